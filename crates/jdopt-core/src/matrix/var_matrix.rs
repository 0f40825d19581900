use jdopt_expr::VariableId;

use crate::matrix::grid::{Grid, impl_grid_view};
use crate::model::ModelError;

/// Row-major matrix of variables.
///
/// Views (`get`, `slice`, `transpose`) share variable identity with their
/// parent: they hold the same ids.
#[derive(Debug, Clone, PartialEq)]
pub struct VarMatrix {
    grid: Grid<VariableId>,
}

impl VarMatrix {
    pub fn new(rows: usize, cols: usize, ids: Vec<VariableId>) -> Result<Self, ModelError> {
        Ok(Self {
            grid: Grid::new(rows, cols, ids)?,
        })
    }

    pub fn scalar(id: VariableId) -> Self {
        Self {
            grid: Grid::scalar(id),
        }
    }

    /// `1 x n` row of ids.
    pub fn row_vector(ids: Vec<VariableId>) -> Result<Self, ModelError> {
        Self::new(1, ids.len(), ids)
    }

    fn from_grid(grid: Grid<VariableId>, _parent: &Self) -> Self {
        Self { grid }
    }

    pub fn ids(&self) -> &[VariableId] {
        self.grid.cells()
    }

    pub fn into_ids(self) -> Vec<VariableId> {
        self.grid.into_cells()
    }
}

impl_grid_view!(VarMatrix, VariableId);

impl From<VariableId> for VarMatrix {
    fn from(id: VariableId) -> Self {
        VarMatrix::scalar(id)
    }
}
