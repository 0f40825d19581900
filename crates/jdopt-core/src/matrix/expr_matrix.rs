use jdopt_expr::ExprId;

use crate::matrix::grid::{Grid, impl_grid_view};
use crate::model::ModelError;

/// Row-major matrix of handles into a model's expression arena.
///
/// Every view over the same cells holds the same [`ExprId`]s, so editing a
/// cell through `Model::add_assign` or `Model::expr_mut` on a view is seen
/// through the parent and through every other view.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprMatrix {
    grid: Grid<ExprId>,
}

impl ExprMatrix {
    pub(crate) fn new(rows: usize, cols: usize, ids: Vec<ExprId>) -> Result<Self, ModelError> {
        Ok(Self {
            grid: Grid::new(rows, cols, ids)?,
        })
    }

    fn from_grid(grid: Grid<ExprId>, _parent: &Self) -> Self {
        Self { grid }
    }

    pub fn ids(&self) -> &[ExprId] {
        self.grid.cells()
    }

    /// Handle of the only cell of a `1 x 1` matrix.
    pub fn scalar_id(&self) -> Option<ExprId> {
        match self.grid.cells() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

impl_grid_view!(ExprMatrix, ExprId);
