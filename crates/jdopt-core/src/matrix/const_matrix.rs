use jdopt_expr::{Coefficient, SymbolicConstant};

use crate::matrix::grid::{Grid, impl_grid_view};
use crate::model::ModelError;

/// How a constant operand was written down.
///
/// A `Vector` has no fixed orientation; matrix multiplication decides whether
/// it is a row or a column from the other operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstKind {
    Scalar,
    Vector,
    Matrix,
}

/// Row-major matrix of literal or symbolic constants.
#[derive(Debug, Clone)]
pub struct ConstMatrix {
    grid: Grid<Coefficient>,
    kind: ConstKind,
}

impl ConstMatrix {
    pub fn scalar(value: impl Into<Coefficient>) -> Self {
        Self {
            grid: Grid::scalar(value.into()),
            kind: ConstKind::Scalar,
        }
    }

    /// Orientation-free list, stored as `1 x n`.
    pub fn vector<C: Into<Coefficient>>(
        values: impl IntoIterator<Item = C>,
    ) -> Result<Self, ModelError> {
        let cells: Vec<Coefficient> = values.into_iter().map(Into::into).collect();
        Ok(Self {
            grid: Grid::new(1, cells.len(), cells)?,
            kind: ConstKind::Vector,
        })
    }

    /// Matrix from nested rows. Every row must have the same length.
    pub fn from_rows<C: Into<Coefficient>>(rows: Vec<Vec<C>>) -> Result<Self, ModelError> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(row_count * col_count);
        for row in rows {
            if row.len() != col_count {
                return Err(ModelError::InvalidDimensions {
                    rows: row_count,
                    cols: col_count,
                    cells: cells.len() + row.len(),
                });
            }
            cells.extend(row.into_iter().map(Into::into));
        }
        Self::new(row_count, col_count, cells)
    }

    pub fn new(rows: usize, cols: usize, cells: Vec<Coefficient>) -> Result<Self, ModelError> {
        Ok(Self {
            grid: Grid::new(rows, cols, cells)?,
            kind: ConstKind::Matrix,
        })
    }

    fn from_grid(grid: Grid<Coefficient>, parent: &Self) -> Self {
        let kind = if grid.shape().is_scalar() {
            ConstKind::Scalar
        } else if parent.kind == ConstKind::Vector && grid.shape().rows == 1 {
            ConstKind::Vector
        } else {
            ConstKind::Matrix
        };
        Self { grid, kind }
    }

    pub fn kind(&self) -> ConstKind {
        self.kind
    }

    /// Resolved values in row-major order.
    pub fn values(&self) -> Vec<f64> {
        self.grid.cells().iter().map(Coefficient::resolve).collect()
    }
}

impl_grid_view!(ConstMatrix, Coefficient);

impl From<f64> for ConstMatrix {
    fn from(value: f64) -> Self {
        ConstMatrix::scalar(value)
    }
}

impl From<SymbolicConstant> for ConstMatrix {
    fn from(value: SymbolicConstant) -> Self {
        ConstMatrix::scalar(value)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::matrix::shape::Shape;

    #[test]
    fn vector_is_stored_as_a_row() {
        let vector = ConstMatrix::vector([29.0, 28.0, 27.0]).unwrap();
        assert_eq!(vector.kind(), ConstKind::Vector);
        assert_eq!(vector.shape(), Shape::new(1, 3));
        assert_eq!(vector.values(), vec![29.0, 28.0, 27.0]);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = ConstMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err.code(), "MATRIX_INVALID_DIMENSIONS");
    }

    #[test]
    fn empty_vector_is_rejected() {
        assert!(ConstMatrix::vector(Vec::<f64>::new()).is_err());
    }

    #[test]
    fn single_cell_views_become_scalars() {
        let matrix = ConstMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(matrix.kind(), ConstKind::Matrix);
        let cell = matrix.get(1, 0).unwrap();
        assert_eq!(cell.kind(), ConstKind::Scalar);
        assert_eq!(cell.values(), vec![3.0]);
        assert_eq!(matrix.transpose().values(), vec![1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn symbolic_cells_resolve_lazily() {
        let price = SymbolicConstant::named("price", 2.0);
        let matrix = ConstMatrix::vector([price.clone(), price.clone() * 3.0]).unwrap();
        assert_eq!(matrix.values(), vec![2.0, 6.0]);
    }
}
