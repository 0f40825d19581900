//! Row-major cell storage shared by every container kind.

use std::ops::Range;

use crate::matrix::shape::Shape;
use crate::model::ModelError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Grid<T> {
    shape: Shape,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub(crate) fn new(rows: usize, cols: usize, cells: Vec<T>) -> Result<Self, ModelError> {
        if rows == 0 || cols == 0 || rows * cols != cells.len() {
            return Err(ModelError::InvalidDimensions {
                rows,
                cols,
                cells: cells.len(),
            });
        }
        Ok(Self {
            shape: Shape::new(rows, cols),
            cells,
        })
    }

    pub(crate) fn scalar(cell: T) -> Self {
        Self {
            shape: Shape::scalar(),
            cells: vec![cell],
        }
    }

    pub(crate) fn shape(&self) -> Shape {
        self.shape
    }

    pub(crate) fn cells(&self) -> &[T] {
        &self.cells
    }

    pub(crate) fn into_cells(self) -> Vec<T> {
        self.cells
    }

    pub(crate) fn cell(&self, index: usize) -> Option<&T> {
        self.cells.get(index)
    }

    pub(crate) fn at(&self, row: usize, col: usize) -> Result<Self, ModelError> {
        if row >= self.shape.rows || col >= self.shape.cols {
            return Err(ModelError::IndexOutOfBounds {
                row,
                col,
                shape: self.shape,
            });
        }
        Ok(Self::scalar(self.cells[self.shape.index(row, col)].clone()))
    }

    /// Sub-rectangle `rows x cols` (half-open), copied row by row.
    pub(crate) fn view(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self, ModelError> {
        if rows.start >= rows.end
            || cols.start >= cols.end
            || rows.end > self.shape.rows
            || cols.end > self.shape.cols
        {
            return Err(ModelError::InvalidSlice {
                rows: (rows.start, rows.end),
                cols: (cols.start, cols.end),
                shape: self.shape,
            });
        }
        let mut cells = Vec::with_capacity(rows.len() * cols.len());
        for row in rows.clone() {
            let start = self.shape.index(row, cols.start);
            cells.extend_from_slice(&self.cells[start..start + cols.len()]);
        }
        Ok(Self {
            shape: Shape::new(rows.len(), cols.len()),
            cells,
        })
    }

    pub(crate) fn transpose(&self) -> Self {
        let Shape { rows, cols } = self.shape;
        let mut cells = Vec::with_capacity(self.cells.len());
        for col in 0..cols {
            for row in 0..rows {
                cells.push(self.cells[row * cols + col].clone());
            }
        }
        Self {
            shape: self.shape.transpose(),
            cells,
        }
    }
}

/// Shared view methods for the public container wrappers.
macro_rules! impl_grid_view {
    ($name:ident, $cell:ty) => {
        impl $name {
            pub fn shape(&self) -> $crate::matrix::shape::Shape {
                self.grid.shape()
            }

            pub fn rows(&self) -> usize {
                self.grid.shape().rows
            }

            pub fn cols(&self) -> usize {
                self.grid.shape().cols
            }

            pub fn numel(&self) -> usize {
                self.grid.shape().numel()
            }

            /// Cells in row-major order.
            pub fn cells(&self) -> &[$cell] {
                self.grid.cells()
            }

            pub fn cell(&self, index: usize) -> Option<&$cell> {
                self.grid.cell(index)
            }

            /// `1 x 1` view of cell `(row, col)`.
            pub fn get(&self, row: usize, col: usize) -> Result<Self, $crate::model::ModelError> {
                Ok(Self::from_grid(self.grid.at(row, col)?, self))
            }

            /// View of rows `rows` and columns `cols`, both half-open.
            pub fn slice(
                &self,
                rows: std::ops::Range<usize>,
                cols: std::ops::Range<usize>,
            ) -> Result<Self, $crate::model::ModelError> {
                Ok(Self::from_grid(self.grid.view(rows, cols)?, self))
            }

            pub fn row(&self, row: usize) -> Result<Self, $crate::model::ModelError> {
                self.slice(row..row + 1, 0..self.cols())
            }

            pub fn column(&self, col: usize) -> Result<Self, $crate::model::ModelError> {
                self.slice(0..self.rows(), col..col + 1)
            }

            pub fn transpose(&self) -> Self {
                Self::from_grid(self.grid.transpose(), self)
            }
        }
    };
}

pub(crate) use impl_grid_view;
