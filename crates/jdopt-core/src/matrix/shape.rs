//! Container shapes and broadcasting rules.
//!
//! Every container is two-dimensional and row-major: cell `(x, y)` lives at
//! linear index `x * cols + y`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn scalar() -> Self {
        Self::new(1, 1)
    }

    /// Total number of cells.
    pub fn numel(self) -> usize {
        self.rows * self.cols
    }

    pub fn is_scalar(self) -> bool {
        self.numel() == 1
    }

    pub fn is_row_vector(self) -> bool {
        self.rows == 1
    }

    pub fn is_column_vector(self) -> bool {
        self.cols == 1
    }

    pub fn transpose(self) -> Self {
        Self::new(self.cols, self.rows)
    }

    pub fn index(self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}x{})", self.rows, self.cols)
    }
}

/// Direction of a partial reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Sum down each column, giving a `1 x cols` row.
    Columns,
    /// Sum across each row, giving a `rows x 1` column.
    Rows,
}

/// How the two operands of an elementwise operation line up.
///
/// Resolution order: equal cell counts, then a single-cell side, then a row
/// vector matching the other side's columns, then a column vector matching
/// its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Broadcast {
    Elementwise,
    Scalar,
    Rows,
    Columns,
}

impl Broadcast {
    /// Kind and result shape for `+`/`-`. Only full-size and scalar pairing apply.
    pub fn additive(left: Shape, right: Shape) -> Option<(Broadcast, Shape)> {
        if left.numel() == right.numel() {
            Some((Broadcast::Elementwise, left))
        } else if right.is_scalar() {
            Some((Broadcast::Scalar, left))
        } else if left.is_scalar() {
            Some((Broadcast::Scalar, right))
        } else {
            None
        }
    }

    /// Kind and result shape for the elementwise product.
    pub fn product(left: Shape, right: Shape) -> Option<(Broadcast, Shape)> {
        if let Some(resolved) = Self::additive(left, right) {
            return Some(resolved);
        }
        if right.is_row_vector() && right.cols == left.cols {
            Some((Broadcast::Rows, left))
        } else if right.is_column_vector() && right.rows == left.rows {
            Some((Broadcast::Columns, left))
        } else if left.is_row_vector() && left.cols == right.cols {
            Some((Broadcast::Rows, right))
        } else if left.is_column_vector() && left.rows == right.rows {
            Some((Broadcast::Columns, right))
        } else {
            None
        }
    }

    /// Linear index into an operand of shape `side` feeding result cell `index`.
    pub fn source_index(self, side: Shape, result: Shape, index: usize) -> usize {
        if side.numel() == result.numel() {
            return index;
        }
        match self {
            Broadcast::Elementwise => index,
            Broadcast::Scalar => 0,
            Broadcast::Rows => index % result.cols,
            Broadcast::Columns => index / result.cols,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Broadcast::Elementwise => "elementwise",
            Broadcast::Scalar => "scalar",
            Broadcast::Rows => "rows",
            Broadcast::Columns => "columns",
        }
    }
}
