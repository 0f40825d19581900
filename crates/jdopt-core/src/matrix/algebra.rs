//! Container arithmetic.
//!
//! Every operation reads its operands, builds fresh expressions and stores them
//! in the model's arena. The only in-place edit is [`Model::add_assign`].

use std::time::Instant;

use jdopt_expr::{Coefficient, ExprId, LinExpr};
use tracing::debug;

use crate::matrix::const_matrix::ConstKind;
use crate::matrix::expr_matrix::ExprMatrix;
use crate::matrix::operand::Operand;
use crate::matrix::shape::{Axis, Broadcast, Shape};
use crate::model::{Model, ModelError};

impl Model {
    /// Scalar expression behind cell `index` of an operand. Single-cell
    /// operands answer every index.
    pub(crate) fn operand_cell(&self, operand: &Operand, index: usize) -> Result<LinExpr, ModelError> {
        let index = if operand.numel() == 1 { 0 } else { index };
        let shape = operand.shape();
        let out_of_bounds = || ModelError::IndexOutOfBounds {
            row: index / shape.cols,
            col: index % shape.cols,
            shape,
        };
        match operand {
            Operand::Var(matrix) => {
                let id = matrix.cell(index).ok_or_else(out_of_bounds)?;
                Ok(LinExpr::var(*id))
            }
            Operand::Expr(matrix) => {
                let id = matrix.cell(index).ok_or_else(out_of_bounds)?;
                Ok(self.arena.get(*id)?.clone())
            }
            Operand::Const(matrix) => {
                let coeff = matrix.cell(index).ok_or_else(out_of_bounds)?;
                Ok(LinExpr::from_constant(coeff.clone()))
            }
        }
    }

    pub(crate) fn operand_cells(&self, operand: &Operand) -> Result<Vec<LinExpr>, ModelError> {
        (0..operand.numel())
            .map(|index| self.operand_cell(operand, index))
            .collect()
    }

    fn store(&mut self, shape: Shape, exprs: Vec<LinExpr>) -> Result<ExprMatrix, ModelError> {
        let ids: Vec<ExprId> = exprs.into_iter().map(|expr| self.arena.alloc(expr)).collect();
        ExprMatrix::new(shape.rows, shape.cols, ids)
    }

    /// Fresh expression container holding a copy of every cell.
    pub fn expr(&mut self, operand: impl Into<Operand>) -> Result<ExprMatrix, ModelError> {
        let operand = operand.into();
        let exprs = self.operand_cells(&operand)?;
        self.store(operand.shape(), exprs)
    }

    /// Scalar expression stored behind a handle.
    pub fn expr_at(&self, id: ExprId) -> Result<&LinExpr, ModelError> {
        self.arena.get(id)
    }

    /// Edit a stored expression. Every view holding `id` sees the change.
    pub fn expr_mut(&mut self, id: ExprId) -> Result<&mut LinExpr, ModelError> {
        self.arena.get_mut(id)
    }

    /// `lhs + rhs` with scalar broadcasting.
    pub fn add(
        &mut self,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<ExprMatrix, ModelError> {
        self.additive("add", lhs.into(), rhs.into(), &Coefficient::ONE)
    }

    /// `lhs - rhs` with scalar broadcasting.
    pub fn sub(
        &mut self,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<ExprMatrix, ModelError> {
        self.additive("subtract", lhs.into(), rhs.into(), &Coefficient::Literal(-1.0))
    }

    fn additive(
        &mut self,
        operation: &'static str,
        lhs: Operand,
        rhs: Operand,
        rhs_sign: &Coefficient,
    ) -> Result<ExprMatrix, ModelError> {
        let (kind, shape) =
            Broadcast::additive(lhs.shape(), rhs.shape()).ok_or(ModelError::ShapeMismatch {
                operation,
                left: lhs.shape(),
                right: rhs.shape(),
            })?;
        let mut exprs = Vec::with_capacity(shape.numel());
        for index in 0..shape.numel() {
            let mut cell =
                self.operand_cell(&lhs, kind.source_index(lhs.shape(), shape, index))?;
            let other = self.operand_cell(&rhs, kind.source_index(rhs.shape(), shape, index))?;
            cell.add_scaled(rhs_sign, &other);
            exprs.push(cell);
        }
        self.store(shape, exprs)
    }

    /// Multiply every cell by a literal or symbolic constant.
    pub fn scale(
        &mut self,
        operand: impl Into<Operand>,
        factor: impl Into<Coefficient>,
    ) -> Result<ExprMatrix, ModelError> {
        let operand = operand.into();
        let factor = factor.into();
        let exprs = self
            .operand_cells(&operand)?
            .iter()
            .map(|expr| expr.scale(&factor))
            .collect();
        self.store(operand.shape(), exprs)
    }

    pub fn neg(&mut self, operand: impl Into<Operand>) -> Result<ExprMatrix, ModelError> {
        self.scale(operand, -1.0)
    }

    /// `lhs * rhs`: scaling when either side is a single constant, matrix
    /// multiplication otherwise.
    pub fn mul(
        &mut self,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<ExprMatrix, ModelError> {
        let lhs = lhs.into();
        let rhs = rhs.into();
        if let Some(factor) = single_constant(&rhs) {
            return self.scale(lhs, factor);
        }
        if let Some(factor) = single_constant(&lhs) {
            return self.scale(rhs, factor);
        }
        self.matmul(lhs, rhs)
    }

    /// Elementwise product.
    ///
    /// Operands pair up by equal cell count, then by a single-cell side, then
    /// a row vector against each row, then a column vector against each
    /// column. Each cell product needs at least one constant factor.
    pub fn dot_mul(
        &mut self,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<ExprMatrix, ModelError> {
        let lhs = lhs.into();
        let rhs = rhs.into();
        let (kind, shape) =
            Broadcast::product(lhs.shape(), rhs.shape()).ok_or(ModelError::ShapeMismatch {
                operation: "multiply elementwise",
                left: lhs.shape(),
                right: rhs.shape(),
            })?;
        let mut exprs = Vec::with_capacity(shape.numel());
        for index in 0..shape.numel() {
            let left = self.operand_cell(&lhs, kind.source_index(lhs.shape(), shape, index))?;
            let right = self.operand_cell(&rhs, kind.source_index(rhs.shape(), shape, index))?;
            exprs.push(left.try_mul(&right)?);
        }
        debug!(
            component = "matrix",
            operation = "dot_mul",
            status = "success",
            broadcast = kind.as_str(),
            rows = shape.rows,
            cols = shape.cols,
            "Built elementwise product"
        );
        self.store(shape, exprs)
    }

    /// Matrix product: `(A.rows x A.cols) * (B.rows x B.cols)` with
    /// `A.cols == B.rows`.
    ///
    /// A flat constant list on the right is a column when its length equals
    /// `A.cols` and a row when it equals `A.rows`.
    pub fn matmul(
        &mut self,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<ExprMatrix, ModelError> {
        let started = Instant::now();
        let lhs = lhs.into();
        let rhs = rhs.into();
        let left = lhs.shape();
        let right = oriented_shape(left, &rhs)?;
        if left.cols != right.rows {
            return Err(ModelError::ShapeMismatch {
                operation: "multiply",
                left,
                right,
            });
        }

        let left_cells = self.operand_cells(&lhs)?;
        let right_cells = self.operand_cells(&rhs)?;
        let shape = Shape::new(left.rows, right.cols);
        let mut exprs = Vec::with_capacity(shape.numel());
        for row in 0..shape.rows {
            for col in 0..shape.cols {
                let mut acc = LinExpr::new();
                for k in 0..left.cols {
                    let a = &left_cells[left.index(row, k)];
                    let b = &right_cells[right.index(k, col)];
                    acc.add_expr(&a.try_mul(b)?);
                }
                exprs.push(acc);
            }
        }
        debug!(
            component = "matrix",
            operation = "matmul",
            status = "success",
            rows = shape.rows,
            cols = shape.cols,
            inner = left.cols,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Built matrix product"
        );
        self.store(shape, exprs)
    }

    /// Fold every cell into one `1 x 1` expression.
    pub fn sum(&mut self, operand: impl Into<Operand>) -> Result<ExprMatrix, ModelError> {
        let expr = self.sum_expr(&operand.into())?;
        self.store(Shape::scalar(), vec![expr])
    }

    pub(crate) fn sum_expr(&self, operand: &Operand) -> Result<LinExpr, ModelError> {
        let cells = self.operand_cells(operand)?;
        Ok(jdopt_expr::linear_sum(&cells))
    }

    /// Partial sums: [`Axis::Columns`] gives `1 x cols`, [`Axis::Rows`] gives
    /// `rows x 1`.
    pub fn sum_axis(
        &mut self,
        operand: impl Into<Operand>,
        axis: Axis,
    ) -> Result<ExprMatrix, ModelError> {
        let operand = operand.into();
        let shape = operand.shape();
        let cells = self.operand_cells(&operand)?;
        let (result, exprs) = match axis {
            Axis::Columns => {
                let mut sums = vec![LinExpr::new(); shape.cols];
                for (index, cell) in cells.iter().enumerate() {
                    sums[index % shape.cols].add_expr(cell);
                }
                (Shape::new(1, shape.cols), sums)
            }
            Axis::Rows => {
                let mut sums = vec![LinExpr::new(); shape.rows];
                for (index, cell) in cells.iter().enumerate() {
                    sums[index / shape.cols].add_expr(cell);
                }
                (Shape::new(shape.rows, 1), sums)
            }
        };
        self.store(result, exprs)
    }

    /// `target += rhs` in place. `rhs` must match `target` cell for cell or be
    /// a single cell.
    pub fn add_assign(
        &mut self,
        target: &ExprMatrix,
        rhs: impl Into<Operand>,
    ) -> Result<(), ModelError> {
        let rhs = rhs.into();
        let shape = target.shape();
        if rhs.numel() != shape.numel() && rhs.numel() != 1 {
            return Err(ModelError::ShapeMismatch {
                operation: "add in place",
                left: shape,
                right: rhs.shape(),
            });
        }
        let addends = self.operand_cells(&rhs)?;
        for (index, id) in target.ids().iter().enumerate() {
            let addend = &addends[if addends.len() == 1 { 0 } else { index }];
            self.arena.get_mut(*id)?.add_expr(addend);
        }
        Ok(())
    }

    /// Per-cell values from solved variables; `None` where a variable is unsolved.
    pub fn values(&self, operand: impl Into<Operand>) -> Result<Vec<Option<f64>>, ModelError> {
        let operand = operand.into();
        Ok(self
            .operand_cells(&operand)?
            .iter()
            .map(|expr| self.evaluate(expr))
            .collect())
    }

    /// Value of the sum of all cells.
    pub fn value(&self, operand: impl Into<Operand>) -> Result<Option<f64>, ModelError> {
        let expr = self.sum_expr(&operand.into())?;
        Ok(self.evaluate(&expr))
    }

    pub(crate) fn evaluate(&self, expr: &LinExpr) -> Option<f64> {
        expr.value(|id| self.variables.get(&id).and_then(|var| var.solved_value))
    }
}

fn single_constant(operand: &Operand) -> Option<Coefficient> {
    match operand {
        Operand::Const(matrix) if matrix.numel() == 1 => matrix.cell(0).cloned(),
        _ => None,
    }
}

/// Shape of the right matmul operand, orienting flat constant lists.
fn oriented_shape(left: Shape, rhs: &Operand) -> Result<Shape, ModelError> {
    if rhs.const_kind() != Some(ConstKind::Vector) {
        return Ok(rhs.shape());
    }
    let len = rhs.numel();
    match (len == left.cols, len == left.rows) {
        (true, false) => Ok(Shape::new(len, 1)),
        (false, true) => Ok(Shape::new(1, len)),
        _ => Err(ModelError::AmbiguousVectorOrientation {
            len,
            rows: left.rows,
            cols: left.cols,
        }),
    }
}
