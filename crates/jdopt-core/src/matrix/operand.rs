use jdopt_expr::{Coefficient, SymbolicConstant, VariableId};

use crate::matrix::const_matrix::{ConstKind, ConstMatrix};
use crate::matrix::expr_matrix::ExprMatrix;
use crate::matrix::shape::Shape;
use crate::matrix::var_matrix::VarMatrix;
use crate::model::ModelError;

/// Anything that can sit on either side of container algebra or a comparison.
#[derive(Debug, Clone)]
pub enum Operand {
    Var(VarMatrix),
    Expr(ExprMatrix),
    Const(ConstMatrix),
}

impl Operand {
    pub fn shape(&self) -> Shape {
        match self {
            Operand::Var(matrix) => matrix.shape(),
            Operand::Expr(matrix) => matrix.shape(),
            Operand::Const(matrix) => matrix.shape(),
        }
    }

    pub fn numel(&self) -> usize {
        self.shape().numel()
    }

    /// True for a single literal or symbolic constant.
    pub fn is_scalar_constant(&self) -> bool {
        matches!(self, Operand::Const(matrix) if matrix.numel() == 1)
    }

    pub(crate) fn const_kind(&self) -> Option<ConstKind> {
        match self {
            Operand::Const(matrix) => Some(matrix.kind()),
            _ => None,
        }
    }

    pub fn transpose(&self) -> Operand {
        match self {
            Operand::Var(matrix) => Operand::Var(matrix.transpose()),
            Operand::Expr(matrix) => Operand::Expr(matrix.transpose()),
            Operand::Const(matrix) => Operand::Const(matrix.transpose()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Var(_) => "variables",
            Operand::Expr(_) => "expressions",
            Operand::Const(_) => "constants",
        }
    }

    /// Constant operand from a flat list. Fails on an empty list.
    pub fn vector(values: &[f64]) -> Result<Operand, ModelError> {
        Ok(Operand::Const(ConstMatrix::vector(values.iter().copied())?))
    }
}

impl From<VarMatrix> for Operand {
    fn from(matrix: VarMatrix) -> Self {
        Operand::Var(matrix)
    }
}

impl From<&VarMatrix> for Operand {
    fn from(matrix: &VarMatrix) -> Self {
        Operand::Var(matrix.clone())
    }
}

impl From<VariableId> for Operand {
    fn from(id: VariableId) -> Self {
        Operand::Var(VarMatrix::scalar(id))
    }
}

impl From<ExprMatrix> for Operand {
    fn from(matrix: ExprMatrix) -> Self {
        Operand::Expr(matrix)
    }
}

impl From<&ExprMatrix> for Operand {
    fn from(matrix: &ExprMatrix) -> Self {
        Operand::Expr(matrix.clone())
    }
}

impl From<ConstMatrix> for Operand {
    fn from(matrix: ConstMatrix) -> Self {
        Operand::Const(matrix)
    }
}

impl From<&ConstMatrix> for Operand {
    fn from(matrix: &ConstMatrix) -> Self {
        Operand::Const(matrix.clone())
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Const(ConstMatrix::scalar(value))
    }
}

impl From<SymbolicConstant> for Operand {
    fn from(value: SymbolicConstant) -> Self {
        Operand::Const(ConstMatrix::scalar(value))
    }
}

impl From<&SymbolicConstant> for Operand {
    fn from(value: &SymbolicConstant) -> Self {
        Operand::Const(ConstMatrix::scalar(value.clone()))
    }
}

impl From<Coefficient> for Operand {
    fn from(value: Coefficient) -> Self {
        Operand::Const(ConstMatrix::scalar(value))
    }
}

impl From<&Operand> for Operand {
    fn from(operand: &Operand) -> Self {
        operand.clone()
    }
}
