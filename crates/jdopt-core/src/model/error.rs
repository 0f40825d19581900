//! Model error types.

use jdopt_expr::{ConstraintId, ExprError, ExprId, VariableId};

use crate::matrix::Shape;
use crate::types::ConstraintSense;

/// Errors that can occur during model operations
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Operand shapes cannot be combined by the operation
    ShapeMismatch {
        operation: &'static str,
        left: Shape,
        right: Shape,
    },
    /// Container cell count does not match `rows * cols`
    InvalidDimensions {
        rows: usize,
        cols: usize,
        cells: usize,
    },
    /// Cell index outside the container
    IndexOutOfBounds { row: usize, col: usize, shape: Shape },
    /// Empty or out-of-range slice
    InvalidSlice {
        rows: (usize, usize),
        cols: (usize, usize),
        shape: Shape,
    },
    /// A flat constant list fits both or neither orientation
    AmbiguousVectorOrientation { len: usize, rows: usize, cols: usize },
    /// Product of two expressions that both contain variables
    NonLinearProduct,
    /// Constraint without variables whose constant violates its sense
    InfeasibleConstantConstraint {
        constant: f64,
        sense: ConstraintSense,
    },
    /// SOS member without finite bounds around zero
    UnsupportedSemicontinuousBounds {
        var: VariableId,
        lower: f64,
        upper: f64,
    },
    /// Unrecognized variable type name
    UnknownVariableType { name: String },
    /// Comparison operator with no constraint meaning
    BadComparisonOperator { symbol: String },
    /// Named constant not present in the registry
    UnregisteredConstant { name: String },
    /// Invalid variable ID
    InvalidVariableId(VariableId),
    /// Invalid constraint ID
    InvalidConstraintId(ConstraintId),
    /// Expression handle not present in the arena
    InvalidExprId(ExprId),
    /// Invalid variable bounds
    InvalidVariableBounds { lower: f64, upper: f64 },
    /// Lazy level outside `0..=31`
    InvalidLazyLevel { level: u8 },
    /// SOS weights do not line up with the variables
    InvalidSosWeights { variables: usize, weights: usize },
    /// No objective set
    NoObjective,
    /// Merged models share an id
    IdCollision { kind: &'static str, id: u32 },
    /// Reading or writing a model document failed
    Persistence { reason: String },
    /// Expression construction failed
    Expr(ExprError),
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::ShapeMismatch { .. } => "MATRIX_SHAPE_MISMATCH",
            ModelError::InvalidDimensions { .. } => "MATRIX_INVALID_DIMENSIONS",
            ModelError::IndexOutOfBounds { .. } => "MATRIX_INDEX_OUT_OF_BOUNDS",
            ModelError::InvalidSlice { .. } => "MATRIX_INVALID_SLICE",
            ModelError::AmbiguousVectorOrientation { .. } => "MATRIX_AMBIGUOUS_VECTOR",
            ModelError::NonLinearProduct => "EXPR_NON_LINEAR_PRODUCT",
            ModelError::InfeasibleConstantConstraint { .. } => "CONSTRAINT_INFEASIBLE_CONSTANT",
            ModelError::UnsupportedSemicontinuousBounds { .. } => "SOS_UNSUPPORTED_BOUNDS",
            ModelError::UnknownVariableType { .. } => "VARIABLE_UNKNOWN_TYPE",
            ModelError::BadComparisonOperator { .. } => "EXPR_BAD_COMPARISON_OPERATOR",
            ModelError::UnregisteredConstant { .. } => "CONSTANT_UNREGISTERED",
            ModelError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            ModelError::InvalidConstraintId(_) => "CONSTRAINT_INVALID_ID",
            ModelError::InvalidExprId(_) => "EXPR_INVALID_ID",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::InvalidLazyLevel { .. } => "CONSTRAINT_INVALID_LAZY_LEVEL",
            ModelError::InvalidSosWeights { .. } => "SOS_INVALID_WEIGHTS",
            ModelError::NoObjective => "OBJECTIVE_MISSING",
            ModelError::IdCollision { .. } => "MODEL_ID_COLLISION",
            ModelError::Persistence { .. } => "MODEL_PERSISTENCE",
            ModelError::Expr(err) => err.code(),
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ShapeMismatch {
                operation,
                left,
                right,
            } => write!(
                f,
                "[{}] Cannot {} shapes {} and {}",
                self.code(),
                operation,
                left,
                right
            ),
            ModelError::InvalidDimensions { rows, cols, cells } => write!(
                f,
                "[{}] A {}x{} container needs {} cells, got {}",
                self.code(),
                rows,
                cols,
                rows * cols,
                cells
            ),
            ModelError::IndexOutOfBounds { row, col, shape } => write!(
                f,
                "[{}] Cell ({}, {}) is outside a {} container",
                self.code(),
                row,
                col,
                shape
            ),
            ModelError::InvalidSlice { rows, cols, shape } => write!(
                f,
                "[{}] Slice rows {}..{} cols {}..{} does not fit a {} container",
                self.code(),
                rows.0,
                rows.1,
                cols.0,
                cols.1,
                shape
            ),
            ModelError::AmbiguousVectorOrientation { len, rows, cols } => write!(
                f,
                "[{}] Cannot orient a list of {} values against a {}x{} container",
                self.code(),
                len,
                rows,
                cols
            ),
            ModelError::NonLinearProduct => write!(
                f,
                "[{}] Product of two expressions with variables is not linear",
                self.code()
            ),
            ModelError::InfeasibleConstantConstraint { constant, sense } => write!(
                f,
                "[{}] Constraint without variables is infeasible: {} {} 0",
                self.code(),
                constant,
                sense.symbol()
            ),
            ModelError::UnsupportedSemicontinuousBounds { var, lower, upper } => write!(
                f,
                "[{}] SOS member {} needs finite bounds around zero (got [{}, {}])",
                self.code(),
                var.inner(),
                lower,
                upper
            ),
            ModelError::UnknownVariableType { name } => {
                write!(f, "[{}] Unknown variable type '{}'", self.code(), name)
            }
            ModelError::BadComparisonOperator { symbol } => write!(
                f,
                "[{}] Operator '{}' cannot build a constraint",
                self.code(),
                symbol
            ),
            ModelError::UnregisteredConstant { name } => write!(
                f,
                "[{}] Named constant '{}' is not registered",
                self.code(),
                name
            ),
            ModelError::InvalidVariableId(id) => write!(
                f,
                "[{}] Variable ID {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::InvalidConstraintId(id) => write!(
                f,
                "[{}] Constraint ID {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::InvalidExprId(id) => write!(
                f,
                "[{}] Expression handle {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::InvalidVariableBounds { lower, upper } => write!(
                f,
                "[{}] Variable bounds invalid: lower ({}) > upper ({})",
                self.code(),
                lower,
                upper
            ),
            ModelError::InvalidLazyLevel { level } => write!(
                f,
                "[{}] Lazy level must be at most 31 (got {})",
                self.code(),
                level
            ),
            ModelError::InvalidSosWeights { variables, weights } => write!(
                f,
                "[{}] SOS set has {} variables but {} weights",
                self.code(),
                variables,
                weights
            ),
            ModelError::NoObjective => {
                write!(f, "[{}] Model has no objective defined", self.code())
            }
            ModelError::IdCollision { kind, id } => write!(
                f,
                "[{}] Both models use {} ID {}; seed disjoint id ranges before merging",
                self.code(),
                kind,
                id
            ),
            ModelError::Persistence { reason } => {
                write!(f, "[{}] Model document invalid: {}", self.code(), reason)
            }
            ModelError::Expr(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Expr(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExprError> for ModelError {
    fn from(err: ExprError) -> Self {
        match err {
            ExprError::NonLinearProduct => ModelError::NonLinearProduct,
            ExprError::BadComparisonOperator { symbol } => {
                ModelError::BadComparisonOperator { symbol }
            }
            ExprError::UnregisteredConstant { name } => ModelError::UnregisteredConstant { name },
            other => ModelError::Expr(other),
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Persistence {
            reason: err.to_string(),
        }
    }
}
