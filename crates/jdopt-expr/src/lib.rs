//! Scalar algebra for jdopt models: linear expressions, symbolic constants and
//! the named-constant registry.

pub mod constant;
pub mod expr;
pub mod ids;
pub mod registry;

pub use constant::{BinaryOp, Leaf, SymbolicConstant, UnaryOp};
pub use expr::{Coefficient, ComparisonSense, ExprError, LinExpr, Term, linear_sum, linear_terms};
pub use ids::{ConstraintId, ExprId, VariableId};
pub use registry::NamedConstRegistry;
