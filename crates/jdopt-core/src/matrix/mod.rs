//! Matrix-shaped containers over variables, expressions and constants.
//!
//! - [`shape`]: shapes, reduction axes and broadcasting rules
//! - [`var_matrix`], [`expr_matrix`], [`const_matrix`]: the three container kinds
//! - [`operand`]: the sum type accepted by container algebra
//! - [`arena`]: per-model expression storage behind [`ExprMatrix`] handles
//! - [`comparison`]: staged comparisons and chains
//! - [`algebra`]: container arithmetic, implemented on `Model`

pub mod algebra;
pub mod arena;
pub mod comparison;
pub mod const_matrix;
pub mod expr_matrix;
mod grid;
pub mod operand;
pub mod shape;
pub mod var_matrix;

pub use arena::ExprArena;
pub use comparison::{Compare, Comparison, ComparisonChain};
pub use const_matrix::{ConstKind, ConstMatrix};
pub use expr_matrix::ExprMatrix;
pub use operand::Operand;
pub use shape::{Axis, Broadcast, Shape};
pub use var_matrix::VarMatrix;
