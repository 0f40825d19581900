//! jdopt core: matrix-shaped LP/MILP model building, constraint
//! normalization and SOS reformulation.

pub mod config;
pub mod matrix;
pub mod model;
pub mod solver;
pub mod types;

pub use config::ModelConfig;
pub use matrix::{
    Axis, Compare, Comparison, ComparisonChain, ConstKind, ConstMatrix, ExprMatrix, Operand,
    Shape, VarMatrix,
};
pub use model::{ConstraintOptions, MAX_LAZY_LEVEL, Model, ModelDocument, ModelError, PrettyPrintOptions};
pub use solver::{Backend, BackendConstructor, BackendRegistry, Problem};
pub use types::{
    Bounds, Constraint, ConstraintSense, Objective, Sense, SosConstraint, SosMode, SosType,
    Variable, VariableSpec, VariableType,
};
