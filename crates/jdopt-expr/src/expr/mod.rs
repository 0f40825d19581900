//! Expression types for optimization modeling.
//!
//! - `coefficient` - Coefficient: literal or symbolic number
//! - `core`        - Term and LinExpr: constant + ordered terms
//! - `constraint`  - ComparisonSense used when staging constraints
//! - `builders`    - helpers assembling expressions from raw inputs
//! - `error`       - Expression construction errors

pub mod builders;
pub mod coefficient;
pub mod constraint;
pub mod core;
pub mod error;

pub use builders::{linear_sum, linear_terms};
pub use coefficient::Coefficient;
pub use constraint::ComparisonSense;
pub use core::{LinExpr, Term};
pub use error::ExprError;
