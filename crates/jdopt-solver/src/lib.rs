//! Shared solver abstractions for jdopt.
//!
//! This crate provides the types a backend (like `jdopt-highs`) and the model
//! layer agree on.
//!
//! # Overview
//!
//! - [`ParameterBag`]: string-keyed int/double/string solver parameters
//! - [`SolverStatus`]: Common status values across solvers
//! - [`SolverError`]: Error types for solver operations
//! - [`SolveOutcome`]: per-variable values and result parameters
//! - [`SolutionView`]: Trait for accessing solution data

pub mod config;
mod error;
mod status;
mod traits;

pub use config::{ParamValue, ParameterBag};
pub use error::SolverError;
pub use status::SolverStatus;
pub use traits::{SolutionView, SolveOutcome};
