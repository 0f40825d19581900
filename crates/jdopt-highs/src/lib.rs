//! HiGHS backend for jdopt models.
//!
//! [`HighsBackend`] turns the normalized rows of a model into a HiGHS row
//! problem: every variable becomes a column (binary and integer variables as
//! integer columns), `expr <= 0` rows get bounds `[-inf, -c]` and `expr == 0`
//! rows `[-c, -c]`, where `c` is the row constant.
//!
//! ```no_run
//! use jdopt_core::{BackendRegistry, Model};
//! use jdopt_solver::ParameterBag;
//!
//! let mut registry = BackendRegistry::new();
//! jdopt_highs::register(&mut registry);
//! let mut model = Model::new();
//! // ... build the model ...
//! let outcome = model.solve_with(&registry, "highs", &ParameterBag::new());
//! ```

pub mod backend;
pub mod highs_model;

pub use backend::{BACKEND_KEY, HighsBackend, RESULT_HIGHS_STATUS, RESULT_PEAK_RSS, register};
pub use highs_model::{HighsModel, HighsModelError, HighsOption, HighsStatus, ObjectiveSense};
