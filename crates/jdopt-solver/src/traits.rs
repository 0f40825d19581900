//! Solve outcomes and the read-only view over them.

use std::collections::BTreeMap;

use crate::config::{RESULT_OBJECTIVE, RESULT_SOLVE_TIME, RESULT_STATUS};
use crate::{ParameterBag, SolverStatus};

/// Trait for accessing solution data from a solver.
pub trait SolutionView {
    fn status(&self) -> SolverStatus;

    /// Objective value, `None` when the backend produced no solution.
    fn objective_value(&self) -> Option<f64>;

    /// Solved value for a variable id.
    fn value(&self, var_id: u32) -> Option<f64>;

    /// Get the solve time in seconds.
    fn solve_time_seconds(&self) -> f64;

    fn is_optimal(&self) -> bool {
        self.status().is_optimal()
    }

    fn is_feasible(&self) -> bool {
        self.status().is_feasible()
    }
}

/// What a backend hands back after a solve.
///
/// `values` is keyed by variable id; a variable the backend could not value
/// maps to `None`. `results` carries any extra result parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolverStatus,
    pub objective_value: Option<f64>,
    pub solve_time_seconds: f64,
    pub values: BTreeMap<u32, Option<f64>>,
    pub results: ParameterBag,
}

impl SolveOutcome {
    pub fn new(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            solve_time_seconds: 0.0,
            values: BTreeMap::new(),
            results: ParameterBag::new(),
        }
    }

    pub fn with_objective_value(mut self, value: f64) -> Self {
        self.objective_value = Some(value);
        self
    }

    pub fn with_solve_time(mut self, seconds: f64) -> Self {
        self.solve_time_seconds = seconds;
        self
    }

    pub fn with_value(mut self, var_id: u32, value: Option<f64>) -> Self {
        self.values.insert(var_id, value);
        self
    }

    /// Result parameters including status code, objective and solve time.
    pub fn result_parameters(&self) -> ParameterBag {
        let mut bag = self.results.clone();
        bag.set(RESULT_STATUS, self.status.code());
        bag.set(RESULT_SOLVE_TIME, self.solve_time_seconds);
        if let Some(objective) = self.objective_value {
            bag.set(RESULT_OBJECTIVE, objective);
        }
        bag
    }
}

impl SolutionView for SolveOutcome {
    fn status(&self) -> SolverStatus {
        self.status
    }

    fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    fn value(&self, var_id: u32) -> Option<f64> {
        self.values.get(&var_id).copied().flatten()
    }

    fn solve_time_seconds(&self) -> f64 {
        self.solve_time_seconds
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_view_reads_values() {
        let outcome = SolveOutcome::new(SolverStatus::Optimal)
            .with_objective_value(12.5)
            .with_value(0, Some(1.0))
            .with_value(1, None);

        assert!(outcome.is_optimal());
        assert!(outcome.is_feasible());
        assert_eq!(outcome.value(0), Some(1.0));
        assert_eq!(outcome.value(1), None);
        assert_eq!(outcome.value(7), None);
        assert_eq!(SolutionView::objective_value(&outcome), Some(12.5));
    }

    #[test]
    fn test_outcome_infeasible_is_not_feasible() {
        let outcome = SolveOutcome::new(SolverStatus::Infeasible);
        assert!(!outcome.is_optimal());
        assert!(!outcome.is_feasible());
    }

    #[test]
    fn test_result_parameters_include_status() {
        let mut outcome = SolveOutcome::new(SolverStatus::ReachedTimeLimit)
            .with_objective_value(3.0)
            .with_solve_time(0.25);
        outcome.results.set("simplex_iterations", 17_i64);

        let bag = outcome.result_parameters();
        assert_eq!(
            bag.get_int(RESULT_STATUS),
            Some(SolverStatus::ReachedTimeLimit.code())
        );
        assert_eq!(bag.get_double(RESULT_OBJECTIVE), Some(3.0));
        assert_eq!(bag.get_double(RESULT_SOLVE_TIME), Some(0.25));
        assert_eq!(bag.get_int("simplex_iterations"), Some(17));
    }
}
