//! HiGHS implementation of the model's backend boundary.

use std::collections::BTreeMap;
use std::time::Instant;

use jdopt_core::{Backend, BackendRegistry, ConstraintSense, Problem, Sense};
use jdopt_solver::config::{LOG_TO_CONSOLE, MIP_GAP, PRESOLVE, THREADS, TIME_LIMIT, VERBOSITY};
use jdopt_solver::{ParamValue, ParameterBag, SolveOutcome, SolverError, SolverStatus};
use jdopt_tools::memory::MemoryProbe;
use tracing::{debug, trace, warn};

use crate::highs_model::{HighsModel, HighsModelError, HighsOption, HighsStatus, ObjectiveSense};

/// Key [`register`] uses.
pub const BACKEND_KEY: &str = "highs";

/// Result key carrying the raw HiGHS model status.
pub const RESULT_HIGHS_STATUS: &str = "HighsStatus";

/// Result key carrying the largest resident set size seen during the solve.
pub const RESULT_PEAK_RSS: &str = "PeakRssBytes";

fn highs_model_error_to_solver_error(err: HighsModelError) -> SolverError {
    SolverError::InternalError(err.to_string())
}

/// LP/MILP backend over HiGHS. Native SOS sets are not supported; build
/// models with SOS reformulation.
#[derive(Debug, Clone, Default)]
pub struct HighsBackend {
    defaults: ParameterBag,
}

impl HighsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters applied before the per-solve bag, which wins on conflicts.
    pub fn with_defaults(defaults: ParameterBag) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ParameterBag {
        &self.defaults
    }
}

fn create_backend() -> Box<dyn Backend> {
    Box::new(HighsBackend::new())
}

/// Make HiGHS available as `"highs"`.
pub fn register(registry: &mut BackendRegistry) {
    registry.register(BACKEND_KEY, create_backend);
}

impl Backend for HighsBackend {
    fn name(&self) -> &str {
        BACKEND_KEY
    }

    fn solve(
        &mut self,
        problem: &Problem<'_>,
        params: &ParameterBag,
    ) -> Result<SolveOutcome, SolverError> {
        let mut merged = self.defaults.clone();
        merged.extend_from(params);
        solve_problem(problem, &merged)
    }
}

fn invalid_parameter(key: &str, value: &ParamValue, expected: &str) -> SolverError {
    SolverError::InvalidParameter {
        key: key.to_string(),
        reason: format!("expected {expected}, got {}", value.kind()),
    }
}

/// Translate a parameter bag into HiGHS options. Keys without a well-known
/// meaning are passed through under their own name.
pub(crate) fn apply_parameters(
    highs_model: &mut HighsModel,
    params: &ParameterBag,
) -> Result<(), SolverError> {
    for (key, value) in params.iter() {
        match key {
            TIME_LIMIT => {
                let seconds = value
                    .as_double()
                    .ok_or_else(|| invalid_parameter(key, value, "double"))?;
                highs_model.set_option("time_limit", HighsOption::Float(seconds));
            }
            MIP_GAP => {
                let gap = value
                    .as_double()
                    .ok_or_else(|| invalid_parameter(key, value, "double"))?;
                highs_model.set_option("mip_rel_gap", HighsOption::Float(gap));
            }
            THREADS => {
                let threads = value
                    .as_int()
                    .and_then(|threads| i32::try_from(threads).ok())
                    .ok_or_else(|| invalid_parameter(key, value, "int"))?;
                highs_model.set_option("threads", HighsOption::Int(threads));
            }
            VERBOSITY => {
                let level = value
                    .as_int()
                    .and_then(|level| u32::try_from(level).ok())
                    .ok_or_else(|| invalid_parameter(key, value, "non-negative int"))?;
                highs_model.set_verbosity(level);
            }
            PRESOLVE => {
                let enabled = value
                    .as_int()
                    .ok_or_else(|| invalid_parameter(key, value, "int"))?;
                let presolve = if enabled != 0 { "on" } else { "off" };
                highs_model.set_option("presolve", HighsOption::Str(presolve.to_string()));
            }
            LOG_TO_CONSOLE => {
                let enabled = value
                    .as_int()
                    .ok_or_else(|| invalid_parameter(key, value, "int"))?;
                highs_model.set_log_to_console(enabled != 0);
            }
            _ => {
                let option = match value {
                    ParamValue::Int(raw) => i32::try_from(*raw)
                        .map(HighsOption::Int)
                        .map_err(|_| invalid_parameter(key, value, "32-bit int"))?,
                    ParamValue::Double(raw) => HighsOption::Float(*raw),
                    ParamValue::Str(raw) => HighsOption::Str(raw.clone()),
                };
                trace!(
                    component = "solver",
                    operation = "apply_parameters",
                    status = "success",
                    key,
                    "Passing option through to HiGHS"
                );
                highs_model.set_option(key, option);
            }
        }
    }
    Ok(())
}

fn add_variables_to_highs(
    problem: &Problem<'_>,
    highs_model: &mut HighsModel,
) -> Result<BTreeMap<u32, usize>, SolverError> {
    let mut objective_coeffs: BTreeMap<u32, f64> = BTreeMap::new();
    for (var, coeff) in problem.objective.expr.normalized_terms() {
        objective_coeffs.insert(var.inner(), coeff);
    }

    let mut var_to_col = BTreeMap::new();
    for variable in problem.variables {
        let id = variable.id().inner();
        let bounds = variable.bounds();
        let obj_coeff = objective_coeffs.remove(&id).unwrap_or(0.0);
        let col = if variable.var_type().is_integral() {
            highs_model.add_integer_col(bounds.lower, bounds.upper, obj_coeff)
        } else {
            highs_model.add_col(bounds.lower, bounds.upper, obj_coeff)
        };
        var_to_col.insert(id, col);
    }

    // Objective terms over variables the problem does not declare.
    if let Some(&unknown) = objective_coeffs.keys().next() {
        return Err(SolverError::InvalidVariableId(unknown));
    }

    debug!(
        component = "solver",
        operation = "add_variables",
        status = "success",
        num_vars = var_to_col.len(),
        "Added all variables to HiGHS"
    );
    Ok(var_to_col)
}

fn add_constraints_to_highs(
    problem: &Problem<'_>,
    highs_model: &mut HighsModel,
    var_to_col: &BTreeMap<u32, usize>,
) -> Result<(), SolverError> {
    let started = Instant::now();
    for constraint in problem.constraints {
        let terms = constraint.expr().normalized_terms();
        let mut columns = Vec::with_capacity(terms.len());
        let mut coefficients = Vec::with_capacity(terms.len());
        for (var, coeff) in terms {
            let col = var_to_col
                .get(&var.inner())
                .copied()
                .ok_or(SolverError::InvalidVariableId(var.inner()))?;
            columns.push(col);
            coefficients.push(coeff);
        }
        // expr <= 0 and expr == 0 with the constant moved right.
        let rhs = constraint.rhs();
        let lower = match constraint.sense() {
            ConstraintSense::LessEqual => f64::NEG_INFINITY,
            ConstraintSense::Equal => rhs,
        };
        highs_model
            .add_row(lower, rhs, &columns, &coefficients)
            .map_err(highs_model_error_to_solver_error)?;
    }

    debug!(
        component = "solver",
        operation = "add_constraints",
        status = "success",
        num_constraints = problem.constraints.len(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Added all constraints to HiGHS"
    );
    Ok(())
}

/// Snapshot RSS for `stage`; platforms without process memory info are skipped.
fn record_memory(memory: &mut MemoryProbe, stage: &str) {
    if let Err(err) = memory.record(stage) {
        trace!(
            component = "memory",
            operation = "record",
            status = "skipped",
            stage,
            error = %err,
            "Memory snapshot unavailable"
        );
    }
}

fn solve_problem(problem: &Problem<'_>, params: &ParameterBag) -> Result<SolveOutcome, SolverError> {
    if problem.variables.is_empty() {
        return Err(SolverError::EmptyModel);
    }
    if !problem.sos.is_empty() {
        return Err(SolverError::NativeSosUnsupported {
            backend: BACKEND_KEY.to_string(),
        });
    }

    let mut memory = MemoryProbe::new();
    record_memory(&mut memory, "solve_start");
    let solve_started = Instant::now();
    debug!(
        component = "solver",
        operation = "solve",
        status = "start",
        solver = BACKEND_KEY,
        variables = problem.variables.len(),
        constraints = problem.constraints.len(),
        "Starting solve process"
    );

    let mut highs_model = HighsModel::new();
    apply_parameters(&mut highs_model, params)?;
    highs_model.set_objective_sense(match problem.objective.sense {
        Sense::Minimize => ObjectiveSense::Minimize,
        Sense::Maximize => ObjectiveSense::Maximize,
    });

    let var_to_col = add_variables_to_highs(problem, &mut highs_model)?;
    add_constraints_to_highs(problem, &mut highs_model, &var_to_col)?;
    record_memory(&mut memory, "highs_build");

    let highs_status = highs_model.solve();
    let status = SolverStatus::from(highs_status);
    let solve_seconds = solve_started.elapsed().as_secs_f64();
    record_memory(&mut memory, "solve_end");
    let rss_after = memory.snapshots().last().map(|snapshot| snapshot.rss_bytes);
    let rss_delta = memory.last_delta();

    let mut outcome = SolveOutcome::new(status).with_solve_time(solve_seconds);
    outcome
        .results
        .set(RESULT_HIGHS_STATUS, highs_status.as_str());
    if let Some((stage, peak)) = memory.peak() {
        trace!(
            component = "memory",
            operation = "peak",
            status = "success",
            stage,
            rss_bytes = peak,
            "Peak memory during solve"
        );
        outcome
            .results
            .set(RESULT_PEAK_RSS, i64::try_from(peak).unwrap_or(i64::MAX));
    }

    if !highs_status.has_solution() {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = BACKEND_KEY,
            solver_status = highs_status.as_str(),
            duration_ms = solve_seconds * 1000.0,
            rss_bytes = ?rss_after,
            rss_delta_bytes = ?rss_delta,
            "Solver did not find a solution"
        );
        for variable in problem.variables {
            outcome = outcome.with_value(variable.id().inner(), None);
        }
        return Ok(outcome);
    }
    if highs_status != HighsStatus::Optimal {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = BACKEND_KEY,
            solver_status = highs_status.as_str(),
            "Solver hit limit but returning best solution found"
        );
    }

    let snapshot = highs_model
        .solution_snapshot()
        .map_err(highs_model_error_to_solver_error)?;
    for (&id, &col) in &var_to_col {
        outcome = outcome.with_value(id, snapshot.col_values.get(col).copied());
    }
    let objective = &problem.objective.expr;
    let objective_value = objective.value(|var| {
        var_to_col
            .get(&var.inner())
            .and_then(|&col| snapshot.col_values.get(col).copied())
    });
    if let Some(value) = objective_value {
        outcome = outcome.with_objective_value(value);
    }

    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = BACKEND_KEY,
        solver_status = highs_status.as_str(),
        objective_value = ?objective_value,
        duration_ms = solve_seconds * 1000.0,
        rss_bytes = ?rss_after,
        rss_delta_bytes = ?rss_delta,
        "HiGHS solve completed"
    );
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_parameters_map_to_options() {
        let mut model = HighsModel::new();
        let params = ParameterBag::new()
            .with_time_limit(30.0)
            .with_mip_gap(0.01)
            .with_threads(2)
            .with_presolve(false);
        apply_parameters(&mut model, &params).unwrap();

        let options = model.options();
        assert!(options.contains(&("time_limit".to_string(), HighsOption::Float(30.0))));
        assert!(options.contains(&("mip_rel_gap".to_string(), HighsOption::Float(0.01))));
        assert!(options.contains(&("threads".to_string(), HighsOption::Int(2))));
        assert!(options.contains(&(
            "presolve".to_string(),
            HighsOption::Str("off".to_string())
        )));
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let mut model = HighsModel::new();
        let params = ParameterBag::new()
            .with("random_seed", 7_i64)
            .with("solver", "simplex");
        apply_parameters(&mut model, &params).unwrap();
        assert_eq!(
            model.options(),
            &[
                ("random_seed".to_string(), HighsOption::Int(7)),
                ("solver".to_string(), HighsOption::Str("simplex".to_string())),
            ]
        );
    }

    #[test]
    fn test_mistyped_well_known_key_is_rejected() {
        let mut model = HighsModel::new();
        let params = ParameterBag::new().with(TIME_LIMIT, "soon");
        assert_eq!(
            apply_parameters(&mut model, &params),
            Err(SolverError::InvalidParameter {
                key: TIME_LIMIT.to_string(),
                reason: "expected double, got string".to_string(),
            })
        );
    }

    #[test]
    fn test_register_adds_highs_key() {
        let mut registry = BackendRegistry::new();
        register(&mut registry);
        assert!(registry.contains(BACKEND_KEY));
        let backend = registry.create(BACKEND_KEY).unwrap();
        assert_eq!(backend.name(), "highs");
        assert!(!backend.supports_native_sos());
    }
}
