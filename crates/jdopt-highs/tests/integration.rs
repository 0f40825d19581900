#![allow(clippy::float_cmp)]

use jdopt_core::{
    BackendRegistry, Compare, ConstMatrix, ConstraintOptions, Model, ModelConfig, SosMode,
    VarMatrix, VariableSpec,
};
use jdopt_highs::HighsBackend;
use jdopt_solver::{ParameterBag, SolverError, SolverStatus};

const TOL: f64 = 1e-6;

fn assert_close(actual: Option<f64>, expected: f64) {
    let value = actual.unwrap_or_else(|| panic!("expected {expected}, got no value"));
    assert!(
        (value - expected).abs() < TOL,
        "expected {expected}, got {value}"
    );
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn solve(model: &mut Model) -> jdopt_solver::SolveOutcome {
    let mut backend = HighsBackend::new();
    model
        .solve(&mut backend, &ParameterBag::new())
        .unwrap_or_else(|err| panic!("{err}"))
}

fn bounded(model: &mut Model, rows: usize, cols: usize, lower: f64, upper: f64) -> VarMatrix {
    model
        .add_variables(rows, cols, VariableSpec::continuous().with_bounds(lower, upper))
        .unwrap()
}

#[test]
fn test_equality_rows_pin_the_vector() {
    init_tracing();
    let mut model = Model::new();
    let x = bounded(&mut model, 1, 3, -50.0, 50.0);
    let targets = ConstMatrix::from_rows(vec![vec![29.0, 28.0, 27.0]]).unwrap();
    model
        .add_constraint((&x).equals(&targets), ConstraintOptions::named("pin"))
        .unwrap();
    let total = model.sum(&x).unwrap();
    model.maximize(&total).unwrap();

    let outcome = solve(&mut model);
    assert_eq!(outcome.status, SolverStatus::Optimal);
    let values = model.values(&x).unwrap();
    for (value, expected) in values.into_iter().zip([29.0, 28.0, 27.0]) {
        assert_close(value, expected);
    }
    assert_close(outcome.objective_value, 84.0);
    assert_close(model.value(&total).unwrap(), 84.0);
}

#[test]
fn test_sos1_reformulation_picks_one_member() {
    let mut model = Model::new();
    let x = bounded(&mut model, 1, 4, 0.0, 10.0);
    model.add_sos1(x.ids(), &[1.0, 2.0, 3.0, 4.0]).unwrap();
    let weights = ConstMatrix::vector([1.0, 2.0, 3.0, 4.0]).unwrap();
    let weighted = model.mul(&x, &weights).unwrap();
    model.maximize(&weighted).unwrap();

    let outcome = solve(&mut model);
    assert_eq!(outcome.status, SolverStatus::Optimal);
    let values: Vec<f64> = model
        .values(&x)
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect();
    let nonzero = values.iter().filter(|value| value.abs() > TOL).count();
    assert_eq!(nonzero, 1, "values: {values:?}");
    assert!((values[3] - 10.0).abs() < TOL, "values: {values:?}");
    assert_close(outcome.objective_value, 40.0);
}

#[test]
fn test_sos2_reformulation_keeps_nonzeros_adjacent() {
    let mut model = Model::new();
    let x = bounded(&mut model, 1, 3, 0.0, 10.0);
    model.add_sos2(x.ids(), &[1.0, 2.0, 3.0]).unwrap();
    let ends = ConstMatrix::vector([1.0, 0.0, 1.0]).unwrap();
    let objective = model.mul(&x, &ends).unwrap();
    model.maximize(&objective).unwrap();

    let outcome = solve(&mut model);
    assert_eq!(outcome.status, SolverStatus::Optimal);
    assert_close(outcome.objective_value, 10.0);
    let first = model.solved_value(x.ids()[0]).unwrap().unwrap_or(f64::NAN);
    let last = model.solved_value(x.ids()[2]).unwrap().unwrap_or(f64::NAN);
    assert!(first.abs() < TOL || last.abs() < TOL, "x0 = {first}, x2 = {last}");
}

#[test]
fn test_chained_comparison_bounds() {
    let mut model = Model::new();
    let v = bounded(&mut model, 1, 3, -100.0, 100.0);
    let y = v.column(0).unwrap();
    let x = v.column(1).unwrap();
    let z = v.column(2).unwrap();

    // y <= 50 >= x >= -20 == z
    let chain = (&y).le(50.0).ge(&x).ge(-20.0).equals(&z);
    model
        .add_constraint(chain, ConstraintOptions::named("chain"))
        .unwrap();
    let total = model.sum(&v).unwrap();
    model.maximize(&total).unwrap();

    let outcome = solve(&mut model);
    assert_eq!(outcome.status, SolverStatus::Optimal);
    assert_close(model.value(&x).unwrap(), 50.0);
    assert_close(model.value(&y).unwrap(), 50.0);
    assert_close(model.value(&z).unwrap(), -20.0);
}

#[test]
fn test_integer_column_rounds_down() {
    let mut model = Model::new();
    let x = model
        .add_variable(VariableSpec::integer().with_bounds(0.0, 10.0))
        .unwrap();
    model
        .add_constraint(VarMatrix::from(x).le(1.5), ConstraintOptions::new())
        .unwrap();
    model.maximize(x).unwrap();

    let outcome = solve(&mut model);
    assert_eq!(outcome.status, SolverStatus::Optimal);
    assert_close(model.solved_value(x).unwrap(), 1.0);
}

#[test]
fn test_objective_constant_is_reported() {
    let mut model = Model::new();
    let x = bounded(&mut model, 1, 1, 2.0, 8.0);
    let shifted = model.add(&x, 5.0).unwrap();
    model.minimize(&shifted).unwrap();

    let outcome = solve(&mut model);
    assert_close(outcome.objective_value, 7.0);
    assert_close(model.objective_value(), 7.0);
}

#[test]
fn test_infeasible_model_reports_status_without_values() {
    let mut model = Model::new();
    let x = bounded(&mut model, 1, 1, 0.0, 1.0);
    model
        .add_constraint((&x).ge(2.0), ConstraintOptions::new())
        .unwrap();
    model.minimize(&x).unwrap();

    let outcome = solve(&mut model);
    assert!(!outcome.status.is_feasible(), "status: {}", outcome.status);
    assert_eq!(outcome.objective_value, None);
    assert_eq!(model.values(&x).unwrap(), vec![None]);
}

#[test]
fn test_reloaded_constant_changes_next_solve() {
    let mut model = Model::with_config(ModelConfig::new().with_data_loadable(true));
    let x = bounded(&mut model, 1, 2, 0.0, 100.0);
    let cap = model.named_constant("cap", 4.0);
    model
        .add_constraint((&x).le(cap), ConstraintOptions::named("cap"))
        .unwrap();
    let total = model.sum(&x).unwrap();
    model.maximize(&total).unwrap();

    assert_close(solve(&mut model).objective_value, 8.0);

    assert_eq!(model.reload_constants([("cap", 9.0)]), 1);
    assert_close(solve(&mut model).objective_value, 18.0);

    let mut loaded = Model::from_json_str(&model.to_json_string().unwrap()).unwrap();
    assert!(loaded.set_constant("cap", 6.0));
    assert_close(solve(&mut loaded).objective_value, 12.0);
}

#[test]
fn test_native_sos_is_rejected() {
    let mut model = Model::with_config(ModelConfig::new().with_sos_mode(SosMode::Native));
    let x = bounded(&mut model, 1, 2, 0.0, 1.0);
    model.add_sos1(x.ids(), &[1.0, 2.0]).unwrap();
    model.minimize(&x).unwrap();

    let mut backend = HighsBackend::new();
    assert_eq!(
        model.solve(&mut backend, &ParameterBag::new()),
        Err(SolverError::NativeSosUnsupported {
            backend: "highs".to_string()
        })
    );
}

#[test]
fn test_solve_through_registry_with_parameters() {
    let mut registry = BackendRegistry::new();
    jdopt_highs::register(&mut registry);

    let mut model = Model::new();
    let x = bounded(&mut model, 2, 2, 0.0, 3.0);
    let total = model.sum(&x).unwrap();
    model.maximize(&total).unwrap();

    let params = ParameterBag::new()
        .with_time_limit(10.0)
        .with_threads(1)
        .with_presolve(true);
    let outcome = model.solve_with(&registry, "highs", &params).unwrap();
    assert_eq!(outcome.status, SolverStatus::Optimal);
    assert_close(outcome.objective_value, 12.0);
    assert_eq!(
        outcome.results.get_str(jdopt_highs::RESULT_HIGHS_STATUS),
        Some("optimal")
    );
    let peak = outcome
        .results
        .get_int(jdopt_highs::RESULT_PEAK_RSS)
        .unwrap_or_else(|| panic!("peak memory missing from {:?}", outcome.results));
    assert!(peak > 0);
}
