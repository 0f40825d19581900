use std::collections::BTreeMap;

use jdopt_expr::VariableId;
use jdopt_solver::{ParameterBag, SolveOutcome, SolverError, SolverStatus};

use crate::matrix::VarMatrix;
use crate::model::Model;
use crate::solver::{Backend, Problem};
use crate::types::VariableSpec;

/// Backend that answers with preset values and records what it was handed.
#[derive(Debug, Default)]
pub(super) struct FixedBackend {
    pub values: BTreeMap<u32, f64>,
    pub native_sos: bool,
    pub seen_variables: usize,
    pub seen_constraints: usize,
    pub seen_sos: usize,
}

impl FixedBackend {
    pub fn with_values(values: &[(VariableId, f64)]) -> Self {
        Self {
            values: values.iter().map(|(id, value)| (id.inner(), *value)).collect(),
            ..Self::default()
        }
    }
}

impl Backend for FixedBackend {
    fn name(&self) -> &str {
        "fixed"
    }

    fn supports_native_sos(&self) -> bool {
        self.native_sos
    }

    fn solve(
        &mut self,
        problem: &Problem<'_>,
        _params: &ParameterBag,
    ) -> Result<SolveOutcome, SolverError> {
        self.seen_variables = problem.variables.len();
        self.seen_constraints = problem.constraints.len();
        self.seen_sos = problem.sos.len();
        let mut outcome = SolveOutcome::new(SolverStatus::Optimal);
        for var in problem.variables {
            let id = var.id().inner();
            outcome = outcome.with_value(id, self.values.get(&id).copied());
        }
        Ok(outcome)
    }
}

/// Assign solved values through a backend round trip.
pub(super) fn assign_values(model: &mut Model, values: &[(VariableId, f64)]) {
    if model.objective().is_none() {
        let first = model.variables().next().map(|var| var.id()).unwrap();
        model.minimize(first).unwrap();
    }
    let mut backend = FixedBackend::with_values(values);
    model.solve(&mut backend, &ParameterBag::new()).unwrap();
}

pub(super) fn bounded_block(
    model: &mut Model,
    rows: usize,
    cols: usize,
    lower: f64,
    upper: f64,
) -> VarMatrix {
    model
        .add_variables(rows, cols, VariableSpec::continuous().with_bounds(lower, upper))
        .unwrap()
}
