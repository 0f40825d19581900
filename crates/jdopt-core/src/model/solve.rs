//! Handing the model to a backend and reading values back.

use std::time::Instant;

use jdopt_solver::{ParameterBag, SolveOutcome, SolverError};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::model::Model;
use crate::solver::{Backend, BackendRegistry, Problem};
use crate::types::{Constraint, Variable};

impl Model {
    /// Check the model can be handed to a backend.
    fn validate_for_solve(&self, backend: &dyn Backend) -> Result<(), SolverError> {
        if self.variables.is_empty() {
            return Err(SolverError::EmptyModel);
        }
        if self.objective.is_none() {
            return Err(SolverError::NoObjective);
        }
        if !self.sos.is_empty() && !backend.supports_native_sos() {
            return Err(SolverError::NativeSosUnsupported {
                backend: backend.name().to_string(),
            });
        }
        Ok(())
    }

    /// Solve with `backend` and write the solved values back onto the
    /// variables. Variables the backend left out end up unsolved.
    ///
    /// The outcome is returned whatever its status; check
    /// [`SolveOutcome::status`] before trusting the values.
    pub fn solve(
        &mut self,
        backend: &mut dyn Backend,
        params: &ParameterBag,
    ) -> Result<SolveOutcome, SolverError> {
        self.validate_for_solve(backend)?;
        let started = Instant::now();

        let outcome = {
            let variables: Vec<&Variable> = self.variables.values().collect();
            let constraints: Vec<&Constraint> = self.constraints().collect();
            let objective = self.objective.as_ref().ok_or(SolverError::NoObjective)?;
            let problem = Problem {
                variables: &variables,
                constraints: &constraints,
                sos: &self.sos,
                objective,
            };
            debug!(
                component = "model",
                operation = "solve",
                status = "start",
                backend = backend.name(),
                variables = variables.len(),
                constraints = constraints.len(),
                sos = self.sos.len(),
                params = params.len(),
                "Handing model to backend"
            );
            backend.solve(&problem, params)?
        };

        if let Some(&unknown) = outcome
            .values
            .keys()
            .find(|id| !self.variables.contains_key(&jdopt_expr::VariableId::new(**id)))
        {
            warn!(
                component = "model",
                operation = "solve",
                status = "error",
                var_id = unknown,
                "Backend returned a value for an unknown variable"
            );
            return Err(SolverError::InvalidVariableId(unknown));
        }

        let values = &outcome.values;
        self.variables.par_iter_mut().for_each(|(id, var)| {
            var.solved_value = values.get(&id.inner()).copied().flatten();
        });

        debug!(
            component = "model",
            operation = "solve",
            status = "success",
            backend = backend.name(),
            solver_status = outcome.status.as_str(),
            objective = outcome.objective_value,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Solve finished"
        );
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Create the backend registered under `key` and solve with it.
    pub fn solve_with(
        &mut self,
        registry: &BackendRegistry,
        key: &str,
        params: &ParameterBag,
    ) -> Result<SolveOutcome, SolverError> {
        let mut backend = registry.create(key)?;
        self.solve(backend.as_mut(), params)
    }

    /// Outcome of the most recent successful [`Model::solve`].
    pub fn last_outcome(&self) -> Option<&SolveOutcome> {
        self.last_outcome.as_ref()
    }

    /// Forget all solved values.
    pub fn clear_solution(&mut self) {
        for var in self.variables.values_mut() {
            var.solved_value = None;
        }
        self.last_outcome = None;
    }
}
