//! Objective handling.

use crate::matrix::Operand;
use crate::model::Model;
use crate::model::error::ModelError;
use crate::types::{Objective, Sense};

impl Model {
    /// Set the objective. A container is folded into one expression by summing
    /// its cells. Replaces any previous objective and clears its name.
    pub fn set_objective(
        &mut self,
        operand: impl Into<Operand>,
        sense: Sense,
    ) -> Result<(), ModelError> {
        let mut expr = self.sum_expr(&operand.into())?;
        for var in expr.variables() {
            self.ensure_variable_exists(var)?;
        }
        self.unify_constants(&mut expr);
        let terms = expr.len();
        self.objective = Some(Objective::new(expr, sense));
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            terms,
            "Set objective function"
        );
        Ok(())
    }

    /// Minimize the sum of `operand`'s cells.
    pub fn minimize(&mut self, operand: impl Into<Operand>) -> Result<(), ModelError> {
        self.set_objective(operand, Sense::Minimize)
    }

    /// Maximize the sum of `operand`'s cells.
    pub fn maximize(&mut self, operand: impl Into<Operand>) -> Result<(), ModelError> {
        self.set_objective(operand, Sense::Maximize)
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    pub fn set_objective_name(&mut self, name: Option<String>) -> Result<(), ModelError> {
        let objective = self.objective.as_mut().ok_or(ModelError::NoObjective)?;
        objective.name = name;
        Ok(())
    }

    pub fn objective_name(&self) -> Option<&str> {
        self.objective.as_ref().and_then(|obj| obj.name.as_deref())
    }

    /// Objective evaluated at the solved values, constant included.
    pub fn objective_value(&self) -> Option<f64> {
        self.objective
            .as_ref()
            .and_then(|objective| self.evaluate(&objective.expr))
    }
}
