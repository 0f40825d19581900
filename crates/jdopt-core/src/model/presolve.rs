//! Folding fixed variables into constraint constants.

use std::collections::BTreeMap;

use jdopt_expr::VariableId;

use crate::model::Model;

impl Model {
    /// Replace every term over a variable whose bounds are equal and finite
    /// with the corresponding constant. Returns the number of terms replaced.
    ///
    /// Only constraints are rewritten; the objective and the variables
    /// themselves are left alone.
    pub fn replace_constant_variables(&mut self) -> usize {
        let fixed: BTreeMap<VariableId, f64> = self
            .variables
            .values()
            .filter_map(|var| var.bounds().fixed_value().map(|value| (var.id(), value)))
            .collect();
        if fixed.is_empty() {
            return 0;
        }

        let replaced: usize = self
            .constraints
            .values_mut()
            .map(|constraint| constraint.expr.substitute(&fixed))
            .sum();
        tracing::debug!(
            component = "model",
            operation = "replace_constant_variables",
            status = "success",
            fixed_variables = fixed.len(),
            replaced,
            "Folded fixed variables into constants"
        );
        replaced
    }
}
