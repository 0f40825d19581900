//! Storage access methods for the model.

use crate::types::{Constraint, SosConstraint};
use jdopt_expr::ConstraintId;

use super::Model;
use super::error::ModelError;

impl Model {
    /// Get the number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Get the number of constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Number of nonzero coefficients across all constraints, after merging
    /// repeated variables.
    pub fn num_coefficients(&self) -> usize {
        self.constraints
            .values()
            .map(|constraint| constraint.expr().normalized_terms().len())
            .sum()
    }

    /// SOS sets stored for native handling.
    pub fn num_sos(&self) -> usize {
        self.sos.len()
    }

    /// Get a constraint by ID.
    pub fn get_constraint(&self, id: ConstraintId) -> Result<&Constraint, ModelError> {
        self.constraints
            .get(&id)
            .ok_or(ModelError::InvalidConstraintId(id))
    }

    /// First constraint carrying `name`, in id order.
    pub fn get_constraint_by_name(&self, name: &str) -> Option<&Constraint> {
        self.constraints
            .values()
            .find(|constraint| constraint.name() == Some(name))
    }

    /// All constraints: the `<=` pool followed by the `=` pool, each in
    /// insertion order.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.less_equal
            .iter()
            .chain(self.equal.iter())
            .filter_map(|id| self.constraints.get(id))
    }

    pub fn less_equal_constraints(&self) -> &[ConstraintId] {
        &self.less_equal
    }

    pub fn equal_constraints(&self) -> &[ConstraintId] {
        &self.equal
    }

    pub fn sos_constraints(&self) -> &[SosConstraint] {
        &self.sos
    }
}
