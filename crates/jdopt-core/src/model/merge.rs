//! Appending one model to another.

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Move every variable, constraint and SOS set of `other` into `self`.
    ///
    /// Id ranges must not overlap; seed them apart with
    /// [`ModelConfig::with_first_variable_id`] and
    /// [`ModelConfig::with_first_constraint_id`]. Named constants are merged
    /// first-wins and `other`'s expressions are rewired onto the surviving
    /// leaves. `other`'s objective is kept only when `self` has none. Its
    /// expression arena is not carried over.
    ///
    /// [`ModelConfig::with_first_variable_id`]: crate::config::ModelConfig::with_first_variable_id
    /// [`ModelConfig::with_first_constraint_id`]: crate::config::ModelConfig::with_first_constraint_id
    pub fn append(&mut self, other: Model) -> Result<(), ModelError> {
        if let Some(id) = other.variables.keys().find(|id| self.variables.contains_key(id)) {
            return Err(ModelError::IdCollision {
                kind: "variable",
                id: id.inner(),
            });
        }
        if let Some(id) = other
            .constraints
            .keys()
            .find(|id| self.constraints.contains_key(id))
        {
            return Err(ModelError::IdCollision {
                kind: "constraint",
                id: id.inner(),
            });
        }

        let Model {
            variables,
            continuous,
            binary,
            integer,
            mut constraints,
            less_equal,
            equal,
            sos,
            mut objective,
            next_variable_id,
            next_constraint_id,
            sos_count,
            registry,
            ..
        } = other;

        let merged_constants = match (self.registry.as_mut(), registry.as_ref()) {
            (Some(mine), Some(theirs)) => mine.merge(theirs),
            (None, Some(theirs)) if !theirs.is_empty() => {
                tracing::warn!(
                    component = "model",
                    operation = "append",
                    status = "warn",
                    dropped_constants = theirs.len(),
                    names = ?theirs.names().collect::<Vec<_>>(),
                    "Target model is not data-loadable; appended named constants can no longer be reloaded"
                );
                0
            }
            _ => 0,
        };
        if let Some(mine) = self.registry.as_mut() {
            for constraint in constraints.values_mut() {
                constraint.expr.register_named_leaves(mine);
                constraint.expr.deduplicate(mine);
            }
            if let Some(objective) = objective.as_mut() {
                objective.expr.register_named_leaves(mine);
                objective.expr.deduplicate(mine);
            }
        }

        let added_variables = variables.len();
        let added_constraints = constraints.len();
        self.variables.extend(variables);
        self.continuous.extend(continuous);
        self.binary.extend(binary);
        self.integer.extend(integer);
        self.constraints.extend(constraints);
        self.less_equal.extend(less_equal);
        self.equal.extend(equal);
        self.sos.extend(sos);
        if self.objective.is_none() {
            self.objective = objective;
        }
        self.next_variable_id = self.next_variable_id.max(next_variable_id);
        self.next_constraint_id = self.next_constraint_id.max(next_constraint_id);
        self.sos_count += sos_count;

        tracing::debug!(
            component = "model",
            operation = "append",
            status = "success",
            added_variables,
            added_constraints,
            merged_constants,
            "Appended model"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::matrix::{Compare, ComparisonChain, ConstMatrix, VarMatrix};
    use crate::model::ConstraintOptions;
    use crate::types::VariableSpec;

    #[test]
    fn append_concatenates_pools_and_advances_counters() {
        let mut base = Model::new();
        let x = base.add_variable(VariableSpec::continuous()).unwrap();
        base.add_constraint(base_row(x), ConstraintOptions::new()).unwrap();

        let mut other = Model::with_config(
            ModelConfig::new()
                .with_first_variable_id(10)
                .with_first_constraint_id(10),
        );
        let y = other.add_variable(VariableSpec::binary()).unwrap();
        other.add_constraint(base_row(y), ConstraintOptions::new()).unwrap();
        other.maximize(y).unwrap();

        base.append(other).unwrap();
        assert_eq!(base.num_variables(), 2);
        assert_eq!(base.num_constraints(), 2);
        assert_eq!(base.binary_variables(), &[y]);
        assert_eq!(base.next_variable_id(), 11);
        assert_eq!(base.next_constraint_id(), 11);
        assert!(base.objective().is_some());
    }

    #[test]
    fn overlapping_ids_are_rejected() {
        let mut base = Model::new();
        base.add_variable(VariableSpec::continuous()).unwrap();
        let mut other = Model::new();
        other.add_variable(VariableSpec::continuous()).unwrap();
        assert_eq!(
            base.append(other),
            Err(ModelError::IdCollision {
                kind: "variable",
                id: 0
            })
        );
        assert_eq!(base.num_variables(), 1);
    }

    #[test]
    fn appended_constants_share_the_first_leaf() {
        let config = ModelConfig::new().with_data_loadable(true);
        let mut base = Model::with_config(config);
        base.named_constant("cap", 4.0);

        let mut other = Model::with_config(config.with_first_variable_id(5));
        let x = other.add_variable(VariableSpec::continuous()).unwrap();
        let cap = other.named_constant("cap", 9.0);
        other
            .add_constraint(
                VarMatrix::from(x).le(ConstMatrix::scalar(cap)),
                ConstraintOptions::new(),
            )
            .unwrap();

        base.append(other).unwrap();
        let constraint = base.constraints().next().unwrap();
        assert_eq!(constraint.rhs(), 4.0);
        assert!(base.set_constant("cap", 6.0));
        assert_eq!(base.constraints().next().unwrap().rhs(), 6.0);
    }

    #[test]
    fn constants_appended_into_a_plain_model_keep_their_value() {
        let mut base = Model::new();
        let mut other = Model::with_config(
            ModelConfig::new()
                .with_data_loadable(true)
                .with_first_variable_id(3),
        );
        let x = other.add_variable(VariableSpec::continuous()).unwrap();
        let cap = other.named_constant("cap", 9.0);
        other
            .add_constraint(
                VarMatrix::from(x).le(ConstMatrix::scalar(cap)),
                ConstraintOptions::new(),
            )
            .unwrap();

        base.append(other).unwrap();
        assert_eq!(base.num_constraints(), 1);
        assert!(!base.set_constant("cap", 2.0));
        assert_eq!(base.constraints().next().unwrap().rhs(), 9.0);
    }

    fn base_row(var: jdopt_expr::VariableId) -> ComparisonChain {
        VarMatrix::from(var).le(1.0)
    }
}
