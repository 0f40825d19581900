//! Named constants.

use jdopt_expr::{LinExpr, NamedConstRegistry, SymbolicConstant};

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Named constant for use in expressions.
    ///
    /// In a data-loadable model every call with the same name returns the one
    /// registered leaf (the first value wins). Otherwise each call builds an
    /// unregistered leaf.
    pub fn named_constant(&mut self, name: &str, value: f64) -> SymbolicConstant {
        match self.registry.as_mut() {
            Some(registry) => registry.constant(name, value),
            None => SymbolicConstant::named(name, value),
        }
    }

    pub fn registry(&self) -> Option<&NamedConstRegistry> {
        self.registry.as_ref()
    }

    /// Change a registered constant everywhere it is used. Unknown names and
    /// models without a registry are a no-op returning `false`.
    pub fn set_constant(&self, name: &str, value: f64) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|registry| registry.set_value(name, value))
    }

    pub fn constant_value(&self, name: &str) -> Result<f64, ModelError> {
        match self.registry.as_ref() {
            Some(registry) => Ok(registry.value(name)?),
            None => Err(ModelError::UnregisteredConstant {
                name: name.to_string(),
            }),
        }
    }

    /// Bulk reload; returns how many names were known.
    pub fn reload_constants<I, S>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        self.registry
            .as_ref()
            .map_or(0, |registry| registry.reload(values))
    }

    /// Register the expression's named leaves and point them at the canonical
    /// instances. No-op without a registry.
    pub(crate) fn unify_constants(&mut self, expr: &mut LinExpr) {
        if let Some(registry) = self.registry.as_mut() {
            expr.register_named_leaves(registry);
            expr.deduplicate(registry);
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;

    #[test]
    fn data_loadable_model_hands_out_one_leaf_per_name() {
        let mut model = Model::with_config(ModelConfig::new().with_data_loadable(true));
        let first = model.named_constant("c", 5.0);
        let second = model.named_constant("c", 9.0);
        assert_eq!(second.evaluate(), 5.0);

        assert!(model.set_constant("c", 7.0));
        assert_eq!(first.evaluate(), 7.0);
        assert_eq!(second.evaluate(), 7.0);
        assert_eq!(model.constant_value("c"), Ok(7.0));
    }

    #[test]
    fn plain_model_has_no_registry() {
        let mut model = Model::new();
        let leaf = model.named_constant("c", 5.0);
        assert!(!model.set_constant("c", 7.0));
        assert_eq!(leaf.evaluate(), 5.0);
        assert_eq!(
            model.constant_value("c"),
            Err(ModelError::UnregisteredConstant {
                name: "c".to_string()
            })
        );
        assert_eq!(model.reload_constants([("c", 1.0)]), 0);
    }

    #[test]
    fn unknown_names_are_ignored_on_write() {
        let mut model = Model::with_config(ModelConfig::new().with_data_loadable(true));
        model.named_constant("a", 1.0);
        assert!(!model.set_constant("b", 2.0));
        assert_eq!(model.reload_constants([("a", 3.0), ("b", 4.0)]), 1);
        assert_eq!(model.constant_value("a"), Ok(3.0));
        assert!(model.constant_value("b").is_err());
    }
}
