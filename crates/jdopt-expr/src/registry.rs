//! Per-model table of named constants.
//!
//! Each name maps to one canonical [`Leaf`]. Expressions that use the name hold
//! that same `Arc`, so [`NamedConstRegistry::set_value`] updates every use
//! without walking the model.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::constant::{Leaf, SymbolicConstant};
use crate::expr::ExprError;

#[derive(Debug, Clone, Default)]
pub struct NamedConstRegistry {
    entries: BTreeMap<String, Arc<Leaf>>,
}

impl NamedConstRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a named leaf. Anonymous leaves and names already present are
    /// ignored; returns whether the leaf became canonical.
    pub fn register(&mut self, leaf: &Arc<Leaf>) -> bool {
        let Some(name) = leaf.name() else {
            return false;
        };
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_string(), Arc::clone(leaf));
        tracing::trace!(
            component = "registry",
            operation = "register",
            status = "success",
            name,
            value = leaf.value(),
            "Registered named constant"
        );
        true
    }

    /// Canonical constant for `name`, created with `value` on first use.
    ///
    /// An existing entry keeps its current value.
    pub fn constant(&mut self, name: &str, value: f64) -> SymbolicConstant {
        let leaf = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Leaf::new(Some(name.to_string()), value)));
        SymbolicConstant::from_leaf(Arc::clone(leaf))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Leaf>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Current value of a registered constant.
    pub fn value(&self, name: &str) -> Result<f64, ExprError> {
        self.entries
            .get(name)
            .map(|leaf| leaf.value())
            .ok_or_else(|| ExprError::UnregisteredConstant {
                name: name.to_string(),
            })
    }

    /// Overwrite the value of a registered constant in place.
    ///
    /// Unknown names are ignored; the return value tells whether anything changed.
    pub fn set_value(&self, name: &str, value: f64) -> bool {
        match self.entries.get(name) {
            Some(leaf) => {
                leaf.set_value(value);
                true
            }
            None => {
                tracing::debug!(
                    component = "registry",
                    operation = "set_value",
                    status = "skipped",
                    name,
                    "Ignoring value for unregistered constant"
                );
                false
            }
        }
    }

    /// Apply many values at once. Returns how many names were known.
    pub fn reload<I, S>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut applied = 0;
        let mut ignored = 0;
        for (name, value) in values {
            if self.set_value(name.as_ref(), value) {
                applied += 1;
            } else {
                ignored += 1;
            }
        }
        tracing::debug!(
            component = "registry",
            operation = "reload",
            status = "success",
            applied,
            ignored,
            "Reloaded named constant values"
        );
        applied
    }

    /// Fold another registry into this one. Names already present keep their
    /// canonical leaf.
    pub fn merge(&mut self, other: &NamedConstRegistry) -> usize {
        other
            .entries
            .values()
            .filter(|leaf| self.register(leaf))
            .count()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Snapshot of `(name, value)` pairs in name order.
    pub fn values(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|(name, leaf)| (name.clone(), leaf.value()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn constant_returns_canonical_instance() {
        let mut registry = NamedConstRegistry::new();
        let first = registry.constant("demand", 10.0);
        let second = registry.constant("demand", 99.0);
        assert_eq!(second.evaluate(), 10.0);

        registry.set_value("demand", 12.0);
        assert_eq!(first.evaluate(), 12.0);
        assert_eq!(second.evaluate(), 12.0);
    }

    #[test]
    fn set_value_on_unknown_name_is_noop() {
        let registry = NamedConstRegistry::new();
        assert!(!registry.set_value("missing", 1.0));
        assert_eq!(
            registry.value("missing"),
            Err(ExprError::UnregisteredConstant {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn anonymous_leaves_are_not_registered() {
        let mut registry = NamedConstRegistry::new();
        let SymbolicConstant::Leaf(leaf) = SymbolicConstant::literal(3.0) else {
            panic!("expected a leaf");
        };
        assert!(!registry.register(&leaf));
        assert!(registry.is_empty());
    }

    #[test]
    fn reload_counts_known_names() {
        let mut registry = NamedConstRegistry::new();
        let a = registry.constant("a", 1.0);
        let _b = registry.constant("b", 2.0);
        let applied = registry.reload([("a", 5.0), ("zzz", 3.0), ("b", 4.0)]);
        assert_eq!(applied, 2);
        assert_eq!(a.evaluate(), 5.0);
        assert_eq!(
            registry.values(),
            vec![("a".to_string(), 5.0), ("b".to_string(), 4.0)]
        );
    }

    #[test]
    fn merge_keeps_existing_entries() {
        let mut left = NamedConstRegistry::new();
        left.constant("shared", 1.0);
        let mut right = NamedConstRegistry::new();
        right.constant("shared", 2.0);
        right.constant("only_right", 3.0);

        assert_eq!(left.merge(&right), 1);
        assert_eq!(left.value("shared").unwrap(), 1.0);
        assert_eq!(left.value("only_right").unwrap(), 3.0);
        assert_eq!(left.names().collect::<Vec<_>>(), vec!["only_right", "shared"]);
    }
}
