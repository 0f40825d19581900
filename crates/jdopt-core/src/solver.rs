//! Backend boundary.
//!
//! A [`Backend`] receives a read-only [`Problem`] view of an assembled model
//! plus a [`ParameterBag`], and answers with a [`SolveOutcome`] keyed by
//! variable id. Backends are made available through a [`BackendRegistry`] of
//! constructor functions, registered at start-up under a string key.

use std::collections::BTreeMap;
use std::fmt;

use jdopt_solver::{ParameterBag, SolveOutcome, SolverError};

use crate::types::{Constraint, Objective, SosConstraint, Variable};

/// Everything a backend needs from a model.
#[derive(Debug, Clone, Copy)]
pub struct Problem<'a> {
    /// Variables in id order.
    pub variables: &'a [&'a Variable],
    /// Normalized `expr <= 0` / `expr == 0` rows, `<=` pool first.
    pub constraints: &'a [&'a Constraint],
    /// SOS sets kept in native form.
    pub sos: &'a [SosConstraint],
    pub objective: &'a Objective,
}

/// A solving engine.
pub trait Backend: Send {
    /// Key the backend is registered under.
    fn name(&self) -> &str;

    /// Whether `Problem::sos` may be non-empty.
    fn supports_native_sos(&self) -> bool {
        false
    }

    fn solve(
        &mut self,
        problem: &Problem<'_>,
        params: &ParameterBag,
    ) -> Result<SolveOutcome, SolverError>;
}

pub type BackendConstructor = fn() -> Box<dyn Backend>;

/// String key to backend constructor.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    constructors: BTreeMap<String, BackendConstructor>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constructor` under `key`, replacing any earlier entry.
    pub fn register(&mut self, key: impl Into<String>, constructor: BackendConstructor) {
        let key = key.into();
        tracing::debug!(
            component = "solver",
            operation = "register_backend",
            status = "success",
            backend = key.as_str(),
            "Registered solver backend"
        );
        self.constructors.insert(key, constructor);
    }

    pub fn create(&self, key: &str) -> Result<Box<dyn Backend>, SolverError> {
        self.constructors
            .get(key)
            .map(|constructor| constructor())
            .ok_or_else(|| SolverError::BackendNotRegistered(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.constructors.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("keys", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdopt_solver::SolverStatus;

    struct Idle;

    impl Backend for Idle {
        fn name(&self) -> &str {
            "idle"
        }

        fn solve(
            &mut self,
            _problem: &Problem<'_>,
            _params: &ParameterBag,
        ) -> Result<SolveOutcome, SolverError> {
            Ok(SolveOutcome::new(SolverStatus::Unknown))
        }
    }

    fn idle() -> Box<dyn Backend> {
        Box::new(Idle)
    }

    #[test]
    fn registry_creates_registered_backends() {
        let mut registry = BackendRegistry::new();
        registry.register("idle", idle);
        assert!(registry.contains("idle"));
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["idle"]);

        let backend = registry.create("idle").unwrap();
        assert_eq!(backend.name(), "idle");
        assert!(!backend.supports_native_sos());
    }

    #[test]
    fn unknown_key_is_reported() {
        let registry = BackendRegistry::new();
        assert_eq!(
            registry.create("gurobi").err(),
            Some(SolverError::BackendNotRegistered("gurobi".to_string()))
        );
    }
}
