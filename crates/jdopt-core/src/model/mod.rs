//! Model module for building optimization models.
//!
//! This module provides the core [`Model`] type: variable and constraint pools,
//! the objective, SOS sets, id counters and the optional named-constant
//! registry.
//!
//! # Module Organization
//!
//! - [`error`]: Model error types
//! - [`variables`]: Variable creation, pools and edits
//! - [`constraints`]: Normalizing staged comparisons into stored constraints
//! - [`objective`]: Objective handling
//! - [`sos`]: SOS sets and their big-M reformulation
//! - [`constants`]: Named-constant registry access
//! - [`merge`]: Appending one model to another
//! - [`presolve`]: Folding fixed variables into constants
//! - [`storage`]: Counts and lookups
//! - [`pretty`]: Human-readable LP-style rendering
//! - [`persist`]: Serializable model documents
//! - [`solve`]: Handing the model to a backend and reading values back

mod constants;
mod constraints;
mod error;
mod merge;
mod objective;
mod persist;
mod presolve;
mod pretty;
mod solve;
mod sos;
mod storage;
mod variables;

use std::collections::BTreeMap;

use jdopt_expr::{ConstraintId, NamedConstRegistry, VariableId};
use jdopt_solver::SolveOutcome;

use crate::config::ModelConfig;
use crate::matrix::ExprArena;
use crate::types::{Constraint, ConstraintSense, Objective, SosConstraint, Variable, VariableType};

pub use constraints::{ConstraintOptions, MAX_LAZY_LEVEL};
pub use error::ModelError;
pub use persist::{
    CoefficientDoc, ConstantDoc, ConstraintDoc, ExprDoc, FORMAT_VERSION, ModelDocument,
    NamedValueDoc, ObjectiveDoc, SosDoc, TermDoc, VariableDoc,
};
pub use pretty::{PrettyPrintOptions, format_lp_number};

/// A model for linear and mixed-integer programs built over matrix containers.
///
/// Variables and constraints are created only through the model so ids stay
/// unique and pool membership stays consistent. Cloning a model shares its
/// named constants with the clone.
#[derive(Debug, Clone)]
pub struct Model {
    config: ModelConfig,
    pub(crate) variables: BTreeMap<VariableId, Variable>,
    pub(crate) continuous: Vec<VariableId>,
    pub(crate) binary: Vec<VariableId>,
    pub(crate) integer: Vec<VariableId>,
    pub(crate) constraints: BTreeMap<ConstraintId, Constraint>,
    pub(crate) less_equal: Vec<ConstraintId>,
    pub(crate) equal: Vec<ConstraintId>,
    pub(crate) sos: Vec<SosConstraint>,
    pub(crate) objective: Option<Objective>,
    pub(crate) next_variable_id: u32,
    pub(crate) next_constraint_id: u32,
    pub(crate) sos_count: u32,
    // Present iff the model is data-loadable.
    pub(crate) registry: Option<NamedConstRegistry>,
    pub(crate) arena: ExprArena,
    pub(crate) last_outcome: Option<SolveOutcome>,
}

impl Model {
    /// Create a new empty model with default configuration.
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    pub fn with_config(config: ModelConfig) -> Self {
        tracing::debug!(
            component = "model",
            operation = "create",
            status = "success",
            sos_mode = config.sos_mode.as_str(),
            data_loadable = config.data_loadable,
            first_variable_id = config.first_variable_id,
            first_constraint_id = config.first_constraint_id,
            "Created model"
        );
        Self {
            config,
            variables: BTreeMap::new(),
            continuous: Vec::new(),
            binary: Vec::new(),
            integer: Vec::new(),
            constraints: BTreeMap::new(),
            less_equal: Vec::new(),
            equal: Vec::new(),
            sos: Vec::new(),
            objective: None,
            next_variable_id: config.first_variable_id,
            next_constraint_id: config.first_constraint_id,
            sos_count: 0,
            registry: config.data_loadable.then(NamedConstRegistry::new),
            arena: ExprArena::new(),
            last_outcome: None,
        }
    }

    pub fn config(&self) -> ModelConfig {
        self.config
    }

    pub fn is_data_loadable(&self) -> bool {
        self.registry.is_some()
    }

    /// Id the next created variable will get.
    pub fn next_variable_id(&self) -> u32 {
        self.next_variable_id
    }

    /// Id the next stored constraint will get.
    pub fn next_constraint_id(&self) -> u32 {
        self.next_constraint_id
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if self.variables.contains_key(&id) {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn pool_mut(&mut self, var_type: VariableType) -> &mut Vec<VariableId> {
        match var_type {
            VariableType::Continuous => &mut self.continuous,
            VariableType::Binary => &mut self.binary,
            VariableType::Integer => &mut self.integer,
        }
    }

    pub(crate) fn constraint_pool_mut(&mut self, sense: ConstraintSense) -> &mut Vec<ConstraintId> {
        match sense {
            ConstraintSense::LessEqual => &mut self.less_equal,
            ConstraintSense::Equal => &mut self.equal,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
