//! Model configuration.

use crate::types::SosMode;

/// Options fixed when a model is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelConfig {
    /// How SOS sets are handed to the backend.
    pub sos_mode: SosMode,
    /// Keep a named-constant registry so constants can be reloaded after build.
    pub data_loadable: bool,
    /// First id handed out to a variable. Seed disjoint ranges for models
    /// that will later be merged.
    pub first_variable_id: u32,
    /// First id handed out to a constraint.
    pub first_constraint_id: u32,
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sos_mode(mut self, mode: SosMode) -> Self {
        self.sos_mode = mode;
        self
    }

    pub fn with_data_loadable(mut self, enabled: bool) -> Self {
        self.data_loadable = enabled;
        self
    }

    pub fn with_first_variable_id(mut self, id: u32) -> Self {
        self.first_variable_id = id;
        self
    }

    pub fn with_first_constraint_id(mut self, id: u32) -> Self {
        self.first_constraint_id = id;
        self
    }
}
