//! Solver parameter bag.
//!
//! Parameters are string-keyed so a backend can accept options the core does
//! not know about. Well-known keys get typed builder methods.

use std::collections::BTreeMap;
use std::fmt;

/// Time limit in seconds (double).
pub const TIME_LIMIT: &str = "TimeLimit";
/// Relative MIP gap tolerance (double).
pub const MIP_GAP: &str = "MIPGap";
/// Number of solver threads (int).
pub const THREADS: &str = "Threads";
/// Backend verbosity level (int).
pub const VERBOSITY: &str = "Verbosity";
/// Presolve on/off (int, 0 or 1).
pub const PRESOLVE: &str = "Presolve";
/// Echo solver output to the console (int, 0 or 1).
pub const LOG_TO_CONSOLE: &str = "LogToConsole";

/// Result key for the numeric status code.
pub const RESULT_STATUS: &str = "Status";
/// Result key for the objective value.
pub const RESULT_OBJECTIVE: &str = "ObjectiveValue";
/// Result key for wall-clock solve time in seconds.
pub const RESULT_SOLVE_TIME: &str = "SolveTime";

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Double(f64),
    Str(String),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Doubles and ints both read as a double.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            ParamValue::Double(value) => Some(*value),
            ParamValue::Int(value) => Some(*value as f64),
            ParamValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "int",
            ParamValue::Double(_) => "double",
            ParamValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Double(value) => write!(f, "{value}"),
            ParamValue::Str(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Double(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

/// String-keyed int/double/string values passed to and returned from a backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBag {
    entries: BTreeMap<String, ParamValue>,
}

impl ParameterBag {
    /// Create an empty bag; every backend default applies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(self, seconds: f64) -> Self {
        self.with(TIME_LIMIT, seconds)
    }

    /// Set the relative MIP gap tolerance.
    pub fn with_mip_gap(self, gap: f64) -> Self {
        self.with(MIP_GAP, gap)
    }

    pub fn with_threads(self, count: u32) -> Self {
        self.with(THREADS, i64::from(count))
    }

    pub fn with_verbosity(self, level: u32) -> Self {
        self.with(VERBOSITY, i64::from(level))
    }

    pub fn with_presolve(self, enabled: bool) -> Self {
        self.with(PRESOLVE, i64::from(enabled))
    }

    pub fn with_log_to_console(self, enabled: bool) -> Self {
        self.with(LOG_TO_CONSOLE, i64::from(enabled))
    }

    /// Set an arbitrary entry, replacing any previous value under `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ParamValue::as_int)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ParamValue::as_double)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_int(key).map(|value| value != 0)
    }

    pub fn time_limit(&self) -> Option<f64> {
        self.get_double(TIME_LIMIT)
    }

    pub fn mip_gap(&self) -> Option<f64> {
        self.get_double(MIP_GAP)
    }

    pub fn threads(&self) -> Option<i64> {
        self.get_int(THREADS)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `other` over this bag.
    pub fn extend_from(&mut self, other: &ParameterBag) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_bag_new_is_empty() {
        let bag = ParameterBag::new();
        assert!(bag.is_empty());
        assert_eq!(bag.time_limit(), None);
    }

    #[test]
    fn test_bag_builder_pattern() {
        let bag = ParameterBag::new()
            .with_time_limit(60.0)
            .with_mip_gap(0.01)
            .with_verbosity(1)
            .with_presolve(true)
            .with_threads(4)
            .with_log_to_console(false);

        assert_eq!(bag.len(), 6);
        assert_eq!(bag.time_limit(), Some(60.0));
        assert_eq!(bag.mip_gap(), Some(0.01));
        assert_eq!(bag.get_int(VERBOSITY), Some(1));
        assert_eq!(bag.get_bool(PRESOLVE), Some(true));
        assert_eq!(bag.threads(), Some(4));
        assert_eq!(bag.get_bool(LOG_TO_CONSOLE), Some(false));
    }

    #[test]
    fn test_bag_free_form_entries() {
        let bag = ParameterBag::new()
            .with("mip_rel_gap", 0.5)
            .with("solver", "ipm")
            .with("random_seed", 7_i64);

        assert_eq!(bag.get_str("solver"), Some("ipm"));
        assert_eq!(bag.get_int("random_seed"), Some(7));
        assert_eq!(bag.get_double("random_seed"), Some(7.0));
        assert_eq!(bag.get_int("mip_rel_gap"), None);
        let keys: Vec<&str> = bag.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["mip_rel_gap", "random_seed", "solver"]);
    }

    #[test]
    fn test_bag_set_replaces_previous_value() {
        let mut bag = ParameterBag::new().with_threads(2);
        bag.set(THREADS, 8_i64);
        assert_eq!(bag.threads(), Some(8));
        assert_eq!(bag.remove(THREADS), Some(ParamValue::Int(8)));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_param_value_display() {
        assert_eq!(ParamValue::from("x").to_string(), "x");
        assert_eq!(ParamValue::from(3_i64).kind(), "int");
        assert_eq!(ParamValue::from(1.5).to_string(), "1.5");
    }
}
