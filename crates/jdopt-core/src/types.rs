use std::str::FromStr;

use jdopt_expr::{ConstraintId, LinExpr, VariableId};

use crate::model::ModelError;

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariableType {
    Continuous,
    Binary,
    Integer,
}

impl VariableType {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableType::Continuous => "continuous",
            VariableType::Binary => "binary",
            VariableType::Integer => "integer",
        }
    }

    /// Binary and integer variables both need an integral value.
    pub fn is_integral(self) -> bool {
        !matches!(self, VariableType::Continuous)
    }
}

impl FromStr for VariableType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" | "c" => Ok(VariableType::Continuous),
            "binary" | "b" => Ok(VariableType::Binary),
            "integer" | "i" => Ok(VariableType::Integer),
            _ => Err(ModelError::UnknownVariableType {
                name: s.to_string(),
            }),
        }
    }
}

/// Bounds for a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `(-inf, +inf)`.
    pub fn free() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn binary() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn is_valid(self) -> bool {
        !self.lower.is_nan() && !self.upper.is_nan() && self.lower <= self.upper
    }

    pub fn is_finite(self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// Finite bounds with `lower <= 0 <= upper`.
    pub fn spans_zero(self) -> bool {
        self.is_finite() && self.lower <= 0.0 && self.upper >= 0.0
    }

    /// Value the variable is pinned to when both bounds coincide.
    pub fn fixed_value(self) -> Option<f64> {
        (self.lower.is_finite() && self.lower == self.upper).then_some(self.lower)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::free()
    }
}

/// A decision variable owned by a model.
///
/// `id` and `name` never change after creation. Type, bounds and priority are
/// edited through the owning model so pool membership stays consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    id: VariableId,
    name: Option<String>,
    pub(crate) var_type: VariableType,
    pub(crate) bounds: Bounds,
    pub(crate) branch_priority: u8,
    pub(crate) solved_value: Option<f64>,
}

impl Variable {
    pub(crate) fn new(id: VariableId, spec: VariableSpec) -> Self {
        let bounds = spec.effective_bounds();
        Self {
            id,
            name: spec.name,
            var_type: spec.var_type,
            bounds,
            branch_priority: spec.branch_priority,
            solved_value: None,
        }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn var_type(&self) -> VariableType {
        self.var_type
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn branch_priority(&self) -> u8 {
        self.branch_priority
    }

    /// `None` until a backend assigns a value.
    pub fn solved_value(&self) -> Option<f64> {
        self.solved_value
    }
}

/// Description of a variable to create.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSpec {
    pub name: Option<String>,
    pub var_type: VariableType,
    /// `None` picks the type's default: 0/1 for binary, free otherwise.
    pub bounds: Option<Bounds>,
    pub branch_priority: u8,
}

impl VariableSpec {
    pub fn new(var_type: VariableType) -> Self {
        Self {
            name: None,
            var_type,
            bounds: None,
            branch_priority: 0,
        }
    }

    pub fn continuous() -> Self {
        Self::new(VariableType::Continuous)
    }

    pub fn binary() -> Self {
        Self::new(VariableType::Binary)
    }

    pub fn integer() -> Self {
        Self::new(VariableType::Integer)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.bounds = Some(Bounds::new(lower, upper));
        self
    }

    pub fn with_branch_priority(mut self, priority: u8) -> Self {
        self.branch_priority = priority;
        self
    }

    pub(crate) fn effective_bounds(&self) -> Bounds {
        self.bounds.unwrap_or(match self.var_type {
            VariableType::Binary => Bounds::binary(),
            _ => Bounds::free(),
        })
    }
}

impl Default for VariableSpec {
    fn default() -> Self {
        Self::continuous()
    }
}

/// Stored constraint sense. `>=` is normalized away before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintSense {
    LessEqual,
    Equal,
}

impl ConstraintSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintSense::LessEqual => "le",
            ConstraintSense::Equal => "eq",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintSense::LessEqual => "<=",
            ConstraintSense::Equal => "=",
        }
    }
}

/// `expr <= 0` or `expr == 0`.
#[derive(Debug, Clone)]
pub struct Constraint {
    id: ConstraintId,
    pub(crate) expr: LinExpr,
    sense: ConstraintSense,
    name: Option<String>,
    lazy_level: u8,
}

impl Constraint {
    pub(crate) fn new(
        id: ConstraintId,
        expr: LinExpr,
        sense: ConstraintSense,
        name: Option<String>,
        lazy_level: u8,
    ) -> Self {
        Self {
            id,
            expr,
            sense,
            name,
            lazy_level,
        }
    }

    pub fn id(&self) -> ConstraintId {
        self.id
    }

    pub fn expr(&self) -> &LinExpr {
        &self.expr
    }

    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn lazy_level(&self) -> u8 {
        self.lazy_level
    }

    /// Right-hand side after moving the constant across: `terms (sense) rhs`.
    pub fn rhs(&self) -> f64 {
        -self.expr.constant_value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SosType {
    Sos1,
    Sos2,
}

impl SosType {
    pub fn as_str(self) -> &'static str {
        match self {
            SosType::Sos1 => "sos1",
            SosType::Sos2 => "sos2",
        }
    }
}

/// A special-ordered set kept in native form for the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SosConstraint {
    pub variables: Vec<VariableId>,
    pub weights: Vec<f64>,
    pub sos_type: SosType,
}

/// How SOS sets reach the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SosMode {
    /// Store the set as-is; the backend must support SOS natively.
    Native,
    /// Rewrite the set into binary indicators and big-M rows.
    #[default]
    Reformulate,
}

impl SosMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SosMode::Native => "native",
            SosMode::Reformulate => "reformulate",
        }
    }
}

/// Objective function with a sense and a linear expression.
#[derive(Debug, Clone)]
pub struct Objective {
    pub expr: LinExpr,
    pub sense: Sense,
    pub name: Option<String>,
}

impl Objective {
    pub fn new(expr: LinExpr, sense: Sense) -> Self {
        Self {
            expr,
            sense,
            name: None,
        }
    }
}
