//! Literal-or-symbolic numeric coefficient.

use std::fmt;

use crate::constant::{BinaryOp, SymbolicConstant};
use crate::registry::NamedConstRegistry;

#[derive(Debug, Clone)]
pub enum Coefficient {
    Literal(f64),
    Symbolic(SymbolicConstant),
}

impl Coefficient {
    pub const ZERO: Coefficient = Coefficient::Literal(0.0);
    pub const ONE: Coefficient = Coefficient::Literal(1.0);

    /// Current numeric value.
    pub fn resolve(&self) -> f64 {
        match self {
            Coefficient::Literal(value) => *value,
            Coefficient::Symbolic(constant) => constant.evaluate(),
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Coefficient::Symbolic(_))
    }

    fn is_literal(&self, target: f64) -> bool {
        matches!(self, Coefficient::Literal(value) if *value == target)
    }

    fn into_symbolic(self) -> SymbolicConstant {
        match self {
            Coefficient::Literal(value) => SymbolicConstant::literal(value),
            Coefficient::Symbolic(constant) => constant,
        }
    }

    /// Sum of two coefficients. Literal pairs fold eagerly, symbolic ones keep
    /// the tree so later reloads still apply.
    pub fn plus(&self, other: &Coefficient) -> Coefficient {
        match (self, other) {
            (Coefficient::Literal(a), Coefficient::Literal(b)) => Coefficient::Literal(a + b),
            (lhs, rhs) if rhs.is_literal(0.0) => lhs.clone(),
            (lhs, rhs) if lhs.is_literal(0.0) => rhs.clone(),
            (lhs, rhs) => Coefficient::Symbolic(SymbolicConstant::binary(
                BinaryOp::Add,
                lhs.clone().into_symbolic(),
                rhs.clone().into_symbolic(),
            )),
        }
    }

    /// Product of two coefficients.
    pub fn times(&self, other: &Coefficient) -> Coefficient {
        match (self, other) {
            (Coefficient::Literal(a), Coefficient::Literal(b)) => Coefficient::Literal(a * b),
            (lhs, rhs) if rhs.is_literal(1.0) => lhs.clone(),
            (lhs, rhs) if lhs.is_literal(1.0) => rhs.clone(),
            (lhs, rhs) => Coefficient::Symbolic(SymbolicConstant::binary(
                BinaryOp::Mul,
                lhs.clone().into_symbolic(),
                rhs.clone().into_symbolic(),
            )),
        }
    }

    pub fn negated(&self) -> Coefficient {
        self.times(&Coefficient::Literal(-1.0))
    }

    pub fn register_named_leaves(&self, registry: &mut NamedConstRegistry) {
        if let Coefficient::Symbolic(constant) = self {
            constant.register_named_leaves(registry);
        }
    }

    pub fn deduplicate(&mut self, registry: &NamedConstRegistry) -> usize {
        match self {
            Coefficient::Literal(_) => 0,
            Coefficient::Symbolic(constant) => constant.deduplicate(registry),
        }
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Coefficient::ZERO
    }
}

impl From<f64> for Coefficient {
    fn from(value: f64) -> Self {
        Coefficient::Literal(value)
    }
}

impl From<SymbolicConstant> for Coefficient {
    fn from(constant: SymbolicConstant) -> Self {
        Coefficient::Symbolic(constant)
    }
}

impl From<&SymbolicConstant> for Coefficient {
    fn from(constant: &SymbolicConstant) -> Self {
        Coefficient::Symbolic(constant.clone())
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Literal(value) => write!(f, "{value}"),
            Coefficient::Symbolic(constant) => write!(f, "[{constant}]"),
        }
    }
}
