//! Symbolic constants: lazily evaluated arithmetic trees over `f64`.
//!
//! Leaves may carry a name. Named leaves are shared through `Arc`, so a value
//! written to one leaf is observed by every tree that holds it. The
//! [`NamedConstRegistry`](crate::registry::NamedConstRegistry) keeps the
//! canonical leaf per name.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::registry::NamedConstRegistry;

/// A leaf value, optionally named for later reload.
#[derive(Debug)]
pub struct Leaf {
    name: Option<String>,
    bits: AtomicU64,
}

impl Leaf {
    pub fn new(name: Option<String>, value: f64) -> Self {
        Self {
            name,
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Overwrite the value in place. Every holder of this leaf sees the update.
    pub fn set_value(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }

    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Sub => left - right,
            BinaryOp::Mul => left * right,
            BinaryOp::Div => left / right,
            BinaryOp::Pow => left.powf(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Abs,
}

impl UnaryOp {
    fn apply(self, operand: f64) -> f64 {
        match self {
            UnaryOp::Abs => operand.abs(),
        }
    }
}

/// Arithmetic expression tree over constants.
///
/// Operators never mutate their operands; they build new nodes that share the
/// operands' leaves.
#[derive(Debug, Clone)]
pub enum SymbolicConstant {
    Leaf(Arc<Leaf>),
    Binary {
        op: BinaryOp,
        left: Box<SymbolicConstant>,
        right: Box<SymbolicConstant>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<SymbolicConstant>,
    },
}

impl SymbolicConstant {
    /// Anonymous leaf holding a plain value.
    pub fn literal(value: f64) -> Self {
        SymbolicConstant::Leaf(Arc::new(Leaf::new(None, value)))
    }

    /// Fresh named leaf. Inside a data-loadable model prefer
    /// `Model::named_constant`, which hands out the canonical instance.
    pub fn named(name: impl Into<String>, value: f64) -> Self {
        SymbolicConstant::Leaf(Arc::new(Leaf::new(Some(name.into()), value)))
    }

    pub fn from_leaf(leaf: Arc<Leaf>) -> Self {
        SymbolicConstant::Leaf(leaf)
    }

    pub fn evaluate(&self) -> f64 {
        match self {
            SymbolicConstant::Leaf(leaf) => leaf.value(),
            SymbolicConstant::Binary { op, left, right } => {
                op.apply(left.evaluate(), right.evaluate())
            }
            SymbolicConstant::Unary { op, operand } => op.apply(operand.evaluate()),
        }
    }

    pub fn binary(op: BinaryOp, left: SymbolicConstant, right: SymbolicConstant) -> Self {
        SymbolicConstant::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn pow(&self, exponent: impl Into<SymbolicConstant>) -> Self {
        Self::binary(BinaryOp::Pow, self.clone(), exponent.into())
    }

    pub fn abs(&self) -> Self {
        SymbolicConstant::Unary {
            op: UnaryOp::Abs,
            operand: Box::new(self.clone()),
        }
    }

    /// Visit every leaf, left to right.
    pub fn for_each_leaf(&self, visit: &mut impl FnMut(&Arc<Leaf>)) {
        match self {
            SymbolicConstant::Leaf(leaf) => visit(leaf),
            SymbolicConstant::Binary { left, right, .. } => {
                left.for_each_leaf(visit);
                right.for_each_leaf(visit);
            }
            SymbolicConstant::Unary { operand, .. } => operand.for_each_leaf(visit),
        }
    }

    fn for_each_leaf_mut(&mut self, visit: &mut impl FnMut(&mut Arc<Leaf>)) {
        match self {
            SymbolicConstant::Leaf(leaf) => visit(leaf),
            SymbolicConstant::Binary { left, right, .. } => {
                left.for_each_leaf_mut(visit);
                right.for_each_leaf_mut(visit);
            }
            SymbolicConstant::Unary { operand, .. } => operand.for_each_leaf_mut(visit),
        }
    }

    /// Whether any leaf in this tree carries a name.
    pub fn has_named_leaves(&self) -> bool {
        let mut found = false;
        self.for_each_leaf(&mut |leaf| found |= leaf.name().is_some());
        found
    }

    /// Insert every named leaf not yet known to `registry`. Existing entries win.
    pub fn register_named_leaves(&self, registry: &mut NamedConstRegistry) {
        self.for_each_leaf(&mut |leaf| {
            registry.register(leaf);
        });
    }

    /// Point every named leaf at the registry's canonical instance.
    ///
    /// Returns how many tree positions were rewired.
    pub fn deduplicate(&mut self, registry: &NamedConstRegistry) -> usize {
        let mut rewired = 0;
        self.for_each_leaf_mut(&mut |leaf| {
            let Some(name) = leaf.name() else {
                return;
            };
            if let Some(canonical) = registry.get(name) {
                if !Arc::ptr_eq(canonical, leaf) {
                    *leaf = Arc::clone(canonical);
                    rewired += 1;
                }
            }
        });
        rewired
    }

    fn precedence(&self) -> u8 {
        match self {
            SymbolicConstant::Leaf(_) | SymbolicConstant::Unary { .. } => 3,
            SymbolicConstant::Binary { op, .. } => match op {
                BinaryOp::Add | BinaryOp::Sub => 0,
                BinaryOp::Mul | BinaryOp::Div => 1,
                BinaryOp::Pow => 2,
            },
        }
    }
}

impl fmt::Display for SymbolicConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolicConstant::Leaf(leaf) => match leaf.name() {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "{}", leaf.value()),
            },
            SymbolicConstant::Binary { op, left, right } => {
                let own = self.precedence();
                if left.precedence() < own {
                    write!(f, "({left})")?;
                } else {
                    write!(f, "{left}")?;
                }
                write!(f, " {} ", op.symbol())?;
                if right.precedence() <= own {
                    write!(f, "({right})")
                } else {
                    write!(f, "{right}")
                }
            }
            SymbolicConstant::Unary { op, operand } => match op {
                UnaryOp::Abs => write!(f, "|{operand}|"),
            },
        }
    }
}

impl From<f64> for SymbolicConstant {
    fn from(value: f64) -> Self {
        SymbolicConstant::literal(value)
    }
}

macro_rules! impl_constant_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait for SymbolicConstant {
            type Output = SymbolicConstant;

            fn $method(self, rhs: SymbolicConstant) -> Self::Output {
                SymbolicConstant::binary($op, self, rhs)
            }
        }

        impl $trait<&SymbolicConstant> for &SymbolicConstant {
            type Output = SymbolicConstant;

            fn $method(self, rhs: &SymbolicConstant) -> Self::Output {
                SymbolicConstant::binary($op, self.clone(), rhs.clone())
            }
        }

        impl $trait<f64> for SymbolicConstant {
            type Output = SymbolicConstant;

            fn $method(self, rhs: f64) -> Self::Output {
                SymbolicConstant::binary($op, self, SymbolicConstant::literal(rhs))
            }
        }

        impl $trait<SymbolicConstant> for f64 {
            type Output = SymbolicConstant;

            fn $method(self, rhs: SymbolicConstant) -> Self::Output {
                SymbolicConstant::binary($op, SymbolicConstant::literal(self), rhs)
            }
        }
    };
}

impl_constant_op!(Add, add, BinaryOp::Add);
impl_constant_op!(Sub, sub, BinaryOp::Sub);
impl_constant_op!(Mul, mul, BinaryOp::Mul);
impl_constant_op!(Div, div, BinaryOp::Div);

impl Neg for SymbolicConstant {
    type Output = SymbolicConstant;

    fn neg(self) -> Self::Output {
        SymbolicConstant::binary(BinaryOp::Mul, SymbolicConstant::literal(-1.0), self)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_nested_tree() {
        let a = SymbolicConstant::named("a", 3.0);
        let b = SymbolicConstant::literal(4.0);
        let tree = (&a * &b + 2.0).pow(2.0);
        assert_eq!(tree.evaluate(), 196.0);
        assert_eq!((-(a.clone())).abs().evaluate(), 3.0);
        assert_eq!((a / 2.0).evaluate(), 1.5);
    }

    #[test]
    fn operators_do_not_mutate_operands() {
        let a = SymbolicConstant::named("a", 3.0);
        let sum = a.clone() + 1.0;
        assert_eq!(a.evaluate(), 3.0);
        assert_eq!(sum.evaluate(), 4.0);
    }

    #[test]
    fn shared_leaf_updates_every_tree() {
        let a = SymbolicConstant::named("a", 2.0);
        let double = &a * &SymbolicConstant::literal(2.0);
        let plus = a.clone() + 10.0;
        let SymbolicConstant::Leaf(leaf) = &a else {
            panic!("expected a leaf");
        };
        leaf.set_value(5.0);
        assert_eq!(double.evaluate(), 10.0);
        assert_eq!(plus.evaluate(), 15.0);
    }

    #[test]
    fn deduplicate_rewires_to_canonical_leaf() {
        let mut registry = NamedConstRegistry::new();
        let canonical = SymbolicConstant::named("c", 5.0);
        canonical.register_named_leaves(&mut registry);

        let mut copy = SymbolicConstant::named("c", 5.0) * 3.0;
        assert_eq!(copy.deduplicate(&registry), 1);
        assert_eq!(copy.deduplicate(&registry), 0);

        registry.set_value("c", 7.0);
        assert_eq!(copy.evaluate(), 21.0);
        assert_eq!(canonical.evaluate(), 7.0);
    }

    #[test]
    fn register_keeps_first_instance() {
        let mut registry = NamedConstRegistry::new();
        SymbolicConstant::named("c", 1.0).register_named_leaves(&mut registry);
        SymbolicConstant::named("c", 9.0).register_named_leaves(&mut registry);
        assert_eq!(registry.value("c").unwrap(), 1.0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn display_respects_precedence() {
        let a = SymbolicConstant::named("a", 1.0);
        let b = SymbolicConstant::named("b", 2.0);
        let tree = (a.clone() + b.clone()) * a.clone() - b.abs();
        assert_eq!(tree.to_string(), "(a + b) * a - |b|");
    }
}
