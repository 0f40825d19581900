//! Scalar linear expression: constant plus an ordered list of terms.
//!
//! Term order is insertion order. It only matters for display and
//! persistence; [`LinExpr::normalized_terms`] gives the merged view used at the
//! solver boundary.

use std::collections::BTreeMap;
use std::fmt;

use crate::expr::coefficient::Coefficient;
use crate::expr::error::ExprError;
use crate::ids::VariableId;
use crate::registry::NamedConstRegistry;

/// `coefficient * variable`.
#[derive(Debug, Clone)]
pub struct Term {
    var: VariableId,
    coeff: Coefficient,
}

impl Term {
    pub fn new(var: VariableId, coeff: impl Into<Coefficient>) -> Self {
        Self {
            var,
            coeff: coeff.into(),
        }
    }

    pub fn var(&self) -> VariableId {
        self.var
    }

    pub fn coeff(&self) -> &Coefficient {
        &self.coeff
    }

    pub fn scaled(&self, by: &Coefficient) -> Term {
        Term {
            var: self.var,
            coeff: self.coeff.times(by),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinExpr {
    constant: Coefficient,
    terms: Vec<Term>,
}

impl LinExpr {
    // ── Constructors ────────────────────────────────────────

    /// Empty expression (all zeros).
    pub fn new() -> Self {
        Self::default()
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: impl Into<Coefficient>) -> Self {
        Self {
            constant: constant.into(),
            terms: Vec::new(),
        }
    }

    /// Single term: coeff * var.
    pub fn term(var: VariableId, coeff: impl Into<Coefficient>) -> Self {
        Self {
            constant: Coefficient::ZERO,
            terms: vec![Term::new(var, coeff)],
        }
    }

    /// Single variable with coefficient 1.0.
    pub fn var(var: VariableId) -> Self {
        Self::term(var, 1.0)
    }

    pub fn from_terms(terms: Vec<Term>, constant: impl Into<Coefficient>) -> Self {
        Self {
            constant: constant.into(),
            terms,
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn constant(&self) -> &Coefficient {
        &self.constant
    }

    pub fn constant_value(&self) -> f64 {
        self.constant.resolve()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True when no variable survives merging (e.g. `x - x + 3`).
    ///
    /// Only literal coefficients cancel. A symbolic coefficient keeps its
    /// variable even while it currently evaluates to zero, since its value
    /// can be reloaded later.
    pub fn is_constant(&self) -> bool {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for term in &self.terms {
            match &term.coeff {
                Coefficient::Symbolic(_) => return false,
                Coefficient::Literal(value) => *merged.entry(term.var).or_insert(0.0) += value,
            }
        }
        merged.values().all(|c| *c == 0.0)
    }

    pub fn into_parts(self) -> (Vec<Term>, Coefficient) {
        (self.terms, self.constant)
    }

    // ── In-place construction ───────────────────────────────

    /// Append `other`'s terms and add its constant.
    pub fn add_expr(&mut self, other: &LinExpr) {
        self.terms.extend(other.terms.iter().cloned());
        self.constant = self.constant.plus(&other.constant);
    }

    /// Add `multiplier * other`, appending a scaled copy of each term.
    pub fn add_scaled(&mut self, multiplier: &Coefficient, other: &LinExpr) {
        self.constant = self.constant.plus(&other.constant.times(multiplier));
        self.terms
            .extend(other.terms.iter().map(|term| term.scaled(multiplier)));
    }

    pub fn add_constant(&mut self, value: impl Into<Coefficient>) {
        self.constant = self.constant.plus(&value.into());
    }

    pub fn add_term(&mut self, coeff: impl Into<Coefficient>, var: VariableId) {
        self.terms.push(Term::new(var, coeff));
    }

    // ── Derived expressions ─────────────────────────────────

    /// Scale all terms and the constant.
    pub fn scale(&self, by: &Coefficient) -> LinExpr {
        let mut scaled = LinExpr::new();
        scaled.add_scaled(by, self);
        scaled
    }

    pub fn negate(&self) -> LinExpr {
        self.scale(&Coefficient::Literal(-1.0))
    }

    /// `self - other` as a fresh expression.
    pub fn minus(&self, other: &LinExpr) -> LinExpr {
        let mut diff = self.clone();
        diff.add_scaled(&Coefficient::Literal(-1.0), other);
        diff
    }

    /// Product of two expressions; one of them must be free of variables.
    pub fn try_mul(&self, other: &LinExpr) -> Result<LinExpr, ExprError> {
        if other.is_empty() {
            Ok(self.scale(&other.constant))
        } else if self.is_empty() {
            Ok(other.scale(&self.constant))
        } else {
            Err(ExprError::NonLinearProduct)
        }
    }

    /// Merged terms with duplicates combined and zero coefficients dropped.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for term in &self.terms {
            *merged.entry(term.var).or_insert(0.0) += term.coeff.resolve();
        }
        merged.into_iter().filter(|(_, c)| *c != 0.0).collect()
    }

    /// Evaluate against solved variable values. `None` as soon as one
    /// referenced variable has no value.
    pub fn value(&self, solved: impl Fn(VariableId) -> Option<f64>) -> Option<f64> {
        let mut total = self.constant.resolve();
        for term in &self.terms {
            total += term.coeff.resolve() * solved(term.var)?;
        }
        Some(total)
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.terms.iter().map(Term::var)
    }

    // ── Named constants ─────────────────────────────────────

    pub fn register_named_leaves(&self, registry: &mut NamedConstRegistry) {
        self.constant.register_named_leaves(registry);
        for term in &self.terms {
            term.coeff.register_named_leaves(registry);
        }
    }

    pub fn deduplicate(&mut self, registry: &NamedConstRegistry) -> usize {
        let mut rewired = self.constant.deduplicate(registry);
        for term in &mut self.terms {
            rewired += term.coeff.deduplicate(registry);
        }
        rewired
    }

    /// Fold variables with known fixed values into the constant.
    ///
    /// Returns how many terms were removed.
    pub fn substitute(&mut self, fixed: &BTreeMap<VariableId, f64>) -> usize {
        let before = self.terms.len();
        let mut folded = Coefficient::ZERO;
        self.terms.retain(|term| match fixed.get(&term.var) {
            Some(value) => {
                folded = folded.plus(&term.coeff.times(&Coefficient::Literal(*value)));
                false
            }
            None => true,
        });
        self.constant = self.constant.plus(&folded);
        before - self.terms.len()
    }
}

impl From<VariableId> for LinExpr {
    fn from(var: VariableId) -> Self {
        LinExpr::var(var)
    }
}

impl From<f64> for LinExpr {
    fn from(value: f64) -> Self {
        LinExpr::from_constant(value)
    }
}

impl fmt::Display for LinExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for term in &self.terms {
            if wrote {
                write!(f, " + ")?;
            }
            write!(f, "{} x{}", term.coeff, term.var.inner())?;
            wrote = true;
        }
        let constant_is_zero = matches!(self.constant, Coefficient::Literal(v) if v == 0.0);
        if !wrote || !constant_is_zero {
            if wrote {
                write!(f, " + ")?;
            }
            write!(f, "{}", self.constant)?;
        }
        Ok(())
    }
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for LinExpr {
    type Output = LinExpr;

    fn add(mut self, rhs: LinExpr) -> Self::Output {
        self.add_expr(&rhs);
        self
    }
}

impl std::ops::Sub for LinExpr {
    type Output = LinExpr;

    fn sub(self, rhs: LinExpr) -> Self::Output {
        self.minus(&rhs)
    }
}

impl std::ops::Mul<f64> for LinExpr {
    type Output = LinExpr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(&Coefficient::Literal(rhs))
    }
}

impl std::ops::Neg for LinExpr {
    type Output = LinExpr;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}
