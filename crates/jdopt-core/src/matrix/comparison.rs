//! Staged comparisons.
//!
//! Comparing two operands records what was compared and does nothing else.
//! The model turns a chain into stored constraints in `Model::add_constraint`.

use jdopt_expr::ComparisonSense;

use crate::matrix::operand::Operand;
use crate::model::ModelError;

#[derive(Debug, Clone)]
pub struct Comparison {
    pub lhs: Operand,
    pub sense: ComparisonSense,
    pub rhs: Operand,
}

impl Comparison {
    pub fn new(lhs: impl Into<Operand>, sense: ComparisonSense, rhs: impl Into<Operand>) -> Self {
        Self {
            lhs: lhs.into(),
            sense,
            rhs: rhs.into(),
        }
    }
}

/// Ordered list of comparisons where each one starts at the previous
/// right-hand side: `a.le(b).le(c)` stages `a <= b` and `b <= c`.
#[derive(Debug, Clone)]
pub struct ComparisonChain {
    comparisons: Vec<Comparison>,
}

impl ComparisonChain {
    pub fn start(lhs: impl Into<Operand>, sense: ComparisonSense, rhs: impl Into<Operand>) -> Self {
        Self {
            comparisons: vec![Comparison::new(lhs, sense, rhs)],
        }
    }

    pub fn le(self, rhs: impl Into<Operand>) -> Self {
        self.then(ComparisonSense::LessEqual, rhs)
    }

    pub fn ge(self, rhs: impl Into<Operand>) -> Self {
        self.then(ComparisonSense::GreaterEqual, rhs)
    }

    pub fn equals(self, rhs: impl Into<Operand>) -> Self {
        self.then(ComparisonSense::Equal, rhs)
    }

    /// Chain by operator symbol. Only `<=`, `>=` and `==` are accepted.
    pub fn compare(self, symbol: &str, rhs: impl Into<Operand>) -> Result<Self, ModelError> {
        let sense = ComparisonSense::from_symbol(symbol)?;
        Ok(self.then(sense, rhs))
    }

    fn then(mut self, sense: ComparisonSense, rhs: impl Into<Operand>) -> Self {
        let lhs = match self.comparisons.last() {
            Some(last) => last.rhs.clone(),
            None => return self,
        };
        self.comparisons.push(Comparison {
            lhs,
            sense,
            rhs: rhs.into(),
        });
        self
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn len(&self) -> usize {
        self.comparisons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }

    pub fn into_comparisons(self) -> Vec<Comparison> {
        self.comparisons
    }
}

impl From<Comparison> for ComparisonChain {
    fn from(comparison: Comparison) -> Self {
        Self {
            comparisons: vec![comparison],
        }
    }
}

/// Comparison builders for every operand-like value.
///
/// `x.le(50.0).ge(&y)` stages `x <= 50` and `50 >= y`.
pub trait Compare: Into<Operand> + Sized {
    fn le(self, rhs: impl Into<Operand>) -> ComparisonChain {
        ComparisonChain::start(self, ComparisonSense::LessEqual, rhs)
    }

    fn ge(self, rhs: impl Into<Operand>) -> ComparisonChain {
        ComparisonChain::start(self, ComparisonSense::GreaterEqual, rhs)
    }

    fn equals(self, rhs: impl Into<Operand>) -> ComparisonChain {
        ComparisonChain::start(self, ComparisonSense::Equal, rhs)
    }

    fn compare(self, symbol: &str, rhs: impl Into<Operand>) -> Result<ComparisonChain, ModelError> {
        let sense = ComparisonSense::from_symbol(symbol)?;
        Ok(ComparisonChain::start(self, sense, rhs))
    }
}

impl Compare for Operand {}
impl Compare for &Operand {}
impl Compare for crate::matrix::VarMatrix {}
impl Compare for &crate::matrix::VarMatrix {}
impl Compare for crate::matrix::ExprMatrix {}
impl Compare for &crate::matrix::ExprMatrix {}
impl Compare for crate::matrix::ConstMatrix {}
impl Compare for &crate::matrix::ConstMatrix {}
