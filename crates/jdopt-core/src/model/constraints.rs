//! Turning staged comparisons into stored constraints.

use std::time::Instant;

use jdopt_expr::{ComparisonSense, ConstraintId, LinExpr};

use crate::matrix::{Comparison, ComparisonChain};
use crate::model::Model;
use crate::model::error::ModelError;
use crate::types::{Constraint, ConstraintSense};

/// Constants within this distance of zero count as zero when a constraint has
/// no variable terms left.
const CONSTANT_TOLERANCE: f64 = 1e-9;

/// Highest lazy level a constraint may carry.
pub const MAX_LAZY_LEVEL: u8 = 31;

/// Name and lazy level applied to every constraint of one `add_constraint` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintOptions {
    pub name: Option<String>,
    pub lazy_level: u8,
}

impl ConstraintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            lazy_level: 0,
        }
    }

    pub fn with_lazy_level(mut self, level: u8) -> Self {
        self.lazy_level = level;
        self
    }
}

impl Model {
    /// Normalize a comparison or chain into `expr <= 0` / `expr == 0` rows.
    ///
    /// Each comparison pairs its sides cell by cell (a single cell broadcasts).
    /// `>=` is stored as `rhs - lhs <= 0`. Rows without variable terms are
    /// dropped when their constant satisfies the sense and rejected otherwise.
    /// Nothing is stored unless the whole batch is valid. When several rows
    /// come out of one call, a name gets an `[i]` suffix per row.
    pub fn add_constraint(
        &mut self,
        staged: impl Into<ComparisonChain>,
        options: ConstraintOptions,
    ) -> Result<Vec<ConstraintId>, ModelError> {
        let started = Instant::now();
        if options.lazy_level > MAX_LAZY_LEVEL {
            return Err(ModelError::InvalidLazyLevel {
                level: options.lazy_level,
            });
        }

        let chain = staged.into();
        let mut pending = Vec::new();
        let mut dropped = 0_usize;
        for comparison in chain.comparisons() {
            for (expr, sense) in self.normalize_comparison(comparison)? {
                if self.is_trivially_satisfied(&expr, sense)? {
                    dropped += 1;
                } else {
                    pending.push((expr, sense));
                }
            }
        }

        let single = pending.len() == 1;
        let mut ids = Vec::with_capacity(pending.len());
        for (index, (expr, sense)) in pending.into_iter().enumerate() {
            let name = options.name.as_ref().map(|name| {
                if single {
                    name.clone()
                } else {
                    format!("{name}[{index}]")
                }
            });
            ids.push(self.push_constraint(expr, sense, name, options.lazy_level));
        }

        tracing::debug!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            comparisons = chain.len(),
            added = ids.len(),
            dropped,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Added constraints"
        );
        Ok(ids)
    }

    fn normalize_comparison(
        &self,
        comparison: &Comparison,
    ) -> Result<Vec<(LinExpr, ConstraintSense)>, ModelError> {
        let left = comparison.lhs.shape();
        let right = comparison.rhs.shape();
        if left.numel() != right.numel() && !left.is_scalar() && !right.is_scalar() {
            return Err(ModelError::ShapeMismatch {
                operation: "compare",
                left,
                right,
            });
        }

        let count = left.numel().max(right.numel());
        let mut rows = Vec::with_capacity(count);
        for index in 0..count {
            let lhs = self.operand_cell(&comparison.lhs, index)?;
            let rhs = self.operand_cell(&comparison.rhs, index)?;
            let row = match comparison.sense {
                ComparisonSense::GreaterEqual => (rhs.minus(&lhs), ConstraintSense::LessEqual),
                ComparisonSense::LessEqual => (lhs.minus(&rhs), ConstraintSense::LessEqual),
                ComparisonSense::Equal => (lhs.minus(&rhs), ConstraintSense::Equal),
            };
            rows.push(row);
        }
        Ok(rows)
    }

    /// `Ok(true)` for a variable-free row that always holds, an error for one
    /// that never does, `Ok(false)` for a row with variables.
    fn is_trivially_satisfied(
        &self,
        expr: &LinExpr,
        sense: ConstraintSense,
    ) -> Result<bool, ModelError> {
        for var in expr.variables() {
            self.ensure_variable_exists(var)?;
        }
        if !expr.is_constant() {
            return Ok(false);
        }
        let constant = expr.constant_value();
        let holds = match sense {
            ConstraintSense::LessEqual => constant <= CONSTANT_TOLERANCE,
            ConstraintSense::Equal => constant.abs() <= CONSTANT_TOLERANCE,
        };
        if holds {
            Ok(true)
        } else {
            Err(ModelError::InfeasibleConstantConstraint { constant, sense })
        }
    }

    /// Store an already validated row under the next constraint id.
    pub(crate) fn push_constraint(
        &mut self,
        mut expr: LinExpr,
        sense: ConstraintSense,
        name: Option<String>,
        lazy_level: u8,
    ) -> ConstraintId {
        self.unify_constants(&mut expr);
        let id = ConstraintId::new(self.next_constraint_id);
        self.next_constraint_id += 1;
        self.constraints
            .insert(id, Constraint::new(id, expr, sense, name, lazy_level));
        self.constraint_pool_mut(sense).push(id);
        id
    }
}
