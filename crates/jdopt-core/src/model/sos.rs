//! Special-ordered sets.
//!
//! In [`SosMode::Native`] a set is stored untouched for the backend. In
//! [`SosMode::Reformulate`] it is rewritten into binary indicators and big-M
//! rows that any MILP backend can handle:
//!
//! - every non-binary member `v` gets a nonzero indicator `b` with
//!   `b * lb <= v` (when `lb < 0`) and `v <= b * ub` (when `ub > 0`);
//! - SOS1 adds `sum(b) <= 1`;
//! - SOS2 adds startup indicators `su` with `su[0] >= b[0]`,
//!   `su[k] >= b[k] - b[k-1]`, `su[k] <= b[k]`, `sum(b) <= 2`, `sum(su) <= 1`.

use std::time::Instant;

use jdopt_expr::{LinExpr, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;
use crate::types::{ConstraintSense, SosConstraint, SosMode, SosType, VariableSpec, VariableType};

impl Model {
    /// At most one member may be nonzero.
    pub fn add_sos1(&mut self, variables: &[VariableId], weights: &[f64]) -> Result<(), ModelError> {
        self.add_sos(variables, weights, SosType::Sos1)
    }

    /// At most two members may be nonzero, and they must be adjacent.
    pub fn add_sos2(&mut self, variables: &[VariableId], weights: &[f64]) -> Result<(), ModelError> {
        self.add_sos(variables, weights, SosType::Sos2)
    }

    fn add_sos(
        &mut self,
        variables: &[VariableId],
        weights: &[f64],
        sos_type: SosType,
    ) -> Result<(), ModelError> {
        let started = Instant::now();
        if variables.len() != weights.len() {
            return Err(ModelError::InvalidSosWeights {
                variables: variables.len(),
                weights: weights.len(),
            });
        }
        for &var in variables {
            self.ensure_variable_exists(var)?;
        }
        if variables.is_empty() {
            return Ok(());
        }

        let mode = self.config().sos_mode;
        match mode {
            SosMode::Native => self.sos.push(SosConstraint {
                variables: variables.to_vec(),
                weights: weights.to_vec(),
                sos_type,
            }),
            SosMode::Reformulate => self.reformulate_sos(variables, sos_type)?,
        }
        self.sos_count += 1;

        tracing::debug!(
            component = "model",
            operation = "add_sos",
            status = "success",
            sos_type = sos_type.as_str(),
            mode = mode.as_str(),
            members = variables.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Added SOS set"
        );
        Ok(())
    }

    fn reformulate_sos(&mut self, variables: &[VariableId], sos_type: SosType) -> Result<(), ModelError> {
        // Validate every member before anything is created.
        for &var in variables {
            let variable = self.get_variable(var)?;
            if variable.var_type() == VariableType::Binary {
                continue;
            }
            let bounds = variable.bounds();
            if !bounds.is_finite() || !bounds.spans_zero() {
                return Err(ModelError::UnsupportedSemicontinuousBounds {
                    var,
                    lower: bounds.lower,
                    upper: bounds.upper,
                });
            }
        }

        let set = self.sos_count;
        let mut indicators = Vec::with_capacity(variables.len());
        for (index, &var) in variables.iter().enumerate() {
            let variable = self.get_variable(var)?;
            if variable.var_type() == VariableType::Binary {
                indicators.push(var);
                continue;
            }
            let bounds = variable.bounds();
            let indicator =
                self.add_variable(VariableSpec::binary().with_name(format!("__sos{set}_nz_{index}")))?;
            if bounds.lower < 0.0 {
                // b * lb - v <= 0
                let mut row = LinExpr::term(indicator, bounds.lower);
                row.add_term(-1.0, var);
                self.push_constraint(row, ConstraintSense::LessEqual, None, 0);
            }
            if bounds.upper > 0.0 {
                // v - b * ub <= 0
                let mut row = LinExpr::var(var);
                row.add_term(-bounds.upper, indicator);
                self.push_constraint(row, ConstraintSense::LessEqual, None, 0);
            }
            indicators.push(indicator);
        }

        match sos_type {
            SosType::Sos1 => {
                self.push_cardinality(&indicators, 1.0);
            }
            SosType::Sos2 => {
                let mut startups = Vec::with_capacity(indicators.len());
                for (index, &nonzero) in indicators.iter().enumerate() {
                    let startup = self
                        .add_variable(VariableSpec::binary().with_name(format!("__sos{set}_su_{index}")))?;
                    // b[k] - b[k-1] - su[k] <= 0
                    let mut rise = LinExpr::var(nonzero);
                    if index > 0 {
                        rise.add_term(-1.0, indicators[index - 1]);
                    }
                    rise.add_term(-1.0, startup);
                    self.push_constraint(rise, ConstraintSense::LessEqual, None, 0);
                    // su[k] - b[k] <= 0
                    let mut cap = LinExpr::var(startup);
                    cap.add_term(-1.0, nonzero);
                    self.push_constraint(cap, ConstraintSense::LessEqual, None, 0);
                    startups.push(startup);
                }
                self.push_cardinality(&indicators, 2.0);
                self.push_cardinality(&startups, 1.0);
            }
        }
        Ok(())
    }

    /// `sum(vars) - limit <= 0`
    fn push_cardinality(&mut self, vars: &[VariableId], limit: f64) {
        let mut row = LinExpr::from_constant(-limit);
        for &var in vars {
            row.add_term(1.0, var);
        }
        self.push_constraint(row, ConstraintSense::LessEqual, None, 0);
    }

    /// Number of SOS sets added, in either mode.
    pub fn num_sos_sets(&self) -> u32 {
        self.sos_count
    }
}
