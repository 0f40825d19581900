//! Human-readable LP-style model formatting.

use std::fmt::Write as _;

use jdopt_expr::{LinExpr, VariableId};

use crate::model::Model;
use crate::types::{Bounds, Constraint, Sense, SosType, VariableType};

const FLOAT_EQ_EPSILON: f64 = 1e-12;
const PREVIEW_CONSTRAINTS: usize = 20;
const PREVIEW_TERMS: usize = 30;
const PREVIEW_DOMAIN_ITEMS: usize = 20;

/// Formatting controls for pretty-print output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyPrintOptions {
    /// Maximum number of constraints to render.
    pub constraints: Option<usize>,
    /// Maximum number of terms to render per linear expression.
    pub terms: Option<usize>,
    /// Maximum number of items in the bounds, integrality and SOS sections.
    pub domain_items: Option<usize>,
}

impl PrettyPrintOptions {
    /// Preview mode used by terse displays.
    pub fn preview() -> Self {
        Self {
            constraints: Some(PREVIEW_CONSTRAINTS),
            terms: Some(PREVIEW_TERMS),
            domain_items: Some(PREVIEW_DOMAIN_ITEMS),
        }
    }

    /// Full mode with no truncation.
    pub fn full() -> Self {
        Self {
            constraints: None,
            terms: None,
            domain_items: None,
        }
    }
}

impl Default for PrettyPrintOptions {
    fn default() -> Self {
        Self::preview()
    }
}

struct ConstraintRenderLine {
    lhs: String,
    op: &'static str,
    rhs: String,
}

impl Model {
    /// Render the model as LP-style text.
    ///
    /// Terms appear in the order they were built, with current constant
    /// values. Constraints are listed `<=` pool first, then `=`.
    pub fn format_lp(&self, options: PrettyPrintOptions) -> String {
        let mut lines = Vec::new();
        lines.push(self.render_objective_line(options.terms));
        lines.push(String::new());
        lines.push("s.t.".to_string());

        let total_constraints = self.num_constraints();
        let constraint_limit = options
            .constraints
            .unwrap_or(total_constraints)
            .min(total_constraints);

        if constraint_limit == 0 {
            lines.push(" (none)".to_string());
        } else {
            let rendered_constraints: Vec<ConstraintRenderLine> = self
                .constraints()
                .take(constraint_limit)
                .map(|constraint| self.render_constraint_line(constraint, options.terms))
                .collect();
            let lhs_width = rendered_constraints
                .iter()
                .map(|entry| entry.lhs.len())
                .max()
                .unwrap_or(0);
            for entry in rendered_constraints {
                lines.push(format!(
                    " {:lhs_width$} {:>2} {}",
                    entry.lhs,
                    entry.op,
                    entry.rhs,
                    lhs_width = lhs_width
                ));
            }
        }

        if constraint_limit < total_constraints {
            lines.push(format!(
                " ... ({} more constraints)",
                total_constraints - constraint_limit
            ));
        }

        let mut binary_vars = Vec::new();
        let mut integer_vars = Vec::new();
        let mut bounds_lines = Vec::new();
        for var in self.variables() {
            let label = self.variable_label(var.id());
            match var.var_type() {
                VariableType::Binary if is_unit_interval(var.bounds()) => {
                    binary_vars.push(label);
                    continue;
                }
                VariableType::Binary | VariableType::Integer => integer_vars.push(label.clone()),
                VariableType::Continuous => {}
            }
            if let Some(line) = format_variable_bounds_line(&label, var.bounds()) {
                bounds_lines.push(line);
            }
        }

        let sos_lines: Vec<String> = self
            .sos_constraints()
            .iter()
            .map(|set| {
                let kind = match set.sos_type {
                    SosType::Sos1 => "S1",
                    SosType::Sos2 => "S2",
                };
                let members: Vec<String> = set
                    .variables
                    .iter()
                    .zip(&set.weights)
                    .map(|(var, weight)| {
                        format!("{}:{}", self.variable_label(*var), format_lp_number(*weight))
                    })
                    .collect();
                format!("{kind}:: {}", members.join(" "))
            })
            .collect();

        let has_domains = !binary_vars.is_empty()
            || !integer_vars.is_empty()
            || !bounds_lines.is_empty()
            || !sos_lines.is_empty();
        if has_domains {
            lines.push(String::new());
        }
        push_limited_section(&mut lines, "Bounds", &bounds_lines, "bounds", options.domain_items);
        if !binary_vars.is_empty() {
            lines.push(format_variable_group_line(
                "Binary",
                &binary_vars,
                options.domain_items,
            ));
        }
        if !integer_vars.is_empty() {
            lines.push(format_variable_group_line(
                "Integer",
                &integer_vars,
                options.domain_items,
            ));
        }
        push_limited_section(&mut lines, "SOS", &sos_lines, "sets", options.domain_items);

        lines.join("\n")
    }

    fn render_objective_line(&self, max_terms: Option<usize>) -> String {
        let Some(objective) = self.objective() else {
            return "Objective: (not set)".to_string();
        };

        let sense_label = match objective.sense {
            Sense::Minimize => "Min",
            Sense::Maximize => "Max",
        };
        let mut expr = self.format_linear_expression(&objective.expr, max_terms);
        let constant = objective.expr.constant_value();
        if !float_approx_equal(constant, 0.0) {
            if expr == "0" {
                expr = format_lp_number(constant);
            } else if constant < 0.0 {
                let _ = write!(expr, " - {}", format_lp_number(-constant));
            } else {
                let _ = write!(expr, " + {}", format_lp_number(constant));
            }
        }
        match objective.name.as_deref() {
            Some(name) => format!("{sense_label} {name}: {expr}"),
            None => format!("{sense_label} {expr}"),
        }
    }

    fn render_constraint_line(
        &self,
        constraint: &Constraint,
        max_terms: Option<usize>,
    ) -> ConstraintRenderLine {
        let mut lhs = self.format_linear_expression(constraint.expr(), max_terms);
        if let Some(name) = constraint.name() {
            lhs = format!("{name}: {lhs}");
        }
        ConstraintRenderLine {
            lhs,
            op: constraint.sense().symbol(),
            rhs: format_lp_number(constraint.rhs()),
        }
    }

    fn format_linear_expression(&self, expr: &LinExpr, max_terms: Option<usize>) -> String {
        let nonzero_terms: Vec<(VariableId, f64)> = expr
            .terms()
            .iter()
            .map(|term| (term.var(), term.coeff().resolve()))
            .filter(|(_, coeff)| !float_approx_equal(*coeff, 0.0))
            .collect();
        if nonzero_terms.is_empty() {
            return "0".to_string();
        }

        let term_limit = max_terms
            .unwrap_or(nonzero_terms.len())
            .min(nonzero_terms.len());
        let mut rendered = String::new();

        for (idx, (var_id, coeff)) in nonzero_terms.iter().take(term_limit).enumerate() {
            let negative = *coeff < 0.0;
            let abs_coeff = coeff.abs();
            let label = self.variable_label(*var_id);
            let term_body = if float_approx_equal(abs_coeff, 1.0) {
                label
            } else {
                format!("{} {label}", format_lp_number(abs_coeff))
            };

            if idx == 0 {
                if negative {
                    rendered.push('-');
                }
                rendered.push_str(&term_body);
            } else if negative {
                let _ = write!(rendered, " - {term_body}");
            } else {
                let _ = write!(rendered, " + {term_body}");
            }
        }

        if term_limit < nonzero_terms.len() {
            let _ = write!(
                rendered,
                " + ... ({} more terms)",
                nonzero_terms.len() - term_limit
            );
        }

        rendered
    }

    fn variable_label(&self, var_id: VariableId) -> String {
        self.get_variable(var_id)
            .ok()
            .and_then(|var| var.name())
            .map_or_else(|| format!("v{}", var_id.inner()), ToString::to_string)
    }
}

/// Shared numeric formatter for LP-style output.
pub fn format_lp_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            "-inf".to_string()
        } else {
            "inf".to_string()
        };
    }

    let mut rendered = format!("{value:.12}");
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }
    if rendered == "-0" {
        "0".to_string()
    } else {
        rendered
    }
}

fn float_approx_equal(lhs: f64, rhs: f64) -> bool {
    if lhs.to_bits() == rhs.to_bits() {
        return true;
    }
    if !lhs.is_finite() || !rhs.is_finite() {
        return false;
    }
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= FLOAT_EQ_EPSILON * scale
}

fn is_unit_interval(bounds: Bounds) -> bool {
    float_approx_equal(bounds.lower, 0.0) && float_approx_equal(bounds.upper, 1.0)
}

fn push_limited_section(
    lines: &mut Vec<String>,
    heading: &str,
    entries: &[String],
    noun: &str,
    max_items: Option<usize>,
) {
    if entries.is_empty() {
        return;
    }
    lines.push(format!("{heading}:"));
    let limit = max_items.unwrap_or(entries.len()).min(entries.len());
    for entry in entries.iter().take(limit) {
        lines.push(format!(" {entry}"));
    }
    if limit < entries.len() {
        lines.push(format!(" ... ({} more {noun})", entries.len() - limit));
    }
}

fn format_variable_group_line(
    label: &str,
    variables: &[String],
    max_items: Option<usize>,
) -> String {
    let limit = max_items.unwrap_or(variables.len()).min(variables.len());
    let mut line = String::new();
    let _ = write!(line, "{label}: ");
    if limit > 0 {
        line.push_str(&variables[..limit].join(", "));
    }
    if limit < variables.len() {
        if limit > 0 {
            line.push_str(", ");
        }
        let _ = write!(line, "... ({} more)", variables.len() - limit);
    }
    line
}

fn format_variable_bounds_line(label: &str, bounds: Bounds) -> Option<String> {
    let lower_finite = bounds.lower.is_finite();
    let upper_finite = bounds.upper.is_finite();
    if !lower_finite && !upper_finite {
        return None;
    }

    if lower_finite && upper_finite {
        return Some(format!(
            "{} <= {label} <= {}",
            format_lp_number(bounds.lower),
            format_lp_number(bounds.upper)
        ));
    }
    if lower_finite {
        return Some(format!("{} <= {label}", format_lp_number(bounds.lower)));
    }
    Some(format!("{label} <= {}", format_lp_number(bounds.upper)))
}
