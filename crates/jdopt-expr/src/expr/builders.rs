//! Builder functions for constructing linear expressions.

use crate::expr::coefficient::Coefficient;
use crate::expr::core::{LinExpr, Term};
use crate::expr::error::ExprError;
use crate::ids::VariableId;

/// Build a LinExpr from flexible inputs.
///
/// Accepts either:
/// - `terms`: pre-paired (VariableId, f64) tuples
/// - `variables` + `coefficients`: separate vecs zipped together
///
/// Returns an error if both styles are mixed or if lengths mismatch.
pub fn linear_terms(
    terms: Option<Vec<(VariableId, f64)>>,
    variables: Option<Vec<VariableId>>,
    coefficients: Option<Vec<f64>>,
) -> Result<LinExpr, ExprError> {
    let pairs: Vec<(VariableId, f64)> = match (terms, variables, coefficients) {
        (Some(t), None, None) => t,
        (None, Some(vars), Some(coeffs)) => {
            if vars.len() != coeffs.len() {
                return Err(ExprError::MismatchedLengths);
            }
            vars.into_iter().zip(coeffs).collect()
        }
        (None, None, None) => return Err(ExprError::MissingInputs),
        (None, Some(_), None) | (None, None, Some(_)) => return Err(ExprError::MissingInputs),
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => return Err(ExprError::MixedInputs),
    };
    let terms = pairs
        .into_iter()
        .filter(|(_, c)| *c != 0.0)
        .map(|(var, c)| Term::new(var, c))
        .collect();
    Ok(LinExpr::from_terms(terms, Coefficient::ZERO))
}

/// Combine expressions by concatenating their terms and adding constants.
///
/// Duplicate variable terms are NOT merged - use `normalized_terms()` on the
/// result if consolidation is needed.
pub fn linear_sum<'a>(exprs: impl IntoIterator<Item = &'a LinExpr>) -> LinExpr {
    let mut total = LinExpr::new();
    for expr in exprs {
        total.add_expr(expr);
    }
    total
}
