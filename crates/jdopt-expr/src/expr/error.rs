//! Expression construction errors.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    MixedInputs,
    MissingInputs,
    MismatchedLengths,
    /// Both factors of a product carry variable terms.
    NonLinearProduct,
    /// A comparison symbol with no constraint meaning (for example `!=`).
    BadComparisonOperator { symbol: String },
    /// Read access to a constant name the registry does not know.
    UnregisteredConstant { name: String },
}

impl ExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::MixedInputs => "EXPR_MIXED_INPUTS",
            ExprError::MissingInputs => "EXPR_MISSING_INPUTS",
            ExprError::MismatchedLengths => "EXPR_MISMATCHED_LENGTHS",
            ExprError::NonLinearProduct => "EXPR_NON_LINEAR_PRODUCT",
            ExprError::BadComparisonOperator { .. } => "EXPR_BAD_COMPARISON_OPERATOR",
            ExprError::UnregisteredConstant { .. } => "CONSTANT_UNREGISTERED",
        }
    }
}

impl std::fmt::Display for ExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprError::MixedInputs => write!(
                f,
                "[{}] Use either terms or variables/coefficients, not both",
                self.code()
            ),
            ExprError::MissingInputs => write!(
                f,
                "[{}] variables and coefficients are required",
                self.code()
            ),
            ExprError::MismatchedLengths => write!(
                f,
                "[{}] variables and coefficients must have the same length",
                self.code()
            ),
            ExprError::NonLinearProduct => write!(
                f,
                "[{}] Product of two expressions with variable terms is not linear",
                self.code()
            ),
            ExprError::BadComparisonOperator { symbol } => write!(
                f,
                "[{}] Operator '{}' cannot form a constraint (use <=, >= or ==)",
                self.code(),
                symbol
            ),
            ExprError::UnregisteredConstant { name } => write!(
                f,
                "[{}] Named constant '{}' is not registered",
                self.code(),
                name
            ),
        }
    }
}

impl std::error::Error for ExprError {}

#[cfg(test)]
mod tests {
    use super::ExprError;

    #[test]
    fn error_code_is_stable() {
        assert_eq!(ExprError::MixedInputs.code(), "EXPR_MIXED_INPUTS");
        assert_eq!(ExprError::MissingInputs.code(), "EXPR_MISSING_INPUTS");
        assert_eq!(
            ExprError::MismatchedLengths.code(),
            "EXPR_MISMATCHED_LENGTHS"
        );
        assert_eq!(
            ExprError::UnregisteredConstant {
                name: "c".to_string()
            }
            .code(),
            "CONSTANT_UNREGISTERED"
        );
    }

    #[test]
    fn display_prefixes_error_code() {
        let rendered = ExprError::BadComparisonOperator {
            symbol: "!=".to_string(),
        }
        .to_string();
        assert!(rendered.starts_with("[EXPR_BAD_COMPARISON_OPERATOR]"));
        assert!(rendered.contains("'!='"));
    }
}
