//! Comparison senses used when staging constraints.

use crate::expr::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "le",
            ComparisonSense::GreaterEqual => "ge",
            ComparisonSense::Equal => "eq",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "<=",
            ComparisonSense::GreaterEqual => ">=",
            ComparisonSense::Equal => "==",
        }
    }

    /// Parse an operator symbol. `!=` and anything unknown are rejected.
    pub fn from_symbol(symbol: &str) -> Result<Self, ExprError> {
        match symbol.trim() {
            "<=" => Ok(ComparisonSense::LessEqual),
            ">=" => Ok(ComparisonSense::GreaterEqual),
            "==" | "=" => Ok(ComparisonSense::Equal),
            other => Err(ExprError::BadComparisonOperator {
                symbol: other.to_string(),
            }),
        }
    }

    /// Sense after swapping both sides of the comparison.
    pub fn flipped(self) -> Self {
        match self {
            ComparisonSense::LessEqual => ComparisonSense::GreaterEqual,
            ComparisonSense::GreaterEqual => ComparisonSense::LessEqual,
            ComparisonSense::Equal => ComparisonSense::Equal,
        }
    }
}

impl std::str::FromStr for ComparisonSense {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_constraint_operators() {
        assert_eq!(
            ComparisonSense::from_symbol("<="),
            Ok(ComparisonSense::LessEqual)
        );
        assert_eq!(">=".parse(), Ok(ComparisonSense::GreaterEqual));
        assert_eq!(" == ".parse(), Ok(ComparisonSense::Equal));
    }

    #[test]
    fn rejects_not_equal() {
        let err = ComparisonSense::from_symbol("!=").unwrap_err();
        assert_eq!(err.code(), "EXPR_BAD_COMPARISON_OPERATOR");
    }

    #[test]
    fn flipped_swaps_inequalities() {
        assert_eq!(
            ComparisonSense::LessEqual.flipped(),
            ComparisonSense::GreaterEqual
        );
        assert_eq!(ComparisonSense::Equal.flipped(), ComparisonSense::Equal);
    }
}
