//! Solver error types.

use crate::SolverStatus;

/// Error type for solver operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Model has no variables.
    EmptyModel,
    /// No objective function set.
    NoObjective,
    /// A constraint or objective references a variable the problem does not declare.
    InvalidVariableId(u32),
    /// No backend is registered under the requested key.
    BackendNotRegistered(String),
    /// The backend cannot take SOS sets in native form.
    NativeSosUnsupported { backend: String },
    /// A parameter was given with a type the backend cannot accept.
    InvalidParameter { key: String, reason: String },
    /// Internal solver error.
    InternalError(String),
    /// Solver failed to find a usable solution.
    SolveFailure { status: SolverStatus },
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EmptyModel => "MODEL_EMPTY",
            SolverError::NoObjective => "OBJECTIVE_MISSING",
            SolverError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            SolverError::BackendNotRegistered(_) => "BACKEND_NOT_REGISTERED",
            SolverError::NativeSosUnsupported { .. } => "BACKEND_NATIVE_SOS_UNSUPPORTED",
            SolverError::InvalidParameter { .. } => "PARAMETER_INVALID",
            SolverError::InternalError(_) => "SOLVER_INTERNAL",
            SolverError::SolveFailure { status } => match status {
                SolverStatus::Infeasible => "SOLVER_INFEASIBLE",
                SolverStatus::Unbounded => "SOLVER_UNBOUNDED",
                SolverStatus::ReachedTimeLimit => "SOLVER_TIME_LIMIT",
                SolverStatus::ReachedIterationLimit => "SOLVER_ITERATION_LIMIT",
                _ => "SOLVER_INTERNAL",
            },
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::EmptyModel => write!(f, "[{}] Model has no variables", self.code()),
            SolverError::NoObjective => write!(f, "[{}] Model has no objective", self.code()),
            SolverError::InvalidVariableId(var_id) => {
                write!(f, "[{}] Variable ID {} does not exist", self.code(), var_id)
            }
            SolverError::BackendNotRegistered(key) => {
                write!(f, "[{}] No backend registered as '{}'", self.code(), key)
            }
            SolverError::NativeSosUnsupported { backend } => write!(
                f,
                "[{}] Backend '{}' cannot solve native SOS sets; build the model with SOS reformulation",
                self.code(),
                backend
            ),
            SolverError::InvalidParameter { key, reason } => {
                write!(f, "[{}] Parameter '{}': {}", self.code(), key, reason)
            }
            SolverError::InternalError(msg) => {
                write!(f, "[{}] Solver internal error: {}", self.code(), msg)
            }
            SolverError::SolveFailure { status } => {
                write!(f, "[{}] {}", self.code(), status.message())
            }
        }
    }
}

impl std::error::Error for SolverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_variable_id() {
        let msg = SolverError::InvalidVariableId(42).to_string();
        assert!(msg.contains("VARIABLE_INVALID_ID"));
        assert!(msg.contains("42"));
    }

    #[test]
    fn test_error_display_backend_not_registered() {
        let msg = SolverError::BackendNotRegistered("gurobi".to_string()).to_string();
        assert_eq!(msg, "[BACKEND_NOT_REGISTERED] No backend registered as 'gurobi'");
    }

    #[test]
    fn test_error_display_native_sos() {
        let err = SolverError::NativeSosUnsupported {
            backend: "highs".to_string(),
        };
        assert!(err.to_string().contains("highs"));
        assert_eq!(err.code(), "BACKEND_NATIVE_SOS_UNSUPPORTED");
    }

    #[test]
    fn test_error_display_solve_failure() {
        let err = SolverError::SolveFailure {
            status: SolverStatus::Infeasible,
        };
        let msg = err.to_string();
        assert!(msg.contains("SOLVER_INFEASIBLE"));
        assert!(msg.contains("infeasible"));
    }

    #[test]
    fn test_error_code() {
        assert_eq!(SolverError::EmptyModel.code(), "MODEL_EMPTY");
        assert_eq!(SolverError::NoObjective.code(), "OBJECTIVE_MISSING");
        assert_eq!(
            SolverError::InternalError(String::new()).code(),
            "SOLVER_INTERNAL"
        );
        assert_eq!(
            SolverError::SolveFailure {
                status: SolverStatus::Unknown
            }
            .code(),
            "SOLVER_INTERNAL"
        );
    }
}
