//! Solve status reported by a backend.

/// Outcome class of a solve. Limit statuses may still carry values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    ReachedTimeLimit,
    ReachedIterationLimit,
    Unknown,
}

// (status, result-bag code, name, message)
const STATUS_TABLE: [(SolverStatus, i64, &str, &str); 6] = [
    (SolverStatus::Unknown, 0, "unknown", "Solver status unknown"),
    (SolverStatus::Optimal, 1, "optimal", "Solver returned optimal"),
    (SolverStatus::Infeasible, 2, "infeasible", "Problem is infeasible"),
    (SolverStatus::Unbounded, 3, "unbounded", "Problem is unbounded"),
    (
        SolverStatus::ReachedTimeLimit,
        4,
        "time_limit",
        "Solver reached time limit",
    ),
    (
        SolverStatus::ReachedIterationLimit,
        5,
        "iteration_limit",
        "Solver reached iteration limit",
    ),
];

impl SolverStatus {
    fn entry(self) -> &'static (SolverStatus, i64, &'static str, &'static str) {
        // Every variant has exactly one row.
        let index = match self {
            SolverStatus::Unknown => 0,
            SolverStatus::Optimal => 1,
            SolverStatus::Infeasible => 2,
            SolverStatus::Unbounded => 3,
            SolverStatus::ReachedTimeLimit => 4,
            SolverStatus::ReachedIterationLimit => 5,
        };
        &STATUS_TABLE[index]
    }

    pub fn is_optimal(self) -> bool {
        self == SolverStatus::Optimal
    }

    /// Whether solved values are expected alongside this status.
    pub fn is_feasible(self) -> bool {
        matches!(
            self,
            SolverStatus::Optimal
                | SolverStatus::ReachedTimeLimit
                | SolverStatus::ReachedIterationLimit
        )
    }

    pub fn as_str(self) -> &'static str {
        self.entry().2
    }

    /// Integer code written under the `Status` result key.
    pub fn code(self) -> i64 {
        self.entry().1
    }

    /// Sentence used in error messages.
    pub fn message(self) -> &'static str {
        self.entry().3
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
