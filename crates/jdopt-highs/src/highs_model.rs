//! Thin wrapper over the `highs` crate's row-oriented problem.
//!
//! Columns are added first, then rows referencing them by index. A model is
//! consumed by [`HighsModel::solve`]; the solved state is kept for reading
//! values back.

use std::fmt;

use highs::{Col, HighsModelStatus, RowProblem, Sense as HighsSense, SolvedModel};
use jdopt_solver::SolverStatus;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

/// Status of the latest solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighsStatus {
    Optimal,
    Infeasible,
    Unbounded,
    UnboundedOrInfeasible,
    /// May still carry a feasible solution.
    ReachedTimeLimit,
    /// May still carry a feasible solution.
    ReachedIterationLimit,
    Unknown,
}

impl HighsStatus {
    /// Name written into the `HighsStatus` result parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            HighsStatus::Optimal => "optimal",
            HighsStatus::Infeasible => "infeasible",
            HighsStatus::Unbounded => "unbounded",
            HighsStatus::UnboundedOrInfeasible => "unbounded_or_infeasible",
            HighsStatus::ReachedTimeLimit => "time_limit",
            HighsStatus::ReachedIterationLimit => "iteration_limit",
            HighsStatus::Unknown => "unknown",
        }
    }

    /// Whether column values are worth reading back.
    pub fn has_solution(self) -> bool {
        SolverStatus::from(self).is_feasible()
    }
}

impl From<HighsStatus> for SolverStatus {
    fn from(status: HighsStatus) -> Self {
        match status {
            HighsStatus::Optimal => SolverStatus::Optimal,
            HighsStatus::Infeasible => SolverStatus::Infeasible,
            HighsStatus::Unbounded => SolverStatus::Unbounded,
            HighsStatus::ReachedTimeLimit => SolverStatus::ReachedTimeLimit,
            HighsStatus::ReachedIterationLimit => SolverStatus::ReachedIterationLimit,
            // HiGHS could not tell which of the two it is.
            HighsStatus::UnboundedOrInfeasible | HighsStatus::Unknown => SolverStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighsModelError {
    ColumnCoefficientLengthMismatch {
        columns: usize,
        coefficients: usize,
    },
    ColumnIndexOutOfBounds {
        column_index: usize,
        num_columns: usize,
    },
    SolveRequired {
        operation: &'static str,
    },
}

impl HighsModelError {
    pub fn code(&self) -> &'static str {
        match self {
            HighsModelError::ColumnCoefficientLengthMismatch { .. } => "HIGHS_ROW_LENGTH",
            HighsModelError::ColumnIndexOutOfBounds { .. } => "HIGHS_COLUMN_INDEX",
            HighsModelError::SolveRequired { .. } => "HIGHS_SOLVE_REQUIRED",
        }
    }
}

impl fmt::Display for HighsModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighsModelError::ColumnCoefficientLengthMismatch {
                columns,
                coefficients,
            } => write!(
                f,
                "[{}] columns length ({}) must match coefficients length ({})",
                self.code(),
                columns,
                coefficients
            ),
            HighsModelError::ColumnIndexOutOfBounds {
                column_index,
                num_columns,
            } => write!(
                f,
                "[{}] column index {} out of bounds (num_columns = {})",
                self.code(),
                column_index,
                num_columns
            ),
            HighsModelError::SolveRequired { operation } => {
                write!(f, "[{}] solve must be called before {}", self.code(), operation)
            }
        }
    }
}

impl std::error::Error for HighsModelError {}

/// Option value types accepted by HiGHS.
#[derive(Debug, Clone, PartialEq)]
pub enum HighsOption {
    Bool(bool),
    Int(i32),
    Float(f64),
    Str(String),
}

/// Primal and dual values of a solved model.
#[derive(Debug, Clone, Default)]
pub struct SolutionSnapshot {
    pub col_values: Vec<f64>,
    pub col_duals: Vec<f64>,
    pub row_values: Vec<f64>,
    pub row_duals: Vec<f64>,
}

pub struct HighsModel {
    problem: RowProblem,
    objective_sense: ObjectiveSense,
    solved: Option<SolvedModel>,
    columns: Vec<Col>,
    log_to_console: bool,
    options: Vec<(String, HighsOption)>,
    verbosity: Option<u32>,
}

impl HighsModel {
    pub fn new() -> Self {
        HighsModel {
            problem: RowProblem::default(),
            objective_sense: ObjectiveSense::Minimize,
            solved: None,
            columns: Vec::new(),
            log_to_console: false,
            options: Vec::new(),
            verbosity: None,
        }
    }

    /// Add a continuous column; returns its index.
    pub fn add_col(&mut self, lower: f64, upper: f64, objective_coefficient: f64) -> usize {
        self.add_col_with_integrality(lower, upper, objective_coefficient, false)
    }

    /// Add an integer column; returns its index.
    pub fn add_integer_col(&mut self, lower: f64, upper: f64, objective_coefficient: f64) -> usize {
        self.add_col_with_integrality(lower, upper, objective_coefficient, true)
    }

    fn add_col_with_integrality(
        &mut self,
        lower: f64,
        upper: f64,
        objective_coefficient: f64,
        is_integer: bool,
    ) -> usize {
        trace!(
            lower,
            upper,
            objective_coefficient,
            is_integer,
            component = "highs",
            operation = "add_column",
            status = "success",
            "Adding column"
        );
        self.solved = None;
        let col = if is_integer {
            self.problem
                .add_integer_column(objective_coefficient, lower..=upper)
        } else {
            self.problem.add_column(objective_coefficient, lower..=upper)
        };
        self.columns.push(col);
        self.columns.len() - 1
    }

    /// Add a row `lower <= sum(coefficients[k] * columns[k]) <= upper`.
    ///
    /// # Errors
    ///
    /// Returns an error if `columns` and `coefficients` differ in length or a
    /// column index is out of bounds.
    pub fn add_row(
        &mut self,
        lower: f64,
        upper: f64,
        columns: &[usize],
        coefficients: &[f64],
    ) -> Result<usize, HighsModelError> {
        if columns.len() != coefficients.len() {
            warn!(
                component = "highs",
                operation = "add_row",
                status = "error",
                columns = columns.len(),
                coefficients = coefficients.len(),
                "Column/coefficients length mismatch"
            );
            return Err(HighsModelError::ColumnCoefficientLengthMismatch {
                columns: columns.len(),
                coefficients: coefficients.len(),
            });
        }
        let num_columns = self.columns.len();
        let mut factors = Vec::with_capacity(columns.len());
        for (&column_index, &coeff) in columns.iter().zip(coefficients) {
            let col = *self
                .columns
                .get(column_index)
                .ok_or(HighsModelError::ColumnIndexOutOfBounds {
                    column_index,
                    num_columns,
                })?;
            factors.push((col, coeff));
        }
        trace!(
            lower,
            upper,
            nnz = factors.len(),
            component = "highs",
            operation = "add_row",
            status = "success",
            "Adding row"
        );
        self.solved = None;
        self.problem.add_row(lower..=upper, factors);
        Ok(self.problem.num_rows().saturating_sub(1))
    }

    pub fn set_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective_sense = sense;
    }

    pub fn objective_sense(&self) -> ObjectiveSense {
        self.objective_sense
    }

    pub fn set_log_to_console(&mut self, enabled: bool) {
        self.log_to_console = enabled;
    }

    /// Queue a HiGHS option for the next solve.
    pub fn set_option(&mut self, option: impl Into<String>, value: HighsOption) {
        self.options.push((option.into(), value));
    }

    pub fn options(&self) -> &[(String, HighsOption)] {
        &self.options
    }

    pub fn set_verbosity(&mut self, level: u32) {
        self.verbosity = Some(level);
    }

    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> usize {
        self.problem.num_rows()
    }

    /// Solve and keep the solved state. The built problem is consumed; a
    /// further solve needs columns and rows added again.
    pub fn solve(&mut self) -> HighsStatus {
        debug!(
            num_cols = self.problem.num_cols(),
            num_rows = self.problem.num_rows(),
            objective_sense = ?self.objective_sense,
            component = "highs",
            operation = "solve",
            status = "start",
            "Solving model"
        );

        let sense = match self.objective_sense {
            ObjectiveSense::Minimize => HighsSense::Minimise,
            ObjectiveSense::Maximize => HighsSense::Maximise,
        };

        let problem = std::mem::take(&mut self.problem);
        let mut model = problem.optimise(sense);
        if self.verbosity.unwrap_or(0) == 0 && !self.log_to_console {
            model.make_quiet();
        }
        if let Some(level) = self.verbosity {
            model.set_option("output_flag", level > 0);
        }
        for (option, value) in self.options.drain(..) {
            match value {
                HighsOption::Bool(val) => model.set_option(option.as_str(), val),
                HighsOption::Int(val) => model.set_option(option.as_str(), val),
                HighsOption::Float(val) => model.set_option(option.as_str(), val),
                HighsOption::Str(val) => model.set_option(option.as_str(), val.as_str()),
            }
        }
        if self.log_to_console {
            model.set_option("log_to_console", true);
            model.set_option("output_flag", true);
        }

        let solved = model.solve();
        let status = map_status(solved.status());
        trace!(
            component = "highs",
            operation = "solve",
            status = "success",
            highs_status = ?status,
            "Solution status received"
        );
        self.solved = Some(solved);
        self.columns.clear();
        self.verbosity = None;
        status
    }

    /// Primal and dual values of the latest solve.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has not been solved yet.
    pub fn solution_snapshot(&self) -> Result<SolutionSnapshot, HighsModelError> {
        let solved = self.solved.as_ref().ok_or(HighsModelError::SolveRequired {
            operation: "solution_snapshot",
        })?;
        let solution = solved.get_solution();
        Ok(SolutionSnapshot {
            col_values: solution.columns().to_vec(),
            col_duals: solution.dual_columns().to_vec(),
            row_values: solution.rows().to_vec(),
            row_duals: solution.dual_rows().to_vec(),
        })
    }
}

impl Default for HighsModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HighsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsModel")
            .field("num_columns", &self.columns.len())
            .field("num_rows", &self.problem.num_rows())
            .field("objective_sense", &self.objective_sense)
            .field("solved", &self.solved.is_some())
            .finish_non_exhaustive()
    }
}

fn map_status(status: HighsModelStatus) -> HighsStatus {
    match status {
        HighsModelStatus::Optimal => HighsStatus::Optimal,
        HighsModelStatus::Infeasible => HighsStatus::Infeasible,
        HighsModelStatus::Unbounded => HighsStatus::Unbounded,
        HighsModelStatus::UnboundedOrInfeasible => HighsStatus::UnboundedOrInfeasible,
        HighsModelStatus::ReachedTimeLimit => HighsStatus::ReachedTimeLimit,
        HighsModelStatus::ReachedIterationLimit => HighsStatus::ReachedIterationLimit,
        _ => HighsStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_model_is_empty() {
        let model = HighsModel::new();
        assert_eq!(model.columns(), 0);
        assert_eq!(model.rows(), 0);
        assert_eq!(model.objective_sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn test_add_row_validates_columns() {
        let mut model = HighsModel::new();
        let x = model.add_col(0.0, 1.0, 1.0);
        assert_eq!(
            model.add_row(0.0, 1.0, &[x], &[1.0, 2.0]),
            Err(HighsModelError::ColumnCoefficientLengthMismatch {
                columns: 1,
                coefficients: 2,
            })
        );
        assert_eq!(
            model.add_row(0.0, 1.0, &[3], &[1.0]),
            Err(HighsModelError::ColumnIndexOutOfBounds {
                column_index: 3,
                num_columns: 1,
            })
        );
        assert_eq!(model.add_row(0.0, 1.0, &[x], &[1.0]), Ok(0));
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(SolverStatus::from(HighsStatus::Optimal), SolverStatus::Optimal);
        assert_eq!(
            SolverStatus::from(HighsStatus::ReachedIterationLimit),
            SolverStatus::ReachedIterationLimit
        );
        assert_eq!(
            SolverStatus::from(HighsStatus::UnboundedOrInfeasible),
            SolverStatus::Unknown
        );
        assert!(HighsStatus::ReachedTimeLimit.has_solution());
        assert!(!HighsStatus::UnboundedOrInfeasible.has_solution());
        assert_eq!(
            HighsStatus::UnboundedOrInfeasible.as_str(),
            "unbounded_or_infeasible"
        );
    }

    #[test]
    fn test_snapshot_requires_solve() {
        let model = HighsModel::new();
        assert_eq!(
            model.solution_snapshot().unwrap_err().code(),
            "HIGHS_SOLVE_REQUIRED"
        );
    }
}
