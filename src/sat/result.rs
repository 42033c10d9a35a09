//! Outcome of a single solver run

use super::protocol::Reply;
use super::variables::Registry;
use crate::error::{Result, SolverError};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Verdict and diagnostics produced by one call to
/// [`Solver::solve`](super::Solver::solve)
#[derive(Debug, Clone, Serialize)]
pub struct SolverResult {
    satisfiable: bool,
    statistics: Vec<String>,
    solve_time: Duration,
    exit_code: Option<i32>,
}

impl SolverResult {
    pub(crate) fn new(satisfiable: bool) -> Self {
        Self {
            satisfiable,
            statistics: Vec::new(),
            solve_time: Duration::ZERO,
            exit_code: None,
        }
    }

    /// Build the result from a parsed reply, pushing the assignment into
    /// `registry`. A reply naming an identifier the registry never issued is
    /// rejected as a whole and leaves the registry untouched.
    pub(crate) fn from_reply(reply: &Reply, registry: &Registry) -> Result<Self> {
        if reply.satisfiable {
            if let Some(&(id, _)) = reply
                .assignment
                .iter()
                .find(|(id, _)| !registry.contains(*id))
            {
                return Err(SolverError::UnknownVariable(id));
            }
            for &(id, value) in &reply.assignment {
                registry.record_result(id, value)?;
            }
        }
        Ok(Self::new(reply.satisfiable))
    }

    pub(crate) fn add_statistics_line(&mut self, line: String) {
        self.statistics.push(line);
    }

    pub(crate) fn set_solve_time(&mut self, solve_time: Duration) {
        self.solve_time = solve_time;
    }

    pub(crate) fn set_exit_code(&mut self, exit_code: Option<i32>) {
        self.exit_code = exit_code;
    }

    pub fn is_satisfiable(&self) -> bool {
        self.satisfiable
    }

    /// Raw diagnostic lines from the solver's error channel, in order
    pub fn statistics(&self) -> &[String] {
        &self.statistics
    }

    /// Wall time of the whole solve call
    pub fn solve_time(&self) -> Duration {
        self.solve_time
    }

    /// Process exit code, `None` if the solver was killed by a signal
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}

/// The statistics lines, one per line. Meant for humans; use
/// [`SolverResult::statistics`] when the lines themselves matter.
impl fmt::Display for SolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.statistics {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
