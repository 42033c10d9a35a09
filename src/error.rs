//! Error types for building problems and talking to the external solver

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, SolverError>;

/// Errors raised while configuring, running or interpreting a solver
#[derive(Debug, Error)]
pub enum SolverError {
    /// Configuration could not be read, parsed or written
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A report or the problem echo could not be produced
    #[error("output error: {0}")]
    Output(String),

    /// The solver executable could not be started
    #[error("failed to launch solver `{executable}`: {source}")]
    ProcessLaunch {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    /// A pipe to or from the running solver broke
    #[error("I/O error while talking to the solver: {0}")]
    Io(#[from] std::io::Error),

    /// The solver reply does not follow the expected grammar
    #[error("malformed solver reply: {0}")]
    Protocol(#[from] ProtocolError),

    /// The reply assigns a variable the registry never allocated
    #[error("solver assigned unknown variable {0}")]
    UnknownVariable(u32),

    /// No value has been recorded for the variable
    #[error("result for variable {0} not available: solver not yet run or yielded no solution")]
    ResultNotAvailable(u32),

    /// The solver did not finish within the configured bound
    #[error("solver did not finish within {0:?}")]
    Timeout(Duration),
}

/// Violations of the solver reply grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("solver closed its output before the verdict line")]
    MissingVerdict,

    #[error("expected `SAT` or `UNSAT`, got `{0}`")]
    InvalidVerdict(String),

    #[error("invalid literal `{0}` in assignment line")]
    InvalidLiteral(String),

    #[error("assignment line ended without the `0` terminator")]
    MissingTerminator,
}
