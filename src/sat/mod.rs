//! Problem building and the bridge to the external solver

pub mod variables;
pub mod constraints;
pub mod encoder;
pub mod protocol;
pub mod result;
pub mod solver;

pub use variables::{Registry, RegistryStatistics, Variable, MAX_VARIABLES};
pub use constraints::Clause;
pub use protocol::Reply;
pub use result::SolverResult;
pub use solver::Solver;
