//! SAT problem builder and solver bridge
//!
//! Describe a problem as Boolean variables and clauses, hand it to an
//! external DIMACS solver such as minisat, and read the assignment back
//! through the [`Registry`] that created the variables.
//!
//! ```no_run
//! use sat_bridge::{encoder, Clause, Registry, Settings, Solver};
//!
//! # fn main() -> sat_bridge::Result<()> {
//! let registry = Registry::new();
//! let vars = registry.create_variables(3);
//!
//! let mut solver = Solver::new(Settings::default());
//! solver.add_clauses(encoder::exactly_one(&vars));
//! solver.add_clause(Clause::unit(!vars[0]));
//!
//! let result = solver.solve(&registry)?;
//! if result.is_satisfiable() {
//!     for var in &vars {
//!         println!("{} = {}", var, registry.lookup_result(*var)?);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod sat;
pub mod utils;

pub use config::Settings;
pub use error::{ProtocolError, Result, SolverError};
pub use sat::{encoder, Clause, Registry, Solver, SolverResult, Variable};
