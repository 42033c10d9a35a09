//! Output helpers for the command line

pub mod display;

pub use display::{ColorOutput, OutputFormat, ResultFormatter};
