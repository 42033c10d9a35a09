//! Configuration management for the solver bridge

pub mod settings;

pub use settings::{
    parse_properties, CliOverrides, ConfigSource, Settings, SolverConfig,
    DEFAULT_EXECUTABLE, DEFAULT_PROPERTIES_FILE,
};
