//! Display and output formatting utilities

use crate::error::{Result, SolverError};
use crate::sat::{Registry, SolverResult, Variable};
use serde::Serialize;

/// How the CLI prints a solved problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Serializable view of a result together with named variable values
#[derive(Debug, Serialize)]
pub struct ResultReport<'a> {
    pub satisfiable: bool,
    pub solve_time_ms: u128,
    pub exit_code: Option<i32>,
    pub assignment: Vec<AssignmentEntry<'a>>,
    pub statistics: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct AssignmentEntry<'a> {
    pub name: &'a str,
    pub id: u32,
    /// `None` when the solver produced no value for the variable
    pub value: Option<bool>,
}

/// Format solver results for display
pub struct ResultFormatter;

impl ResultFormatter {
    pub fn report<'a>(
        result: &'a SolverResult,
        variables: &'a [(String, Variable)],
        registry: &Registry,
    ) -> ResultReport<'a> {
        let assignment = variables
            .iter()
            .map(|(name, var)| AssignmentEntry {
                name: name.as_str(),
                id: var.id(),
                value: registry.lookup_result(*var).ok(),
            })
            .collect();

        ResultReport {
            satisfiable: result.is_satisfiable(),
            solve_time_ms: result.solve_time().as_millis(),
            exit_code: result.exit_code(),
            assignment,
            statistics: result.statistics(),
        }
    }

    /// Human readable summary, one variable per line
    pub fn format_text(
        result: &SolverResult,
        variables: &[(String, Variable)],
        registry: &Registry,
        show_statistics: bool,
    ) -> String {
        let mut output = String::new();

        output.push_str(&format!("satisfiable: {}\n", result.is_satisfiable()));
        output.push_str(&format!(
            "solve time: {:.3}s\n",
            result.solve_time().as_secs_f64()
        ));

        if result.is_satisfiable() {
            let width = variables.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
            for (name, var) in variables {
                let value = match registry.lookup_result(*var) {
                    Ok(value) => value.to_string(),
                    Err(_) => "unassigned".to_string(),
                };
                output.push_str(&format!("{:width$} : {}\n", name, value, width = width));
            }
        }

        if show_statistics && !result.statistics().is_empty() {
            output.push_str("\nSolver statistics:\n");
            output.push_str(&result.to_string());
        }

        output
    }

    pub fn format_json(
        result: &SolverResult,
        variables: &[(String, Variable)],
        registry: &Registry,
    ) -> Result<String> {
        let report = Self::report(result, variables, registry);
        serde_json::to_string_pretty(&report)
            .map_err(|e| SolverError::Output(format!("failed to serialize report: {}", e)))
    }

    pub fn format(
        format: OutputFormat,
        result: &SolverResult,
        variables: &[(String, Variable)],
        registry: &Registry,
        show_statistics: bool,
    ) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(Self::format_text(
                result,
                variables,
                registry,
                show_statistics,
            )),
            OutputFormat::Json => Self::format_json(result, variables, registry),
        }
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Wrap text in an ANSI color unless the terminal opts out
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").map_or(true, |term| term != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{protocol::Reply, SolverResult};

    fn solved() -> (Registry, Vec<(String, Variable)>, SolverResult) {
        let registry = Registry::new();
        let named = vec![
            ("left".to_string(), registry.create_variable()),
            ("v0".to_string(), registry.create_variable()),
        ];
        let reply = Reply::parse("SAT\n-1 2 0\n").unwrap();
        let mut result = SolverResult::from_reply(&reply, &registry).unwrap();
        result.add_statistics_line("conflicts : 0".to_string());
        (registry, named, result)
    }

    #[test]
    fn test_format_text() {
        let (registry, named, result) = solved();
        let text = ResultFormatter::format_text(&result, &named, &registry, true);

        assert!(text.starts_with("satisfiable: true\n"));
        assert!(text.contains("left : false\n"));
        assert!(text.contains("v0   : true\n"));
        assert!(text.ends_with("Solver statistics:\nconflicts : 0\n"));
    }

    #[test]
    fn test_format_json() {
        let (registry, named, result) = solved();
        let json = ResultFormatter::format_json(&result, &named, &registry).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["satisfiable"], true);
        assert_eq!(value["assignment"][0]["name"], "left");
        assert_eq!(value["assignment"][0]["value"], false);
        assert_eq!(value["assignment"][1]["id"], 2);
        assert_eq!(value["statistics"][0], "conflicts : 0");
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
