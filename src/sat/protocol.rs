//! DIMACS CNF output and parsing of the solver's reply.
//!
//! Problem text:
//!
//! ```text
//! p cnf <variables> <clauses>
//! <lit> <lit> ... 0
//! ```
//!
//! Reply on the solver's output channel: a `SAT` or `UNSAT` line, followed
//! for `SAT` by one line of signed literals closed by `0`.

use super::constraints::Clause;
use crate::error::ProtocolError;
use std::io::{self, Write};

/// DIMACS problem line
pub fn header(variable_count: usize, clause_count: usize) -> String {
    format!("p cnf {} {}", variable_count, clause_count)
}

/// Write the header and every clause line, each ending in `\n`
pub fn write_problem<W: Write>(
    writer: &mut W,
    variable_count: usize,
    clauses: &[Clause],
) -> io::Result<()> {
    writeln!(writer, "{}", header(variable_count, clauses.len()))?;
    for clause in clauses {
        writeln!(writer, "{}", clause)?;
    }
    writer.flush()
}

/// Parse the verdict line; `None` means the stream ended first
pub fn parse_verdict(line: Option<&str>) -> Result<bool, ProtocolError> {
    let line = line.ok_or(ProtocolError::MissingVerdict)?;
    match line.trim_end_matches('\r') {
        "SAT" => Ok(true),
        "UNSAT" => Ok(false),
        other => Err(ProtocolError::InvalidVerdict(other.to_string())),
    }
}

/// Parse a single `[-]digits` token into `(id, value)`
pub fn parse_literal(token: &str) -> Result<(u32, bool), ProtocolError> {
    let (value, digits) = match token.strip_prefix('-') {
        Some(rest) => (false, rest),
        None => (true, token),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProtocolError::InvalidLiteral(token.to_string()));
    }
    let id = digits
        .parse::<u32>()
        .map_err(|_| ProtocolError::InvalidLiteral(token.to_string()))?;
    Ok((id, value))
}

/// Parse the assignment line into `(id, value)` pairs.
///
/// Parsing stops at the first `0` token; anything after it is ignored.
/// A missing line or a line without the terminator is an error.
pub fn parse_assignment(line: Option<&str>) -> Result<Vec<(u32, bool)>, ProtocolError> {
    let line = line.ok_or(ProtocolError::MissingTerminator)?;
    let mut assignment = Vec::new();

    for token in line.split_whitespace() {
        if token == "0" {
            return Ok(assignment);
        }
        assignment.push(parse_literal(token)?);
    }

    Err(ProtocolError::MissingTerminator)
}

/// The solver's answer as read from its output channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub satisfiable: bool,
    /// `(id, value)` pairs; empty unless satisfiable
    pub assignment: Vec<(u32, bool)>,
}

impl Reply {
    /// Parse the full output channel contents
    pub fn parse(output: &str) -> Result<Self, ProtocolError> {
        let mut lines = output.lines();
        let satisfiable = parse_verdict(lines.next())?;
        let assignment = if satisfiable {
            parse_assignment(lines.next())?
        } else {
            Vec::new()
        };
        Ok(Self {
            satisfiable,
            assignment,
        })
    }
}
