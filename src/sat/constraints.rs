//! Clauses: disjunctions of variables in DIMACS form

use super::variables::Variable;
use itertools::Itertools;
use std::fmt;

/// A disjunction of literals.
///
/// An empty clause is the empty OR and can never be satisfied.
#[derive(Debug, Clone, Default)]
pub struct Clause {
    variables: Vec<Variable>,
}

impl Clause {
    /// Create a new clause from variables
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    /// Create a unit clause (single literal)
    pub fn unit(variable: Variable) -> Self {
        Self {
            variables: vec![variable],
        }
    }

    /// Create a binary clause (two literals)
    pub fn binary(first: Variable, second: Variable) -> Self {
        Self {
            variables: vec![first, second],
        }
    }

    /// Append a literal to the disjunction
    pub fn push(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Signed DIMACS literals, in insertion order
    pub fn literals(&self) -> impl Iterator<Item = i64> + '_ {
        self.variables.iter().map(Variable::literal)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.variables.len() == 1
    }

    /// DIMACS clause line without the line break, e.g. `1 -2 3 0`.
    ///
    /// The format is stable: literals separated by single spaces, then `0`.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Evaluate the clause given the value of each variable's positive form
    pub fn is_satisfied_by<F>(&self, mut assignment: F) -> bool
    where
        F: FnMut(u32) -> bool,
    {
        self.variables
            .iter()
            .any(|v| assignment(v.id()) != v.is_negated())
    }
}

impl FromIterator<Variable> for Clause {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Variable> for Clause {
    fn extend<I: IntoIterator<Item = Variable>>(&mut self, iter: I) {
        self.variables.extend(iter);
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variables.is_empty() {
            return f.write_str("0");
        }
        write!(f, "{} 0", self.variables.iter().join(" "))
    }
}
