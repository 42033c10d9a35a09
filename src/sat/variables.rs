//! Decision variables and the registry that numbers them

use crate::error::{Result, SolverError};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Not;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A Boolean decision variable, either in its positive or negated form.
///
/// Equality and hashing only look at the identifier: `v` and `!v` are the
/// same key in a map, but render differently inside a clause.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Variable {
    id: u32,
    negated: bool,
}

impl Variable {
    /// Identifier shared by both forms of the variable
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Returns the view with the opposite negation flag
    pub fn negate(self) -> Self {
        Self {
            id: self.id,
            negated: !self.negated,
        }
    }

    /// Returns the positive form of this variable
    pub fn positive(self) -> Self {
        Self {
            id: self.id,
            negated: false,
        }
    }

    /// Signed DIMACS literal for this view
    pub fn literal(&self) -> i64 {
        if self.negated {
            -i64::from(self.id)
        } else {
            i64::from(self.id)
        }
    }

    /// Truth value of this literal under the recorded solution.
    ///
    /// Unlike [`Registry::lookup_result`] the negation flag is applied.
    pub fn value(&self, registry: &Registry) -> Result<bool> {
        Ok(registry.lookup_result(*self)? != self.negated)
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Not for Variable {
    type Output = Variable;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "-{}", self.id)
        } else {
            write!(f, "{}", self.id)
        }
    }
}

/// Largest identifier a registry hands out. DIMACS solvers read literals
/// as signed 32-bit integers.
pub const MAX_VARIABLES: u32 = i32::MAX as u32;

/// Allocates variable identifiers and holds the solver's assignment.
///
/// Identifiers are consecutive and start at 1, which is what DIMACS
/// solvers expect. One registry backs one problem; call [`Registry::reset`]
/// before reusing it for an unrelated one.
#[derive(Debug, Default)]
pub struct Registry {
    /// Number of identifiers handed out so far
    allocated: AtomicU32,
    /// Values for the positive form of each solved variable
    results: Mutex<HashMap<u32, bool>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register the next variable
    ///
    /// # Panics
    ///
    /// Panics once [`MAX_VARIABLES`] identifiers have been handed out.
    pub fn create_variable(&self) -> Variable {
        let previous = self
            .allocated
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < MAX_VARIABLES).then_some(n + 1)
            })
            .unwrap_or_else(|_| panic!("variable identifiers exhausted at {}", MAX_VARIABLES));
        Variable {
            id: previous + 1,
            negated: false,
        }
    }

    /// Create `count` consecutive variables
    pub fn create_variables(&self, count: usize) -> Vec<Variable> {
        (0..count).map(|_| self.create_variable()).collect()
    }

    /// Number of identifiers allocated so far
    pub fn variable_count(&self) -> usize {
        self.allocated.load(Ordering::SeqCst) as usize
    }

    /// Whether `id` was handed out by this registry
    pub fn contains(&self, id: u32) -> bool {
        id != 0 && id <= self.allocated.load(Ordering::SeqCst)
    }

    /// Store the solver's value for the positive form of `id`
    pub fn record_result(&self, id: u32, value: bool) -> Result<()> {
        if !self.contains(id) {
            return Err(SolverError::UnknownVariable(id));
        }
        self.results().insert(id, value);
        Ok(())
    }

    /// Value recorded for the positive form of `variable`.
    ///
    /// The negation flag is not part of the key; see [`Variable::value`]
    /// for the value of the literal itself.
    pub fn lookup_result(&self, variable: Variable) -> Result<bool> {
        self.results()
            .get(&variable.id)
            .copied()
            .ok_or(SolverError::ResultNotAvailable(variable.id))
    }

    /// Number of variables with a recorded value
    pub fn assigned_count(&self) -> usize {
        self.results().len()
    }

    /// Forget every recorded value, keeping the allocated identifiers
    pub fn clear_results(&self) {
        self.results().clear();
    }

    /// Forget everything: identifiers restart at 1
    pub fn reset(&mut self) {
        *self.allocated.get_mut() = 0;
        self.results
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get statistics about variable usage
    pub fn statistics(&self) -> RegistryStatistics {
        RegistryStatistics {
            total_variables: self.variable_count(),
            assigned_variables: self.assigned_count(),
        }
    }

    fn results(&self) -> MutexGuard<'_, HashMap<u32, bool>> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone)]
pub struct RegistryStatistics {
    pub total_variables: usize,
    pub assigned_variables: usize,
}

impl fmt::Display for RegistryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Assigned variables: {}", self.assigned_variables)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use std::collections::HashSet;

    #[test]
    #[should_panic(expected = "variable identifiers exhausted")]
    fn test_identifier_limit() {
        let registry = Registry {
            allocated: AtomicU32::new(MAX_VARIABLES - 1),
            ..Registry::default()
        };

        assert_eq!(registry.create_variable().id(), MAX_VARIABLES);
        assert_eq!(registry.variable_count(), MAX_VARIABLES as usize);
        registry.create_variable();
    }

    #[test]
    fn test_variable_creation() {
        let registry = Registry::new();
        assert_eq!(registry.variable_count(), 0);

        let ids: Vec<u32> = (0..10).map(|_| registry.create_variable().id()).collect();

        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(registry.variable_count(), 10);
    }

    #[test]
    fn test_double_negation() {
        let registry = Registry::new();
        let v = registry.create_variable();

        assert_eq!((!v).to_string(), "-1");
        assert_eq!((!!v).to_string(), v.to_string());
        assert!(!(!!v).is_negated());
        assert_eq!(v.negate().literal(), -1);
    }

    #[test]
    fn test_equality_ignores_negation() {
        let registry = Registry::new();
        let v = registry.create_variable();
        let w = registry.create_variable();

        assert_eq!(v, !v);
        assert_ne!(v, w);

        let keys: HashSet<Variable> = [v, !v, w].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_record_and_lookup() {
        let registry = Registry::new();
        let x1 = registry.create_variable();
        let x2 = registry.create_variable();

        registry.record_result(1, true).unwrap();
        registry.record_result(2, false).unwrap();

        assert!(registry.lookup_result(x1).unwrap());
        assert!(!registry.lookup_result(x2).unwrap());
        // Lookup is keyed on the id, the flag is ignored
        assert!(!registry.lookup_result(!x2).unwrap());
        // The literal value applies it
        assert!(x1.value(&registry).unwrap());
        assert!((!x2).value(&registry).unwrap());
    }

    #[test]
    fn test_record_unknown_variable() {
        let registry = Registry::new();
        registry.create_variable();

        assert!(matches!(
            registry.record_result(2, true),
            Err(SolverError::UnknownVariable(2))
        ));
        assert!(matches!(
            registry.record_result(0, true),
            Err(SolverError::UnknownVariable(0))
        ));
    }

    #[test]
    fn test_result_not_available() {
        let registry = Registry::new();
        let v = registry.create_variable();

        assert!(matches!(
            registry.lookup_result(v),
            Err(SolverError::ResultNotAvailable(1))
        ));

        registry.record_result(1, false).unwrap();
        registry.clear_results();
        assert!(registry.lookup_result(v).is_err());
    }

    #[test]
    fn test_reset() {
        let mut registry = Registry::new();
        registry.create_variables(3);
        registry.record_result(3, true).unwrap();

        registry.reset();

        assert_eq!(registry.variable_count(), 0);
        assert_eq!(registry.assigned_count(), 0);
        assert_eq!(registry.create_variable().id(), 1);
    }

    #[test]
    fn test_concurrent_allocation() {
        let registry = Registry::new();

        let ids: Vec<u32> = (0..1000)
            .into_par_iter()
            .map(|_| registry.create_variable().id())
            .collect();

        let unique: HashSet<u32> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 1000);
        assert_eq!(registry.variable_count(), 1000);
        assert!(unique.iter().all(|&id| (1..=1000).contains(&id)));
    }

    #[test]
    fn test_statistics() {
        let registry = Registry::new();
        registry.create_variables(2);
        registry.record_result(1, true).unwrap();

        let stats = registry.statistics();
        assert_eq!(stats.total_variables, 2);
        assert_eq!(stats.assigned_variables, 1);
    }
}
