//! Encodings of higher-level constraints into clauses

use super::constraints::Clause;
use super::variables::Variable;
use itertools::Itertools;

/// Clauses for `left <-> (right[0] | ... | right[n-1])`.
///
/// Always returns `right.len() + 1` clauses. The first encodes
/// `left -> OR(right)`, clause `i` encodes `right[i - 1] -> left`. With no
/// right-hand variables the single clause `-left` forces `left` false.
pub fn equivalence(left: Variable, right: &[Variable]) -> Vec<Clause> {
    let mut clauses = Vec::with_capacity(right.len() + 1);

    let mut forward: Clause = right.iter().copied().collect();
    forward.push(!left);
    clauses.push(forward);

    clauses.extend(right.iter().map(|&var| Clause::binary(!var, left)));
    clauses
}

/// Pairwise exclusion: one `(-a | -b)` clause per unordered pair, outer
/// index ascending then inner index ascending.
pub fn at_most_one(vars: &[Variable]) -> Vec<Clause> {
    vars.iter()
        .tuple_combinations()
        .map(|(&first, &second)| Clause::binary(!first, !second))
        .collect()
}

/// A single clause requiring at least one of `vars`
pub fn at_least_one(vars: &[Variable]) -> Clause {
    vars.iter().copied().collect()
}

/// Clauses allowing exactly one of `vars` to be true.
///
/// Returns `n * (n - 1) / 2 + 1` clauses: [`at_most_one`] followed by
/// [`at_least_one`]. For an empty slice that last clause is empty, so the
/// result is unsatisfiable.
pub fn exactly_one(vars: &[Variable]) -> Vec<Clause> {
    let mut clauses = at_most_one(vars);
    clauses.push(at_least_one(vars));
    clauses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::Registry;

    fn all_satisfied(clauses: &[Clause], bits: u32) -> bool {
        // variable id `k` takes bit `k - 1`
        clauses
            .iter()
            .all(|c| c.is_satisfied_by(|id| bits & (1 << (id - 1)) != 0))
    }

    fn rendered(clauses: &[Clause]) -> Vec<String> {
        clauses.iter().map(Clause::render).collect()
    }

    #[test]
    fn test_equivalence_clause_count() {
        for n in 0..8 {
            let registry = Registry::new();
            let left = registry.create_variable();
            let right = registry.create_variables(n);

            assert_eq!(equivalence(left, &right).len(), n + 1);
        }
    }

    #[test]
    fn test_equivalence_layout() {
        let registry = Registry::new();
        let left = registry.create_variable();
        let right = registry.create_variables(3);

        assert_eq!(
            rendered(&equivalence(left, &right)),
            vec!["2 3 4 -1 0", "-2 1 0", "-3 1 0", "-4 1 0"]
        );
    }

    #[test]
    fn test_equivalence_empty_right_forces_false() {
        let registry = Registry::new();
        let left = registry.create_variable();

        let clauses = equivalence(left, &[]);
        assert_eq!(rendered(&clauses), vec!["-1 0"]);
        assert!(all_satisfied(&clauses, 0));
        assert!(!all_satisfied(&clauses, 1));
    }

    #[test]
    fn test_equivalence_truth_table() {
        for n in 0..=5 {
            let registry = Registry::new();
            let left = registry.create_variable();
            let right = registry.create_variables(n);
            let clauses = equivalence(left, &right);

            for bits in 0..(1u32 << (n + 1)) {
                let left_value = bits & 1 != 0;
                let any_right = bits >> 1 != 0;
                assert_eq!(
                    all_satisfied(&clauses, bits),
                    left_value == any_right,
                    "n = {}, assignment = {:b}",
                    n,
                    bits
                );
            }
        }
    }

    #[test]
    fn test_exactly_one_clause_count() {
        for n in 0..10 {
            let registry = Registry::new();
            let vars = registry.create_variables(n);

            let expected = n * n.saturating_sub(1) / 2 + 1;
            assert_eq!(exactly_one(&vars).len(), expected);
        }
    }

    #[test]
    fn test_exactly_one_layout() {
        let registry = Registry::new();
        let vars = registry.create_variables(3);

        assert_eq!(
            rendered(&exactly_one(&vars)),
            vec!["-1 -2 0", "-1 -3 0", "-2 -3 0", "1 2 3 0"]
        );
    }

    #[test]
    fn test_exactly_one_truth_table() {
        for n in 1..=6 {
            let registry = Registry::new();
            let vars = registry.create_variables(n);
            let clauses = exactly_one(&vars);

            for bits in 0..(1u32 << n) {
                assert_eq!(
                    all_satisfied(&clauses, bits),
                    bits.count_ones() == 1,
                    "n = {}, assignment = {:b}",
                    n,
                    bits
                );
            }
        }
    }

    #[test]
    fn test_exactly_one_single_variable() {
        let registry = Registry::new();
        let vars = registry.create_variables(1);

        assert_eq!(rendered(&exactly_one(&vars)), vec!["1 0"]);
    }

    #[test]
    fn test_exactly_one_empty_is_unsatisfiable() {
        let clauses = exactly_one(&[]);

        assert_eq!(clauses.len(), 1);
        assert!(clauses[0].is_empty());
        assert!(!all_satisfied(&clauses, 0));
    }
}
