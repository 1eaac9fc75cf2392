//! The propositional seed generator MARCO uses to pick the next region of
//! the rule-id powerset to test: [`seed::SeedSolver`] is the abstract
//! contract, with a plain-SAT implementation ([`seed::PlainSeedSolver`])
//! and a MaxSAT-biased one ([`seed::MaxSatSeedSolver`]) that finds maximal
//! include-sets directly, sharing a from-scratch DPLL core ([`dpll`]).

mod dpll;
mod seed;
mod varmap;

pub use seed::{MaxSatSeedSolver, PlainSeedSolver, SeedSolver};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_solver_finds_any_model_satisfying_clauses() {
        let mut solver = PlainSeedSolver::new(&[1, 2, 3]);
        // Forbid the empty seed and forbid including both 1 and 2 together.
        solver.add_clause(&[1, 2, 3]);
        solver.add_clause(&[-1, -2]);
        assert!(solver.solve());
        let model = solver.model();
        assert!(!model.is_empty());
        assert!(!(model.contains(&1) && model.contains(&2)));
    }

    #[test]
    fn plain_solver_reports_unsat() {
        let mut solver = PlainSeedSolver::new(&[1]);
        solver.add_clause(&[1]);
        solver.add_clause(&[-1]);
        assert!(!solver.solve());
    }

    #[test]
    fn maxsat_solver_grows_to_a_maximal_model() {
        let mut solver = MaxSatSeedSolver::new(&[1, 2, 3]);
        // Only constraint: 1 and 2 are mutually exclusive. 3 is free.
        solver.add_clause(&[-1, -2]);
        assert!(solver.solve());
        let model = solver.model();
        // A maximal model must include 3, and exactly one of {1,2}.
        assert!(model.contains(&3));
        assert_eq!(model.iter().filter(|r| **r == 1 || **r == 2).count(), 1);
    }

    #[test]
    fn blocking_clause_excludes_the_previous_model_next_time() {
        let mut solver = MaxSatSeedSolver::new(&[1, 2]);
        assert!(solver.solve());
        let first = solver.model();
        // Block this exact region: at least one excluded element must be
        // included next time (MARCO's "block MSS" step).
        let blocking: Vec<i32> = [1, 2].iter().filter(|r| !first.contains(r)).map(|&r| r as i32).collect();
        if blocking.is_empty() {
            return;
        }
        solver.add_clause(&blocking);
        assert!(solver.solve());
        let second = solver.model();
        assert!(blocking.iter().any(|&lit| second.contains(&(lit as u32))));
    }
}
