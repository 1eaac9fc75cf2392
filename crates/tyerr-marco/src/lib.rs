//! MARCO: enumerates Minimal Unsatisfiable Subsets (MUSes) and Maximal
//! Satisfiable Subsets (MSSes) of a rule-id universe by interleaving a
//! [`tyerr_sat::SeedSolver`] with a caller-supplied [`SatOracle`].
//!
//! The oracle is a trait rather than a direct `tyerr-inventory` dependency:
//! MARCO only needs "is this subset satisfiable", and keeping that as a
//! capability trait (matching `tsz`'s own seam-placement habit of small
//! capability traits at crate boundaries) avoids a circular dependency
//! between the inventory and the enumerator.

use std::time::Instant;

use rustc_hash::FxHashSet;
use tracing::{info_span, trace};

use tyerr_common::error::FatalError;
use tyerr_sat::SeedSolver;

/// The one capability MARCO needs from the constraint inventory: whether a
/// given rule-id subset admits a well-typed program.
pub trait SatOracle {
    fn satisfiable(&mut self, rules: &FxHashSet<u32>) -> Result<bool, FatalError>;
}

#[derive(Debug, Clone, Copy)]
pub struct MarcoOptions {
    pub max_loop: u32,
    pub deadline: Option<Instant>,
}

impl Default for MarcoOptions {
    fn default() -> Self {
        Self { max_loop: tyerr_common::limits::DEFAULT_MAX_LOOP, deadline: None }
    }
}

/// Accumulated enumeration results: disjoint-when-output minimal
/// unsatisfiable / maximal satisfiable subsets, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct MarcoResult {
    pub muses: Vec<FxHashSet<u32>>,
    pub msses: Vec<FxHashSet<u32>>,
}

/// Runs MARCO over `universe` using `solver` as the seed generator and
/// `oracle` as the satisfiability check, per the seed/grow-or-shrink/block
/// loop. Bounded by `options.max_loop`; exceeding it is fatal, matching the
/// teacher's "budget exceeded is an internal error, not a value" convention
/// for resource-exhaustion conditions.
pub fn run<S: SeedSolver>(
    universe: &[u32],
    mut solver: S,
    oracle: &mut impl SatOracle,
    options: MarcoOptions,
) -> Result<MarcoResult, FatalError> {
    let _span = info_span!("marco.run", rules = universe.len()).entered();
    let universe_set: FxHashSet<u32> = universe.iter().copied().collect();
    let mut singleton_mus: FxHashSet<u32> = FxHashSet::default();
    let mut result = MarcoResult::default();
    let mut loop_counter = 0u32;

    while solver.solve() {
        if let Some(deadline) = options.deadline {
            if Instant::now() >= deadline {
                return Err(FatalError::DeadlineExceeded);
            }
        }
        if loop_counter >= options.max_loop {
            return Err(FatalError::MarcoBudgetExceeded { loop_counter, max_loop: options.max_loop });
        }

        let seed = solver.model();
        if oracle.satisfiable(&seed)? {
            let mss = grow(&universe_set, seed, solver.grows_seeds_itself(), oracle)?;
            let mcs: Vec<i32> = {
                let mut excluded: Vec<u32> = universe_set.difference(&mss).copied().collect();
                excluded.sort_unstable();
                if excluded.len() == 1 {
                    singleton_mus.insert(excluded[0]);
                }
                excluded.into_iter().map(|id| id as i32).collect()
            };
            solver.add_clause(&mcs);
            result.msses.push(mss);
        } else {
            let mus = shrink(seed, &singleton_mus, oracle)?;
            let negs: Vec<i32> = {
                let mut ids: Vec<u32> = mus.iter().copied().collect();
                ids.sort_unstable();
                ids.into_iter().map(|id| -(id as i32)).collect()
            };
            solver.add_clause(&negs);
            result.muses.push(mus);
        }
        loop_counter += 1;
    }
    Ok(result)
}

/// Grow `seed` into a maximal satisfiable subset, one excluded rule at a
/// time in id order for reproducibility. A no-op when the seed generator
/// already produces maximal models (`MaxSatSeedSolver`).
fn grow(
    universe: &FxHashSet<u32>,
    mut seed: FxHashSet<u32>,
    already_maximal: bool,
    oracle: &mut impl SatOracle,
) -> Result<FxHashSet<u32>, FatalError> {
    if already_maximal {
        return Ok(seed);
    }
    let _span = info_span!("marco.grow").entered();
    let mut excluded: Vec<u32> = universe.difference(&seed).copied().collect();
    excluded.sort_unstable();
    for rule in excluded.drain(..) {
        let mut candidate = seed.clone();
        candidate.insert(rule);
        if oracle.satisfiable(&candidate)? {
            trace!(rule, "grow: accepted");
            seed = candidate;
        }
    }
    Ok(seed)
}

/// Shrink an unsatisfiable `seed` into a minimal unsatisfiable subset: for
/// each rule (in id order, skipping rules already known to form a singleton
/// MUS on their own) try dropping it; if the remainder is still
/// unsatisfiable the rule wasn't needed and stays dropped.
fn shrink(
    mut seed: FxHashSet<u32>,
    singleton_mus: &FxHashSet<u32>,
    oracle: &mut impl SatOracle,
) -> Result<FxHashSet<u32>, FatalError> {
    let _span = info_span!("marco.shrink").entered();
    let mut candidates: Vec<u32> = seed.iter().copied().collect();
    candidates.sort_unstable();
    for rule in candidates.drain(..) {
        if singleton_mus.contains(&rule) || !seed.contains(&rule) {
            continue;
        }
        let mut without = seed.clone();
        without.remove(&rule);
        if !oracle.satisfiable(&without)? {
            trace!(rule, "shrink: dropped");
            seed = without;
        }
    }
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyerr_sat::{MaxSatSeedSolver, PlainSeedSolver};

    /// A toy oracle: a seed is satisfiable iff it doesn't contain both 1
    /// and 2 (mirroring `marco.go`'s `TestMarco` fixture shape).
    struct ToyOracle;
    impl SatOracle for ToyOracle {
        fn satisfiable(&mut self, rules: &FxHashSet<u32>) -> Result<bool, FatalError> {
            Ok(!(rules.contains(&1) && rules.contains(&2)))
        }
    }

    #[test]
    fn plain_solver_finds_consistent_muses_and_msses() {
        let universe = [1, 2, 3];
        let solver = PlainSeedSolver::new(&universe);
        let mut oracle = ToyOracle;
        let result = run(&universe, solver, &mut oracle, MarcoOptions::default()).unwrap();
        for mus in &result.muses {
            assert!(!oracle.satisfiable(mus).unwrap());
            for e in mus {
                let mut shrunk = mus.clone();
                shrunk.remove(e);
                assert!(oracle.satisfiable(&shrunk).unwrap());
            }
        }
        for mss in &result.msses {
            assert!(oracle.satisfiable(mss).unwrap());
            for e in universe.iter().filter(|e| !mss.contains(e)) {
                let mut grown = mss.clone();
                grown.insert(*e);
                assert!(!oracle.satisfiable(&grown).unwrap());
            }
        }
        assert!(!result.muses.is_empty());
        assert!(!result.msses.is_empty());
    }

    #[test]
    fn maxsat_solver_agrees_with_plain_solver_on_muses_found() {
        let universe = [1, 2, 3];
        let solver = MaxSatSeedSolver::new(&universe);
        let mut oracle = ToyOracle;
        let result = run(&universe, solver, &mut oracle, MarcoOptions::default()).unwrap();
        // The only MUS in this toy instance is {1, 2}.
        assert!(result.muses.iter().any(|m| *m == FxHashSet::from_iter([1, 2])));
    }

    #[test]
    fn exceeding_max_loop_is_fatal() {
        let universe = [1, 2, 3];
        let solver = PlainSeedSolver::new(&universe);
        let mut oracle = ToyOracle;
        let options = MarcoOptions { max_loop: 0, deadline: None };
        let err = run(&universe, solver, &mut oracle, options).unwrap_err();
        assert!(matches!(err, FatalError::MarcoBudgetExceeded { .. }));
    }
}
