use fixedbitset::FixedBitSet;
use rustc_hash::FxHashSet;

use crate::dpll::{self, Assignment, Value};
use crate::varmap::VarMap;

/// Abstract contract over a propositional seed generator: `solve` produces
/// a seed model subject to every clause added via `add_clause` so far;
/// `model` returns the set of rule ids the seed *includes*.
pub trait SeedSolver {
    fn new(rule_ids: &[u32]) -> Self
    where
        Self: Sized;

    fn solve(&mut self) -> bool;

    fn model(&self) -> FxHashSet<u32>;

    /// `literals` are nonzero signed rule ids: positive means "include",
    /// negative means "exclude".
    fn add_clause(&mut self, literals: &[i32]);

    /// Whether `model()` is already a maximal satisfying set, so MARCO's
    /// separate Grow phase is redundant for this implementation.
    fn grows_seeds_itself(&self) -> bool {
        false
    }
}

fn assignment_to_model(assignment: &Assignment, varmap: &VarMap) -> FxHashSet<u32> {
    let mut bits = FixedBitSet::with_capacity(assignment.len());
    for (var, value) in assignment.iter().enumerate().skip(1) {
        if *value == Some(Value::True) {
            bits.insert(var);
        }
    }
    bits.ones().map(|var| varmap.rule_of(var as i32)).collect()
}

/// Seed = any satisfying assignment. Grow to an MSS is left to the MARCO
/// enumerator.
pub struct PlainSeedSolver {
    varmap: VarMap,
    clauses: Vec<Vec<i32>>,
    last_model: Option<FxHashSet<u32>>,
}

impl SeedSolver for PlainSeedSolver {
    fn new(rule_ids: &[u32]) -> Self {
        Self { varmap: VarMap::new(rule_ids), clauses: Vec::new(), last_model: None }
    }

    fn solve(&mut self) -> bool {
        match dpll::solve(&self.clauses, self.varmap.num_vars(), true) {
            Some(assignment) => {
                self.last_model = Some(assignment_to_model(&assignment, &self.varmap));
                true
            }
            None => {
                self.last_model = None;
                false
            }
        }
    }

    fn model(&self) -> FxHashSet<u32> {
        self.last_model.clone().unwrap_or_default()
    }

    fn add_clause(&mut self, literals: &[i32]) {
        self.clauses.push(self.varmap.literal_clause(literals));
    }
}

/// Seed = a maximal include-set: after DPLL finds any satisfying
/// assignment, every still-excluded rule is tried for inclusion and kept
/// if the result remains satisfiable under the accumulated clause set.
/// This embeds MARCO's Grow step directly into seed generation, so MARCO
/// finds large MSSes first and many MCSes come out as singletons.
pub struct MaxSatSeedSolver {
    varmap: VarMap,
    clauses: Vec<Vec<i32>>,
    last_model: Option<FxHashSet<u32>>,
}

impl SeedSolver for MaxSatSeedSolver {
    fn new(rule_ids: &[u32]) -> Self {
        Self { varmap: VarMap::new(rule_ids), clauses: Vec::new(), last_model: None }
    }

    fn solve(&mut self) -> bool {
        let Some(assignment) = dpll::solve(&self.clauses, self.varmap.num_vars(), true) else {
            self.last_model = None;
            return false;
        };
        let maximized = self.maximize(assignment);
        self.last_model = Some(assignment_to_model(&maximized, &self.varmap));
        true
    }

    fn model(&self) -> FxHashSet<u32> {
        self.last_model.clone().unwrap_or_default()
    }

    fn add_clause(&mut self, literals: &[i32]) {
        self.clauses.push(self.varmap.literal_clause(literals));
    }

    fn grows_seeds_itself(&self) -> bool {
        true
    }
}

impl MaxSatSeedSolver {
    /// Greedily forces each excluded variable to true, one at a time,
    /// keeping the forcing only if the whole clause set (original clauses
    /// plus every unit clause forced so far) remains solvable. Re-running
    /// full DPLL per candidate is more expensive than a shallow check but
    /// avoids accepting a flip that only looks safe under a partial
    /// assignment.
    fn maximize(&self, assignment: Assignment) -> Assignment {
        let num_vars = self.varmap.num_vars();
        let mut forced: Vec<i32> = (1..assignment.len())
            .filter(|&v| assignment[v] == Some(Value::True))
            .map(|v| v as i32)
            .collect();
        for var in 1..assignment.len() {
            if assignment[var] == Some(Value::True) {
                continue;
            }
            let mut trial_clauses = self.clauses.clone();
            trial_clauses.extend(forced.iter().map(|&v| vec![v]));
            trial_clauses.push(vec![var as i32]);
            if dpll::solve(&trial_clauses, num_vars, true).is_some() {
                forced.push(var as i32);
            }
        }
        let mut result = vec![None; num_vars + 1];
        for v in forced {
            result[v as usize] = Some(Value::True);
        }
        result
    }
}
