use rustc_hash::FxHashMap;

use tyerr_common::error::FatalError;

/// A thin, uniform contract over an external clause-database: the same
/// five operations regardless of which clause-resolution engine backs it.
/// All faults are fatal — the emitted program is generated by this
/// workspace, so any adapter failure is an internal bug, never a value the
/// caller is expected to recover from.
pub trait LogicAdapter {
    /// Loads a full program (preamble, rendered rules, predicates) into a
    /// fresh database, discarding anything previously consulted.
    fn consult(&mut self, program: &str) -> Result<(), FatalError>;

    /// Returns true iff `goal` has at least one solution under the current
    /// database.
    fn query(&mut self, goal: &str) -> Result<bool, FatalError>;

    /// Returns the first solution as a mapping from the goal's uppercase
    /// variable names to the textual form of their binding, or `None` if
    /// the goal has no solution. A missing solution is not an error: the
    /// caller (constraint inventory's `QueryTypes`) treats it as an
    /// internal invariant violation only when it had already established
    /// satisfiability.
    fn query_one(&mut self, goal: &str) -> Result<Option<FxHashMap<String, String>>, FatalError>;

    /// Incrementally adds one clause (`name(args) :- body.` or a bare
    /// fact) to the database without touching any other predicate.
    fn assertz(&mut self, clause: &str) -> Result<(), FatalError>;

    /// Removes every clause for `name/arity`. Idempotent: abolishing a
    /// predicate with no clauses is not an error.
    fn abolish(&mut self, name: &str, arity: usize) -> Result<(), FatalError>;
}
