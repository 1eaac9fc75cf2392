//! Named constants for loops that would otherwise carry magic numbers
//! scattered across the inventory and MARCO crates.

/// Default cap on MARCO's seed/grow/shrink loop iterations before it is
/// considered stuck, per spec.md §4.E ("bounded by `maxLoop`, default
/// 1,000"), not `goanna`'s own incidental default.
pub const DEFAULT_MAX_LOOP: u32 = 1_000;

/// Default cap on the generalization loop's level decrements, i.e. the
/// deepest a declaration's node forest can be re-walked before the
/// orchestrator gives up and reports `NoMoreLevels`.
pub const DEFAULT_MAX_GENERALIZE_LEVEL: u32 = 64;
