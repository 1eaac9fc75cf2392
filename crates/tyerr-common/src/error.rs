//! The single fatal-error enum for internal invariant violations (error
//! handling design, kind 3). Every fallible internal function returns
//! `Result<_, FatalError>`; the orchestrator is the only place this is
//! converted into a process-level status, and it is never conflated with a
//! `TypeCheck`/`Parse`/`Import` response value.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FatalError {
    #[error("logic adapter fault: {0}")]
    LogicAdapter(String),

    #[error("generalization loop exhausted all levels without reaching a checkable state")]
    NoMoreLevels,

    #[error("MARCO enumeration exceeded its iteration budget ({loop_counter}/{max_loop})")]
    MarcoBudgetExceeded { loop_counter: u32, max_loop: u32 },

    #[error("external deadline exceeded during MARCO enumeration")]
    DeadlineExceeded,

    #[error("provided rule set is unsatisfiable where a solution was required")]
    MissingSolution,

    #[error("logic adapter returned a term shape the pretty-printer does not recognize: {0}")]
    UnrecognizedTermShape(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),
}
