//! Library facade over the constraint-based diagnostic pipeline.
//!
//! - Re-exports [`run_pipeline`] and its request/response types from
//!   `tyerr-pipeline`, so a consumer (the CLI, a future transport) depends on
//!   one crate rather than wiring up the inventory/MARCO/cluster/pretty/
//!   report stack itself.
//! - Re-exports [`Interpreter`] as the default [`LogicAdapter`], since every
//!   caller in this workspace uses the in-tree SLD resolver rather than an
//!   external one.
//! - Leaves `tyerr-sat`'s seed-solver choice and `tyerr-marco`/
//!   `tyerr-cluster`/`tyerr-pretty`/`tyerr-report` internal: `run_pipeline`
//!   already picks `MaxSatSeedSolver` and wires the rest, matching
//!   SPEC_FULL's Open Question resolution on seeding bias.

pub use tyerr_common::error::FatalError;
pub use tyerr_common::span::{Position, Range};
pub use tyerr_logic::Interpreter;
pub use tyerr_pipeline::{
    run_pipeline, CriticalNodeDto, FixDto, ImportErrorDto, InventoryOptions, PipelineInput, PipelineOutput,
    RangeDto, TypeErrorDto,
};
pub use tyerr_term::Term;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_reexports_a_runnable_pipeline() {
        let raw: PipelineInput = serde_json::from_value(serde_json::json!({
            "base_modules": [],
            "rules": [],
            "declarations": [],
            "type_vars": {},
            "arguments": {},
            "node_depth": {},
            "max_depth": 1,
            "classes": {},
            "node_graph": [],
            "node_range": {},
            "parsing_errors": [],
            "import_errors": [],
            "source": "",
        }))
        .unwrap();

        let output = run_pipeline(raw, Interpreter::new(), InventoryOptions::default()).unwrap();
        assert!(matches!(output, PipelineOutput::WellTyped { .. }));
    }
}
