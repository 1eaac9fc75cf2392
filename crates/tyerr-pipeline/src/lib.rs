//! The orchestrator: dispatches early on source/import errors, otherwise
//! drives the generalization loop (inventory -> MARCO -> cluster analyzer
//! -> pretty-printer -> report builder) to a `type-check` or `well-typed`
//! response.

mod dto;
mod input;
mod output;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info_span;

use tyerr_common::error::FatalError;
use tyerr_common::span::Range;
use tyerr_cluster::ClusterError;
pub use tyerr_inventory::InventoryOptions;
use tyerr_inventory::ConstraintInventory;
use tyerr_logic::LogicAdapter;
use tyerr_marco::{MarcoOptions, SatOracle};
use tyerr_pretty::Printer;
use tyerr_sat::MaxSatSeedSolver;
use tyerr_term::Term;

pub use dto::{ImportErrorDto, RangeDto};
pub use input::PipelineInput;
pub use output::{CriticalNodeDto, FixDto, PipelineOutput, TypeErrorDto};

/// The one capability MARCO needs, borrowed from whichever inventory this
/// request owns. Kept as a thin wrapper rather than implementing
/// `tyerr_marco::SatOracle` on `ConstraintInventory` directly, so that crate
/// stays free to add other oracle-shaped consumers later without the
/// inventory crate depending on `tyerr-marco`.
struct InventoryOracle<'a, L: LogicAdapter> {
    inventory: &'a mut ConstraintInventory<L>,
}

impl<L: LogicAdapter> SatOracle for InventoryOracle<'_, L> {
    fn satisfiable(&mut self, rules: &FxHashSet<u32>) -> Result<bool, FatalError> {
        self.inventory.satisfiable(rules)
    }
}

fn parse_type_list(text: &str) -> Result<Vec<Term>, FatalError> {
    let term = tyerr_term::parse_term(text).map_err(|e| FatalError::MalformedInput(e.to_string()))?;
    match term {
        Term::List(items, _) => Ok(items),
        other => Err(FatalError::UnrecognizedTermShape(other.to_string())),
    }
}

fn render_types(terms: &[Term], superclasses: &FxHashMap<String, Vec<String>>) -> Result<Vec<String>, FatalError> {
    let mut printer = Printer::new(superclasses.clone());
    let prepared = terms.iter().map(|t| printer.prepare(t)).collect::<Result<Vec<_>, _>>()?;
    printer.assign_names();
    Ok(prepared.iter().map(|p| printer.render(p)).collect())
}

/// Runs the full request/response pipeline over `raw`, using `logic` as the
/// backing clause-resolution engine and `options` to bound the loop.
pub fn run_pipeline<L: LogicAdapter>(
    raw: PipelineInput,
    logic: L,
    options: InventoryOptions,
) -> Result<PipelineOutput, FatalError> {
    let _span = info_span!("pipeline.run").entered();

    if !raw.parsing_errors.is_empty() {
        return Ok(PipelineOutput::Parse { errors: raw.parsing_errors.clone() });
    }
    if !raw.import_errors.is_empty() {
        return Ok(PipelineOutput::Import { errors: raw.import_errors.clone() });
    }

    let (inventory_input, node_range) = input::to_inventory_input(&raw)?;
    let mut level = inventory_input.max_level;
    let mut inventory = ConstraintInventory::new(inventory_input, options, logic);

    loop {
        if level == 0 {
            return Err(FatalError::NoMoreLevels);
        }
        inventory.generalize(level);

        if !inventory.axiom_check()? {
            level -= 1;
            continue;
        }

        let effective: Vec<u32> = inventory.effective_rules().to_vec();
        let effective_set: FxHashSet<u32> = effective.iter().copied().collect();

        if inventory.type_check()? {
            let bindings = inventory.query_types(&effective_set, &[])?;
            let global_text = bindings.get("G").ok_or(FatalError::MissingSolution)?;
            let global_terms = parse_type_list(global_text)?;
            let global_types = render_types(&global_terms, &raw.classes)?;
            let inferred_types = raw.declarations.iter().cloned().zip(global_types).collect();
            return Ok(PipelineOutput::WellTyped { inferred_types });
        }

        inventory.consult_axioms()?;
        let marco_result = {
            let solver = MaxSatSeedSolver::new(&effective);
            let mut oracle = InventoryOracle { inventory: &mut inventory };
            tyerr_marco::run(&effective, solver, &mut oracle, MarcoOptions::default())?
        };
        let cluster_errors = tyerr_cluster::analyze(&effective_set, &marco_result.muses, &marco_result.msses, &node_range);

        if cluster_errors.len() == 1 && cluster_errors[0].critical_nodes.is_empty() {
            level -= 1;
            continue;
        }

        let mut errors = Vec::with_capacity(cluster_errors.len());
        for cluster_error in &cluster_errors {
            errors.push(build_type_error(&mut inventory, cluster_error, &effective_set, &raw, &node_range)?);
        }
        return Ok(PipelineOutput::TypeCheck { errors });
    }
}

fn build_type_error<L: LogicAdapter>(
    inventory: &mut ConstraintInventory<L>,
    cluster_error: &ClusterError,
    effective_set: &FxHashSet<u32>,
    raw: &PipelineInput,
    node_range: &FxHashMap<u32, Range>,
) -> Result<TypeErrorDto, FatalError> {
    let mut captured: Vec<u32> = cluster_error.critical_nodes.iter().copied().collect();
    captured.sort_unstable();

    // Rules outside this error's critical nodes are common background and
    // are always kept, matching `report.go`'s `otherMSS` passed into
    // `ReportTypeError` alongside each cause's own (restricted) MSS.
    let background: FxHashSet<u32> = effective_set.difference(&cluster_error.critical_nodes).copied().collect();

    let mut fixes = Vec::with_capacity(cluster_error.causes.len());
    for cause in &cluster_error.causes {
        let mut rules_for_query = background.clone();
        rules_for_query.extend(cause.mss.iter().copied());

        let bindings = inventory.query_types(&rules_for_query, &captured)?;
        let global_terms = parse_type_list(bindings.get("G").ok_or(FatalError::MissingSolution)?)?;
        let local_terms = parse_type_list(bindings.get("L").ok_or(FatalError::MissingSolution)?)?;
        let global_types = render_types(&global_terms, &raw.classes)?;
        let local_types = render_types(&local_terms, &raw.classes)?;

        let global_type = raw.declarations.iter().cloned().zip(global_types).collect();
        let local_type = captured.iter().copied().zip(local_types).collect();

        let mut mcs: Vec<u32> = cause.mcs.iter().copied().collect();
        mcs.sort_unstable();
        let snapshot = tyerr_report::build_snapshot(&captured, &cause.mcs, node_range, &raw.source);

        fixes.push(FixDto { mcs, local_type, global_type, snapshot });
    }

    let names = tyerr_report::display_names(&captured, node_range, &raw.source);
    let critical_nodes = captured
        .iter()
        .filter_map(|&id| {
            let range = node_range.get(&id)?;
            let display_name = names.get(&id).cloned().unwrap_or_default();
            Some((id, CriticalNodeDto { display_name, range: input::range_to_dto(range) }))
        })
        .collect();

    Ok(TypeErrorDto { critical_nodes, fixes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap as Map;
    use tyerr_logic::Interpreter;

    fn base_input() -> serde_json::Value {
        serde_json::json!({
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
        })
    }

    #[test]
    fn parsing_errors_short_circuit_to_the_parse_stage() {
        let mut value = base_input();
        value["parsing_errors"] = serde_json::json!([{"from_line":1,"to_line":1,"from_col":1,"to_col":2}]);
        let raw: PipelineInput = serde_json::from_value(value).unwrap();
        let output = run_pipeline(raw, Interpreter::new(), InventoryOptions::default()).unwrap();
        assert!(matches!(output, PipelineOutput::Parse { .. }));
    }

    #[test]
    fn import_errors_short_circuit_to_the_import_stage() {
        let mut value = base_input();
        value["import_errors"] = serde_json::json!([
            {"node_id": 1, "name": "foo", "node_range": {"from_line":1,"to_line":1,"from_col":1,"to_col":4}, "is_type": false, "is_term": true}
        ]);
        let raw: PipelineInput = serde_json::from_value(value).unwrap();
        let output = run_pipeline(raw, Interpreter::new(), InventoryOptions::default()).unwrap();
        assert!(matches!(output, PipelineOutput::Import { .. }));
    }

    #[test]
    fn a_single_satisfiable_leaf_declaration_is_well_typed() {
        let mut value = base_input();
        value["declarations"] = serde_json::json!(["x"]);
        value["type_vars"] = serde_json::json!({"x": {}});
        value["arguments"] = serde_json::json!({"x": []});
        value["node_depth"] = serde_json::json!({"1": 0});
        value["node_graph"] = serde_json::json!([{"parent": 0, "child": 1}]);
        value["rules"] = serde_json::json!([
            {"id": 1, "head": {"id": 1, "name": "x", "module": "User", "type": "type"}, "body": "T = foo", "is_axiom": false}
        ]);
        value["source"] = serde_json::json!("x = 1\n");
        let raw: PipelineInput = serde_json::from_value(value).unwrap();
        let output = run_pipeline(raw, Interpreter::new(), InventoryOptions::default()).unwrap();
        match output {
            PipelineOutput::WellTyped { inferred_types } => {
                assert_eq!(inferred_types.get("x").map(String::as_str), Some("foo"));
            }
            other => panic!("expected WellTyped, got {other:?}"),
        }
    }

    #[test]
    fn conflicting_literal_kinds_yield_a_type_check_error() {
        let mut value = base_input();
        value["declarations"] = serde_json::json!(["x"]);
        value["type_vars"] = serde_json::json!({"x": {}});
        value["arguments"] = serde_json::json!({"x": []});
        value["node_depth"] = serde_json::json!({"1": 0, "2": 0});
        value["node_graph"] = serde_json::json!([{"parent": 0, "child": 1}, {"parent": 0, "child": 2}]);
        value["node_range"] = serde_json::json!({
            "1": {"from_line": 1, "to_line": 1, "from_col": 5, "to_col": 8},
            "2": {"from_line": 1, "to_line": 1, "from_col": 9, "to_col": 12},
        });
        value["rules"] = serde_json::json!([
            {"id": 1, "head": {"id": 1, "name": "x", "module": "User", "type": "type"}, "body": "T = foo", "is_axiom": false},
            {"id": 2, "head": {"id": 2, "name": "x", "module": "User", "type": "type"}, "body": "T = bar", "is_axiom": false},
        ]);
        value["source"] = serde_json::json!("x = foo bar\n");
        let raw: PipelineInput = serde_json::from_value(value).unwrap();
        let output = run_pipeline(raw, Interpreter::new(), InventoryOptions::default()).unwrap();
        match output {
            PipelineOutput::TypeCheck { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].fixes.len(), 2);
            }
            other => panic!("expected TypeCheck, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_binding_text_is_malformed_input_not_a_panic() {
        assert!(matches!(parse_type_list("not(valid"), Err(FatalError::MalformedInput(_))));
    }

    #[test]
    fn render_types_assigns_distinct_names_to_distinct_variables() {
        let terms = vec![Term::var("X"), Term::var("Y")];
        let rendered = render_types(&terms, &Map::default()).unwrap();
        assert_eq!(rendered, vec!["a".to_string(), "b".to_string()]);
    }
}
