//! The report builder: turns one fix's critical nodes and MCS into a
//! source-text snapshot tagged `normal`/`critical`/`error`, plus a
//! human-readable `display_name` for each node.

mod snapshot;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info_span;

use tyerr_common::span::Range;

pub use snapshot::{display_name, SnapshotLine, Span, SpanTag};

/// Builds the snapshot for one fix, instrumented with the node and mcs
/// counts so a slow report can be spotted in traces.
pub fn build_snapshot(
    critical_nodes: &[u32],
    mcs_nodes: &FxHashSet<u32>,
    node_range: &FxHashMap<u32, Range>,
    source: &str,
) -> Vec<SnapshotLine> {
    let _span =
        info_span!("report.build_snapshot", critical = critical_nodes.len(), mcs = mcs_nodes.len()).entered();
    snapshot::build_snapshot(critical_nodes, mcs_nodes, node_range, source)
}

/// Computes `display_name` for every node in `critical_nodes`, keyed by
/// node id — the shape `tyerr-pipeline` assembles into `TypeError`'s
/// `criticalNodes` map.
pub fn display_names(critical_nodes: &[u32], node_range: &FxHashMap<u32, Range>, source: &str) -> FxHashMap<u32, String> {
    critical_nodes
        .iter()
        .filter_map(|&node| node_range.get(&node).map(|range| (node, display_name(range, source))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyerr_common::span::Position;

    #[test]
    fn display_names_covers_every_ranged_node() {
        let source = "x";
        let mut node_range = FxHashMap::default();
        node_range.insert(1u32, Range::new(Position::start(), Position::new(1, 1, 2)));
        let names = display_names(&[1], &node_range, source);
        assert_eq!(names.get(&1).map(String::as_str), Some("x"));
    }
}
