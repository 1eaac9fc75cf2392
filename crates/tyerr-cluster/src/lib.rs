//! The cluster analyzer: partitions MARCO's MUSes into independent errors
//! via an intersection graph, derives per-error MCSes, and sorts both
//! causes within an error and errors across the report by source position.

mod graph;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info_span;

use tyerr_common::span::Range;

/// One alternative fix for an error: a minimal set of nodes to drop (`mcs`)
/// together with the rule ids that remain well-typed once they are (`mss`,
/// restricted to the error's `critical_nodes`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    pub mcs: FxHashSet<u32>,
    pub mss: FxHashSet<u32>,
}

/// One independent type error: the union of node ids implicated by its
/// cluster of overlapping MUSes, and the distinct fixes derived from it.
#[derive(Debug, Clone)]
pub struct ClusterError {
    pub critical_nodes: FxHashSet<u32>,
    pub causes: Vec<Cause>,
}

/// Builds the intersection graph over `muses` (an edge between two MUSes
/// whenever they share a rule id), labels connected components via DFS, and
/// for each component derives `critical_nodes` and the deduplicated set of
/// `Cause`s obtained by restricting every observed MCS (`universe \ mss`,
/// for each MSS in `msses`) to that component's critical nodes.
///
/// Causes within an error, and errors across the returned list, are sorted
/// ascending by the smallest `(line, column)` of any node in the cause's
/// `mcs` (respectively the error's `critical_nodes`), using `node_range` to
/// resolve positions.
pub fn analyze(
    universe: &FxHashSet<u32>,
    muses: &[FxHashSet<u32>],
    msses: &[FxHashSet<u32>],
    node_range: &FxHashMap<u32, Range>,
) -> Vec<ClusterError> {
    let _span = info_span!("cluster.analyze", muses = muses.len(), msses = msses.len()).entered();
    if muses.is_empty() {
        return Vec::new();
    }

    let mcss: Vec<FxHashSet<u32>> = msses.iter().map(|mss| universe.difference(mss).copied().collect()).collect();

    let mut g = graph::Graph::new(muses.len());
    for i in 0..muses.len() {
        for j in (i + 1)..muses.len() {
            if !muses[i].is_disjoint(&muses[j]) {
                g.add_edge(i, j);
            }
        }
    }
    let component_of = g.connected_components();
    let component_count = component_of.iter().copied().max().map_or(0, |m| m + 1);

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); component_count];
    for (mus_idx, &component) in component_of.iter().enumerate() {
        members[component].push(mus_idx);
    }

    let mut errors: Vec<ClusterError> = members
        .into_iter()
        .map(|mus_indices| {
            let critical_nodes: FxHashSet<u32> =
                mus_indices.iter().flat_map(|&i| muses[i].iter().copied()).collect();

            let mut seen: FxHashSet<Vec<u32>> = FxHashSet::default();
            let mut causes = Vec::new();
            for mcs in &mcss {
                let restricted: FxHashSet<u32> = mcs.intersection(&critical_nodes).copied().collect();
                if restricted.is_empty() {
                    continue;
                }
                let mut key: Vec<u32> = restricted.iter().copied().collect();
                key.sort_unstable();
                if !seen.insert(key) {
                    continue;
                }
                let mss: FxHashSet<u32> = critical_nodes.difference(&restricted).copied().collect();
                causes.push(Cause { mcs: restricted, mss });
            }
            causes.sort_by_key(|cause| min_position(cause.mcs.iter().copied(), node_range));
            ClusterError { critical_nodes, causes }
        })
        .collect();

    errors.sort_by_key(|error| min_position(error.critical_nodes.iter().copied(), node_range));
    errors
}

/// The smallest `(line, column)` among the given node ids' ranges, used as a
/// stable ascending sort key. Nodes absent from `node_range` sort last
/// within their set (their position is unknown, not earliest).
fn min_position(nodes: impl Iterator<Item = u32>, node_range: &FxHashMap<u32, Range>) -> (u32, u32) {
    nodes
        .filter_map(|id| node_range.get(&id))
        .map(|range| (range.from.line, range.from.column))
        .min()
        .unwrap_or((u32::MAX, u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyerr_common::span::Position;

    fn range_at(line: u32, column: u32) -> Range {
        Range::new(Position::new(0, line, column), Position::new(0, line, column + 1))
    }

    #[test]
    fn two_disjoint_muses_form_two_independent_errors() {
        let universe: FxHashSet<u32> = [1, 2, 3, 4].into_iter().collect();
        let muses = vec![FxHashSet::from_iter([1]), FxHashSet::from_iter([3])];
        let msses = vec![FxHashSet::from_iter([2, 3, 4]), FxHashSet::from_iter([1, 2, 4])];
        let node_range = FxHashMap::from_iter([
            (1, range_at(10, 1)),
            (2, range_at(1, 1)),
            (3, range_at(20, 1)),
            (4, range_at(1, 1)),
        ]);
        let errors = analyze(&universe, &muses, &msses, &node_range);
        assert_eq!(errors.len(), 2);
        // Sorted by smallest critical-node line: error for rule 1 (line 10)
        // before the one for rule 3 (line 20).
        assert_eq!(errors[0].critical_nodes, FxHashSet::from_iter([1]));
        assert_eq!(errors[1].critical_nodes, FxHashSet::from_iter([3]));
        assert_eq!(errors[0].causes.len(), 1);
        assert_eq!(errors[0].causes[0].mcs, FxHashSet::from_iter([1]));
    }

    #[test]
    fn overlapping_muses_merge_into_one_error_with_union_critical_nodes() {
        let universe: FxHashSet<u32> = [1, 2, 3].into_iter().collect();
        let muses = vec![FxHashSet::from_iter([1, 2]), FxHashSet::from_iter([2, 3])];
        let msses = vec![FxHashSet::from_iter([3]), FxHashSet::from_iter([1])];
        let node_range = FxHashMap::from_iter([
            (1, range_at(1, 1)),
            (2, range_at(1, 5)),
            (3, range_at(1, 10)),
        ]);
        let errors = analyze(&universe, &muses, &msses, &node_range);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].critical_nodes, FxHashSet::from_iter([1, 2, 3]));
    }

    #[test]
    fn empty_muses_yields_no_errors() {
        let universe: FxHashSet<u32> = [1].into_iter().collect();
        let errors = analyze(&universe, &[], &[], &FxHashMap::default());
        assert!(errors.is_empty());
    }
}
