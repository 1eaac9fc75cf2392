use rustc_hash::FxHashMap;
use tyerr_common::span::Range;

/// Which side of a declaration a rule's head belongs to: a binding's own
/// typing rules, or one of a class's instance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Type,
    Instance,
}

#[derive(Debug, Clone)]
pub struct RuleHead {
    pub id: u32,
    pub name: String,
    pub module: String,
    pub kind: RuleKind,
}

/// A single labelled typing or instance rule. `body` is a conjunction of
/// literal goals already in the clause language tyerr-logic's adapter
/// consults, not re-parsed or validated by the inventory itself.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: u32,
    pub head: RuleHead,
    pub body: String,
    pub is_axiom: bool,
}

/// A type variable belonging to a declaration, together with the classes
/// it is constrained by.
#[derive(Debug, Clone)]
pub struct TypeVarConstraint {
    pub var_name: String,
    pub classes: Vec<String>,
}

/// Parent-child pairs over integer node ids forming the elaboration-tree
/// forest `Generalize` walks.
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    pairs: Vec<(u32, u32)>,
}

impl NodeGraph {
    pub fn new(pairs: Vec<(u32, u32)>) -> Self {
        Self { pairs }
    }

    /// Nodes reachable by pairs whose child has depth <= `level`, minus the
    /// parents so reached: the finest granularity of blame at that level.
    pub fn leaf_nodes(&self, level: u32, node_depth: &FxHashMap<u32, u32>) -> rustc_hash::FxHashSet<u32> {
        let mut nodes = rustc_hash::FxHashSet::default();
        let mut parents = rustc_hash::FxHashSet::default();
        for &(parent, child) in &self.pairs {
            let depth = node_depth.get(&child).copied().unwrap_or(0);
            if depth <= level {
                nodes.insert(parent);
                nodes.insert(child);
                parents.insert(parent);
            }
        }
        nodes.retain(|n| !parents.contains(n));
        nodes
    }
}

/// Immutable input the inventory is built from; one instance per source
/// file (see `Lifecycles` in the data model).
#[derive(Debug, Clone)]
pub struct Input {
    pub base_modules: rustc_hash::FxHashSet<String>,
    pub rules: Vec<Rule>,
    pub declarations: Vec<String>,
    /// Per-declaration type variables and their class constraints.
    pub type_vars: FxHashMap<String, Vec<TypeVarConstraint>>,
    /// Per-declaration argument names.
    pub arguments: FxHashMap<String, Vec<String>>,
    pub node_depth: FxHashMap<u32, u32>,
    /// Class name -> its immediate superclasses.
    pub classes: FxHashMap<String, Vec<String>>,
    pub node_graph: NodeGraph,
    pub node_range: FxHashMap<u32, Range>,
    pub max_level: u32,
}

/// Per-subsystem options, mirroring the teacher's one-small-options-struct
/// convention instead of a long constructor argument list.
#[derive(Debug, Clone, Copy)]
pub struct InventoryOptions {
    pub max_loop: u32,
    /// An external wall-clock deadline; checked by callers driving the
    /// generalization loop around expensive `consult`/`query` calls. The
    /// inventory itself doesn't schedule against it (that's the orchestrator's
    /// job) but carries it so a `ConstraintInventory` can be constructed with
    /// the same options struct the rest of the pipeline passes around.
    pub deadline: Option<std::time::Instant>,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self { max_loop: tyerr_common::limits::DEFAULT_MAX_LOOP, deadline: None }
    }
}
