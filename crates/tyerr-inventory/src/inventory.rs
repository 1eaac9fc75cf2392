use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info_span};

use tyerr_common::error::FatalError;
use tyerr_logic::LogicAdapter;

use crate::model::{Input, InventoryOptions, Rule, RuleKind};
use crate::templates;

/// Owns the rule set, the generalization level, and a logic-adapter
/// connection, generic over which backend implements `LogicAdapter` (the
/// in-tree interpreter in the common case, any other conforming backend
/// otherwise).
pub struct ConstraintInventory<L: LogicAdapter> {
    input: Input,
    options: InventoryOptions,
    axiomatic_rules: FxHashSet<u32>,
    effective_rules: Vec<u32>,
    current_level: u32,
    typing_rules: FxHashMap<String, Vec<u32>>,
    instance_rules: FxHashMap<String, FxHashMap<u32, Vec<String>>>,
    rules_by_id: FxHashMap<u32, Rule>,
    logic: L,
    /// Fast-path bookkeeping: the rule-id set last installed for each
    /// declaration's typing predicate, so `Satisfiable` only re-renders and
    /// re-asserts the declarations whose effective rules actually changed.
    installed: FxHashMap<String, FxHashSet<u32>>,
    axioms_consulted: bool,
}

impl<L: LogicAdapter> ConstraintInventory<L> {
    pub fn new(input: Input, options: InventoryOptions, logic: L) -> Self {
        let mut typing_rules: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        let mut instance_rules: FxHashMap<String, FxHashMap<u32, Vec<String>>> = FxHashMap::default();
        let mut rules_by_id = FxHashMap::default();
        for rule in &input.rules {
            match rule.head.kind {
                RuleKind::Type => typing_rules.entry(rule.head.name.clone()).or_default().push(rule.id),
                RuleKind::Instance => instance_rules
                    .entry(rule.head.name.clone())
                    .or_default()
                    .entry(rule.head.id)
                    .or_default()
                    .push(rule.body.clone()),
            }
            rules_by_id.insert(rule.id, rule.clone());
        }
        let current_level = input.max_level;
        Self {
            input,
            options,
            axiomatic_rules: FxHashSet::default(),
            effective_rules: Vec::new(),
            current_level,
            typing_rules,
            instance_rules,
            rules_by_id,
            logic,
            installed: FxHashMap::default(),
            axioms_consulted: false,
        }
    }

    pub fn options(&self) -> &InventoryOptions {
        &self.options
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn effective_rules(&self) -> &[u32] {
        &self.effective_rules
    }

    pub fn axiomatic_rules(&self) -> &FxHashSet<u32> {
        &self.axiomatic_rules
    }

    /// Recomputes `leafNodes` at `level` and repartitions every rule into
    /// `axiomaticRules`/`effectiveRules`. Monotone: safe to call repeatedly
    /// as the generalization loop coarsens the level.
    pub fn generalize(&mut self, level: u32) {
        let _span = info_span!("inventory.generalize", level).entered();
        let leaf_nodes = self.input.node_graph.leaf_nodes(level, &self.input.node_depth);
        let mut axiomatic = FxHashSet::default();
        let mut effective = Vec::new();
        for rule in &self.input.rules {
            let is_axiomatic = rule.is_axiom
                || self.input.base_modules.contains(&rule.head.module)
                || !leaf_nodes.contains(&rule.id);
            if is_axiomatic {
                axiomatic.insert(rule.id);
            } else {
                effective.push(rule.id);
            }
        }
        effective.sort_unstable();
        debug!(axiomatic = axiomatic.len(), effective = effective.len(), "generalized");
        self.axiomatic_rules = axiomatic;
        self.effective_rules = effective;
        self.current_level = level;
        self.axioms_consulted = false;
        self.installed.clear();
    }

    fn class_rule_text(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (class_name, superclasses) in &self.input.classes {
            out.push(templates::render_class_rule(class_name, superclasses));
            if let Some(instances) = self.instance_rules.get(class_name) {
                for bodies in instances.values() {
                    out.push(templates::render_instance_rule(class_name, superclasses, bodies));
                }
            }
        }
        out
    }

    /// Renders the two-clause typing predicate for every declaration,
    /// including a rule's body iff its id is in `rules` or is axiomatic
    /// (axiomatic rules always apply); `captures`, when given, marks which
    /// rule ids populate `Gamma`.
    fn typing_rule_text(&self, rules: &FxHashSet<u32>, captures: Option<&FxHashSet<u32>>) -> Vec<String> {
        let mut out = Vec::new();
        for name in &self.input.declarations {
            let own = self.typing_rules.get(name).map(Vec::as_slice).unwrap_or(&[]);
            let mut body = Vec::new();
            let mut captured = Vec::new();
            for &rule_id in own {
                let included = rules.contains(&rule_id) || self.axiomatic_rules.contains(&rule_id);
                if included {
                    if let Some(rule) = self.rules_by_id.get(&rule_id) {
                        body.push(rule.body.clone());
                    }
                }
                if captures.is_some_and(|c| c.contains(&rule_id)) {
                    captured.push(rule_id);
                }
            }
            captured.sort_unstable();
            let arguments = self.input.arguments.get(name).cloned().unwrap_or_default();
            out.push(templates::render_fun1(name));
            out.push(templates::render_fun2(name, &captured, &arguments, &body));
        }
        out
    }

    fn type_check_text(&self) -> String {
        templates::render_type_check(&self.input.declarations, &self.input.type_vars)
    }

    fn main_text(&self, captures: &[u32]) -> String {
        templates::render_main(&self.input.declarations, &self.capture_by_decl(captures), &self.input.type_vars, captures)
    }

    fn capture_by_decl(&self, captures: &[u32]) -> FxHashMap<String, Vec<u32>> {
        let capture_set: FxHashSet<u32> = captures.iter().copied().collect();
        let mut by_decl: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        for rule in &self.input.rules {
            if capture_set.contains(&rule.id) {
                by_decl.entry(rule.head.name.clone()).or_default().push(rule.id);
            }
        }
        by_decl
    }

    fn full_program(&self, rules: &FxHashSet<u32>, captures: Option<&FxHashSet<u32>>, with_type_check: bool) -> String {
        let mut parts = self.typing_rule_text(rules, captures);
        parts.extend(self.class_rule_text());
        if with_type_check {
            parts.push(self.type_check_text());
        }
        parts.join("\n")
    }

    /// Slow path: loads the baseline the fast-path `satisfiable` then
    /// incrementally patches — class rules and the type-check entry, with
    /// no effective typing clauses yet installed. The grounding source
    /// also declares every `N/6` `dynamic` here so calling an as-yet-
    /// unasserted predicate doesn't raise an existence error; this
    /// backend's `solve_call` treats an absent `(name, arity)` as simple
    /// failure rather than an error, so no declaration is needed and the
    /// directive (which this narrow backend's clause grammar doesn't
    /// parse in any case) is dropped.
    pub fn consult_axioms(&mut self) -> Result<(), FatalError> {
        let _span = info_span!("inventory.consult_axioms").entered();
        let mut program = self.class_rule_text().join("\n");
        program.push('\n');
        program.push_str(&self.type_check_text());
        self.logic.consult(&program)?;
        self.installed.clear();
        self.axioms_consulted = true;
        Ok(())
    }

    /// Fast-path MARCO oracle: only the declarations whose effective rule
    /// set actually changed are `abolish`ed and re-`assertz`ed.
    pub fn satisfiable(&mut self, rules: &FxHashSet<u32>) -> Result<bool, FatalError> {
        let _span = info_span!("inventory.satisfiable", rules = rules.len()).entered();
        if !self.axioms_consulted {
            self.consult_axioms()?;
        }
        let declarations = self.input.declarations.clone();
        for name in &declarations {
            let own = self.typing_rules.get(name).cloned().unwrap_or_default();
            let desired: FxHashSet<u32> =
                own.iter().copied().filter(|id| rules.contains(id) || self.axiomatic_rules.contains(id)).collect();
            let previous = self.installed.get(name);
            if previous == Some(&desired) {
                continue;
            }
            self.logic.abolish(name, 6)?;
            let body: Vec<String> = own
                .iter()
                .copied()
                .filter(|id| desired.contains(id))
                .filter_map(|id| self.rules_by_id.get(&id))
                .map(|r| r.body.clone())
                .collect();
            let arguments = self.input.arguments.get(name).cloned().unwrap_or_default();
            self.logic.assertz(&templates::render_fun1(name))?;
            self.logic.assertz(&templates::render_fun2(name, &[], &arguments, &body))?;
            self.installed.insert(name.clone(), desired);
        }
        let ok = self.logic.query("type_check.")?;
        debug!(satisfiable = ok, "fast-path satisfiability query");
        Ok(ok)
    }

    /// Slow-path: regenerates the full program from `axiomaticRules` only
    /// and consults it fresh.
    pub fn axiom_check(&mut self) -> Result<bool, FatalError> {
        let _span = info_span!("inventory.axiom_check").entered();
        let empty = FxHashSet::default();
        let program = self.full_program(&empty, None, true);
        self.logic.consult(&program)?;
        self.axioms_consulted = false;
        self.logic.query("type_check.")
    }

    /// Slow-path: regenerates the full program from `effectiveRules` and
    /// consults it fresh.
    pub fn type_check(&mut self) -> Result<bool, FatalError> {
        let _span = info_span!("inventory.type_check").entered();
        let effective: FxHashSet<u32> = self.effective_rules.iter().copied().collect();
        let program = self.full_program(&effective, None, true);
        self.logic.consult(&program)?;
        self.axioms_consulted = false;
        self.logic.query("type_check.")
    }

    /// `QueryTypes(mss, captured)`: the caller guarantees `rules` is
    /// satisfiable, so a missing solution is an internal invariant
    /// violation, not a type error.
    pub fn query_types(&mut self, rules: &FxHashSet<u32>, captured: &[u32]) -> Result<FxHashMap<String, String>, FatalError> {
        let _span = info_span!("inventory.query_types", rules = rules.len()).entered();
        let capture_set: FxHashSet<u32> = captured.iter().copied().collect();
        let mut program = self.typing_rule_text(rules, Some(&capture_set)).join("\n");
        program.push('\n');
        program.push_str(&self.class_rule_text().join("\n"));
        program.push('\n');
        program.push_str(&self.main_text(captured));
        self.logic.consult(&program)?;
        self.axioms_consulted = false;
        let bindings = self.logic.query_one("main(G, L).")?;
        bindings.ok_or(FatalError::MissingSolution)
    }
}
