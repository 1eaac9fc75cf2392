//! The `MetaVar` table: one entry per logic-variable (or skolem atom) name,
//! shared across every type prepared in one response, per the Data
//! Model's "instantiated per fix or per well-typed inference" lifecycle.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// One type variable (or skolem) the pretty-printer has seen, tracked from
/// first appearance through name assignment.
#[derive(Debug, Clone)]
pub struct MetaVar {
    pub key: String,
    pub skolem: bool,
    /// The part of a skolem atom's name before `__`, preserved when possible.
    pub preferred_name: Option<String>,
    pub classes: FxHashSet<String>,
    pub jobs: FxHashSet<usize>,
    pub friendly_name: Option<String>,
}

#[derive(Debug, Default)]
pub struct VarTable {
    vars: IndexMap<String, MetaVar>,
}

impl VarTable {
    pub fn new() -> Self {
        Self { vars: IndexMap::new() }
    }

    pub fn register_var(&mut self, key: &str, skolem: bool, preferred_name: Option<String>, job: usize) {
        let entry = self.vars.entry(key.to_string()).or_insert_with(|| MetaVar {
            key: key.to_string(),
            skolem,
            preferred_name,
            classes: FxHashSet::default(),
            jobs: FxHashSet::default(),
            friendly_name: None,
        });
        entry.jobs.insert(job);
    }

    pub fn add_class(&mut self, key: &str, class: String) {
        if let Some(entry) = self.vars.get_mut(key) {
            entry.classes.insert(class);
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetaVar> {
        self.vars.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetaVar> {
        self.vars.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MetaVar> {
        self.vars.values_mut()
    }

    /// Vars touched by `job`, in table insertion order (stable for display).
    pub fn vars_in_job(&self, job: usize) -> Vec<&MetaVar> {
        self.vars.values().filter(|v| v.jobs.contains(&job)).collect()
    }
}
