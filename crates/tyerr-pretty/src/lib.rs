//! The type reconstructor / pretty-printer: turns logic-level type terms
//! back into surface type syntax, assigning readable variable names and
//! normalizing class contexts by superclass pruning.

mod context;
mod naming;
mod surface;
mod vartable;

use rustc_hash::FxHashMap;
use tracing::info_span;

use tyerr_common::error::FatalError;
use tyerr_term::Term;

pub use surface::Surface;
pub use vartable::MetaVar;

/// A type prepared from one logic term, not yet rendered: the job id it
/// was prepared under (used to pull this job's own variables back out of
/// the shared table) and its decoded print tree.
pub struct PreparedType {
    job: usize,
    surface: Surface,
}

/// One pretty-printer session: the `MetaVar` table accumulates across
/// every `prepare` call, then `assign_names` runs the skolem and
/// non-skolem naming passes once, and `render` turns each `PreparedType`
/// into its final `Context => Type` text. Matches the Data Model's
/// "instantiated per fix or per well-typed inference" lifecycle — build
/// one `Printer` per response, not one per declaration.
pub struct Printer {
    table: vartable::VarTable,
    superclasses: FxHashMap<String, Vec<String>>,
    next_job: usize,
    named: bool,
}

impl Printer {
    pub fn new(superclasses: FxHashMap<String, Vec<String>>) -> Self {
        Self { table: vartable::VarTable::new(), superclasses, next_job: 0, named: false }
    }

    /// Decodes `term` into a `PreparedType` under a fresh job id, recording
    /// every variable/skolem it touches (and the classes `has/2` imposes on
    /// them) into the shared table. Call this for every declaration's type
    /// before calling `assign_names`.
    pub fn prepare(&mut self, term: &Term) -> Result<PreparedType, FatalError> {
        let _span = info_span!("pretty.prepare", job = self.next_job).entered();
        let job = self.next_job;
        self.next_job += 1;
        let decoded = surface::decode(term, job, &mut self.table)?;
        Ok(PreparedType { job, surface: decoded })
    }

    /// Runs the skolem then non-skolem naming passes over every variable
    /// seen so far. Idempotent in the sense that it only needs to run
    /// once, after every `prepare` call for this response has happened.
    pub fn assign_names(&mut self) {
        let _span = info_span!("pretty.assign_names", vars = self.table.iter().count()).entered();
        naming::assign_names(&mut self.table);
        self.named = true;
    }

    /// Renders `prepared` to its final `Context => Type` string. Panics if
    /// called before `assign_names` — a programmer error, not a recoverable
    /// one (every job's variables are already known at that point).
    pub fn render(&self, prepared: &PreparedType) -> String {
        assert!(self.named, "Printer::render called before assign_names");
        let resolve = |key: &str| {
            self.table
                .get(key)
                .and_then(|v| v.friendly_name.clone())
                .unwrap_or_else(|| key.to_string())
        };
        let type_text = surface::render(&prepared.surface, &resolve);

        let mut requirements = Vec::new();
        for var in self.table.vars_in_job(prepared.job) {
            if var.classes.is_empty() {
                continue;
            }
            let pruned = context::prune_superclasses(&var.classes, &self.superclasses);
            let name = var.friendly_name.clone().unwrap_or_else(|| var.key.clone());
            for class in pruned {
                requirements.push((class, name.clone()));
            }
        }
        let context = context::render_context(requirements);
        format!("{context}{type_text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(classes: &[&str], var: &str) -> Term {
        Term::compound("has", vec![Term::List(classes.iter().map(|c| Term::atom(*c)).collect(), None), Term::var(var)])
    }

    #[test]
    fn plain_variable_with_no_classes_prints_bare() {
        let mut printer = Printer::new(FxHashMap::default());
        let prepared = printer.prepare(&Term::var("A")).unwrap();
        printer.assign_names();
        assert_eq!(printer.render(&prepared), "a");
    }

    #[test]
    fn monomorphic_function_prints_with_arrow() {
        let mut printer = Printer::new(FxHashMap::default());
        let term = Term::compound(
            "pair",
            vec![Term::compound("pair", vec![Term::atom("function"), Term::atom("module_Int")]), Term::atom("module_Int")],
        );
        let prepared = printer.prepare(&term).unwrap();
        printer.assign_names();
        assert_eq!(printer.render(&prepared), "Int->Int");
    }

    #[test]
    fn polymorphic_identity_over_a_num_constrained_variable() {
        let mut printer = Printer::new(FxHashMap::default());
        let term = Term::compound(
            "pair",
            vec![Term::compound("pair", vec![Term::atom("function"), has(&["module_Num"], "A")]), has(&["module_Num"], "A")],
        );
        let prepared = printer.prepare(&term).unwrap();
        printer.assign_names();
        assert_eq!(printer.render(&prepared), "Num a=>a->a");
    }

    #[test]
    fn three_way_function_chain_is_fully_right_flattened() {
        let mut printer = Printer::new(FxHashMap::default());
        let inner =
            Term::compound("pair", vec![Term::compound("pair", vec![Term::atom("function"), Term::var("Y")]), Term::var("Z")]);
        let outer = Term::compound("pair", vec![Term::compound("pair", vec![Term::atom("function"), Term::var("X")]), inner]);
        let prepared = printer.prepare(&outer).unwrap();
        printer.assign_names();
        assert_eq!(printer.render(&prepared), "a->b->c");
    }

    #[test]
    fn list_of_a_type_prints_with_brackets() {
        let mut printer = Printer::new(FxHashMap::default());
        let term = Term::compound("pair", vec![Term::atom("list"), Term::atom("module_Char")]);
        let prepared = printer.prepare(&term).unwrap();
        printer.assign_names();
        assert_eq!(printer.render(&prepared), "[Char]");
    }

    #[test]
    fn skolem_atom_preserves_its_declared_name() {
        let mut printer = Printer::new(FxHashMap::default());
        let term = Term::compound(
            "pair",
            vec![Term::compound("pair", vec![Term::atom("function"), has(&[], "a__id")]), has(&[], "a__id")],
        );
        let prepared = printer.prepare(&term).unwrap();
        printer.assign_names();
        assert_eq!(printer.render(&prepared), "a->a");
    }

    #[test]
    fn context_drops_a_redundant_superclass() {
        let superclasses = FxHashMap::from_iter([("module_Ord".to_string(), vec!["module_Eq".to_string()])]);
        let mut printer = Printer::new(superclasses);
        let term = has(&["module_Ord", "module_Eq"], "A");
        let prepared = printer.prepare(&term).unwrap();
        printer.assign_names();
        assert_eq!(printer.render(&prepared), "Ord a=>a");
    }

    #[test]
    fn unrecognized_compound_functor_is_a_fatal_error() {
        let mut printer = Printer::new(FxHashMap::default());
        let term = Term::compound("mystery", vec![Term::atom("x")]);
        assert!(printer.prepare(&term).is_err());
    }
}
