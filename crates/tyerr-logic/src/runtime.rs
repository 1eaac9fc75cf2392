//! Runtime term representation used during resolution, and unification
//! with occurs-check over an `ena` union-find table — the same crate the
//! teacher uses for type-variable unification, applied here to logic
//! variables instead.

use std::rc::Rc;

use ena::unify::{InPlaceUnificationTable, NoError, UnificationTable, UnifyKey, UnifyValue};

/// A term during resolution. Logic variables are represented as table
/// keys rather than names, so that binding is O(1) union-find rather than
/// substitution-map lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTerm {
    Atom(Rc<str>),
    Var(LVar),
    Compound(Rc<str>, Vec<RTerm>),
    List(Vec<RTerm>, Option<Box<RTerm>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LVar(u32);

impl UnifyKey for LVar {
    type Value = Binding;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        LVar(u)
    }

    fn tag() -> &'static str {
        "LVar"
    }
}

/// Wraps `Option<RTerm>` so the orphan rule lets us implement `UnifyValue`
/// locally. `unify_values` is only ever invoked by `ena` when unioning two
/// *unbound* variables (our own `unify` never lets it merge two bound
/// terms — that goes through recursive structural unification instead), so
/// the only reachable case is `(None, None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding(pub Option<RTerm>);

impl UnifyValue for Binding {
    type Error = NoError;

    fn unify_values(a: &Self, b: &Self) -> Result<Self, NoError> {
        match (&a.0, &b.0) {
            (None, None) => Ok(Binding(None)),
            (Some(_), None) => Ok(a.clone()),
            (None, Some(_)) => Ok(b.clone()),
            (Some(x), Some(y)) if x == y => Ok(a.clone()),
            _ => Ok(a.clone()),
        }
    }
}

pub type Table = InPlaceUnificationTable<LVar>;

/// Follows variable bindings until reaching an unbound variable or a
/// non-variable term. Does not recurse into compound arguments.
pub fn walk(term: &RTerm, table: &mut Table) -> RTerm {
    let mut current = term.clone();
    while let RTerm::Var(v) = current {
        match table.probe_value(v).0 {
            Some(bound) => current = bound,
            None => return RTerm::Var(v),
        }
    }
    current
}

fn occurs(var: LVar, term: &RTerm, table: &mut Table) -> bool {
    match walk(term, table) {
        RTerm::Var(v) => v == var,
        RTerm::Atom(_) => false,
        RTerm::Compound(_, args) => args.iter().any(|a| occurs(var, a, table)),
        RTerm::List(items, tail) => {
            items.iter().any(|i| occurs(var, i, table))
                || tail.as_deref().is_some_and(|t| occurs(var, t, table))
        }
    }
}

/// Structural unification with occurs-check (`unify_with_occurs_check`).
/// `table` is the caller's live unification state; failed attempts must be
/// rolled back by the caller via `table.rollback_to` to a snapshot taken
/// before calling this.
pub fn unify(a: &RTerm, b: &RTerm, table: &mut Table) -> bool {
    let a = walk(a, table);
    let b = walk(b, table);
    match (a, b) {
        (RTerm::Var(x), RTerm::Var(y)) if x == y => true,
        (RTerm::Var(x), RTerm::Var(y)) => table.unify_var_var(x, y).is_ok(),
        (RTerm::Var(x), other) | (other, RTerm::Var(x)) => {
            if occurs(x, &other, table) {
                false
            } else {
                table.unify_var_value(x, Binding(Some(other))).is_ok()
            }
        }
        (RTerm::Atom(x), RTerm::Atom(y)) => x == y,
        (RTerm::Compound(f1, a1), RTerm::Compound(f2, a2)) => {
            f1 == f2 && a1.len() == a2.len() && a1.iter().zip(a2.iter()).all(|(x, y)| unify(x, y, table))
        }
        (RTerm::List(i1, t1), RTerm::List(i2, t2)) => unify_lists(&i1, t1.as_deref(), &i2, t2.as_deref(), table),
        _ => false,
    }
}

fn unify_lists(i1: &[RTerm], t1: Option<&RTerm>, i2: &[RTerm], t2: Option<&RTerm>, table: &mut Table) -> bool {
    match (i1.split_first(), i2.split_first()) {
        (Some((h1, r1)), Some((h2, r2))) => unify(h1, h2, table) && unify_lists(r1, t1, r2, t2, table),
        (None, None) => match (t1, t2) {
            (None, None) => true,
            (Some(t), None) | (None, Some(t)) => unify(t, &RTerm::List(Vec::new(), None), table),
            (Some(x), Some(y)) => unify(x, y, table),
        },
        (Some(_), None) => match t2 {
            Some(t) => unify(t, &RTerm::List(i1.to_vec(), t1.map(|t| Box::new(t.clone()))), table),
            None => false,
        },
        (None, Some(_)) => match t1 {
            Some(t) => unify(t, &RTerm::List(i2.to_vec(), t2.map(|t| Box::new(t.clone()))), table),
            None => false,
        },
    }
}

/// Fully resolves a term (recursively, unlike `walk`) into a `tyerr_term`
/// surface term for textual rendering, replacing unbound variables with a
/// synthesized name derived from their table index.
pub fn reify(term: &RTerm, table: &mut Table) -> tyerr_term::Term {
    match walk(term, table) {
        RTerm::Var(v) => tyerr_term::Term::var(format!("_G{}", v.index())),
        RTerm::Atom(name) => tyerr_term::Term::atom(name.to_string()),
        RTerm::Compound(name, args) => {
            tyerr_term::Term::compound(name.to_string(), args.iter().map(|a| reify(a, table)).collect())
        }
        RTerm::List(items, tail) => tyerr_term::Term::List(
            items.iter().map(|i| reify(i, table)).collect(),
            tail.as_deref().map(|t| Box::new(reify(t, table))),
        ),
    }
}
