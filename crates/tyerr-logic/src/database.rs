use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::clause_parser::{PClause, PGoal, PTerm};
use crate::runtime::{Binding, LVar, RTerm, Table};

/// A clause body goal in template form (local variables are indices, not
/// names, so instantiation is a single pass allocating `num_vars` fresh
/// table keys).
#[derive(Debug, Clone)]
pub enum TGoal {
    Cut,
    Eq(TTerm, TTerm),
    Call(TTerm),
}

#[derive(Debug, Clone)]
pub enum TTerm {
    Atom(Rc<str>),
    Var(usize),
    Compound(Rc<str>, Vec<TTerm>),
    List(Vec<TTerm>, Option<Box<TTerm>>),
}

#[derive(Debug, Clone)]
pub struct ClauseTemplate {
    pub num_vars: usize,
    pub head: TTerm,
    pub body: Vec<TGoal>,
}

/// Per-clause lowering state: named variables share a slot, each `_`
/// occurrence gets its own fresh slot.
#[derive(Default)]
struct LowerCtx {
    names: FxHashMap<String, usize>,
    next: usize,
}

impl LowerCtx {
    fn slot_for(&mut self, name: &str) -> usize {
        if name == "_" {
            let idx = self.next;
            self.next += 1;
            return idx;
        }
        if let Some(&idx) = self.names.get(name) {
            idx
        } else {
            let idx = self.next;
            self.next += 1;
            self.names.insert(name.to_string(), idx);
            idx
        }
    }
}

impl ClauseTemplate {
    pub fn from_parsed(clause: &PClause) -> Self {
        let mut ctx = LowerCtx::default();
        let head = lower_term(&clause.head, &mut ctx);
        let body = clause.body.iter().map(|g| lower_goal(g, &mut ctx)).collect();
        ClauseTemplate { num_vars: ctx.next, head, body }
    }

    /// Allocates `num_vars` fresh table keys and substitutes them into a
    /// renamed copy of the head and body, so repeated attempts at the same
    /// clause never alias variables across attempts.
    pub fn instantiate(&self, table: &mut Table) -> (RTerm, Vec<InstGoal>) {
        let fresh: Vec<LVar> = (0..self.num_vars).map(|_| table.new_key(Binding(None))).collect();
        let head = inst_term(&self.head, &fresh);
        let body = self.body.iter().map(|g| inst_goal(g, &fresh)).collect();
        (head, body)
    }
}

#[derive(Clone)]
pub enum InstGoal {
    Cut,
    Eq(RTerm, RTerm),
    Call(RTerm),
}

fn inst_term(t: &TTerm, fresh: &[LVar]) -> RTerm {
    match t {
        TTerm::Atom(a) => RTerm::Atom(a.clone()),
        TTerm::Var(i) => RTerm::Var(fresh[*i]),
        TTerm::Compound(name, args) => {
            RTerm::Compound(name.clone(), args.iter().map(|a| inst_term(a, fresh)).collect())
        }
        TTerm::List(items, tail) => RTerm::List(
            items.iter().map(|i| inst_term(i, fresh)).collect(),
            tail.as_deref().map(|t| Box::new(inst_term(t, fresh))),
        ),
    }
}

fn inst_goal(g: &TGoal, fresh: &[LVar]) -> InstGoal {
    match g {
        TGoal::Cut => InstGoal::Cut,
        TGoal::Eq(a, b) => InstGoal::Eq(inst_term(a, fresh), inst_term(b, fresh)),
        TGoal::Call(t) => InstGoal::Call(inst_term(t, fresh)),
    }
}

fn lower_term(t: &PTerm, ctx: &mut LowerCtx) -> TTerm {
    match t {
        PTerm::Atom(a) => TTerm::Atom(Rc::from(a.as_str())),
        PTerm::Var(name) => TTerm::Var(ctx.slot_for(name)),
        PTerm::Compound(name, args) => {
            TTerm::Compound(Rc::from(name.as_str()), args.iter().map(|a| lower_term(a, ctx)).collect())
        }
        PTerm::List(items, tail) => TTerm::List(
            items.iter().map(|i| lower_term(i, ctx)).collect(),
            tail.as_deref().map(|t| Box::new(lower_term(t, ctx))),
        ),
    }
}

fn lower_goal(g: &PGoal, ctx: &mut LowerCtx) -> TGoal {
    match g {
        PGoal::Cut => TGoal::Cut,
        PGoal::Eq(a, b) => TGoal::Eq(lower_term(a, ctx), lower_term(b, ctx)),
        PGoal::Call(t) => TGoal::Call(lower_term(t, ctx)),
    }
}

/// The clause store: all clauses for a predicate, keyed by `(name, arity)`.
#[derive(Default)]
pub struct Database {
    pub(crate) clauses: FxHashMap<(Rc<str>, usize), Vec<Rc<ClauseTemplate>>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assertz_parsed(&mut self, clause: &PClause) {
        let (name, arity) = head_key(&clause.head);
        let template = Rc::new(ClauseTemplate::from_parsed(clause));
        self.clauses.entry((name, arity)).or_default().push(template);
    }

    pub fn abolish(&mut self, name: &str, arity: usize) {
        self.clauses.remove(&(Rc::from(name), arity));
    }

    pub fn clear(&mut self) {
        self.clauses.clear();
    }

    pub fn lookup(&self, name: &str, arity: usize) -> &[Rc<ClauseTemplate>] {
        self.clauses
            .get(&(Rc::from(name), arity))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// A standalone goal query (as opposed to a stored clause): lowers a goal
/// list into template form and records the surface name of each variable
/// so the caller can read back bindings after solving.
pub struct GoalQuery {
    pub num_vars: usize,
    pub var_names: FxHashMap<String, usize>,
    pub goals: Vec<TGoal>,
}

impl GoalQuery {
    pub fn from_parsed(goals: &[PGoal]) -> Self {
        let mut ctx = LowerCtx::default();
        let lowered = goals.iter().map(|g| lower_goal(g, &mut ctx)).collect();
        GoalQuery { num_vars: ctx.next, var_names: ctx.names, goals: lowered }
    }

    /// Allocates fresh table keys for this query's variables and returns
    /// the instantiated goal list alongside a name -> key map for reading
    /// back bindings.
    pub fn instantiate(&self, table: &mut Table) -> (Vec<InstGoal>, FxHashMap<String, LVar>) {
        let fresh: Vec<LVar> = (0..self.num_vars).map(|_| table.new_key(Binding(None))).collect();
        let goals = self.goals.iter().map(|g| inst_goal(g, &fresh)).collect();
        let keys = self.var_names.iter().map(|(name, &idx)| (name.clone(), fresh[idx])).collect();
        (goals, keys)
    }
}

fn head_key(head: &PTerm) -> (Rc<str>, usize) {
    match head {
        PTerm::Atom(name) => (Rc::from(name.as_str()), 0),
        PTerm::Compound(name, args) => (Rc::from(name.as_str()), args.len()),
        _ => panic!("clause head must be an atom or compound"),
    }
}
