use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use tyerr_common::error::FatalError;

use crate::adapter::LogicAdapter;
use crate::clause_parser::{self, ClauseParseError};
use crate::database::{Database, GoalQuery};
use crate::runtime::{reify, Table};
use crate::solve;

/// The fixed predicates every fresh database needs regardless of which
/// program is consulted: occurs-checked unification, list membership, the
/// class-obligation walker, and the one builtin rule with a fixed type
/// signature (`builtin_cons/6`). `apply1/2` is the one native builtin this
/// preamble relies on: it dispatches to a predicate named by an atom
/// value, standing in for Prolog's `call/N` over a dynamically-named goal
/// (needed because a class name is only known as a runtime atom, never a
/// literal functor, at the `test_class/1` call site). The trailing
/// `test_class(_).` is a wildcard fallback matching the grounding
/// template's own final clause, so a `Classes` shape none of the other
/// four clauses recognize still succeeds trivially instead of failing the
/// whole `once(...)` conjunction it's conjoined into.
const PREAMBLE: &str = "
eq(X,Y) :- unify_with_occurs_check(X,Y).
member1(X,[X|_]) :- !.
member1(X,[_|T]) :- member1(X,T).
test_class(true) :- !.
test_class([]) :- !.
test_class([H|T]) :- !, test_class(H), test_class(T).
test_class(with(Class,Instance)) :- !, apply1(Class,Instance).
test_class(_).
builtin_cons(T,_Calls,_Gamma,_Zeta,_Theta,_Classes) :- T=pair(function(A),pair(function(D),D)), D=pair(list,A).
";

/// The in-tree `LogicAdapter` backend: a clause database plus a
/// unification table, both rebuilt from scratch on every `consult`.
pub struct Interpreter {
    db: Database,
    table: Table,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self { db: Database::new(), table: Table::new() }
    }

    fn load(&mut self, program: &str) -> Result<(), FatalError> {
        let clauses = clause_parser::parse_program(program).map_err(render_parse_error)?;
        for clause in &clauses {
            self.db.assertz_parsed(clause);
        }
        Ok(())
    }
}

fn render_parse_error(err: ClauseParseError) -> FatalError {
    FatalError::LogicAdapter(format!("{} at {}:{}", err.message, err.pos.line, err.pos.column))
}

impl LogicAdapter for Interpreter {
    fn consult(&mut self, program: &str) -> Result<(), FatalError> {
        debug!(bytes = program.len(), "consulting program");
        self.db.clear();
        self.table = Table::new();
        self.load(PREAMBLE)?;
        self.load(program)
    }

    fn query(&mut self, goal: &str) -> Result<bool, FatalError> {
        let parsed = parse_goal(goal)?;
        let query = GoalQuery::from_parsed(&parsed);
        let (goals, _keys) = query.instantiate(&mut self.table);
        let snap = self.table.snapshot();
        let found = solve::solve(&goals, &self.db, &mut self.table, &mut |_t| true);
        self.table.rollback_to(snap);
        trace!(goal, found, "query");
        Ok(found)
    }

    fn query_one(&mut self, goal: &str) -> Result<Option<FxHashMap<String, String>>, FatalError> {
        let parsed = parse_goal(goal)?;
        let query = GoalQuery::from_parsed(&parsed);
        let (goals, keys) = query.instantiate(&mut self.table);
        let snap = self.table.snapshot();
        let mut bindings = None;
        let found = solve::solve(&goals, &self.db, &mut self.table, &mut |table| {
            let mut map = FxHashMap::default();
            for (name, key) in &keys {
                let term = reify(&crate::runtime::RTerm::Var(*key), table);
                map.insert(name.clone(), term.to_string());
            }
            bindings = Some(map);
            true
        });
        if found {
            self.table.commit(snap);
        } else {
            self.table.rollback_to(snap);
        }
        trace!(goal, found, "query_one");
        Ok(bindings)
    }

    fn assertz(&mut self, clause: &str) -> Result<(), FatalError> {
        let parsed = clause_parser::parse_clause(clause).map_err(render_parse_error)?;
        self.db.assertz_parsed(&parsed);
        Ok(())
    }

    fn abolish(&mut self, name: &str, arity: usize) -> Result<(), FatalError> {
        self.db.abolish(name, arity);
        Ok(())
    }
}

fn parse_goal(goal: &str) -> Result<Vec<crate::clause_parser::PGoal>, FatalError> {
    clause_parser::parse_goal_text(goal).map_err(render_parse_error)
}
