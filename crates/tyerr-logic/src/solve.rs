//! SLD resolution with chronological backtracking and a local cut,
//! scoped tightly to the fixed clause templates the constraint inventory
//! renders (no `findall`, arithmetic, or I/O — see the crate root docs).

use crate::database::{Database, InstGoal};
use crate::runtime::{unify, walk, RTerm, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// The caller's solution callback accepted; unwind without trying any
    /// further alternative.
    Stop,
    /// Every alternative was tried and none satisfied the callback.
    Exhausted,
    /// A `!` fired somewhere in the goals just solved; the nearest
    /// enclosing predicate call must not try further clauses, but its own
    /// caller continues its search normally (as `Exhausted`).
    Cut,
}

/// Runs `goals` to exhaustion, calling `sol` on every solution found (i.e.
/// every point at which the goal list is empty). `sol` returns `true` to
/// accept and stop searching, `false` to request the next solution.
pub fn solve(goals: &[InstGoal], db: &Database, table: &mut Table, sol: &mut dyn FnMut(&mut Table) -> bool) -> bool {
    matches!(solve_goals(goals, db, table, sol), Outcome::Stop)
}

fn solve_goals(goals: &[InstGoal], db: &Database, table: &mut Table, sol: &mut dyn FnMut(&mut Table) -> bool) -> Outcome {
    match goals.split_first() {
        None => {
            if sol(table) {
                Outcome::Stop
            } else {
                Outcome::Exhausted
            }
        }
        Some((first, rest)) => solve_one(first, rest, db, table, sol),
    }
}

fn solve_one(
    goal: &InstGoal,
    rest: &[InstGoal],
    db: &Database,
    table: &mut Table,
    sol: &mut dyn FnMut(&mut Table) -> bool,
) -> Outcome {
    match goal {
        InstGoal::Cut => match solve_goals(rest, db, table, sol) {
            Outcome::Stop => Outcome::Stop,
            Outcome::Exhausted | Outcome::Cut => Outcome::Cut,
        },
        InstGoal::Eq(a, b) => {
            let snap = table.snapshot();
            if unify(a, b, table) {
                match solve_goals(rest, db, table, sol) {
                    Outcome::Stop => {
                        table.commit(snap);
                        Outcome::Stop
                    }
                    other => {
                        table.rollback_to(snap);
                        other
                    }
                }
            } else {
                table.rollback_to(snap);
                Outcome::Exhausted
            }
        }
        InstGoal::Call(term) => solve_call(term, rest, db, table, sol),
    }
}

fn solve_call(
    goal: &RTerm,
    rest: &[InstGoal],
    db: &Database,
    table: &mut Table,
    sol: &mut dyn FnMut(&mut Table) -> bool,
) -> Outcome {
    let (name, args) = match goal {
        RTerm::Atom(name) => (name.as_ref(), &[][..]),
        RTerm::Compound(name, args) => (name.as_ref(), args.as_slice()),
        _ => return Outcome::Exhausted,
    };

    if let Some(outcome) = solve_builtin(name, args, goal, rest, db, table, sol) {
        return outcome;
    }

    let clauses = db.lookup(name, args.len()).to_vec();
    for clause in clauses {
        let snap = table.snapshot();
        let (head, body) = clause.instantiate(table);
        if unify(goal, &head, table) {
            let mut combined = body;
            combined.extend(rest.iter().cloned());
            match solve_goals(&combined, db, table, sol) {
                Outcome::Stop => {
                    table.commit(snap);
                    return Outcome::Stop;
                }
                Outcome::Cut => {
                    // Cut prunes remaining clauses for *this* call only;
                    // the caller's own search continues normally.
                    table.rollback_to(snap);
                    return Outcome::Exhausted;
                }
                Outcome::Exhausted => {
                    table.rollback_to(snap);
                }
            }
        } else {
            table.rollback_to(snap);
        }
    }
    Outcome::Exhausted
}

fn solve_builtin(
    name: &str,
    args: &[RTerm],
    goal: &RTerm,
    rest: &[InstGoal],
    db: &Database,
    table: &mut Table,
    sol: &mut dyn FnMut(&mut Table) -> bool,
) -> Option<Outcome> {
    match (name, args.len()) {
        ("true", 0) => Some(solve_goals(rest, db, table, sol)),
        ("fail", 0) | ("false", 0) => Some(Outcome::Exhausted),
        ("unify_with_occurs_check", 2) => {
            let snap = table.snapshot();
            if unify(&args[0], &args[1], table) {
                match solve_goals(rest, db, table, sol) {
                    Outcome::Stop => {
                        table.commit(snap);
                        Some(Outcome::Stop)
                    }
                    other => {
                        table.rollback_to(snap);
                        Some(other)
                    }
                }
            } else {
                table.rollback_to(snap);
                Some(Outcome::Exhausted)
            }
        }
        ("nonvar", 1) => {
            if matches!(walk(&args[0], table), RTerm::Var(_)) {
                Some(Outcome::Exhausted)
            } else {
                Some(solve_goals(rest, db, table, sol))
            }
        }
        ("once", 1) => Some(solve_once(&args[0], rest, db, table, sol)),
        ("apply1", 2) => {
            // Dispatches to the predicate named by the now-bound atom
            // `args[0]`, applied to `args[1]` — a stand-in for Prolog's
            // `call/2` over a dynamically-named goal, needed because a
            // class name reaches `test_class/1` only as a runtime atom.
            match walk(&args[0], table) {
                RTerm::Atom(name) => {
                    let dispatched = RTerm::Compound(name, vec![args[1].clone()]);
                    Some(solve_call(&dispatched, rest, db, table, sol))
                }
                _ => Some(Outcome::Exhausted),
            }
        }
        _ => {
            let _ = goal;
            None
        }
    }
}

/// `once(G)`: find the first solution of `G` (a conjunction encoded as a
/// right-leaning `and/2` chain, terminated by `true`), commit to it, and
/// continue with `rest`. Cut inside `G` is opaque to the caller: it prunes
/// only `G`'s own alternatives, never the caller's.
fn solve_once(
    arg: &RTerm,
    rest: &[InstGoal],
    db: &Database,
    table: &mut Table,
    sol: &mut dyn FnMut(&mut Table) -> bool,
) -> Outcome {
    let inner = flatten_and_chain(arg);
    let snap = table.snapshot();
    let found_once = matches!(solve_goals(&inner, db, table, &mut |_t| true), Outcome::Stop);
    if !found_once {
        table.rollback_to(snap);
        return Outcome::Exhausted;
    }
    match solve_goals(rest, db, table, sol) {
        Outcome::Stop => {
            table.commit(snap);
            Outcome::Stop
        }
        Outcome::Cut => Outcome::Cut,
        Outcome::Exhausted => {
            table.rollback_to(snap);
            Outcome::Exhausted
        }
    }
}

fn flatten_and_chain(term: &RTerm) -> Vec<InstGoal> {
    match term {
        RTerm::Atom(a) if a.as_ref() == "true" => Vec::new(),
        RTerm::Compound(f, args) if f.as_ref() == "and" && args.len() == 2 => {
            let mut goals = flatten_and_chain(&args[0]);
            goals.extend(flatten_and_chain(&args[1]));
            goals
        }
        other => vec![InstGoal::Call(other.clone())],
    }
}
