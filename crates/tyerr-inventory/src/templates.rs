//! Clause rendering: five fixed shapes, built as typed string builders
//! rather than a textual template engine (the one this was grounded on
//! drives `text/template` off runtime-constructed contexts; a handful of
//! fixed shapes over a small, known context don't need that machinery).
//!
//! The preamble itself is *not* rendered here: `tyerr_logic::interp`'s
//! `consult` seeds it into every fresh database, so the inventory only
//! ever renders typing rules, class rules, and the two entry predicates.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;

use crate::model::TypeVarConstraint;

fn join_int(items: &[u32], prefix: &str, sep: &str) -> String {
    items.iter().map(|n| format!("{prefix}{n}")).collect::<Vec<_>>().join(sep)
}

fn join_str(items: &[String], prefix: &str, sep: &str) -> String {
    items.iter().map(|s| format!("{prefix}{s}")).collect::<Vec<_>>().join(sep)
}

fn render_has_list(vars: &[TypeVarConstraint]) -> String {
    vars.iter()
        .map(|v| format!("has([{}], {})", join_str(&v.classes, "", ", "), v.var_name))
        .collect::<Vec<_>>()
        .join(",")
}

/// `N(_, Calls, _, _, _, _) :- member1(N, Calls), !.` — breaks recursion in
/// monomorphic recursion handling.
pub fn render_fun1(name: &str) -> String {
    format!("{name}(_, Calls, _, _, _, _) :- member1({name}, Calls), !.\n")
}

/// The recursive-case typing predicate for declaration `name`. `captures`
/// are the ids of rules captured for the final `main/2` report (rendered
/// into `Gamma`); `arguments` are the declaration's own argument names
/// (rendered into `Zeta`); `rule_bodies` are the effective-or-axiomatic
/// rule bodies contributing to this declaration, already-rendered goal
/// text supplied by the rules themselves. `Theta` is left an unbound
/// out-parameter: it carries no constraint of its own in the grounding
/// source, only `Gamma`/`Zeta`/`Classes` are actually threaded through.
pub fn render_fun2(name: &str, captures: &[u32], arguments: &[String], rule_bodies: &[String]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{name}(T, Calls, Gamma, Zeta, Theta, Classes) :-\n    Calls_ = [{name} | Calls],\n");
    if !captures.is_empty() {
        let _ = write!(out, "    Gamma = [{}],\n", join_int(captures, "_", ","));
    }
    if !arguments.is_empty() {
        let _ = write!(out, "    Zeta = [{} | _],\n", join_str(arguments, "_", ","));
    }
    for body in rule_bodies {
        let _ = write!(out, "    {body},\n");
    }
    out.push_str("    true.\n");
    out
}

/// `C(T) :- T = has(Class,_), !, member1(C, Class), member1(super_i, Class),
/// …, true.`
pub fn render_class_rule(name: &str, superclasses: &[String]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{name}(T) :-\n    T = has(Class, _), !,\n    member1({name}, Class),\n");
    for sup in superclasses {
        let _ = write!(out, "    member1({sup}, Class),\n");
    }
    out.push_str("    true.\n");
    out
}

/// `C(T) :- nonvar(T), body…, super_i(T), …, true.`
pub fn render_instance_rule(name: &str, superclasses: &[String], bodies: &[String]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{name}(T) :-\n    nonvar(T),\n");
    for body in bodies {
        let _ = write!(out, "    {body},\n");
    }
    for sup in superclasses {
        let _ = write!(out, "    {sup}(T),\n");
    }
    out.push_str("    true.\n");
    out
}

/// `type_check :- once((N1(_,[],_,_,[has(classes,ν) … ], C_N1), …)),
/// test_class(C_N1), …, true.`
pub fn render_type_check(
    declarations: &[String],
    var_classes: &FxHashMap<String, Vec<TypeVarConstraint>>,
) -> String {
    let calls: Vec<String> = declarations
        .iter()
        .map(|decl| {
            let vars = var_classes.get(decl).map(Vec::as_slice).unwrap_or(&[]);
            format!("{decl}(_, [], _, _, [{}], C_{decl})", render_has_list(vars))
        })
        .collect();
    let mut out = String::from("type_check :-\n");
    let _ = write!(out, "    once({}),\n", and_chain(&calls));
    for decl in declarations {
        let _ = write!(out, "    test_class(C_{decl}),\n");
    }
    out.push_str("    true.\n");
    out
}

/// Builds the `and(G1, and(G2, … true))` chain `once/1` expects: this
/// grammar does not parse a parenthesized comma as a term, only as a
/// goal-list separator, so a conjunction passed *into* a single-argument
/// builtin has to be spelled out as nested `and/2` compounds instead of
/// Prolog's `once((G1, G2))`.
fn and_chain(goals: &[String]) -> String {
    let mut chain = String::from("true");
    for goal in goals.iter().rev() {
        chain = format!("and({goal}, {chain})");
    }
    chain
}

/// `main(G, L) :- N1(_N1,[],[captured_ids…], _, [class obligations…],
/// C_N1), …, test_class(C_Ni), …, L = [captured_ids…], G = [_N1,…].`
pub fn render_main(
    declarations: &[String],
    capture_by_decl: &FxHashMap<String, Vec<u32>>,
    var_classes: &FxHashMap<String, Vec<TypeVarConstraint>>,
    all_captures: &[u32],
) -> String {
    let mut out = String::from("main(G, L) :-\n");
    for decl in declarations {
        let captures = capture_by_decl.get(decl).map(Vec::as_slice).unwrap_or(&[]);
        let vars = var_classes.get(decl).map(Vec::as_slice).unwrap_or(&[]);
        let _ = write!(
            out,
            "    {decl}(_{decl}, [], [{}], _, [{}], C_{decl}),\n",
            join_int(captures, "_", ","),
            render_has_list(vars),
        );
    }
    for decl in declarations {
        let _ = write!(out, "    test_class(C_{decl}),\n");
    }
    let _ = write!(out, "    L = [{}],\n", join_int(all_captures, "_", ","));
    let _ = write!(out, "    G = [{}].\n", join_str(declarations, "_", ","));
    out
}
