//! Term -> surface-syntax decoding: `has/2` class bookkeeping, the
//! `pair/2` spine decoder, and the print tree the naming pass later
//! resolves `Var` leaves against.

use tyerr_common::error::FatalError;
use tyerr_term::Term;

use crate::vartable::VarTable;

/// A type, decoded from a logic term but with variable leaves left as keys
/// into the shared `VarTable` — rendered only once every job has been
/// prepared and names have been assigned.
#[derive(Debug, Clone)]
pub enum Surface {
    Var(String),
    Atom(String),
    List(Box<Surface>),
    Tuple(Vec<Surface>),
    Function(Vec<Surface>),
    App(Vec<Surface>),
}

fn unrecognized(term: &Term) -> FatalError {
    FatalError::UnrecognizedTermShape(term.to_string())
}

/// Strips a lexical module prefix (`module_Name` -> `Name`) the way the
/// grounding printer does: split on every `_` and keep the last segment.
/// `builtin_Top` is a dedicated special case printing as the unit type.
pub fn print_atom_text(name: &str) -> String {
    if name == "builtin_Top" {
        return "()".to_string();
    }
    match name.rsplit_once('_') {
        Some((_, suffix)) if !suffix.is_empty() => suffix.to_string(),
        _ => name.to_string(),
    }
}

/// One level of left-leaning `pair/2` spine decoding: `pair(pair(F,A1),A2)`
/// resolves to `(F, [A1, A2])`. Used for generic application (`adt`) heads
/// and to detect the `function`/`tuple`/`list` markers, which thereafter
/// switch to their own (right-associative) recursion.
fn decode_spine(term: &Term) -> (Term, Vec<Term>) {
    if let Term::Compound(functor, args) = term {
        if functor == "pair" && args.len() == 2 {
            let (head, mut spine) = decode_spine(&args[0]);
            spine.push(args[1].clone());
            return (head, spine);
        }
    }
    (term.clone(), Vec::new())
}

fn extract_class_names(term: &Term) -> Result<Vec<String>, FatalError> {
    match term {
        Term::List(items, _) => items
            .iter()
            .map(|item| match item {
                Term::Atom(name) => Ok(print_atom_text(name)),
                other => Err(unrecognized(other)),
            })
            .collect(),
        other => Err(unrecognized(other)),
    }
}

pub fn decode(term: &Term, job: usize, table: &mut VarTable) -> Result<Surface, FatalError> {
    match term {
        Term::Var(name) => {
            table.register_var(name, false, None, job);
            Ok(Surface::Var(name.clone()))
        }
        Term::Atom(name) => Ok(Surface::Atom(print_atom_text(name))),
        Term::Compound(functor, args) if functor == "has" && args.len() == 2 => {
            let classes = extract_class_names(&args[0])?;
            let key = match &args[1] {
                Term::Var(name) => {
                    table.register_var(name, false, None, job);
                    name.clone()
                }
                Term::Atom(name) => {
                    let preferred = name.split("__").next().map(str::to_string);
                    table.register_var(name, true, preferred, job);
                    name.clone()
                }
                other => return Err(unrecognized(other)),
            };
            for class in classes {
                table.add_class(&key, class);
            }
            Ok(Surface::Var(key))
        }
        Term::Compound(functor, args) if functor == "pair" && args.len() == 2 => {
            let (head, spine) = decode_spine(term);
            match &head {
                Term::Atom(name) if name == "list" && spine.len() == 1 => {
                    Ok(Surface::List(Box::new(decode(&spine[0], job, table)?)))
                }
                Term::Atom(name) if name == "function" && spine.len() == 2 => {
                    Ok(Surface::Function(flatten_chain("function", &spine[0], &spine[1], job, table)?))
                }
                Term::Atom(name) if name == "tuple" && spine.len() == 2 => {
                    Ok(Surface::Tuple(flatten_chain("tuple", &spine[0], &spine[1], job, table)?))
                }
                _ => {
                    let mut parts = Vec::with_capacity(spine.len() + 1);
                    parts.push(decode(&head, job, table)?);
                    for arg in &spine {
                        parts.push(decode(arg, job, table)?);
                    }
                    Ok(Surface::App(parts))
                }
            }
        }
        other => Err(unrecognized(other)),
    }
}

/// Right-associative chain flattening shared by `function`/`tuple`: the
/// first element is taken as-is, the second is flattened further only if
/// it is itself headed by the same marker atom.
fn flatten_chain(marker: &str, first: &Term, rest: &Term, job: usize, table: &mut VarTable) -> Result<Vec<Surface>, FatalError> {
    let mut parts = vec![decode(first, job, table)?];
    let (rest_head, rest_spine) = decode_spine(rest);
    if let Term::Atom(name) = &rest_head {
        if name == marker && rest_spine.len() == 2 {
            parts.extend(flatten_chain(marker, &rest_spine[0], &rest_spine[1], job, table)?);
            return Ok(parts);
        }
    }
    parts.push(decode(rest, job, table)?);
    Ok(parts)
}

/// Renders a decoded `Surface` to its final text, resolving `Var` leaves
/// against assigned friendly names (panics if a name wasn't assigned —
/// callers must run `Printer::assign_names` before rendering).
pub fn render(surface: &Surface, resolve: &dyn Fn(&str) -> String) -> String {
    match surface {
        Surface::Var(key) => resolve(key),
        Surface::Atom(text) => text.clone(),
        Surface::List(inner) => format!("[{}]", render(inner, resolve)),
        Surface::Tuple(parts) => {
            format!("({})", parts.iter().map(|p| render(p, resolve)).collect::<Vec<_>>().join(","))
        }
        Surface::Function(parts) => parts
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let text = render(p, resolve);
                if i != parts.len() - 1 && matches!(p, Surface::Function(_)) {
                    format!("({text})")
                } else {
                    text
                }
            })
            .collect::<Vec<_>>()
            .join("->"),
        Surface::App(parts) => parts
            .iter()
            .map(|p| {
                let text = render(p, resolve);
                if matches!(p, Surface::App(_)) {
                    format!("({text})")
                } else {
                    text
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}
