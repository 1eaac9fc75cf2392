use std::fmt;

/// A logic-programming term: the shared representation between the parser,
/// the logic adapter's clause bodies, and the pretty-printer's input.
///
/// Atoms starting with a lowercase letter are constants; compounds are
/// atoms applied to an argument list. Variables start with an uppercase
/// letter or `_`. Special functors (`pair/2`, `has/2`, `with/2`, and the
/// reserved atoms `list`/`function`) carry no distinct representation here
/// — they are ordinary `Compound`/`Atom` values; only the pretty-printer
/// (component G) interprets their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Atom(String),
    Var(String),
    Compound(String, Vec<Term>),
    /// A list literal. `tail` is `Some` when the source carried a `| Var`
    /// tail; it is accepted by the parser but carries no semantics to the
    /// core beyond round-tripping through `Display`.
    List(Vec<Term>, Option<Box<Term>>),
}

impl Term {
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    pub fn compound(functor: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Compound(functor.into(), args)
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    /// The functor name and arity, for compounds and zero-arity atoms.
    pub fn functor(&self) -> Option<(&str, usize)> {
        match self {
            Term::Atom(name) => Some((name, 0)),
            Term::Compound(name, args) => Some((name, args.len())),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => write!(f, "{name}"),
            Term::Var(name) => write!(f, "{name}"),
            Term::Compound(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Term::List(items, tail) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                if let Some(tail) = tail {
                    write!(f, "|{tail}")?;
                }
                write!(f, "]")
            }
        }
    }
}
