//! Logic-programming term representation and parser:
//!
//! - [`term::Term`] — the Atom/Var/Compound/List representation shared by
//!   the logic adapter's clause bodies and the pretty-printer.
//! - [`parser::parse_term`] — a grammar-driven parser over the term's
//!   textual form.
//! - [`error::ParseError`] — syntax errors carrying a source position.

mod error;
mod lexer;
mod parser;
mod term;

pub use error::ParseError;
pub use parser::parse_term;
pub use term::Term;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_atom() {
        assert_eq!(parse_term("foo").unwrap(), Term::atom("foo"));
    }

    #[test]
    fn parses_var() {
        assert_eq!(parse_term("X").unwrap(), Term::var("X"));
        assert_eq!(parse_term("_tmp").unwrap(), Term::var("_tmp"));
    }

    #[test]
    fn parses_compound() {
        let t = parse_term("pair(function,X)").unwrap();
        assert_eq!(t, Term::compound("pair", vec![Term::atom("function"), Term::var("X")]));
    }

    #[test]
    fn parses_nested_compound() {
        let t = parse_term("has([num,ord],T)").unwrap();
        assert_eq!(
            t,
            Term::compound(
                "has",
                vec![
                    Term::List(vec![Term::atom("num"), Term::atom("ord")], None),
                    Term::var("T"),
                ]
            )
        );
    }

    #[test]
    fn parses_list_with_tail() {
        let t = parse_term("[X,Y|Rest]").unwrap();
        assert_eq!(
            t,
            Term::List(vec![Term::var("X"), Term::var("Y")], Some(Box::new(Term::var("Rest"))))
        );
    }

    #[test]
    fn empty_list() {
        assert_eq!(parse_term("[]").unwrap(), Term::List(Vec::new(), None));
    }

    #[test]
    fn display_round_trips_compound() {
        let t = Term::compound("pair", vec![Term::atom("a"), Term::var("B")]);
        assert_eq!(t.to_string(), "pair(a,B)");
    }

    #[test]
    fn reports_position_on_syntax_error() {
        let err = parse_term("pair(a, @)").unwrap_err();
        assert_eq!(err.pos.line, 1);
        assert_eq!(err.pos.column, 9);
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse_term("foo bar").is_err());
    }
}
