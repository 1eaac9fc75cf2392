use tyerr_common::Position;

use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::term::Term;

/// Parses a single term from `src`. Grammar:
///
/// ```text
/// term     := atom ("(" arglist ")")? | var | list
/// arglist  := term ("," term)*
/// list     := "[" "]" | "[" arglist ("|" var)? "]"
/// ```
pub fn parse_term(src: &str) -> Result<Term, ParseError> {
    let mut parser = Parser::new(src)?;
    let term = parser.parse_term()?;
    parser.expect_eof()?;
    Ok(term)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<Token>,
    eof_pos: Position,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(src);
        let lookahead = Self::advance_lexer(&mut lexer)?;
        Ok(Self { lexer, lookahead, eof_pos: Position::new(src.len() as u32, 1, 1) })
    }

    fn advance_lexer(lexer: &mut Lexer<'a>) -> Result<Option<Token>, ParseError> {
        lexer
            .next_token()
            .map_err(|(message, pos)| ParseError { message, pos })
    }

    fn bump(&mut self) -> Result<Token, ParseError> {
        let current = self.lookahead.take().ok_or_else(|| ParseError {
            message: "unexpected end of input".to_string(),
            pos: self.eof_pos,
        })?;
        self.lookahead = Self::advance_lexer(&mut self.lexer)?;
        Ok(current)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        let tok = self.bump()?;
        if &tok.kind == kind {
            Ok(tok)
        } else {
            Err(ParseError { message: format!("expected {kind:?}, found {:?}", tok.kind), pos: tok.pos })
        }
    }

    fn expect_eof(&mut self) -> Result<(), ParseError> {
        match &self.lookahead {
            None => Ok(()),
            Some(tok) => Err(ParseError {
                message: format!("unexpected trailing token {:?}", tok.kind),
                pos: tok.pos,
            }),
        }
    }

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        let tok = self.bump()?;
        match tok.kind {
            TokenKind::Atom(name) => {
                if matches!(&self.lookahead, Some(Token { kind: TokenKind::LParen, .. })) {
                    self.bump()?;
                    let args = self.parse_arglist(&TokenKind::RParen)?;
                    self.expect(&TokenKind::RParen)?;
                    Ok(Term::Compound(name, args))
                } else {
                    Ok(Term::Atom(name))
                }
            }
            TokenKind::Var(name) => Ok(Term::Var(name)),
            TokenKind::LBracket => self.parse_list(),
            other => Err(ParseError { message: format!("unexpected token {other:?}"), pos: tok.pos }),
        }
    }

    fn parse_arglist(&mut self, terminator: &TokenKind) -> Result<Vec<Term>, ParseError> {
        let mut args = Vec::new();
        if matches!(&self.lookahead, Some(t) if &t.kind == terminator) {
            return Ok(args);
        }
        args.push(self.parse_term()?);
        while matches!(&self.lookahead, Some(Token { kind: TokenKind::Comma, .. })) {
            self.bump()?;
            args.push(self.parse_term()?);
        }
        Ok(args)
    }

    fn parse_list(&mut self) -> Result<Term, ParseError> {
        if matches!(&self.lookahead, Some(Token { kind: TokenKind::RBracket, .. })) {
            self.bump()?;
            return Ok(Term::List(Vec::new(), None));
        }
        let items = self.parse_arglist(&TokenKind::RBracket)?;
        let tail = if matches!(&self.lookahead, Some(Token { kind: TokenKind::Pipe, .. })) {
            self.bump()?;
            let tail_tok = self.bump()?;
            match tail_tok.kind {
                TokenKind::Var(name) => Some(Box::new(Term::Var(name))),
                other => {
                    return Err(ParseError {
                        message: format!("expected variable after '|', found {other:?}"),
                        pos: tail_tok.pos,
                    })
                }
            }
        } else {
            None
        };
        self.expect(&TokenKind::RBracket)?;
        Ok(Term::List(items, tail))
    }
}
