//! Parser for the textual program format the in-tree backend consults:
//! Prolog-shaped clauses (`head :- goal, goal, ... .` or bare facts
//! `head.`), conjunctions, a cut (`!`), and infix `=` for unification
//! goals. This is a strict superset of the pure-term grammar
//! `tyerr_term::parse_term` accepts (which only re-parses *bindings*, not
//! whole programs), so it is its own small recursive-descent parser rather
//! than an extension of component A's.

use tyerr_common::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PTerm {
    Atom(String),
    Var(String),
    Compound(String, Vec<PTerm>),
    List(Vec<PTerm>, Option<Box<PTerm>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PGoal {
    Cut,
    Eq(PTerm, PTerm),
    Call(PTerm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PClause {
    pub head: PTerm,
    pub body: Vec<PGoal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseParseError {
    pub message: String,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Atom(String),
    Var(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Pipe,
    Bang,
    Eq,
    Rule,   // :-
    Dot,
}

struct Lexer<'a> {
    bytes: &'a [u8],
    src: &'a str,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { bytes: src.as_bytes(), src, offset: 0, line: 1, column: 1 }
    }

    fn pos(&self) -> Position {
        Position::new(self.offset as u32, self.line, self.column)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.bytes.get(self.offset + 1).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.offset += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'%') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn next(&mut self) -> Result<Option<(Tok, Position)>, ClauseParseError> {
        self.skip_trivia();
        let pos = self.pos();
        let Some(b) = self.peek() else { return Ok(None) };
        let tok = match b {
            b'(' => {
                self.bump();
                Tok::LParen
            }
            b')' => {
                self.bump();
                Tok::RParen
            }
            b'[' => {
                self.bump();
                Tok::LBracket
            }
            b']' => {
                self.bump();
                Tok::RBracket
            }
            b',' => {
                self.bump();
                Tok::Comma
            }
            b'|' => {
                self.bump();
                Tok::Pipe
            }
            b'!' => {
                self.bump();
                Tok::Bang
            }
            b'=' => {
                self.bump();
                Tok::Eq
            }
            b':' if self.peek2() == Some(b'-') => {
                self.bump();
                self.bump();
                Tok::Rule
            }
            b'.' => {
                self.bump();
                Tok::Dot
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let start = self.offset;
                while let Some(b) = self.peek() {
                    if b.is_ascii_alphanumeric() || b == b'_' {
                        self.bump();
                    } else {
                        break;
                    }
                }
                let text = &self.src[start..self.offset];
                if text.as_bytes()[0] == b'_' || text.as_bytes()[0].is_ascii_uppercase() {
                    Tok::Var(text.to_string())
                } else {
                    Tok::Atom(text.to_string())
                }
            }
            other => {
                return Err(ClauseParseError {
                    message: format!("unexpected character '{}'", other as char),
                    pos,
                })
            }
        };
        Ok(Some((tok, pos)))
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<(Tok, Position)>,
    eof: Position,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Self, ClauseParseError> {
        let mut lexer = Lexer::new(src);
        let lookahead = lexer.next()?;
        let eof = Position::new(src.len() as u32, lexer.line, lexer.column);
        Ok(Self { lexer, lookahead, eof })
    }

    fn bump(&mut self) -> Result<(Tok, Position), ClauseParseError> {
        let cur = self.lookahead.take().ok_or_else(|| ClauseParseError {
            message: "unexpected end of input".into(),
            pos: self.eof,
        })?;
        self.lookahead = self.lexer.next()?;
        Ok(cur)
    }

    fn expect(&mut self, tok: &Tok) -> Result<(), ClauseParseError> {
        let (got, pos) = self.bump()?;
        if &got == tok {
            Ok(())
        } else {
            Err(ClauseParseError { message: format!("expected {tok:?}, found {got:?}"), pos })
        }
    }

    fn at(&self, tok: &Tok) -> bool {
        matches!(&self.lookahead, Some((t, _)) if t == tok)
    }

    fn parse_program(&mut self) -> Result<Vec<PClause>, ClauseParseError> {
        let mut clauses = Vec::new();
        while self.lookahead.is_some() {
            clauses.push(self.parse_clause()?);
        }
        Ok(clauses)
    }

    fn parse_clause(&mut self) -> Result<PClause, ClauseParseError> {
        let head = self.parse_pterm()?;
        let body = if self.at(&Tok::Rule) {
            self.bump()?;
            self.parse_goal_list()?
        } else {
            Vec::new()
        };
        self.expect(&Tok::Dot)?;
        Ok(PClause { head, body })
    }

    fn parse_goal_list(&mut self) -> Result<Vec<PGoal>, ClauseParseError> {
        let mut goals = vec![self.parse_goal()?];
        while self.at(&Tok::Comma) {
            self.bump()?;
            goals.push(self.parse_goal()?);
        }
        Ok(goals)
    }

    fn parse_goal(&mut self) -> Result<PGoal, ClauseParseError> {
        if self.at(&Tok::Bang) {
            self.bump()?;
            return Ok(PGoal::Cut);
        }
        let lhs = self.parse_pterm()?;
        if self.at(&Tok::Eq) {
            self.bump()?;
            let rhs = self.parse_pterm()?;
            Ok(PGoal::Eq(lhs, rhs))
        } else {
            Ok(PGoal::Call(lhs))
        }
    }

    fn parse_pterm(&mut self) -> Result<PTerm, ClauseParseError> {
        let (tok, pos) = self.bump()?;
        match tok {
            Tok::Atom(name) => {
                if self.at(&Tok::LParen) {
                    self.bump()?;
                    let args = self.parse_pterm_list(&Tok::RParen)?;
                    self.expect(&Tok::RParen)?;
                    Ok(PTerm::Compound(name, args))
                } else {
                    Ok(PTerm::Atom(name))
                }
            }
            Tok::Var(name) => Ok(PTerm::Var(name)),
            Tok::LBracket => self.parse_plist(),
            other => Err(ClauseParseError { message: format!("unexpected token {other:?}"), pos }),
        }
    }

    fn parse_pterm_list(&mut self, terminator: &Tok) -> Result<Vec<PTerm>, ClauseParseError> {
        let mut items = Vec::new();
        if self.at(terminator) {
            return Ok(items);
        }
        items.push(self.parse_pterm()?);
        while self.at(&Tok::Comma) {
            self.bump()?;
            items.push(self.parse_pterm()?);
        }
        Ok(items)
    }

    fn parse_plist(&mut self) -> Result<PTerm, ClauseParseError> {
        if self.at(&Tok::RBracket) {
            self.bump()?;
            return Ok(PTerm::List(Vec::new(), None));
        }
        let items = self.parse_pterm_list(&Tok::RBracket)?;
        let tail = if self.at(&Tok::Pipe) {
            self.bump()?;
            let (tok, pos) = self.bump()?;
            match tok {
                Tok::Var(name) => Some(Box::new(PTerm::Var(name))),
                other => {
                    return Err(ClauseParseError {
                        message: format!("expected variable after '|', found {other:?}"),
                        pos,
                    })
                }
            }
        } else {
            None
        };
        self.expect(&Tok::RBracket)?;
        Ok(PTerm::List(items, tail))
    }
}

pub fn parse_program(src: &str) -> Result<Vec<PClause>, ClauseParseError> {
    Parser::new(src)?.parse_program()
}

pub fn parse_clause(src: &str) -> Result<PClause, ClauseParseError> {
    let mut parser = Parser::new(src)?;
    parser.parse_clause()
}

/// Parses a bare goal or comma-separated goal conjunction, with an
/// optional trailing `.`, as used for `query`/`query_one`/`assertz`
/// arguments (which are not full `head :- body.` clauses).
pub fn parse_goal_text(src: &str) -> Result<Vec<PGoal>, ClauseParseError> {
    let mut parser = Parser::new(src)?;
    let goals = parser.parse_goal_list()?;
    if parser.at(&Tok::Dot) {
        parser.bump()?;
    }
    Ok(goals)
}
