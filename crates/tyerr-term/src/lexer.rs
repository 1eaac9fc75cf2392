use tyerr_common::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Atom(String),
    Var(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Pipe,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}

/// A minimal hand-rolled lexer for the term grammar: identifiers split into
/// `Atom`/`Var` by leading-character case, plus the punctuation the grammar
/// needs for compounds and lists. No strings or numbers are part of the
/// grammar.
pub struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    offset: u32,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, bytes: src.as_bytes(), offset: 0, line: 1, column: 1 }
    }

    fn pos(&self) -> Position {
        Position::new(self.offset, self.line, self.column)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.offset as usize).copied()
    }

    fn advance(&mut self) -> Option<u8> {
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
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_ident_start(b: u8) -> bool {
        b.is_ascii_alphabetic() || b == b'_'
    }

    fn is_ident_continue(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_'
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, (String, Position)> {
        self.skip_trivia();
        let start = self.pos();
        let Some(b) = self.peek() else {
            return Ok(None);
        };
        match b {
            b'(' => {
                self.advance();
                Ok(Some(Token { kind: TokenKind::LParen, pos: start }))
            }
            b')' => {
                self.advance();
                Ok(Some(Token { kind: TokenKind::RParen, pos: start }))
            }
            b'[' => {
                self.advance();
                Ok(Some(Token { kind: TokenKind::LBracket, pos: start }))
            }
            b']' => {
                self.advance();
                Ok(Some(Token { kind: TokenKind::RBracket, pos: start }))
            }
            b',' => {
                self.advance();
                Ok(Some(Token { kind: TokenKind::Comma, pos: start }))
            }
            b'|' => {
                self.advance();
                Ok(Some(Token { kind: TokenKind::Pipe, pos: start }))
            }
            b if Self::is_ident_start(b) => {
                let start_off = self.offset as usize;
                while let Some(b) = self.peek() {
                    if Self::is_ident_continue(b) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                let text = &self.src[start_off..self.offset as usize];
                let is_var = text.as_bytes()[0] == b'_' || text.as_bytes()[0].is_ascii_uppercase();
                let kind = if is_var {
                    TokenKind::Var(text.to_string())
                } else {
                    TokenKind::Atom(text.to_string())
                };
                Ok(Some(Token { kind, pos: start }))
            }
            other => Err((format!("unexpected character '{}'", other as char), start)),
        }
    }
}
