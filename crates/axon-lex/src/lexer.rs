//! Turns Axon source text into a stream of [`Token`]s (spec §4.1).
//!
//! Single left-to-right pass over a [`Cursor`]. Keywords are matched
//! before the generic identifier pattern, and two-character operators
//! (`==`, `!=`, `<=`, `>=`) are matched before their one-character
//! prefixes, per spec.

use axon_util::Span;
use tracing::trace;

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{keyword, Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Lex the entire source into a token stream terminated by `Eof`.
    pub fn tokenize(source: &'a str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn span(&self) -> Span {
        Span::new(self.cursor.line(), self.cursor.column())
    }

    /// Produce the next token, skipping whitespace and comments first.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        let start = self.span();
        let ch = self.cursor.current();

        if ch == '\0' {
            return Ok(Token::new(TokenKind::Eof, "", start));
        }

        if ch.is_ascii_digit() {
            return Ok(self.lex_number(start));
        }
        if ch == '"' {
            return self.lex_string(start);
        }
        if is_ident_start(ch) {
            return Ok(self.lex_ident_or_keyword(start));
        }

        self.lex_operator_or_delimiter(start)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.current() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance();
                }
                '/' if self.cursor.peek(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current() != '\n' {
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_number(&mut self, start: Span) -> Token {
        let mut lexeme = String::new();
        while self.cursor.current().is_ascii_digit() {
            lexeme.push(self.cursor.advance());
        }
        if self.cursor.current() == '.' && self.cursor.peek(1).is_ascii_digit() {
            lexeme.push(self.cursor.advance()); // '.'
            while self.cursor.current().is_ascii_digit() {
                lexeme.push(self.cursor.advance());
            }
        }
        trace!(%lexeme, "lexed number");
        Token::new(TokenKind::Number, lexeme, start)
    }

    fn lex_string(&mut self, start: Span) -> Result<Token, LexError> {
        self.cursor.advance(); // opening quote
        let mut decoded = String::new();
        loop {
            match self.cursor.current() {
                '\0' | '\n' => return Err(LexError::UnterminatedString { span: start }),
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    let escaped = match self.cursor.current() {
                        'n' => '\n',
                        't' => '\t',
                        '\\' => '\\',
                        '"' => '"',
                        other => other,
                    };
                    self.cursor.advance();
                    decoded.push(escaped);
                }
                other => {
                    self.cursor.advance();
                    decoded.push(other);
                }
            }
        }
        Ok(Token::new(TokenKind::Str, decoded, start))
    }

    fn lex_ident_or_keyword(&mut self, start: Span) -> Token {
        let mut lexeme = String::new();
        while is_ident_continue(self.cursor.current()) {
            lexeme.push(self.cursor.advance());
        }
        let kind = keyword(&lexeme).unwrap_or(TokenKind::Ident);
        Token::new(kind, lexeme, start)
    }

    fn lex_operator_or_delimiter(&mut self, start: Span) -> Result<Token, LexError> {
        let ch = self.cursor.advance();
        let kind = match ch {
            '=' if self.cursor.bump_if('=') => TokenKind::EqEq,
            '!' if self.cursor.bump_if('=') => TokenKind::Neq,
            '<' if self.cursor.bump_if('=') => TokenKind::Le,
            '>' if self.cursor.bump_if('=') => TokenKind::Ge,
            '=' => TokenKind::Eq,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            other => return Err(LexError::UnrecognizedChar { ch: other, span: start }),
        };
        let lexeme: String = std::iter::once(ch).collect();
        Ok(Token::new(kind, lexeme, start))
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
