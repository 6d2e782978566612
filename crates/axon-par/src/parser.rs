//! Recursive-descent parser (spec §4.2).
//!
//! One function per precedence level, following the grammar exactly:
//!
//! ```text
//! expression  := or_expr
//! or_expr     := and_expr ('or' and_expr)*
//! and_expr    := equality ('and' equality)*
//! equality    := comparison (('=='|'!=') comparison)*
//! comparison  := additive (('<'|'<='|'>'|'>=') additive)*
//! additive    := multiplicative (('+'|'-') multiplicative)*
//! multiplicative := unary (('*'|'/'|'%') unary)*
//! unary       := ('-'|'not') unary | postfix
//! postfix     := primary (callsuffix | indexsuffix)*
//! ```
//!
//! All binary operators are left-associative.

use axon_lex::{Token, TokenKind};
use axon_util::{Span, Symbol};
use tracing::trace;

use crate::ast::{BinOpKind, Expr, NumberLit, Program, Stmt, UnaryOpKind};
use crate::error::ParseError;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(mut self) -> PResult<Program> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    // ---------------- token stream helpers ----------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn span(&self) -> Span {
        self.current().span
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                format!("expected {what}, found '{}'", self.current().lexeme),
                self.span(),
            ))
        }
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ---------------- statements ----------------

    fn parse_statement(&mut self) -> PResult<Stmt> {
        trace!(pos = self.pos, kind = ?self.current().kind, "parse_statement");
        match self.current().kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::Print => self.parse_print(),
            TokenKind::Cls => self.parse_cls(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Fn => self.parse_fn(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                self.advance();
                self.expect(TokenKind::Semicolon, "';' after 'break'")?;
                Ok(Stmt::Break)
            }
            TokenKind::Continue => {
                self.advance();
                self.expect(TokenKind::Semicolon, "';' after 'continue'")?;
                Ok(Stmt::Continue)
            }
            TokenKind::Ident if self.peek_is_assignment() => self.parse_assignment(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn peek_is_assignment(&self) -> bool {
        self.pos + 1 < self.tokens.len() && self.tokens[self.pos + 1].kind == TokenKind::Eq
    }

    fn parse_let(&mut self) -> PResult<Stmt> {
        self.advance(); // 'let'
        let name_tok = self.expect(TokenKind::Ident, "identifier after 'let'")?;
        self.expect(TokenKind::Eq, "'=' in let binding")?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "';' after let binding")?;
        Ok(Stmt::Let(Symbol::intern(&name_tok.lexeme), expr))
    }

    fn parse_assignment(&mut self) -> PResult<Stmt> {
        let name_tok = self.advance(); // ident
        self.expect(TokenKind::Eq, "'=' in assignment")?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "';' after assignment")?;
        Ok(Stmt::Let(Symbol::intern(&name_tok.lexeme), expr))
    }

    fn parse_print(&mut self) -> PResult<Stmt> {
        self.advance(); // 'print'
        self.expect(TokenKind::LParen, "'(' after 'print'")?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' after print argument")?;
        self.expect(TokenKind::Semicolon, "';' after print statement")?;
        Ok(Stmt::Print(expr))
    }

    fn parse_cls(&mut self) -> PResult<Stmt> {
        self.advance(); // 'cls'
        self.expect(TokenKind::Semicolon, "';' after 'cls'")?;
        Ok(Stmt::Clear)
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        self.advance(); // 'if'
        self.expect(TokenKind::LParen, "'(' after 'if'")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' after if condition")?;
        let then_body = self.parse_block()?;
        let else_body = if self.match_token(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_body,
            else_body,
        })
    }

    fn parse_while(&mut self) -> PResult<Stmt> {
        self.advance(); // 'while'
        self.expect(TokenKind::LParen, "'(' after 'while'")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' after while condition")?;
        let body = self.parse_block()?;
        Ok(Stmt::While { cond, body })
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        self.advance(); // 'for'
        let var_tok = self.expect(TokenKind::Ident, "loop variable after 'for'")?;
        self.expect(TokenKind::Eq, "'=' after for-loop variable")?;
        let start = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "';' after for-loop start")?;
        let end = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Stmt::For {
            var: Symbol::intern(&var_tok.lexeme),
            start,
            end,
            body,
        })
    }

    fn parse_fn(&mut self) -> PResult<Stmt> {
        self.advance(); // 'fn'
        let name_tok = self.expect(TokenKind::Ident, "function name after 'fn'")?;
        self.expect(TokenKind::LParen, "'(' after function name")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let p = self.expect(TokenKind::Ident, "parameter name")?;
                params.push(Symbol::intern(&p.lexeme));
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after parameter list")?;
        let body = self.parse_block()?;
        trace!(name = %name_tok.lexeme, params = params.len(), "parsed function definition");
        Ok(Stmt::Fn {
            name: Symbol::intern(&name_tok.lexeme),
            params,
            body,
        })
    }

    fn parse_return(&mut self) -> PResult<Stmt> {
        self.advance(); // 'return'
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "';' after return value")?;
        Ok(Stmt::Return(expr))
    }

    fn parse_expr_stmt(&mut self) -> PResult<Stmt> {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "';' after expression statement")?;
        Ok(Stmt::ExprStmt(expr))
    }

    fn parse_block(&mut self) -> PResult<Vec<Stmt>> {
        self.expect(TokenKind::LBrace, "'{' to start block")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace, "'}' to end block")?;
        Ok(statements)
    }

    // ---------------- expressions, by precedence ----------------

    fn parse_expression(&mut self) -> PResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut left = self.parse_and()?;
        while self.match_token(TokenKind::Or) {
            let right = self.parse_and()?;
            left = Expr::BinOp(Box::new(left), BinOpKind::Or, Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.match_token(TokenKind::And) {
            let right = self.parse_equality()?;
            left = Expr::BinOp(Box::new(left), BinOpKind::And, Box::new(right));
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> PResult<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.current().kind {
                TokenKind::EqEq => BinOpKind::Eq,
                TokenKind::Neq => BinOpKind::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::BinOp(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> PResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinOpKind::Lt,
                TokenKind::Le => BinOpKind::Le,
                TokenKind::Gt => BinOpKind::Gt,
                TokenKind::Ge => BinOpKind::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expr::BinOp(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOpKind::Add,
                TokenKind::Minus => BinOpKind::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::BinOp(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOpKind::Mul,
                TokenKind::Slash => BinOpKind::Div,
                TokenKind::Percent => BinOpKind::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::BinOp(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        match self.current().kind {
            TokenKind::Minus => {
                self.advance();
                Ok(Expr::UnaryOp(UnaryOpKind::Neg, Box::new(self.parse_unary()?)))
            }
            TokenKind::Not => {
                self.advance();
                Ok(Expr::UnaryOp(UnaryOpKind::Not, Box::new(self.parse_unary()?)))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.match_token(TokenKind::LBracket) {
                let index = self.parse_expression()?;
                self.expect(TokenKind::RBracket, "']' after index expression")?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let span = self.span();
        match self.current().kind {
            TokenKind::Number => {
                let lexeme = self.advance().lexeme;
                Ok(Expr::Number(parse_number(&lexeme)))
            }
            TokenKind::Str => Ok(Expr::String(self.advance().lexeme)),
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            TokenKind::Ident => {
                let name = Symbol::intern(&self.advance().lexeme);
                if self.match_token(TokenKind::LParen) {
                    let args = self.parse_call_args()?;
                    Ok(Expr::Call(name, args))
                } else {
                    Ok(Expr::Var(name))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')' to close parenthesized expression")?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_dict_literal(),
            _ => Err(ParseError::new(
                format!("unexpected token '{}' in expression", self.current().lexeme),
                span,
            )),
        }
    }

    fn parse_call_args(&mut self) -> PResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after call arguments")?;
        Ok(args)
    }

    fn parse_list_literal(&mut self) -> PResult<Expr> {
        self.advance(); // '['
        let mut elements = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "']' to close list literal")?;
        Ok(Expr::List(elements))
    }

    fn parse_dict_literal(&mut self) -> PResult<Expr> {
        self.advance(); // '{'
        let mut entries = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                let key = self.parse_expression()?;
                self.expect(TokenKind::Colon, "':' between dict key and value")?;
                let value = self.parse_expression()?;
                entries.push((key, value));
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, "'}' to close dict literal")?;
        Ok(Expr::Dict(entries))
    }
}

fn parse_number(lexeme: &str) -> NumberLit {
    if lexeme.contains('.') {
        NumberLit::Float(lexeme.parse().expect("lexer only produces valid float text"))
    } else {
        NumberLit::Int(lexeme.parse().expect("lexer only produces valid integer text"))
    }
}

/// Lex and parse a complete program (the `parse` embedder entry point,
/// spec §6). Lexing and parsing remain distinct stages internally; this
/// just composes them for callers that don't need to observe tokens.
pub fn parse(source: &str) -> Result<Program, crate::FrontendError> {
    let tokens = axon_lex::Lexer::tokenize(source).map_err(crate::FrontendError::Lex)?;
    Parser::new(tokens)
        .parse_program()
        .map_err(crate::FrontendError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axon_lex::Lexer;

    fn parse_src(src: &str) -> Program {
        let tokens = Lexer::tokenize(src).unwrap();
        Parser::new(tokens).parse_program().unwrap()
    }

    #[test]
    fn parses_arithmetic_precedence() {
        let program = parse_src("1 + 2 * 3;");
        match &program.statements[0] {
            Stmt::ExprStmt(Expr::BinOp(left, BinOpKind::Add, right)) => {
                assert!(matches!(**left, Expr::Number(NumberLit::Int(1))));
                assert!(matches!(**right, Expr::BinOp(_, BinOpKind::Mul, _)));
            }
            other => panic!("unexpected AST: {other:?}"),
        }
    }

    #[test]
    fn parses_let_and_bare_assignment_the_same_way() {
        let program = parse_src("let x = 1; x = 2;");
        assert!(matches!(program.statements[0], Stmt::Let(_, _)));
        assert!(matches!(program.statements[1], Stmt::Let(_, _)));
    }

    #[test]
    fn parses_if_else() {
        let program = parse_src("if (true) { print(1); } else { print(2); }");
        match &program.statements[0] {
            Stmt::If { else_body: Some(body), .. } => assert_eq!(body.len(), 1),
            other => panic!("unexpected AST: {other:?}"),
        }
    }

    #[test]
    fn parses_for_loop_header() {
        let program = parse_src("for i = 0; 5 { print(i); }");
        assert!(matches!(program.statements[0], Stmt::For { .. }));
    }

    #[test]
    fn parses_function_call() {
        let program = parse_src("add(2, 3);");
        match &program.statements[0] {
            Stmt::ExprStmt(Expr::Call(_, args)) => assert_eq!(args.len(), 2),
            other => panic!("unexpected AST: {other:?}"),
        }
    }

    #[test]
    fn parses_list_and_dict_and_index() {
        let program = parse_src(r#"let d = {"a": 1}; print(d["a"]);"#);
        assert!(matches!(program.statements[0], Stmt::Let(_, Expr::Dict(_))));
        match &program.statements[1] {
            Stmt::Print(Expr::Index(_, _)) => {}
            other => panic!("unexpected AST: {other:?}"),
        }
    }

    #[test]
    fn missing_semicolon_is_a_parse_error() {
        let tokens = Lexer::tokenize("let x = 1").unwrap();
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert!(err.message.contains("';'"));
    }

    #[test]
    fn left_associativity_of_subtraction() {
        let program = parse_src("10 - 3 - 2;");
        match &program.statements[0] {
            Stmt::ExprStmt(Expr::BinOp(left, BinOpKind::Sub, right)) => {
                assert!(matches!(**right, Expr::Number(NumberLit::Int(2))));
                assert!(matches!(**left, Expr::BinOp(_, BinOpKind::Sub, _)));
            }
            other => panic!("unexpected AST: {other:?}"),
        }
    }
}
