//! Recursive descent parser for the stage language
//!
//! Items and statements are parsed by recursive descent; expressions use
//! precedence climbing over [`OperatorTable`].
//!
//! # Module Structure
//!
//! - `cursor` - Token stream navigation and lookahead
//! - `combinators` - Reusable list parsing
//! - `error` - Error types with source location tracking

pub mod combinators;
pub mod cursor;
pub mod error;

pub use cursor::TokenCursor;
pub use error::{ParseError, ParseResult};

use crate::ast::*;
use crate::errors::CompileError;
use crate::interface::Interface;
use crate::lexer::{Lexer, SpannedToken, Token};
use crate::operators::{Associativity, OperatorTable};
use crate::types::GlslType;
use combinators::Combinators;

/// Lex and parse a complete shader object definition
pub fn parse(source: &str) -> Result<Program, CompileError> {
    let tokens = Lexer::new(source).tokenize()?;
    Ok(Parser::new(tokens).parse_program()?)
}

pub struct Parser {
    cursor: TokenCursor,
    op_table: OperatorTable,
}

impl Combinators for Parser {
    fn cursor(&mut self) -> &mut TokenCursor {
        &mut self.cursor
    }
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            op_table: OperatorTable::new(),
        }
    }

    fn peek(&self) -> &Token {
        self.cursor.peek()
    }

    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    /// Span from `start` through the last consumed token
    fn span_from(&self, start: &Span) -> Span {
        start.merge(&self.cursor.previous_span())
    }

    fn check(&self, token: &Token) -> bool {
        self.cursor.check(token)
    }

    fn match_token(&mut self, token: &Token) -> bool {
        self.cursor.match_token(token)
    }

    fn consume(&mut self, expected: Token) -> ParseResult<Span> {
        self.cursor.consume(expected)
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut items = Vec::new();
        while !self.cursor.is_at_end() {
            items.push(self.parse_item()?);
        }
        Ok(Program { items })
    }

    fn parse_item(&mut self) -> ParseResult<Item> {
        match self.peek() {
            Token::Fn => Ok(Item::Function(self.parse_function()?)),
            Token::Uniform | Token::Attribute | Token::Varying | Token::Output => {
                Ok(Item::Interface(self.parse_interface()?))
            }
            _ => Err(self
                .cursor
                .unexpected("`fn`, `uniform`, `attribute`, `varying` or `output`")),
        }
    }

    /// `uniform name: type;` and friends
    fn parse_interface(&mut self) -> ParseResult<InterfaceDecl> {
        let start = self.current_span();
        let keyword = self.cursor.advance();
        let (name, _) = self.cursor.consume_ident()?;
        self.consume(Token::Colon)?;
        let ty = self.parse_type()?;
        self.consume(Token::Semicolon)?;

        let kind = match keyword {
            Token::Uniform => Interface::Uniform(ty),
            Token::Attribute => Interface::Attribute(ty),
            Token::Varying => Interface::Varying(ty),
            _ => Interface::FragOutput(ty),
        };
        Ok(InterfaceDecl {
            name,
            kind,
            span: self.span_from(&start),
        })
    }

    /// `name` or `name[N]...`
    pub fn parse_type(&mut self) -> ParseResult<GlslType> {
        let (name, span) = self.cursor.consume_ident()?;
        let mut ty = GlslType::from_name(&name).ok_or(ParseError::UnknownType { name, span })?;
        while self.match_token(&Token::LBracket) {
            let len = match self.peek() {
                Token::Int(n) if *n > 0 => *n as usize,
                _ => return Err(self.cursor.unexpected("positive array length")),
            };
            self.cursor.advance();
            self.consume(Token::RBracket)?;
            ty = GlslType::array(ty, len);
        }
        Ok(ty)
    }

    fn parse_function(&mut self) -> ParseResult<FunctionDef> {
        let start = self.consume(Token::Fn)?;
        let (name, _) = self.cursor.consume_ident()?;
        let (has_self, params) = self.parse_params()?;
        let ret = if self.match_token(&Token::Arrow) {
            match self.parse_type()? {
                GlslType::Void => None,
                ty => Some(ty),
            }
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(FunctionDef {
            name,
            has_self,
            params,
            ret,
            body,
            span: self.span_from(&start),
        })
    }

    /// `(self, a: vec3, ...)`; the receiver may only come first
    fn parse_params(&mut self) -> ParseResult<(bool, Vec<Param>)> {
        let entries = self.delimited_list(
            Token::LParen,
            |p| {
                let span = p.current_span();
                if p.match_token(&Token::SelfKw) {
                    return Ok((None, span));
                }
                let (name, _) = p.cursor.consume_ident()?;
                p.consume(Token::Colon)?;
                let ty = p.parse_type()?;
                Ok((Some(Param { name, ty }), span))
            },
            &Token::Comma,
            Token::RParen,
        )?;

        let has_self = matches!(entries.first(), Some((None, _)));
        let mut params = Vec::with_capacity(entries.len());
        for (index, (param, span)) in entries.into_iter().enumerate() {
            match param {
                Some(param) => params.push(param),
                None if index == 0 => {}
                None => {
                    return Err(ParseError::unexpected(
                        "parameter name",
                        Token::SelfKw,
                        span,
                    ))
                }
            }
        }
        Ok((has_self, params))
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.consume(Token::LBrace)?;
        let body = self.many_until(Self::parse_stmt, &Token::RBrace)?;
        self.consume(Token::RBrace)?;
        Ok(body)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match self.peek() {
            Token::Let => self.parse_let(),
            Token::Return => self.parse_return(),
            Token::If => self.parse_if(),
            Token::While => self.parse_while(),
            _ => self.parse_simple_stmt(),
        }
    }

    fn parse_let(&mut self) -> ParseResult<Stmt> {
        let start = self.consume(Token::Let)?;
        let (name, _) = self.cursor.consume_ident()?;
        self.consume(Token::Colon)?;
        let ty = self.parse_type()?;
        let value = if self.match_token(&Token::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.consume(Token::Semicolon)?;
        Ok(Spanned::new(
            StmtKind::Let { name, ty, value },
            self.span_from(&start),
        ))
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let start = self.consume(Token::Return)?;
        let value = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume(Token::Semicolon)?;
        Ok(Spanned::new(StmtKind::Return(value), self.span_from(&start)))
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.consume(Token::If)?;
        let cond = self.parse_expr()?;
        let then_body = self.parse_block()?;
        let else_body = if self.match_token(&Token::Else) {
            if self.check(&Token::If) {
                vec![self.parse_if()?]
            } else {
                self.parse_block()?
            }
        } else {
            Vec::new()
        };
        Ok(Spanned::new(
            StmtKind::If {
                cond,
                then_body,
                else_body,
            },
            self.span_from(&start),
        ))
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let start = self.consume(Token::While)?;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Spanned::new(
            StmtKind::While { cond, body },
            self.span_from(&start),
        ))
    }

    /// Expression statement or assignment. Compound assignments are
    /// desugared: `t += v` becomes `t = t + v`. The target is copied into
    /// the value, so calls inside it are rejected.
    fn parse_simple_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span();
        let lhs = self.parse_expr()?;

        let kind = if self.match_token(&Token::Eq) {
            let value = self.parse_expr()?;
            StmtKind::Assign {
                target: expr_to_target(lhs)?,
                value,
            }
        } else if let Some(symbol) = self.peek().compound_symbol() {
            self.cursor.advance();
            if let Some(span) = first_call(&lhs) {
                return Err(ParseError::CallInCompoundTarget { span: span.clone() });
            }
            let rhs = self.parse_expr()?;
            let (op, _) = self
                .op_table
                .get(symbol)
                .ok_or_else(|| self.cursor.unexpected("operator"))?;
            let span = lhs.span.merge(&rhs.span);
            let value = Spanned::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(lhs.clone()),
                    right: Box::new(rhs),
                },
                span,
            );
            StmtKind::Assign {
                target: expr_to_target(lhs)?,
                value,
            }
        } else {
            StmtKind::Expr(lhs)
        };

        self.consume(Token::Semicolon)?;
        Ok(Spanned::new(kind, self.span_from(&start)))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_binary(0)
    }

    fn parse_expr_binary(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let start = self.current_span();
        let mut left = self.parse_expr_unary()?;
        // Precedence of the last non-associative operator applied at this level
        let mut chained: Option<u8> = None;

        loop {
            let Some((op, info)) = self
                .peek()
                .operator_symbol()
                .and_then(|symbol| self.op_table.get(symbol))
            else {
                break;
            };

            if info.precedence < min_prec {
                break;
            }
            if info.assoc == Associativity::None && chained == Some(info.precedence) {
                return Err(self.cursor.unexpected("`;` (comparisons do not chain)"));
            }

            self.cursor.advance();
            let right = self.parse_expr_binary(info.precedence + 1)?;
            let span = start.merge(&right.span);
            left = Spanned::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
            chained = (info.assoc == Associativity::None).then_some(info.precedence);
        }

        Ok(left)
    }

    fn parse_expr_unary(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();
        let op = match self.peek() {
            Token::Minus => UnaryOp::Neg,
            Token::Bang => UnaryOp::Not,
            _ => return self.parse_expr_postfix(),
        };
        self.cursor.advance();
        let operand = self.parse_expr_unary()?;
        let span = start.merge(&operand.span);
        Ok(Spanned::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_expr_postfix(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();
        let mut expr = self.parse_expr_atom()?;

        loop {
            if self.match_token(&Token::Dot) {
                let (name, _) = self.cursor.consume_ident()?;
                expr = Spanned::new(
                    ExprKind::Member {
                        base: Box::new(expr),
                        name,
                    },
                    self.span_from(&start),
                );
            } else if self.match_token(&Token::LBracket) {
                let index = self.parse_expr()?;
                self.consume(Token::RBracket)?;
                expr = Spanned::new(
                    ExprKind::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                    self.span_from(&start),
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_expr_atom(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();

        let node = match self.peek().clone() {
            Token::Int(n) => {
                self.cursor.advance();
                ExprKind::Lit(Literal::Int(n))
            }
            Token::Float(f) => {
                self.cursor.advance();
                ExprKind::Lit(Literal::Float(f))
            }
            Token::True | Token::False => {
                let value = self.cursor.advance() == Token::True;
                ExprKind::Lit(Literal::Bool(value))
            }
            Token::Ident(name) => {
                self.cursor.advance();
                if self.check(&Token::LParen) {
                    let args = self.parse_args()?;
                    ExprKind::Call { func: name, args }
                } else {
                    ExprKind::Var(name)
                }
            }
            Token::SelfKw => {
                self.cursor.advance();
                if !self.match_token(&Token::Dot) {
                    return Err(ParseError::BareSelf { span: start });
                }
                let (name, _) = self.cursor.consume_ident()?;
                if self.check(&Token::LParen) {
                    let args = self.parse_args()?;
                    ExprKind::MethodCall { name, args }
                } else {
                    ExprKind::Field(name)
                }
            }
            Token::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.consume(Token::RParen)?;
                return Ok(inner);
            }
            _ => return Err(self.cursor.unexpected("expression")),
        };

        Ok(Spanned::new(node, self.span_from(&start)))
    }

    fn parse_args(&mut self) -> ParseResult<Vec<Expr>> {
        self.delimited_list(
            Token::LParen,
            Self::parse_expr,
            &Token::Comma,
            Token::RParen,
        )
    }
}

/// Reinterpret a parsed expression as the left-hand side of an assignment
fn expr_to_target(expr: Expr) -> ParseResult<Target> {
    match expr.node {
        ExprKind::Field(name) => Ok(Target::Field(name)),
        ExprKind::Var(name) => Ok(Target::Var(name)),
        ExprKind::Index { base, index } => Ok(Target::Index {
            base: Box::new(expr_to_target(*base)?),
            index: *index,
        }),
        ExprKind::Member { base, name } => Ok(Target::Member {
            base: Box::new(expr_to_target(*base)?),
            name,
        }),
        other => Err(ParseError::InvalidTarget {
            kind: other.kind_name(),
            span: expr.span,
        }),
    }
}

/// Span of the first call anywhere inside `expr`
fn first_call(expr: &Expr) -> Option<&Span> {
    match &expr.node {
        ExprKind::Call { .. } | ExprKind::MethodCall { .. } => Some(&expr.span),
        ExprKind::Lit(_) | ExprKind::Var(_) | ExprKind::Field(_) => None,
        ExprKind::Member { base, .. } => first_call(base),
        ExprKind::Index { base, index } => first_call(base).or_else(|| first_call(index)),
        ExprKind::Binary { left, right, .. } => first_call(left).or_else(|| first_call(right)),
        ExprKind::Unary { operand, .. } => first_call(operand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(input: &str) -> Stmt {
        let tokens = Lexer::new(input).tokenize().unwrap();
        Parser::new(tokens).parse_stmt().unwrap()
    }

    #[test]
    fn compound_assignment_desugars_to_read_then_write() {
        let StmtKind::Assign { target, value } = stmt("self.t += 1.0;").node else {
            panic!("expected assignment");
        };
        assert_eq!(target, Target::Field("t".into()));
        let ExprKind::Binary { op, left, .. } = value.node else {
            panic!("expected binary value");
        };
        assert_eq!(op, BinOp::Add);
        assert_eq!(left.node, ExprKind::Field("t".into()));
    }

    #[test]
    fn else_if_nests_in_else_body() {
        let StmtKind::If { else_body, .. } = stmt("if a { } else if b { } else { }").node else {
            panic!("expected if");
        };
        assert_eq!(else_body.len(), 1);
        assert!(matches!(else_body[0].node, StmtKind::If { .. }));
    }

    #[test]
    fn parenthesized_expression_has_no_wrapper_node() {
        let StmtKind::Expr(expr) = stmt("(a);").node else {
            panic!("expected expression statement");
        };
        assert_eq!(expr.node, ExprKind::Var("a".into()));
    }

    #[test]
    fn array_types_nest_outward() {
        let tokens = Lexer::new("vec3[4]").tokenize().unwrap();
        let ty = Parser::new(tokens).parse_type().unwrap();
        assert_eq!(ty, GlslType::array(GlslType::vec(3), 4));
    }

    #[test]
    fn function_spans_cover_body() {
        let program = parse("fn frag_shader(self) {\n}\n").unwrap();
        let def = program.function("frag_shader").unwrap();
        assert_eq!(def.span, Span::new(0, 24));
        assert!(def.has_self);
        assert!(def.params.is_empty());
    }
}
