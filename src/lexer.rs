//! Handwritten lexer for the stage language

use crate::ast::Span;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Int(i64),
    Float(f64),
    True,
    False,

    Ident(String),

    // Keywords
    Fn,
    SelfKw,
    Let,
    Return,
    If,
    Else,
    While,
    Uniform,
    Attribute,
    Varying,
    Output,

    // Delimiters
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Semicolon, // ;
    Colon,     // :
    Dot,       // .
    Arrow,     // ->

    // Assignment
    Eq,      // =
    PlusEq,  // +=
    MinusEq, // -=
    StarEq,  // *=
    SlashEq, // /=

    // Operators
    EqEq,   // ==
    Neq,    // !=
    Lt,     // <
    Gt,     // >
    Lte,    // <=
    Gte,    // >=
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    Percent, // %
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    Eof,
}

impl Token {
    /// Spelling of a binary operator token, used for precedence lookup
    pub fn operator_symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            Token::EqEq => "==",
            Token::Neq => "!=",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            _ => return None,
        };
        Some(symbol)
    }

    /// Operator applied by a compound assignment token (`+=` is `+`)
    pub fn compound_symbol(&self) -> Option<&'static str> {
        match self {
            Token::PlusEq => Some("+"),
            Token::MinusEq => Some("-"),
            Token::StarEq => Some("*"),
            Token::SlashEq => Some("/"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character: {0:?}")]
    UnexpectedChar(char, Span),
    #[error("unterminated block comment")]
    UnterminatedComment(Span),
    #[error("invalid number: {0}")]
    InvalidNumber(String, Span),
}

impl LexError {
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnexpectedChar(_, span) => span,
            LexError::UnterminatedComment(span) => span,
            LexError::InvalidNumber(_, span) => span,
        }
    }
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            pos: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.token == Token::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Character after the current one
    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    /// Consume `next` if it follows, choosing between two tokens
    fn either(&mut self, next: char, joined: Token, single: Token) -> Token {
        if self.peek() == Some(next) {
            self.advance();
            joined
        } else {
            single
        }
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(c) = self.advance() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let start = self.pos;
                    self.advance();
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('*') if self.peek() == Some('/') => {
                                self.advance();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(LexError::UnterminatedComment(Span::new(
                                    start, self.pos,
                                )))
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        self.skip_trivia()?;

        let start = self.pos;

        let Some(c) = self.advance() else {
            return Ok(SpannedToken {
                token: Token::Eof,
                span: Span::new(start, start),
            });
        };

        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            ':' => Token::Colon,
            '.' => Token::Dot,
            '%' => Token::Percent,

            '=' => self.either('=', Token::EqEq, Token::Eq),
            '!' => self.either('=', Token::Neq, Token::Bang),
            '<' => self.either('=', Token::Lte, Token::Lt),
            '>' => self.either('=', Token::Gte, Token::Gt),
            '+' => self.either('=', Token::PlusEq, Token::Plus),
            '*' => self.either('=', Token::StarEq, Token::Star),
            '/' => self.either('=', Token::SlashEq, Token::Slash),
            '-' => match self.peek() {
                Some('>') => {
                    self.advance();
                    Token::Arrow
                }
                Some('=') => {
                    self.advance();
                    Token::MinusEq
                }
                _ => Token::Minus,
            },
            '&' if self.peek() == Some('&') => {
                self.advance();
                Token::AndAnd
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                Token::OrOr
            }

            c if c.is_ascii_digit() => self.lex_number(c, start)?,

            c if c.is_ascii_alphabetic() || c == '_' => self.lex_ident(c),

            _ => return Err(LexError::UnexpectedChar(c, Span::new(start, self.pos))),
        };

        Ok(SpannedToken {
            token,
            span: Span::new(start, self.pos),
        })
    }

    fn take_digits(&mut self, s: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn lex_number(&mut self, first: char, start: usize) -> Result<Token, LexError> {
        let mut s = String::new();
        s.push(first);
        self.take_digits(&mut s);

        let mut is_float = false;

        // `1.x` is a member access on an integer, not a float
        if self.peek() == Some('.') && self.peek_second().map_or(false, |c| c.is_ascii_digit()) {
            is_float = true;
            s.push('.');
            self.advance();
            self.take_digits(&mut s);
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            s.push('e');
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                s.push(sign);
                self.advance();
            }
            let before = s.len();
            self.take_digits(&mut s);
            if s.len() == before {
                return Err(LexError::InvalidNumber(s, Span::new(start, self.pos)));
            }
        }

        if is_float {
            // Overflowing exponents parse to infinity, which GLSL cannot spell
            return match s.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Token::Float(f)),
                _ => Err(LexError::InvalidNumber(s, Span::new(start, self.pos))),
            };
        }

        let n: i64 = s
            .parse()
            .map_err(|_| LexError::InvalidNumber(s.clone(), Span::new(start, self.pos)))?;
        Ok(Token::Int(n))
    }

    fn lex_ident(&mut self, first: char) -> Token {
        let mut s = String::new();
        s.push(first);

        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match s.as_str() {
            "fn" => Token::Fn,
            "self" => Token::SelfKw,
            "let" => Token::Let,
            "return" => Token::Return,
            "if" => Token::If,
            "else" => Token::Else,
            "while" => Token::While,
            "true" => Token::True,
            "false" => Token::False,
            "uniform" => Token::Uniform,
            "attribute" => Token::Attribute,
            "varying" => Token::Varying,
            "output" => Token::Output,
            _ => Token::Ident(s),
        }
    }
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
