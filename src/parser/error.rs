//! Parser error types with source locations

use crate::ast::Span;
use crate::lexer::Token;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected token: expected {expected}, found {found:?}")]
    UnexpectedToken {
        expected: String,
        found: Token,
        span: Span,
    },

    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof { expected: String, last_span: Span },

    #[error("cannot assign to {kind}")]
    InvalidTarget { kind: &'static str, span: Span },

    #[error("`self` can only be used to access a field or call a method")]
    BareSelf { span: Span },

    #[error("unknown type `{name}`")]
    UnknownType { name: String, span: Span },

    #[error("compound assignment target would evaluate this call twice")]
    CallInCompoundTarget { span: Span },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => span,
            ParseError::UnexpectedEof { last_span, .. } => last_span,
            ParseError::InvalidTarget { span, .. } => span,
            ParseError::BareSelf { span } => span,
            ParseError::UnknownType { span, .. } => span,
            ParseError::CallInCompoundTarget { span } => span,
        }
    }

    /// Unexpected-token error, or end-of-file when `found` is `Eof`
    pub fn unexpected(expected: impl Into<String>, found: Token, span: Span) -> Self {
        if found == Token::Eof {
            return ParseError::UnexpectedEof {
                expected: expected.into(),
                last_span: span,
            };
        }
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found,
            span,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
