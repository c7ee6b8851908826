//! Token stream cursor with lookahead and span tracking

use crate::ast::Span;
use crate::lexer::{SpannedToken, Token};

use super::error::{ParseError, ParseResult};

pub struct TokenCursor {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ========================================================================
    // Position and lookahead
    // ========================================================================

    pub fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    pub fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| t.span.clone())
            .or_else(|| self.tokens.last().map(|t| t.span.clone()))
            .unwrap_or_default()
    }

    /// Span of the most recently consumed token
    pub fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.clone())
            .unwrap_or_default()
    }

    pub fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    // ========================================================================
    // Token consumption
    // ========================================================================

    /// Advance to the next token and return the consumed one
    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    pub fn check(&self, token: &Token) -> bool {
        self.peek() == token
    }

    /// If the current token matches, consume it and return true
    pub fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the expected token or return an error
    pub fn consume(&mut self, expected: Token) -> ParseResult<Span> {
        if self.check(&expected) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(&describe(&expected)))
        }
    }

    pub fn consume_ident(&mut self) -> ParseResult<(String, Span)> {
        match self.peek().clone() {
            Token::Ident(name) => {
                let span = self.current_span();
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    pub fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::unexpected(expected, self.peek().clone(), self.current_span())
    }
}

/// Human-readable name of a token for "expected ..." messages
fn describe(token: &Token) -> String {
    let text = match token {
        Token::LParen => "`(`",
        Token::RParen => "`)`",
        Token::LBracket => "`[`",
        Token::RBracket => "`]`",
        Token::LBrace => "`{`",
        Token::RBrace => "`}`",
        Token::Comma => "`,`",
        Token::Semicolon => "`;`",
        Token::Colon => "`:`",
        Token::Dot => "`.`",
        Token::Eq => "`=`",
        other => return format!("{:?}", other),
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn cursor(input: &str) -> TokenCursor {
        let tokens = Lexer::new(input).tokenize().unwrap();
        TokenCursor::new(tokens)
    }

    #[test]
    fn test_basic_navigation() {
        let mut c = cursor("let x = 42");
        assert!(c.check(&Token::Let));
        c.advance();
        assert!(matches!(c.peek(), Token::Ident(s) if s == "x"));
        c.advance();
        assert!(c.check(&Token::Eq));
    }

    #[test]
    fn test_consume_reports_expected_token() {
        let mut c = cursor("let x");
        assert!(c.match_token(&Token::Let));
        let err = c.consume(Token::Semicolon).unwrap_err();
        assert!(err.to_string().contains("`;`"), "got {}", err);
        assert!(c.consume_ident().is_ok());
        assert!(matches!(
            c.consume(Token::Semicolon),
            Err(ParseError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let mut c = cursor("a");
        c.advance();
        assert_eq!(c.advance(), Token::Eof);
        assert!(c.is_at_end());
        assert_eq!(c.previous_span(), Span::new(0, 1));
    }
}
