//! Generic parsing combinators for reusable parsing patterns

use crate::lexer::Token;

use super::cursor::TokenCursor;
use super::error::ParseResult;

/// Extension trait over anything that can hand out its token cursor
pub trait Combinators {
    fn cursor(&mut self) -> &mut TokenCursor;

    /// Parse `open item (sep item)* close`, allowing an empty list and a
    /// trailing separator
    fn delimited_list<T, F>(
        &mut self,
        open: Token,
        mut parse_item: F,
        separator: &Token,
        close: Token,
    ) -> ParseResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> ParseResult<T>,
    {
        self.cursor().consume(open)?;
        let mut items = Vec::new();
        while !self.cursor().check(&close) {
            items.push(parse_item(self)?);
            if !self.cursor().match_token(separator) {
                break;
            }
        }
        self.cursor().consume(close)?;
        Ok(items)
    }

    /// Parse items until `terminator` (not consumed) or end of input
    fn many_until<T, F>(&mut self, mut parse_item: F, terminator: &Token) -> ParseResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> ParseResult<T>,
    {
        let mut items = Vec::new();
        while !self.cursor().check(terminator) && !self.cursor().is_at_end() {
            items.push(parse_item(self)?);
        }
        Ok(items)
    }
}

impl Combinators for TokenCursor {
    fn cursor(&mut self) -> &mut TokenCursor {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn cursor(input: &str) -> TokenCursor {
        TokenCursor::new(Lexer::new(input).tokenize().unwrap())
    }

    fn ident(c: &mut TokenCursor) -> ParseResult<String> {
        c.consume_ident().map(|(name, _)| name)
    }

    #[test]
    fn delimited_list_variants() {
        let mut c = cursor("(a, b, c)");
        let items = c
            .delimited_list(Token::LParen, ident, &Token::Comma, Token::RParen)
            .unwrap();
        assert_eq!(items, ["a", "b", "c"]);

        let mut c = cursor("()");
        let items = c
            .delimited_list(Token::LParen, ident, &Token::Comma, Token::RParen)
            .unwrap();
        assert!(items.is_empty());

        let mut c = cursor("(a,)");
        let items = c
            .delimited_list(Token::LParen, ident, &Token::Comma, Token::RParen)
            .unwrap();
        assert_eq!(items, ["a"]);
    }

    #[test]
    fn delimited_list_requires_separator() {
        let mut c = cursor("(a b)");
        assert!(c
            .delimited_list(Token::LParen, ident, &Token::Comma, Token::RParen)
            .is_err());
    }

    #[test]
    fn many_until_stops_at_terminator() {
        let mut c = cursor("a b } c");
        let items = c.many_until(ident, &Token::RBrace).unwrap();
        assert_eq!(items, ["a", "b"]);
        assert!(c.check(&Token::RBrace));
    }
}
