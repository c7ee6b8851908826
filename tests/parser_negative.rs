//! Negative parser tests - malformed stage source that must be rejected
//!
//! Each test checks the error variant, not just that parsing failed.

use stagelink::lexer::{LexError, Lexer};
use stagelink::parser::{ParseError, Parser};
use stagelink::{parse, CompileError};

/// Parse input and expect a parser (not lexer) failure
fn parse_fails(input: &str) -> ParseError {
    let tokens = Lexer::new(input).tokenize().expect("lexer should succeed");
    match Parser::new(tokens).parse_program() {
        Ok(_) => panic!("expected parse error for: {}", input),
        Err(e) => e,
    }
}

fn lex_fails(input: &str) -> LexError {
    match Lexer::new(input).tokenize() {
        Ok(_) => panic!("expected lex error for: {}", input),
        Err(e) => e,
    }
}

fn body_fails(body: &str) -> ParseError {
    parse_fails(&format!("fn stage(self) {{ {} }}", body))
}

// ============================================================================
// Items
// ============================================================================

mod items {
    use super::*;

    #[test]
    fn statement_at_top_level() {
        assert!(matches!(
            parse_fails("self.color = 1.0;"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn interface_without_type() {
        assert!(matches!(
            parse_fails("uniform time;"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn unknown_type_name() {
        let ParseError::UnknownType { name, .. } = parse_fails("varying normal: vec5;") else {
            panic!("expected unknown type");
        };
        assert_eq!(name, "vec5");
    }

    #[test]
    fn zero_length_array() {
        assert!(matches!(
            parse_fails("uniform lights: vec3[0];"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn self_after_other_parameters() {
        assert!(matches!(
            parse_fails("fn stage(t: float, self) {}"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn unclosed_function_body() {
        assert!(matches!(
            parse_fails("fn stage(self) { self.a = 1.0;"),
            ParseError::UnexpectedEof { .. }
        ));
    }
}

// ============================================================================
// Statements and expressions
// ============================================================================

mod statements {
    use super::*;

    #[test]
    fn missing_semicolon() {
        assert!(matches!(
            body_fails("self.a = 1.0 self.b = 2.0;"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn assignment_to_call() {
        let ParseError::InvalidTarget { kind, .. } = body_fails("normalize(self.n) = 1.0;") else {
            panic!("expected invalid target");
        };
        assert_eq!(kind, "call");
    }

    #[test]
    fn assignment_to_literal() {
        assert!(matches!(
            body_fails("1.0 = self.a;"),
            ParseError::InvalidTarget { .. }
        ));
    }

    #[test]
    fn calls_inside_compound_targets() {
        let err = body_fails("self.w[self.next()] += 1.0;");
        assert!(matches!(err, ParseError::CallInCompoundTarget { .. }));
        assert!(matches!(
            body_fails("w[int(self.t)].x *= 2.0;"),
            ParseError::CallInCompoundTarget { .. }
        ));
    }

    #[test]
    fn calls_in_plain_assignment_targets_are_fine() {
        assert!(stagelink::parse("fn stage(self) { self.w[self.next()] = 1.0; }").is_ok());
    }

    #[test]
    fn bare_self() {
        assert!(matches!(body_fails("self = 1.0;"), ParseError::BareSelf { .. }));
        assert!(matches!(body_fails("self.a = self;"), ParseError::BareSelf { .. }));
    }

    #[test]
    fn chained_comparison() {
        assert!(matches!(
            body_fails("self.ok = self.a < self.b < self.c;"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn let_without_type() {
        assert!(matches!(
            body_fails("let t = 1.0;"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn missing_operand() {
        assert!(matches!(
            body_fails("self.a = 1.0 +;"),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn unclosed_paren() {
        assert!(body_fails("self.a = (1.0 + 2.0;").span().end > 0);
    }
}

// ============================================================================
// Lexical errors
// ============================================================================

mod lexical {
    use super::*;

    #[test]
    fn unexpected_character() {
        assert!(matches!(
            lex_fails("fn stage(self) { self.a = 1.0 @ 2.0; }"),
            LexError::UnexpectedChar('@', _)
        ));
    }

    #[test]
    fn unterminated_comment() {
        assert!(matches!(
            lex_fails("fn stage(self) { /* never closed }"),
            LexError::UnterminatedComment(_)
        ));
    }

    #[test]
    fn exponent_without_digits() {
        assert!(matches!(
            lex_fails("fn stage(self) { self.a = 1e; }"),
            LexError::InvalidNumber(..)
        ));
    }

    #[test]
    fn non_ascii_identifiers() {
        assert!(matches!(
            lex_fails("fn stage(self) { self.α = 1.0; }"),
            LexError::UnexpectedChar('α', _)
        ));
        assert!(matches!(
            lex_fails("uniform café: float;"),
            LexError::UnexpectedChar('é', _)
        ));
    }

    #[test]
    fn exponent_overflowing_f64() {
        let LexError::InvalidNumber(text, _) = lex_fails("fn stage(self) { self.a = 1e400; }")
        else {
            panic!("expected invalid number");
        };
        assert_eq!(text, "1e400");
    }

    #[test]
    fn lex_errors_surface_through_parse() {
        assert!(matches!(
            parse("uniform a: float; #"),
            Err(CompileError::Lex(LexError::UnexpectedChar('#', _)))
        ));
    }
}
