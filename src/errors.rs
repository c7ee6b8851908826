//! Compilation errors and their terminal rendering.
//!
//! Reports follow a fixed layout: a header line, the `file:line:col`
//! location, the offending source line with carets under the span, then
//! any "did you mean" hints.

use thiserror::Error;

use crate::ast::{SourceMap, Span};
use crate::lexer::LexError;
use crate::parser::ParseError;

/// Everything that can stop a stage from compiling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("stage `{name}` not found: {reason}")]
    StageNotFound {
        name: String,
        reason: String,
        suggestions: Vec<String>,
    },

    #[error("stage `{stage}` calls `{function}`, which is not defined")]
    MissingFunction {
        stage: String,
        function: String,
        suggestions: Vec<String>,
    },

    #[error("cannot emit {kind}: not supported by the GLSL backend")]
    UnsupportedConstruct { kind: &'static str, span: Span },
}

impl CompileError {
    /// Source location, when the error points at user code
    pub fn span(&self) -> Option<&Span> {
        match self {
            CompileError::Lex(e) => Some(e.span()),
            CompileError::Parse(e) => Some(e.span()),
            CompileError::UnsupportedConstruct { span, .. } => Some(span),
            CompileError::StageNotFound { .. } | CompileError::MissingFunction { .. } => None,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            CompileError::Lex(_) | CompileError::Parse(_) => "SYNTAX ERROR",
            CompileError::StageNotFound { .. } => "MISSING STAGE",
            CompileError::MissingFunction { .. } => "MISSING FUNCTION",
            CompileError::UnsupportedConstruct { .. } => "UNSUPPORTED CONSTRUCT",
        }
    }

    fn suggestions(&self) -> &[String] {
        match self {
            CompileError::StageNotFound { suggestions, .. }
            | CompileError::MissingFunction { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// Render a full report against the source the error came from
    pub fn render(&self, source_map: &SourceMap, config: &ErrorConfig) -> String {
        let colors = &config.colors;
        let mut out = format_header(self.title(), colors);
        out.push_str("\n\n");

        // Synthesized nodes carry an empty span at offset zero
        match self.span().filter(|span| span.end > span.start) {
            Some(span) => {
                out.push_str(&format_location(
                    config.filename.as_deref(),
                    span,
                    source_map,
                    colors,
                ));
                out.push_str("\n\n");
                out.push_str(&self.to_string());
                out.push_str("\n\n");
                out.push_str(&format_snippet(source_map, span, colors));
            }
            None => out.push_str(&self.to_string()),
        }

        out.push_str(&format_suggestions(self.suggestions(), colors));
        out
    }
}

/// ANSI color codes for terminal output
#[derive(Debug, Clone, Default)]
pub struct Colors {
    pub enabled: bool,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn code(&self, code: &'static str) -> &'static str {
        if self.enabled {
            code
        } else {
            ""
        }
    }

    pub fn red(&self) -> &'static str {
        self.code("\x1b[31m")
    }

    pub fn cyan(&self) -> &'static str {
        self.code("\x1b[36m")
    }

    pub fn bold(&self) -> &'static str {
        self.code("\x1b[1m")
    }

    pub fn reset(&self) -> &'static str {
        self.code("\x1b[0m")
    }
}

/// Configuration for error display
#[derive(Debug, Clone, Default)]
pub struct ErrorConfig {
    pub colors: Colors,
    pub filename: Option<String>,
}

impl ErrorConfig {
    pub fn new(use_color: bool) -> Self {
        Self {
            colors: Colors::new(use_color),
            filename: None,
        }
    }

    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }
}

// ============================================================================
// "Did you mean?" suggestions
// ============================================================================

/// Levenshtein edit distance, two rows at a time
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Up to three candidates within `max_distance` of `name`, closest first
pub fn find_similar<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max_distance: usize,
) -> Vec<String> {
    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .map(|c| (levenshtein_distance(name, c), c))
        .filter(|&(dist, _)| dist > 0 && dist <= max_distance)
        .collect();
    scored.sort();
    scored.dedup();
    scored.into_iter().take(3).map(|(_, c)| c.to_string()).collect()
}

// ============================================================================
// Report fragments
// ============================================================================

/// Example: "-- MISSING FUNCTION ----------------------------------------"
pub fn format_header(kind: &str, colors: &Colors) -> String {
    let dashes = "-".repeat(60usize.saturating_sub(kind.len() + 4));
    format!("{}-- {} {}{}", colors.cyan(), kind, dashes, colors.reset())
}

/// Example: "material.stage:12:15"
pub fn format_location(
    filename: Option<&str>,
    span: &Span,
    source_map: &SourceMap,
    colors: &Colors,
) -> String {
    let pos = source_map.position(span.start);
    format!(
        "{}{}:{}{}",
        colors.bold(),
        filename.unwrap_or("<input>"),
        pos,
        colors.reset()
    )
}

/// The source line with a caret underline beneath the span.
///
/// ```text
/// 3 |     while self.t < 1.0 {
///         ^^^^^^^^^^^^^^^^^^^^
/// ```
pub fn format_snippet(source_map: &SourceMap, span: &Span, colors: &Colors) -> String {
    let start = source_map.position(span.start);
    let end = source_map.position(span.end);
    let line_text = source_map.line(start.line).unwrap_or("");
    let gutter = start.line.to_string();

    let width = if start.line == end.line {
        (end.column - start.column).max(1)
    } else {
        // Multi-line spans underline to the end of the first line
        (line_text.chars().count() + 1)
            .saturating_sub(start.column)
            .max(1)
    };
    let padding = " ".repeat(gutter.len() + 3 + start.column - 1);

    format!(
        "{}{} |{} {}\n{}{}{}{}",
        colors.cyan(),
        gutter,
        colors.reset(),
        line_text,
        padding,
        colors.red(),
        "^".repeat(width),
        colors.reset()
    )
}

pub fn format_suggestions(suggestions: &[String], colors: &Colors) -> String {
    match suggestions {
        [] => String::new(),
        [only] => format!("\n\nDid you mean {}{}{}?", colors.bold(), only, colors.reset()),
        many => {
            let formatted: Vec<String> = many
                .iter()
                .map(|s| format!("{}{}{}", colors.bold(), s, colors.reset()))
                .collect();
            format!("\n\nDid you mean one of: {}?", formatted.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("shade", "shade"), 0);
        assert_eq!(levenshtein_distance("shade", "shadr"), 1);
        assert_eq!(levenshtein_distance("frag", "frg"), 1);
        assert_eq!(levenshtein_distance("", "vert"), 4);
        assert_eq!(levenshtein_distance("vert", ""), 4);
    }

    #[test]
    fn test_find_similar_orders_by_distance() {
        let candidates = ["vert_shader", "frag_shader", "geom_shader", "blend"];
        let suggestions = find_similar("vert_shadr", candidates, 2);
        assert_eq!(suggestions[0], "vert_shader");
        assert!(!suggestions.contains(&"blend".to_string()));
    }

    #[test]
    fn test_find_similar_excludes_identical() {
        assert!(find_similar("blend", ["blend"], 2).is_empty());
    }

    #[test]
    fn test_snippet_underlines_span() {
        let map = SourceMap::new("fn a(self) {\n    while x {}\n}");
        let snippet = format_snippet(&map, &Span::new(17, 22), &Colors::default());
        assert_eq!(snippet, "2 |     while x {}\n        ^^^^^");
    }

    #[test]
    fn test_render_without_span() {
        let err = CompileError::MissingFunction {
            stage: "frag_shader".into(),
            function: "shad".into(),
            suggestions: vec!["shade".into()],
        };
        let report = err.render(&SourceMap::new(""), &ErrorConfig::default());
        assert!(report.starts_with("-- MISSING FUNCTION"));
        assert!(report.contains("stage `frag_shader` calls `shad`"));
        assert!(report.ends_with("Did you mean shade?"));
    }
}
