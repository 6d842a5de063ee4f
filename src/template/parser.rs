// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Template tokenizer
//!
//! Patterns mix literal text with `{placeholder}` references. Doubled braces
//! (`{{`, `}}`) outside a placeholder are escapes for a literal brace.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A parsed unit of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Token {
    /// Literal text, with escaped braces already restored
    Literal(String),
    /// Placeholder reference (name between the braces, verbatim)
    Placeholder(String),
}

impl Token {
    /// Placeholder name, if this token is a placeholder
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Token::Placeholder(name) => Some(name),
            Token::Literal(_) => None,
        }
    }
}

/// A parsed naming template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// The original pattern string
    pub pattern: String,
    /// Tokens in pattern order
    pub tokens: Vec<Token>,
    /// Unique placeholder names in first-occurrence order
    pub placeholders: Vec<String>,
}

/// Classification of a template syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    UnclosedBrace,
    EmptyPlaceholder,
    UnexpectedCloseBrace,
    NestedBrace,
}

impl ParseErrorKind {
    /// Stable code used in validation issues
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::UnclosedBrace => "unclosed_brace",
            ParseErrorKind::EmptyPlaceholder => "empty_placeholder",
            ParseErrorKind::UnexpectedCloseBrace => "unexpected_close_brace",
            ParseErrorKind::NestedBrace => "nested_brace",
        }
    }
}

/// Template syntax error
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (at position {position})")]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    #[serde(rename = "type")]
    pub kind: ParseErrorKind,
    /// Character offset of the offending brace
    pub position: usize,
    pub message: String,
}

impl ParseError {
    fn new(kind: ParseErrorKind, position: usize) -> Self {
        let message = match kind {
            ParseErrorKind::UnclosedBrace => "Unclosed brace: '{' has no matching '}'".to_string(),
            ParseErrorKind::EmptyPlaceholder => "Empty placeholder '{}'".to_string(),
            ParseErrorKind::UnexpectedCloseBrace => {
                "Unexpected '}' without a matching '{' (use '}}' for a literal brace)".to_string()
            }
            ParseErrorKind::NestedBrace => {
                "Nested '{' inside a placeholder (use '{{' outside placeholders for a literal brace)"
                    .to_string()
            }
        };
        Self { kind, position, message }
    }
}

impl Template {
    /// Parse a pattern string into a template
    pub fn parse(pattern: &str) -> Result<Self, ParseError> {
        parse(pattern)
    }

    /// Rebuild the pattern from tokens, re-escaping literal braces
    pub fn to_pattern(&self) -> String {
        let mut out = String::with_capacity(self.pattern.len());
        for token in &self.tokens {
            match token {
                Token::Literal(text) => {
                    for c in text.chars() {
                        match c {
                            '{' => out.push_str("{{"),
                            '}' => out.push_str("}}"),
                            _ => out.push(c),
                        }
                    }
                }
                Token::Placeholder(name) => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
        }
        out
    }

    /// Whether the template references a placeholder
    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholders.iter().any(|p| p == name)
    }

    /// Number of times a placeholder occurs
    pub fn occurrences(&self, name: &str) -> usize {
        self.tokens
            .iter()
            .filter(|t| t.placeholder() == Some(name))
            .count()
    }

    /// True for an empty pattern
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Parse a pattern string into a template
pub fn parse(pattern: &str) -> Result<Template, ParseError> {
    let chars: Vec<char> = pattern.chars().collect();

    if let Err(e) = check_balance(&chars) {
        debug!("Template {:?} failed balance check: {}", pattern, e);
        return Err(e);
    }

    let tokens = tokenize(&chars).map_err(|e| {
        debug!("Template {:?} failed to tokenize: {}", pattern, e);
        e
    })?;

    let mut placeholders: Vec<String> = Vec::new();
    for name in tokens.iter().filter_map(Token::placeholder) {
        if !placeholders.iter().any(|p| p == name) {
            placeholders.push(name.to_string());
        }
    }

    Ok(Template {
        pattern: pattern.to_string(),
        tokens,
        placeholders,
    })
}

/// First pass: brace balance with escape skipping
fn check_balance(chars: &[char]) -> Result<(), ParseError> {
    let mut open_at: Option<usize> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match (c, open_at) {
            ('{', None) if next == Some('{') => i += 1,
            ('}', None) if next == Some('}') => i += 1,
            ('{', None) => open_at = Some(i),
            ('{', Some(_)) => return Err(ParseError::new(ParseErrorKind::NestedBrace, i)),
            ('}', None) => return Err(ParseError::new(ParseErrorKind::UnexpectedCloseBrace, i)),
            ('}', Some(_)) => open_at = None,
            _ => {}
        }
        i += 1;
    }

    match open_at {
        Some(pos) => Err(ParseError::new(ParseErrorKind::UnclosedBrace, pos)),
        None => Ok(()),
    }
}

/// Second pass: split into literal and placeholder tokens
fn tokenize(chars: &[char]) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if (c == '{' && next == Some('{')) || (c == '}' && next == Some('}')) {
            literal.push(c);
            i += 2;
            continue;
        }

        if c == '{' {
            let start = i;
            let end = chars[start + 1..]
                .iter()
                .position(|&ch| ch == '}')
                .map(|offset| start + 1 + offset)
                .ok_or_else(|| ParseError::new(ParseErrorKind::UnclosedBrace, start))?;

            let name: String = chars[start + 1..end].iter().collect();
            if name.trim().is_empty() {
                return Err(ParseError::new(ParseErrorKind::EmptyPlaceholder, start));
            }

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(Token::Placeholder(name));
            i = end + 1;
            continue;
        }

        literal.push(c);
        i += 1;
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_only_roundtrips() {
        let template = parse("holiday photos").unwrap();
        assert_eq!(template.tokens, vec![Token::Literal("holiday photos".to_string())]);
        assert!(template.placeholders.is_empty());
        assert_eq!(template.to_pattern(), "holiday photos");
    }

    #[test]
    fn test_parse_mixed_tokens() {
        let template = parse("{year}-{month}-{original}").unwrap();
        assert_eq!(
            template.tokens,
            vec![
                Token::Placeholder("year".to_string()),
                Token::Literal("-".to_string()),
                Token::Placeholder("month".to_string()),
                Token::Literal("-".to_string()),
                Token::Placeholder("original".to_string()),
            ]
        );
        assert_eq!(template.placeholders, vec!["year", "month", "original"]);
    }

    #[test]
    fn test_placeholders_unique_in_first_occurrence_order() {
        let template = parse("{name}_{date}_{name}").unwrap();
        assert_eq!(template.placeholders, vec!["name", "date"]);
        assert_eq!(template.occurrences("name"), 2);
    }

    #[test]
    fn test_escaped_braces_become_literals() {
        let template = parse("{{draft}}_{name}").unwrap();
        assert_eq!(
            template.tokens,
            vec![
                Token::Literal("{draft}_".to_string()),
                Token::Placeholder("name".to_string()),
            ]
        );
        assert_eq!(template.to_pattern(), "{{draft}}_{name}");
    }

    #[test]
    fn test_unclosed_brace_reports_open_position() {
        let err = parse("ab{name").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedBrace);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_unexpected_close_brace() {
        let err = parse("name}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedCloseBrace);
        assert_eq!(err.position, 4);
    }

    #[test]
    fn test_empty_placeholder() {
        let err = parse("x{}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyPlaceholder);
        assert_eq!(err.position, 1);

        let err = parse("{  }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyPlaceholder);
    }

    #[test]
    fn test_nested_braces_rejected() {
        let err = parse("{a{b}}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestedBrace);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_close_inside_placeholder_ends_it() {
        let template = parse("{name}}}").unwrap();
        assert_eq!(
            template.tokens,
            vec![
                Token::Placeholder("name".to_string()),
                Token::Literal("}".to_string()),
            ]
        );
    }

    #[test]
    fn test_positions_count_characters() {
        let err = parse("été}").unwrap_err();
        assert_eq!(err.position, 3);
    }

    #[test]
    fn test_empty_pattern() {
        let template = parse("").unwrap();
        assert!(template.is_empty());
        assert_eq!(template.to_pattern(), "");
    }
}
