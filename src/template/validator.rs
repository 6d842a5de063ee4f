// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Semantic checks for naming templates

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::parser::{parse, Template, Token};
use super::registry::{self, PlaceholderFamily};

static EXTENSION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[A-Za-z0-9]{1,10}$").expect("extension suffix regex"));

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single validation finding
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    fn new(code: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity,
            message: message.into(),
            placeholder: None,
            position: None,
            suggestion: None,
        }
    }

    fn with_placeholder(mut self, name: &str) -> Self {
        self.placeholder = Some(name.to_string());
        self
    }

    fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Outcome of validating a template pattern
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// False iff any error-severity issue exists
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    pub known_placeholders: Vec<String>,
    pub unknown_placeholders: Vec<String>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

/// Parse and semantically check a template pattern
pub fn validate(pattern: &str) -> ValidationResult {
    let template = match parse(pattern) {
        Ok(t) => t,
        Err(e) => {
            let mut issue = ValidationIssue::new(e.kind.code(), Severity::Error, e.message.clone());
            issue.position = Some(e.position);
            return ValidationResult {
                valid: false,
                template: None,
                known_placeholders: Vec::new(),
                unknown_placeholders: Vec::new(),
                issues: vec![issue],
            };
        }
    };

    let mut issues = Vec::new();

    if template.is_empty() {
        issues.push(ValidationIssue::new(
            "empty_template",
            Severity::Error,
            "Template is empty and would produce an empty filename",
        ));
    }

    let (known, unknown): (Vec<String>, Vec<String>) = template
        .placeholders
        .iter()
        .cloned()
        .partition(|name| registry::is_known(name));

    for name in &unknown {
        let mut issue = ValidationIssue::new(
            "unknown_placeholder",
            Severity::Error,
            format!("Unknown placeholder '{{{}}}'", name),
        )
        .with_placeholder(name);
        if let Some(candidate) = registry::suggest(name) {
            issue.message = format!(
                "Unknown placeholder '{{{}}}', did you mean '{{{}}}'?",
                name, candidate
            );
            issue = issue.with_suggestion(candidate);
        }
        issues.push(issue);
    }

    for name in &template.placeholders {
        let count = template.occurrences(name);
        if count > 1 {
            issues.push(
                ValidationIssue::new(
                    "duplicate_placeholder",
                    Severity::Warning,
                    format!("Placeholder '{{{}}}' is used {} times", name, count),
                )
                .with_placeholder(name),
            );
        }
    }

    let has_ext_placeholder =
        template.has_placeholder("ext") || template.has_placeholder("extension");
    if !template.is_empty() && !has_ext_placeholder && !has_literal_extension(&template) {
        issues.push(
            ValidationIssue::new(
                "missing_extension",
                Severity::Warning,
                "Template has no {ext} placeholder or literal extension; \
                 the original extension will be appended",
            )
            .with_suggestion(format!("{}.{{ext}}", pattern)),
        );
    }

    let has_date = template
        .placeholders
        .iter()
        .any(|name| registry::family_of(name) == Some(PlaceholderFamily::Date));
    let has_anchor = template.has_placeholder("original") || template.has_placeholder("name");
    if !template.is_empty() && !has_date && !has_anchor {
        issues.push(
            ValidationIssue::new(
                "fallback_suggested",
                Severity::Info,
                "Template has no date and no {original}/{name}; \
                 names may come out empty when metadata is missing",
            )
            .with_suggestion("Add {original} or {date}, or configure fallback values"),
        );
    }

    let valid = !issues.iter().any(|i| i.severity == Severity::Error);

    ValidationResult {
        valid,
        template: Some(template),
        known_placeholders: known,
        unknown_placeholders: unknown,
        issues,
    }
}

fn has_literal_extension(template: &Template) -> bool {
    match template.tokens.last() {
        Some(Token::Literal(text)) => EXTENSION_SUFFIX.is_match(text),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(result: &ValidationResult) -> Vec<&str> {
        result.issues.iter().map(|i| i.code.as_str()).collect()
    }

    #[test]
    fn test_valid_template_with_extension() {
        let result = validate("{year}-{month}-{original}.{ext}");
        assert!(result.valid);
        assert!(result.issues.is_empty());
        assert_eq!(result.known_placeholders, vec!["year", "month", "original", "ext"]);
    }

    #[test]
    fn test_unknown_placeholder_is_error() {
        let result = validate("{unknwn}");
        assert!(!result.valid);
        let issue = result.errors().next().unwrap();
        assert_eq!(issue.code, "unknown_placeholder");
        assert_eq!(issue.placeholder.as_deref(), Some("unknwn"));
        assert_eq!(result.unknown_placeholders, vec!["unknwn"]);
    }

    #[test]
    fn test_unknown_placeholder_gets_suggestion() {
        let result = validate("{yeer}-{original}.{ext}");
        assert!(!result.valid);
        let issue = result.errors().next().unwrap();
        assert_eq!(issue.suggestion.as_deref(), Some("year"));
        assert!(issue.message.contains("did you mean"));
    }

    #[test]
    fn test_parse_error_surfaces_as_issue() {
        let result = validate("{year");
        assert!(!result.valid);
        assert!(result.template.is_none());
        assert_eq!(codes(&result), vec!["unclosed_brace"]);
        assert_eq!(result.issues[0].position, Some(0));
    }

    #[test]
    fn test_duplicate_placeholder_warns_once_per_name() {
        let result = validate("{name}-{name}-{name}-{year}-{year}.jpg");
        assert!(result.valid);
        let dupes: Vec<_> = result
            .warnings()
            .filter(|i| i.code == "duplicate_placeholder")
            .collect();
        assert_eq!(dupes.len(), 2);
    }

    #[test]
    fn test_missing_extension_warning() {
        let result = validate("{date}-{name}");
        assert!(result.valid);
        assert!(codes(&result).contains(&"missing_extension"));

        let result = validate("{date}-{name}.pdf");
        assert!(!codes(&result).contains(&"missing_extension"));

        let result = validate("{date}-{name}.{extension}");
        assert!(!codes(&result).contains(&"missing_extension"));
    }

    #[test]
    fn test_fallback_suggestion_without_anchor() {
        let result = validate("{camera}-{title}.{ext}");
        assert!(result.valid);
        let info: Vec<_> = result.issues.iter().filter(|i| i.severity == Severity::Info).collect();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].code, "fallback_suggested");
    }

    #[test]
    fn test_empty_template_is_invalid() {
        let result = validate("");
        assert!(!result.valid);
        assert_eq!(codes(&result), vec!["empty_template"]);
    }

    #[test]
    fn test_custom_date_format_is_known() {
        let result = validate("{date:YYYYMMDD}_{name}.{ext}");
        assert!(result.valid);
    }
}
