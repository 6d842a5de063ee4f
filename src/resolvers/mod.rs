// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Placeholder resolvers
//!
//! Each family answers `is_*_placeholder(name)` and resolves a name against a
//! [`ResolveContext`]. Families are tried in the order date, metadata, file;
//! names no family claims resolve to the caller's fallback or an empty string.

pub mod date;
pub mod file;
pub mod metadata;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::context::FileContext;
use crate::template::{registry, Template, Token};

pub use date::{format_date, is_date_placeholder, resolve_date};
pub use file::{is_file_placeholder, resolve_file, strip_date_affixes, strip_existing_patterns};
pub use metadata::{is_metadata_placeholder, resolve_metadata};

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    Exif,
    Document,
    Filesystem,
    Ai,
    Fallback,
    Literal,
}

impl ResolutionSource {
    /// Short badge shown next to a proposal
    pub fn badge(&self) -> &'static str {
        match self {
            ResolutionSource::Exif => "EXIF",
            ResolutionSource::Document => "document",
            ResolutionSource::Filesystem => "filesystem",
            ResolutionSource::Ai => "AI",
            ResolutionSource::Fallback => "fallback",
            ResolutionSource::Literal => "literal",
        }
    }
}

/// A value plus its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub value: String,
    pub source: ResolutionSource,
}

impl ResolvedValue {
    pub fn new(value: impl Into<String>, source: ResolutionSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }
}

/// One placeholder occurrence, resolved for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderResolution {
    pub placeholder: String,
    pub value: String,
    pub source: ResolutionSource,
    pub is_empty: bool,
    pub used_fallback: bool,
}

/// Caller-supplied resolution options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    /// Placeholder name to fallback value
    #[serde(default)]
    pub fallbacks: HashMap<String, String>,
    /// Format for `{date}` (YYYY, MM, DD, HH, mm, ss tokens)
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Drop dates and counters already in `{name}`/`{original}` so reapplying
    /// a template does not stack them
    #[serde(default)]
    pub strip_existing_patterns: bool,
}

fn default_date_format() -> String {
    "YYYY-MM-DD".to_string()
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            fallbacks: HashMap::new(),
            date_format: default_date_format(),
            strip_existing_patterns: false,
        }
    }
}

impl ResolveOptions {
    /// Fallback for a placeholder; `date:FMT` also honours a `date` fallback
    pub fn fallback_for(&self, name: &str) -> Option<&str> {
        let (base, _) = registry::split_format(name);
        self.fallbacks
            .get(name)
            .or_else(|| self.fallbacks.get(base))
            .map(String::as_str)
    }

    /// Value used when a placeholder has no data
    pub(crate) fn fallback(&self, name: &str) -> ResolvedValue {
        ResolvedValue::new(self.fallback_for(name).unwrap_or_default(), ResolutionSource::Fallback)
    }
}

/// Per-file resolution context
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub file: &'a FileContext,
    /// Active template pattern
    pub template_pattern: &'a str,
    /// The template has a date placeholder of its own; the smart name then drops dates
    pub template_uses_date: bool,
}

impl<'a> ResolveContext<'a> {
    /// Context for an already-parsed template
    pub fn for_template(file: &'a FileContext, template: &'a Template) -> Self {
        Self {
            file,
            template_pattern: &template.pattern,
            template_uses_date: file::template_uses_date(template),
        }
    }

    /// Context for a raw pattern, parsed here once
    pub fn new(file: &'a FileContext, template_pattern: &'a str) -> Self {
        Self {
            file,
            template_pattern,
            template_uses_date: file::pattern_uses_date(template_pattern),
        }
    }
}

/// The three resolver families in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolver {
    Date,
    Metadata,
    File,
}

impl Resolver {
    pub const ORDER: [Resolver; 3] = [Resolver::Date, Resolver::Metadata, Resolver::File];

    pub fn handles(&self, name: &str) -> bool {
        match self {
            Resolver::Date => is_date_placeholder(name),
            Resolver::Metadata => is_metadata_placeholder(name),
            Resolver::File => is_file_placeholder(name),
        }
    }

    pub fn resolve(
        &self,
        name: &str,
        ctx: &ResolveContext<'_>,
        options: &ResolveOptions,
    ) -> ResolvedValue {
        match self {
            Resolver::Date => resolve_date(name, ctx, options),
            Resolver::Metadata => resolve_metadata(name, ctx, options),
            Resolver::File => resolve_file(name, ctx, options),
        }
    }

    /// First family claiming a placeholder name
    pub fn for_placeholder(name: &str) -> Option<Resolver> {
        Self::ORDER.into_iter().find(|r| r.handles(name))
    }
}

/// Resolve one placeholder name
pub fn resolve_placeholder(
    name: &str,
    ctx: &ResolveContext<'_>,
    options: &ResolveOptions,
) -> PlaceholderResolution {
    let resolved = match Resolver::for_placeholder(name) {
        Some(resolver) => resolver.resolve(name, ctx, options),
        None => options.fallback(name),
    };

    let used_fallback =
        resolved.source == ResolutionSource::Fallback && options.fallback_for(name).is_some();

    PlaceholderResolution {
        placeholder: name.to_string(),
        is_empty: resolved.value.is_empty(),
        value: resolved.value,
        source: resolved.source,
        used_fallback,
    }
}

/// Resolve a token; literal tokens carry their own text
pub fn resolve_token(
    token: &Token,
    ctx: &ResolveContext<'_>,
    options: &ResolveOptions,
) -> PlaceholderResolution {
    match token {
        Token::Placeholder(name) => resolve_placeholder(name, ctx, options),
        Token::Literal(text) => PlaceholderResolution {
            placeholder: String::new(),
            value: text.clone(),
            source: ResolutionSource::Literal,
            is_empty: text.is_empty(),
            used_fallback: false,
        },
    }
}

/// Resolve every placeholder occurrence of a template, in token order
pub fn resolve_template(
    template: &Template,
    ctx: &ResolveContext<'_>,
    options: &ResolveOptions,
) -> Vec<PlaceholderResolution> {
    template
        .tokens
        .iter()
        .filter_map(|t| t.placeholder())
        .map(|name| resolve_placeholder(name, ctx, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parse;

    #[test]
    fn test_dispatch_order() {
        assert_eq!(Resolver::for_placeholder("year"), Some(Resolver::Date));
        assert_eq!(Resolver::for_placeholder("date:YYYY"), Some(Resolver::Date));
        assert_eq!(Resolver::for_placeholder("title"), Some(Resolver::Metadata));
        assert_eq!(Resolver::for_placeholder("name"), Some(Resolver::File));
        assert_eq!(Resolver::for_placeholder("bogus"), None);
    }

    #[test]
    fn test_unknown_placeholder_uses_fallback() {
        let file = FileContext::new("/tmp/a.txt");
        let ctx = ResolveContext::new(&file, "{bogus}");
        let mut options = ResolveOptions::default();

        let empty = resolve_placeholder("bogus", &ctx, &options);
        assert_eq!(empty.value, "");
        assert!(empty.is_empty);
        assert!(!empty.used_fallback);
        assert_eq!(empty.source, ResolutionSource::Fallback);

        options.fallbacks.insert("bogus".to_string(), "misc".to_string());
        let filled = resolve_placeholder("bogus", &ctx, &options);
        assert_eq!(filled.value, "misc");
        assert!(filled.used_fallback);
    }

    #[test]
    fn test_resolve_template_one_per_occurrence() {
        let file = FileContext::new("/tmp/a.txt");
        let template = parse("{original}-{original}.{ext}").unwrap();
        let ctx = ResolveContext::for_template(&file, &template);
        let resolutions = resolve_template(&template, &ctx, &ResolveOptions::default());
        assert_eq!(resolutions.len(), 3);
        assert_eq!(resolutions[0].value, "a");
        assert_eq!(resolutions[2].value, "txt");
    }

    #[test]
    fn test_context_records_date_usage() {
        let file = FileContext::new("/tmp/a.txt");
        let dated = parse("{date:YYYY}_{name}").unwrap();
        let plain = parse("{name}_{camera}").unwrap();
        assert!(ResolveContext::for_template(&file, &dated).template_uses_date);
        assert!(!ResolveContext::for_template(&file, &plain).template_uses_date);
        assert!(ResolveContext::new(&file, "{year}-{name}").template_uses_date);
    }

    #[test]
    fn test_literal_token_source() {
        let file = FileContext::new("/tmp/a.txt");
        let ctx = ResolveContext::new(&file, "x");
        let r = resolve_token(&Token::Literal("x".to_string()), &ctx, &ResolveOptions::default());
        assert_eq!(r.source, ResolutionSource::Literal);
        assert_eq!(r.value, "x");
    }
}
