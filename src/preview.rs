// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Preview builder: template + file context to a proposed filename
//!
//! The builder substitutes resolved values, applies the case style, appends
//! the original extension when the result lacks it, sanitizes, and rejects
//! degenerate names. The extension is appended before sanitizing so that
//! truncation always keeps it.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::case::{normalize_filename, CaseStyle};
use crate::context::FileContext;
use crate::resolvers::{resolve_placeholder, PlaceholderResolution, ResolveContext, ResolveOptions};
use crate::sanitize::{sanitize, SanitizeOptions, SanitizeResult};
use crate::template::{parse, ParseError, Template, Token};

/// Soft limit for displayed names; exceeding it only warns
pub const DEFAULT_DISPLAY_LENGTH: usize = 100;

/// Options for building previews
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub resolve: ResolveOptions,
    /// Run the sanitizer over the substituted name
    pub sanitize: bool,
    /// Append the original extension when the result lacks it
    pub include_extension: bool,
    pub sanitize_options: SanitizeOptions,
    pub max_display_length: usize,
    pub case_style: CaseStyle,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            resolve: ResolveOptions::default(),
            sanitize: true,
            include_extension: true,
            sanitize_options: SanitizeOptions::default(),
            max_display_length: DEFAULT_DISPLAY_LENGTH,
            case_style: CaseStyle::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewWarning {
    EmptyPlaceholder { placeholder: String },
    FallbackUsed { placeholder: String, value: String },
    NameTooLong { length: usize, limit: usize },
}

impl PreviewWarning {
    pub fn message(&self) -> String {
        match self {
            PreviewWarning::EmptyPlaceholder { placeholder } => {
                format!("{{{}}} resolved to an empty value", placeholder)
            }
            PreviewWarning::FallbackUsed { placeholder, value } => {
                format!("{{{}}} used fallback value \"{}\"", placeholder, value)
            }
            PreviewWarning::NameTooLong { length, limit } => {
                format!(
                    "Name is {} characters, longer than the {} character display limit",
                    length, limit
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStatus {
    Ready,
    Warning,
}

/// Proposed name for one file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePreview {
    pub original_name: String,
    pub proposed_name: String,
    /// One entry per placeholder occurrence
    pub resolutions: Vec<PlaceholderResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitize: Option<SanitizeResult>,
    pub warnings: Vec<PreviewWarning>,
    pub status: PreviewStatus,
}

impl FilePreview {
    pub fn is_unchanged(&self) -> bool {
        self.original_name == self.proposed_name
    }
}

/// Why no name could be proposed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewError {
    #[error("Invalid filename: {name:?}")]
    InvalidFilename { name: String },

    #[error("Template error: {error}")]
    Template {
        #[from]
        error: ParseError,
    },
}

/// Preview one file against an already-parsed template
pub fn preview_file(
    template: &Template,
    file: &FileContext,
    options: &PreviewOptions,
) -> Result<FilePreview, PreviewError> {
    let ctx = ResolveContext::for_template(file, template);

    let mut name = String::new();
    let mut resolutions = Vec::new();
    for token in &template.tokens {
        match token {
            Token::Literal(text) => name.push_str(text),
            Token::Placeholder(placeholder) => {
                let resolution = resolve_placeholder(placeholder, &ctx, &options.resolve);
                name.push_str(&resolution.value);
                resolutions.push(resolution);
            }
        }
    }

    if options.include_extension
        && !file.extension.is_empty()
        && !has_extension(&name, &file.extension)
    {
        name.push('.');
        name.push_str(&file.extension);
    }

    let name = normalize_filename(&name, options.case_style);

    let (proposed_name, sanitize_result) = if options.sanitize {
        let result = sanitize(&name, &options.sanitize_options);
        (result.sanitized.clone(), Some(result))
    } else {
        (name, None)
    };

    if is_degenerate(&proposed_name, file) {
        return Err(PreviewError::InvalidFilename { name: proposed_name });
    }

    let mut warnings = Vec::new();
    for resolution in &resolutions {
        if resolution.is_empty {
            warnings.push(PreviewWarning::EmptyPlaceholder {
                placeholder: resolution.placeholder.clone(),
            });
        } else if resolution.used_fallback {
            warnings.push(PreviewWarning::FallbackUsed {
                placeholder: resolution.placeholder.clone(),
                value: resolution.value.clone(),
            });
        }
    }
    let length = proposed_name.chars().count();
    if length > options.max_display_length {
        warnings.push(PreviewWarning::NameTooLong {
            length,
            limit: options.max_display_length,
        });
    }

    let status = if warnings.is_empty() {
        PreviewStatus::Ready
    } else {
        PreviewStatus::Warning
    };

    Ok(FilePreview {
        original_name: file.full_name(),
        proposed_name,
        resolutions,
        sanitize: sanitize_result,
        warnings,
        status,
    })
}

/// Parse a pattern and preview one file
pub fn preview(
    pattern: &str,
    file: &FileContext,
    options: &PreviewOptions,
) -> Result<FilePreview, PreviewError> {
    let template = parse(pattern)?;
    preview_file(&template, file, options)
}

fn has_extension(name: &str, extension: &str) -> bool {
    name.len() > extension.len()
        && name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(extension))
}

/// Empty, `.`, `..` or a bare `.ext` with nothing before the dot. A dotfile
/// source may keep its leading dot.
fn is_degenerate(name: &str, file: &FileContext) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return true;
    }
    trimmed.rfind('.') == Some(0) && !file.name.starts_with('.')
}

/// Preview outcome for one file of a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Result<FilePreview, PreviewError>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub ready: usize,
    pub with_warnings: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchPreviewResult {
    pub entries: Vec<BatchEntry>,
    pub summary: BatchSummary,
}

/// Preview many files; the pattern is parsed once. A pattern that fails to
/// parse gives every file the same error entry.
pub fn preview_batch(
    pattern: &str,
    files: &[FileContext],
    options: &PreviewOptions,
) -> BatchPreviewResult {
    debug!("Batch preview of {} files with pattern {:?}", files.len(), pattern);

    let parsed = parse(pattern);
    let entries: Vec<BatchEntry> = files
        .iter()
        .map(|file| {
            let result = match &parsed {
                Ok(template) => preview_file(template, file, options),
                Err(error) => Err(PreviewError::from(error.clone())),
            };
            BatchEntry {
                path: file.path.clone(),
                result,
            }
        })
        .collect();

    let mut summary = BatchSummary {
        total: entries.len(),
        ..BatchSummary::default()
    };
    for entry in &entries {
        match &entry.result {
            Ok(p) if p.status == PreviewStatus::Ready => summary.ready += 1,
            Ok(_) => summary.with_warnings += 1,
            Err(_) => summary.errors += 1,
        }
    }

    BatchPreviewResult { entries, summary }
}
