// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Rename proposals
//!
//! A proposal pairs one file's current path with the path the template
//! produces for it, plus a status and the issues found on the way. Batch-wide
//! checks (duplicates, existing files) live in [`crate::conflict`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::context::FileContext;
use crate::preview::{preview_batch, FilePreview, PreviewError, PreviewOptions, PreviewWarning};
use crate::resolvers::{resolve_placeholder, ResolutionSource, ResolveContext};
use crate::sanitize::{is_valid_filename, sanitize};
use crate::template::{parse, ParseError, Severity, Template, Token};

/// Issue codes
pub mod codes {
    pub const DUPLICATE_PROPOSED: &str = "DUPLICATE_PROPOSED";
    pub const FILE_EXISTS: &str = "FILE_EXISTS";
    pub const INVALID_NAME: &str = "INVALID_NAME";
    pub const INVALID_TEMPLATE: &str = "INVALID_TEMPLATE";
    pub const MISSING_DATA: &str = "MISSING_DATA";
    pub const FALLBACK_USED: &str = "FALLBACK_USED";
    pub const NAME_TOO_LONG: &str = "NAME_TOO_LONG";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenameStatus {
    Ready,
    Conflict,
    MissingData,
    NoChange,
    InvalidName,
}

/// What applying a proposal would do on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileAction {
    Rename,
    Move,
    NoChange,
    Conflict,
    Error,
}

/// A problem attached to a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub auto_fixable: bool,
    /// Original paths of the other proposals involved
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub conflicting_with: BTreeSet<String>,
    /// Placeholder or field that caused the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Issue {
    /// Build an issue; severity and auto-fixability follow from the code
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: classify_severity(code),
            suggestion: None,
            auto_fixable: is_auto_fixable(code),
            conflicting_with: BTreeSet::new(),
            field: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_conflicts<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflicting_with.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// `MISSING*`/`EMPTY*` warn, `INVALID*`/`CONFLICT*`/`DUPLICATE*`/`*EXISTS*` block,
/// anything else informs
pub fn classify_severity(code: &str) -> Severity {
    let code = code.to_ascii_uppercase();
    if code.starts_with("MISSING") || code.starts_with("EMPTY") {
        Severity::Warning
    } else if code.starts_with("INVALID")
        || code.starts_with("CONFLICT")
        || code.starts_with("DUPLICATE")
        || code.contains("EXISTS")
    {
        Severity::Error
    } else {
        Severity::Info
    }
}

/// Codes whose issue comes with a usable alternative name
pub fn is_auto_fixable(code: &str) -> bool {
    let code = code.to_ascii_uppercase();
    code.starts_with("DUPLICATE") || code.contains("EXISTS") || code == codes::INVALID_NAME
}

/// One file's original to proposed pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameProposal {
    pub id: String,
    pub original_path: PathBuf,
    pub original_name: String,
    pub proposed_path: PathBuf,
    pub proposed_name: String,
    pub status: RenameStatus,
    pub issues: Vec<Issue>,
    /// Badges for where the name's data came from (e.g. "EXIF", "AI")
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metadata_sources: Vec<String>,
    pub is_folder_move: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_folder: Option<PathBuf>,
    pub action: FileAction,
}

impl RenameProposal {
    /// True iff no error-severity issue is attached
    pub fn can_proceed(&self) -> bool {
        !self.issues.iter().any(Issue::is_blocking)
    }

    pub fn has_issue(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    /// Directory the proposal writes into
    pub fn destination_dir(&self) -> &Path {
        self.proposed_path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn source_dir(&self) -> &Path {
        self.original_path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn is_unchanged(&self) -> bool {
        self.proposed_path == self.original_path
    }
}

/// Options for a proposal run
#[derive(Debug, Clone, Default)]
pub struct ProposalOptions {
    pub preview: PreviewOptions,
    /// Folder pattern such as `{year}/{month}`; enables organize mode
    pub folder_pattern: Option<String>,
    /// Root for organized folders; defaults to each file's own directory
    pub destination_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub total: usize,
    pub ready: usize,
    pub conflicts: usize,
    pub missing_data: usize,
    pub no_change: usize,
    pub invalid_name: usize,
}

impl ProposalSummary {
    pub fn from_proposals(proposals: &[RenameProposal]) -> Self {
        let count = |status: RenameStatus| proposals.iter().filter(|p| p.status == status).count();
        Self {
            total: proposals.len(),
            ready: count(RenameStatus::Ready),
            conflicts: count(RenameStatus::Conflict),
            missing_data: count(RenameStatus::MissingData),
            no_change: count(RenameStatus::NoChange),
            invalid_name: count(RenameStatus::InvalidName),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSummary {
    pub rename_count: usize,
    pub move_count: usize,
    pub no_change_count: usize,
    pub conflict_count: usize,
    pub error_count: usize,
}

impl ActionSummary {
    pub fn from_proposals(proposals: &[RenameProposal]) -> Self {
        let count = |action: FileAction| proposals.iter().filter(|p| p.action == action).count();
        Self {
            rename_count: count(FileAction::Rename),
            move_count: count(FileAction::Move),
            no_change_count: count(FileAction::NoChange),
            conflict_count: count(FileAction::Conflict),
            error_count: count(FileAction::Error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalBatch {
    pub proposals: Vec<RenameProposal>,
    pub summary: ProposalSummary,
    pub action_summary: ActionSummary,
    pub template_used: String,
    pub generated_at: DateTime<Utc>,
}

/// Build one proposal per file, in input order
pub fn generate_proposals(
    pattern: &str,
    files: &[FileContext],
    options: &ProposalOptions,
) -> ProposalBatch {
    let batch = preview_batch(pattern, files, &options.preview);
    let folder_template = options.folder_pattern.as_deref().map(parse);

    let proposals: Vec<RenameProposal> = files
        .iter()
        .zip(batch.entries)
        .map(|(file, entry)| build_proposal(file, entry.result, folder_template.as_ref(), options))
        .collect();

    debug!("Generated {} proposals", proposals.len());

    ProposalBatch {
        summary: ProposalSummary::from_proposals(&proposals),
        action_summary: ActionSummary::from_proposals(&proposals),
        proposals,
        template_used: pattern.to_string(),
        generated_at: Utc::now(),
    }
}

struct Destination {
    dir: PathBuf,
    is_move: bool,
    issues: Vec<Issue>,
}

fn build_proposal(
    file: &FileContext,
    preview: Result<FilePreview, PreviewError>,
    folder_template: Option<&Result<Template, ParseError>>,
    options: &ProposalOptions,
) -> RenameProposal {
    let original_name = file.full_name();
    let mut issues = Vec::new();
    let mut metadata_sources = Vec::new();

    let destination = match folder_template {
        Some(Ok(template)) => organize_destination(file, template, options),
        Some(Err(error)) => {
            issues.push(template_issue(error).with_field("folder_pattern"));
            Destination {
                dir: file.directory(),
                is_move: false,
                issues: Vec::new(),
            }
        }
        None => Destination {
            dir: file.directory(),
            is_move: false,
            issues: Vec::new(),
        },
    };
    issues.extend(destination.issues);

    let proposed_name = match preview {
        Ok(preview) => {
            for resolution in &preview.resolutions {
                let badge = resolution.source.badge().to_string();
                if resolution.source != ResolutionSource::Literal
                    && !metadata_sources.contains(&badge)
                {
                    metadata_sources.push(badge);
                }
            }
            issues.extend(preview.warnings.iter().map(warning_issue));
            let sanitize_options = &options.preview.sanitize_options;
            if !is_valid_filename(
                &preview.proposed_name,
                sanitize_options.platform,
                sanitize_options.max_length,
            ) {
                let message = format!("\"{}\" is not a valid filename", preview.proposed_name);
                let suggestion = sanitize(&preview.proposed_name, sanitize_options).sanitized;
                issues.push(Issue::new(codes::INVALID_NAME, message).with_suggestion(suggestion));
            }
            preview.proposed_name
        }
        Err(PreviewError::InvalidFilename { name }) => {
            issues.push(Issue::new(
                codes::INVALID_NAME,
                format!("Template produced an unusable filename \"{}\"", name),
            ));
            original_name.clone()
        }
        Err(PreviewError::Template { error }) => {
            issues.push(template_issue(&error));
            original_name.clone()
        }
    };

    let invalid = issues
        .iter()
        .any(|i| i.code == codes::INVALID_NAME || i.code == codes::INVALID_TEMPLATE);
    let missing = issues.iter().any(|i| i.code == codes::MISSING_DATA);
    let unchanged = proposed_name == original_name && !destination.is_move;

    let (status, action) = if invalid {
        (RenameStatus::InvalidName, FileAction::Error)
    } else if unchanged {
        (RenameStatus::NoChange, FileAction::NoChange)
    } else if missing {
        let action = if destination.is_move { FileAction::Move } else { FileAction::Rename };
        (RenameStatus::MissingData, action)
    } else if destination.is_move {
        (RenameStatus::Ready, FileAction::Move)
    } else {
        (RenameStatus::Ready, FileAction::Rename)
    };

    let proposed_path = destination.dir.join(&proposed_name);
    RenameProposal {
        id: Uuid::new_v4().to_string(),
        original_path: file.path.clone(),
        original_name,
        proposed_path,
        proposed_name,
        status,
        issues,
        metadata_sources,
        is_folder_move: destination.is_move,
        destination_folder: destination.is_move.then_some(destination.dir),
        action,
    }
}

fn template_issue(error: &ParseError) -> Issue {
    Issue::new(codes::INVALID_TEMPLATE, format!("Template cannot be used: {}", error))
}

fn warning_issue(warning: &PreviewWarning) -> Issue {
    match warning {
        PreviewWarning::EmptyPlaceholder { placeholder } => {
            Issue::new(codes::MISSING_DATA, warning.message()).with_field(placeholder.clone())
        }
        PreviewWarning::FallbackUsed { placeholder, .. } => {
            Issue::new(codes::FALLBACK_USED, warning.message()).with_field(placeholder.clone())
        }
        PreviewWarning::NameTooLong { .. } => Issue::new(codes::NAME_TOO_LONG, warning.message()),
    }
}

/// Resolve the folder pattern for a file; each segment is sanitized and
/// `.`/`..` segments are dropped so a folder never escapes the root.
fn organize_destination(
    file: &FileContext,
    template: &Template,
    options: &ProposalOptions,
) -> Destination {
    let ctx = ResolveContext::for_template(file, template);
    let resolve = &options.preview.resolve;
    let mut issues = Vec::new();

    let mut folder = String::new();
    for token in &template.tokens {
        match token {
            Token::Literal(text) => folder.push_str(text),
            Token::Placeholder(name) => {
                let resolution = resolve_placeholder(name, &ctx, resolve);
                if resolution.is_empty {
                    let message = format!("{{{}}} is empty in the folder pattern", name);
                    issues.push(Issue::new(codes::MISSING_DATA, message).with_field(name.clone()));
                }
                folder.push_str(&resolution.value);
            }
        }
    }

    let source_dir = file.directory();
    let mut dir = options.destination_root.clone().unwrap_or_else(|| source_dir.clone());
    for segment in folder.replace('\\', "/").split('/') {
        let segment = sanitize(segment.trim(), &options.preview.sanitize_options).sanitized;
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        dir.push(segment);
    }

    let is_move = normalize(&dir) != normalize(&source_dir);
    Destination { dir, is_move, issues }
}

fn normalize(path: &Path) -> PathBuf {
    path.components().filter(|c| !matches!(c, Component::CurDir)).collect()
}
