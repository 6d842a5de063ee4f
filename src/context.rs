// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Per-file facts consumed by the resolvers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;

/// GPS position from image metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// EXIF-style image metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    #[serde(default)]
    pub date_taken: Option<DateTime<Utc>>,
    #[serde(default)]
    pub camera_make: Option<String>,
    #[serde(default)]
    pub camera_model: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    /// Human-readable place name, if reverse geocoding ran upstream
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub gps: Option<GpsCoordinates>,
}

/// Where document metadata came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Pdf,
    Office,
}

/// PDF or office document properties
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(default)]
    pub kind: DocumentKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Name suggestion produced by the AI analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestion {
    /// Suggested name without extension
    pub suggested_name: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Everything known about one file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContext {
    /// Full path to the file
    pub path: PathBuf,
    /// File name without extension
    pub name: String,
    /// Extension without the dot (may be empty)
    pub extension: String,
    /// Size in bytes
    pub size: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image: Option<ImageMetadata>,
    #[serde(default)]
    pub document: Option<DocumentMetadata>,
    #[serde(default)]
    pub ai_suggestion: Option<AiSuggestion>,
}

impl FileContext {
    /// Build a context from a path alone, without touching the disk
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (name, extension) = split_path_name(&path);
        Self {
            path,
            name,
            extension,
            size: 0,
            created_at: None,
            modified_at: None,
            image: None,
            document: None,
            ai_suggestion: None,
        }
    }

    /// Build a context from filesystem metadata
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        let mut ctx = Self::new(path);
        ctx.size = meta.len();
        ctx.modified_at = meta.modified().ok().map(DateTime::<Utc>::from);
        ctx.created_at = meta.created().ok().map(DateTime::<Utc>::from);
        Ok(ctx)
    }

    pub fn with_modified(mut self, at: DateTime<Utc>) -> Self {
        self.modified_at = Some(at);
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_image(mut self, image: ImageMetadata) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_document(mut self, document: DocumentMetadata) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_ai_suggestion(mut self, suggestion: AiSuggestion) -> Self {
        self.ai_suggestion = Some(suggestion);
        self
    }

    /// Full file name including extension
    pub fn full_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }

    /// Directory containing the file
    pub fn directory(&self) -> PathBuf {
        self.path.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}

/// Split a path's file name into stem and extension; dotfiles have no extension
fn split_path_name(path: &Path) -> (String, String) {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match file_name.rfind('.') {
        Some(0) | None => (file_name, String::new()),
        Some(pos) => (file_name[..pos].to_string(), file_name[pos + 1..].to_string()),
    }
}
