// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Onoma

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::case::CaseStyle;
use crate::conflict::ConflictOptions;
use crate::preview::{PreviewOptions, DEFAULT_DISPLAY_LENGTH};
use crate::proposal::ProposalOptions;
use crate::resolvers::ResolveOptions;
use crate::sanitize::{Platform, SanitizeOptions, MAX_FILENAME_LENGTH};

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Naming rules
    #[serde(default)]
    pub rename: RenameConfig,

    /// Sanitizer settings
    #[serde(default)]
    pub sanitize: SanitizeConfig,

    /// Preview display settings
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Conflict detection settings
    #[serde(default)]
    pub conflicts: ConflictConfig,

    /// Placeholder fallback values
    #[serde(default)]
    pub fallbacks: HashMap<String, String>,

    /// Saved templates by name
    #[serde(default = "default_templates")]
    pub templates: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RenameConfig {
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub case_style: CaseStyle,
    #[serde(default = "default_true")]
    pub include_extension: bool,
    #[serde(default = "default_true")]
    pub sanitize: bool,
    /// Drop dates and counters already in the name before applying the template
    #[serde(default)]
    pub strip_existing_patterns: bool,
    /// Folder pattern for organize mode (e.g. "{year}/{month}")
    #[serde(default)]
    pub folder_pattern: Option<String>,
    #[serde(default)]
    pub destination_root: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SanitizeConfig {
    #[serde(default)]
    pub platform: Platform,
    #[serde(default = "default_replacement")]
    pub replacement: char,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default)]
    pub ellipsis: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PreviewConfig {
    /// Soft limit; longer names only warn
    #[serde(default = "default_display_length")]
    pub max_display_length: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConflictConfig {
    #[serde(default = "default_true")]
    pub check_filesystem: bool,
    /// Override filesystem case sensitivity
    #[serde(default)]
    pub case_sensitive: Option<bool>,
}

// Default value functions
fn default_true() -> bool { true }
fn default_template() -> String { "{date}_{name}".to_string() }
fn default_date_format() -> String { "YYYY-MM-DD".to_string() }
fn default_replacement() -> char { '_' }
fn default_max_length() -> usize { MAX_FILENAME_LENGTH }
fn default_display_length() -> usize { DEFAULT_DISPLAY_LENGTH }

fn default_templates() -> BTreeMap<String, String> {
    [
        ("dated", "{date}_{name}"),
        ("photo", "{year}-{month}-{day}_{camera}_{original}"),
        ("document", "{author}_{title}"),
        ("ai", "{ai}"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rename: RenameConfig::default(),
            sanitize: SanitizeConfig::default(),
            preview: PreviewConfig::default(),
            conflicts: ConflictConfig::default(),
            fallbacks: HashMap::new(),
            templates: default_templates(),
        }
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            date_format: default_date_format(),
            case_style: CaseStyle::None,
            include_extension: true,
            sanitize: true,
            strip_existing_patterns: false,
            folder_pattern: None,
            destination_root: None,
        }
    }
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            platform: Platform::All,
            replacement: default_replacement(),
            max_length: default_max_length(),
            ellipsis: false,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_display_length: default_display_length(),
        }
    }
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            check_filesystem: true,
            case_sensitive: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::OnomaError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve a template argument: a saved template name or a literal pattern
    pub fn template<'a>(&'a self, name_or_pattern: &'a str) -> &'a str {
        self.templates
            .get(name_or_pattern)
            .map(String::as_str)
            .unwrap_or(name_or_pattern)
    }

    pub fn sanitize_options(&self) -> SanitizeOptions {
        SanitizeOptions {
            platform: self.sanitize.platform,
            replacement: self.sanitize.replacement,
            max_length: self.sanitize.max_length,
            ellipsis: self.sanitize.ellipsis,
        }
    }

    pub fn preview_options(&self) -> PreviewOptions {
        PreviewOptions {
            resolve: ResolveOptions {
                fallbacks: self.fallbacks.clone(),
                date_format: self.rename.date_format.clone(),
                strip_existing_patterns: self.rename.strip_existing_patterns,
            },
            sanitize: self.rename.sanitize,
            include_extension: self.rename.include_extension,
            sanitize_options: self.sanitize_options(),
            max_display_length: self.preview.max_display_length,
            case_style: self.rename.case_style,
        }
    }

    pub fn proposal_options(&self) -> ProposalOptions {
        ProposalOptions {
            preview: self.preview_options(),
            folder_pattern: self.rename.folder_pattern.clone(),
            destination_root: self.rename.destination_root.clone(),
        }
    }

    pub fn conflict_options(&self) -> ConflictOptions {
        ConflictOptions {
            check_filesystem: self.conflicts.check_filesystem,
            case_sensitive: self.conflicts.case_sensitive,
        }
    }
}
