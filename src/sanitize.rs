// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Cross-platform filename sanitization
//!
//! Rules run in a fixed order: invalid characters, trailing spaces and
//! periods, reserved device names, then length truncation. The output of
//! [`sanitize`] is a fixed point: sanitizing it again changes nothing, and it
//! never exceeds the configured `max_length`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Characters rejected on every platform
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];

/// Windows device names, matched against the whole base name
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const RESERVED_SUFFIX: &str = "_file";
const ELLIPSIS: &str = "\u{2026}";

/// Maximum filename length (bytes) for most filesystems
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Target platform for sanitization rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Macos,
    Linux,
    /// Strictest combination of every platform
    #[default]
    All,
}

impl Platform {
    /// Platform the binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Macos
        } else {
            Platform::Linux
        }
    }

    fn windows_rules(&self) -> bool {
        matches!(self, Platform::Windows | Platform::All)
    }

    fn is_invalid(&self, c: char) -> bool {
        INVALID_CHARS.contains(&c) || (self.windows_rules() && c.is_ascii_control())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "windows",
            Platform::Macos => "macos",
            Platform::Linux => "linux",
            Platform::All => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" => Ok(Platform::Windows),
            "macos" => Ok(Platform::Macos),
            "linux" => Ok(Platform::Linux),
            "all" => Ok(Platform::All),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// Sanitizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeOptions {
    #[serde(default)]
    pub platform: Platform,
    #[serde(default = "default_replacement")]
    pub replacement: char,
    /// Hard limit in bytes
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Mark truncated names with an ellipsis
    #[serde(default)]
    pub ellipsis: bool,
}

fn default_replacement() -> char {
    '_'
}

fn default_max_length() -> usize {
    MAX_FILENAME_LENGTH
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            replacement: default_replacement(),
            max_length: default_max_length(),
            ellipsis: false,
        }
    }
}

impl SanitizeOptions {
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SanitizeChangeType {
    CharReplacement,
    ReservedName,
    TrailingFix,
    Truncation,
}

/// One applied sanitization rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeChange {
    #[serde(rename = "type")]
    pub change_type: SanitizeChangeType,
    pub original: String,
    pub replacement: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeResult {
    pub sanitized: String,
    pub original: String,
    pub changes: Vec<SanitizeChange>,
    pub was_modified: bool,
}

/// Sanitize a filename for the given options
pub fn sanitize(filename: &str, options: &SanitizeOptions) -> SanitizeResult {
    let mut changes = Vec::new();
    let platform = options.platform;

    let mut result = replace_invalid_chars(filename, options, &mut changes);
    if platform.windows_rules() {
        result = trim_trailing(&result, &mut changes);
        result = rename_reserved(&result, &mut changes);
    }
    if result.len() > options.max_length {
        result = truncate(&result, options, &mut changes);
    }

    SanitizeResult {
        was_modified: result != filename,
        sanitized: result,
        original: filename.to_string(),
        changes,
    }
}

/// Whether a name is already legal for a platform within `max_length` bytes
pub fn is_valid_filename(name: &str, platform: Platform, max_length: usize) -> bool {
    if name.is_empty() || name == "." || name == ".." || name.len() > max_length {
        return false;
    }
    if name.chars().any(|c| platform.is_invalid(c)) {
        return false;
    }
    if platform.windows_rules() {
        if name.ends_with(' ') || name.ends_with('.') {
            return false;
        }
        let (base, _) = split_ext(name);
        if is_reserved(base) {
            return false;
        }
    }
    true
}

/// Split into base name and extension (without the dot); dotfiles have no extension
pub fn split_filename(filename: &str) -> (&str, &str) {
    let (base, ext) = split_ext(filename);
    (base, ext.strip_prefix('.').unwrap_or(ext))
}

/// Split keeping the dot on the extension side
fn split_ext(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(0) | None => (filename, ""),
        Some(pos) => filename.split_at(pos),
    }
}

fn is_reserved(base: &str) -> bool {
    RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(base))
}

fn replace_invalid_chars(
    name: &str,
    options: &SanitizeOptions,
    changes: &mut Vec<SanitizeChange>,
) -> String {
    let platform = options.platform;
    let replacement = if platform.is_invalid(options.replacement) {
        default_replacement()
    } else {
        options.replacement
    };

    let mut out = String::with_capacity(name.len());
    let mut seen = Vec::new();
    let mut unique = HashSet::new();
    let mut in_run = false;

    for c in name.chars() {
        if platform.is_invalid(c) {
            if unique.insert(c) {
                seen.push(c);
            }
            if !in_run {
                out.push(replacement);
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }

    if !seen.is_empty() {
        let listed: Vec<String> = seen.iter().map(|c| format!("{:?}", c)).collect();
        changes.push(SanitizeChange {
            change_type: SanitizeChangeType::CharReplacement,
            original: seen.iter().collect(),
            replacement: replacement.to_string(),
            message: format!("Replaced invalid characters: {}", listed.join(", ")),
        });
    }
    out
}

fn is_trailing(c: char) -> bool {
    c == ' ' || c == '.'
}

fn trim_trailing(name: &str, changes: &mut Vec<SanitizeChange>) -> String {
    let whole = name.trim_end_matches(is_trailing);
    let (base, ext) = split_ext(whole);
    let trimmed_base = base.trim_end_matches(is_trailing);
    let result = format!("{}{}", trimmed_base, ext);

    if result != name {
        let mut removed = base[trimmed_base.len()..].to_string();
        removed.push_str(&name[whole.len()..]);
        changes.push(SanitizeChange {
            change_type: SanitizeChangeType::TrailingFix,
            original: removed,
            replacement: String::new(),
            message: "Removed trailing spaces/periods (invalid on Windows)".to_string(),
        });
    }
    result
}

fn rename_reserved(name: &str, changes: &mut Vec<SanitizeChange>) -> String {
    let (base, ext) = split_ext(name);
    if !is_reserved(base) {
        return name.to_string();
    }

    let replacement = format!("{}{}", base, RESERVED_SUFFIX);
    changes.push(SanitizeChange {
        change_type: SanitizeChangeType::ReservedName,
        original: base.to_string(),
        replacement: replacement.clone(),
        message: format!("\"{}\" is a reserved name on Windows", base),
    });
    format!("{}{}", replacement, ext)
}

/// Longest prefix of `s` that fits in `max` bytes on a char boundary
fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn truncate(name: &str, options: &SanitizeOptions, changes: &mut Vec<SanitizeChange>) -> String {
    let max = options.max_length;
    let (base, ext) = split_ext(name);

    let result = if ext.len() >= max {
        truncate_bytes(name, max).to_string()
    } else {
        let budget = max - ext.len();
        let base = if options.ellipsis && budget > ELLIPSIS.len() {
            format!("{}{}", truncate_bytes(base, budget - ELLIPSIS.len()), ELLIPSIS)
        } else {
            truncate_bytes(base, budget).to_string()
        };
        format!("{}{}", base, ext)
    };

    changes.push(SanitizeChange {
        change_type: SanitizeChangeType::Truncation,
        original: name.to_string(),
        replacement: result.clone(),
        message: format!("Truncated from {} to {} bytes", name.len(), result.len()),
    });

    if options.platform.windows_rules() {
        settle_truncated(result, changes)
    } else {
        result
    }
}

/// Re-apply the Windows rules to a truncated name without growing it.
/// A cut can end in spaces or periods or leave a reserved stem such as `CON`;
/// a reserved stem loses its last character instead of gaining `_file`.
fn settle_truncated(mut name: String, changes: &mut Vec<SanitizeChange>) -> String {
    loop {
        let trimmed = trim_trailing(&name, changes);
        let (base, ext) = split_ext(&trimmed);
        let next = if is_reserved(base) {
            // Reserved names are ASCII
            let shortened = &base[..base.len() - 1];
            changes.push(SanitizeChange {
                change_type: SanitizeChangeType::ReservedName,
                original: base.to_string(),
                replacement: shortened.to_string(),
                message: format!(
                    "\"{}\" is a reserved name on Windows; shortened to fit the length limit",
                    base
                ),
            });
            format!("{}{}", shortened, ext)
        } else {
            trimmed
        };
        if next == name {
            return next;
        }
        name = next;
    }
}
