// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! File placeholders: `{name}`, `{original}`, `{ext}`, `{extension}`,
//! `{size}`, `{category}`, `{ai}`
//!
//! `{name}` is the smart name. It prefers the AI suggestion, falls back to the
//! original base name, and drops a leading or trailing date when the template
//! already adds one of its own.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ResolveContext, ResolveOptions, ResolutionSource, ResolvedValue};
use crate::context::FileContext;
use crate::template::registry::{self, PlaceholderFamily};
use crate::template::{parse, Template};

const YEAR: &str = r"(?:19|20)\d{2}";
const MONTH: &str = r"(?:0[1-9]|1[0-2])";
const DAY: &str = r"(?:0[1-9]|[12]\d|3[01])";
const SEP: &str = r"[-_.]";

/// Separators that may sit between a date and the rest of a name
const BOUNDARY: &[char] = &['-', '_', ' ', '.'];

/// Date shapes, most specific first
fn date_shapes() -> Vec<String> {
    vec![
        format!("{YEAR}{SEP}{MONTH}{SEP}{DAY}"),
        format!("{YEAR}{MONTH}{DAY}"),
        format!(r"{DAY}{SEP}{DAY}{SEP}{YEAR}"),
        format!("{YEAR}{SEP}{MONTH}"),
        YEAR.to_string(),
    ]
}

static LEADING_DATES: Lazy<Vec<Regex>> = Lazy::new(|| {
    date_shapes()
        .iter()
        .map(|shape| Regex::new(&format!("^{shape}")).expect("leading date pattern"))
        .collect()
});

static TRAILING_DATES: Lazy<Vec<Regex>> = Lazy::new(|| {
    date_shapes()
        .iter()
        .map(|shape| Regex::new(&format!("{shape}$")).expect("trailing date pattern"))
        .collect()
});

/// Counters left by earlier runs: `_001`, `-02`, ` 3`, `(2)`, ` (2)`
static TRAILING_COUNTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[-_ ]\d{1,4}|[ ]?\(\d{1,4}\))$").expect("trailing counter pattern")
});

pub fn is_file_placeholder(name: &str) -> bool {
    registry::family_of(name) == Some(PlaceholderFamily::File)
}

pub fn resolve_file(
    name: &str,
    ctx: &ResolveContext<'_>,
    options: &ResolveOptions,
) -> ResolvedValue {
    let file = ctx.file;
    let from_fs = |value: String| Some(ResolvedValue::new(value, ResolutionSource::Filesystem));
    let found = match name {
        "name" => Some(smart_name(file, ctx.template_uses_date, options)),
        "original" => from_fs(original_name(file, options)),
        "ext" | "extension" => from_fs(file.extension.clone()),
        "size" => from_fs(format_size(file.size)),
        "category" => from_fs(category_for_extension(&file.extension).to_string()),
        "ai" => ai_name(file).map(|n| ResolvedValue::new(n, ResolutionSource::Ai)),
        _ => None,
    };

    match found {
        Some(resolved) if !resolved.value.is_empty() => resolved,
        _ => options.fallback(name),
    }
}

fn ai_name(file: &FileContext) -> Option<String> {
    file.ai_suggestion
        .as_ref()
        .map(|s| s.suggested_name.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn original_name(file: &FileContext, options: &ResolveOptions) -> String {
    if options.strip_existing_patterns {
        strip_existing_patterns(&file.name)
    } else {
        file.name.clone()
    }
}

fn smart_name(
    file: &FileContext,
    template_uses_date: bool,
    options: &ResolveOptions,
) -> ResolvedValue {
    let (candidate, source) = match ai_name(file) {
        Some(name) => (name, ResolutionSource::Ai),
        None => (file.name.clone(), ResolutionSource::Filesystem),
    };

    let value = if options.strip_existing_patterns {
        strip_existing_patterns(&candidate)
    } else if template_uses_date {
        strip_date_affixes(&candidate)
    } else {
        candidate
    };
    ResolvedValue::new(value, source)
}

/// Whether a parsed template contains any date-family placeholder
pub fn template_uses_date(template: &Template) -> bool {
    template
        .placeholders
        .iter()
        .any(|name| registry::family_of(name) == Some(PlaceholderFamily::Date))
}

/// Same check on a raw pattern; unparseable patterns fall back to a text scan
pub fn pattern_uses_date(pattern: &str) -> bool {
    match parse(pattern) {
        Ok(template) => template_uses_date(&template),
        Err(_) => ["{year", "{month", "{day", "{date"]
            .iter()
            .any(|needle| pattern.contains(needle)),
    }
}

/// Folder name for a file's kind, from its extension
pub fn category_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" | "svg" | "ico" | "tiff" | "tif" | "heic"
        | "heif" | "raw" | "cr2" | "nef" | "arw" | "dng" => "Images",
        "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "odt" | "ods" | "odp" | "txt"
        | "rtf" | "md" | "csv" => "Documents",
        "mp4" | "avi" | "mkv" | "mov" | "wmv" | "flv" | "webm" | "m4v" | "mpeg" | "mpg" => "Videos",
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" | "m4a" | "opus" => "Audio",
        "zip" | "tar" | "gz" | "bz2" | "xz" | "7z" | "rar" | "iso" => "Archives",
        "js" | "ts" | "jsx" | "tsx" | "py" | "rs" | "go" | "java" | "c" | "cpp" | "h" | "hpp"
        | "cs" | "rb" | "php" | "swift" | "kt" | "scala" | "html" | "css" | "scss" | "less"
        | "json" | "yaml" | "yml" | "xml" | "toml" | "sql" | "sh" | "bash" | "ps1" => "Code",
        "db" | "sqlite" | "mdb" | "accdb" => "Data",
        _ => "Other",
    }
}

/// Strip dates at either end and a trailing counter, so that applying a
/// template to its own output gives the same name again.
///
/// A name that is nothing but a date, or that would end up empty, is
/// returned unchanged.
pub fn strip_existing_patterns(name: &str) -> String {
    if is_whole_date(name) {
        return name.to_string();
    }

    let without_dates = strip_date_affixes(name);
    let without_counter = TRAILING_COUNTER.replace(&without_dates, "");
    let cleaned = strip_date_affixes(without_counter.trim_matches(BOUNDARY));
    let cleaned = cleaned.trim_matches(BOUNDARY);

    if cleaned.is_empty() {
        name.to_string()
    } else {
        cleaned.to_string()
    }
}

fn is_whole_date(name: &str) -> bool {
    LEADING_DATES
        .iter()
        .any(|re| re.find(name).is_some_and(|m| m.end() == name.len()))
}

/// Remove a date at the start and at the end of a name.
///
/// A match only counts when a separator follows (or precedes) it and something
/// other than separators remains; dates in the middle are left alone.
pub fn strip_date_affixes(name: &str) -> String {
    let head_stripped = strip_leading_date(name);
    strip_trailing_date(head_stripped).to_string()
}

fn strip_leading_date(name: &str) -> &str {
    for pattern in LEADING_DATES.iter() {
        if let Some(m) = pattern.find(name) {
            let rest = &name[m.end()..];
            if rest.starts_with(BOUNDARY) {
                let remainder = rest.trim_start_matches(BOUNDARY);
                if !remainder.is_empty() {
                    return remainder;
                }
            }
            return name;
        }
    }
    name
}

fn strip_trailing_date(name: &str) -> &str {
    for pattern in TRAILING_DATES.iter() {
        if let Some(m) = pattern.find(name) {
            let head = &name[..m.start()];
            if head.ends_with(BOUNDARY) {
                let remainder = head.trim_end_matches(BOUNDARY);
                if !remainder.is_empty() {
                    return remainder;
                }
            }
            return name;
        }
    }
    name
}

/// Human-readable size, e.g. `512B`, `1.5KB`, `20MB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{}B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if value < 10.0 {
        let formatted = format!("{:.1}", value);
        let trimmed = formatted.trim_end_matches(".0");
        format!("{}{}", trimmed, UNITS[unit])
    } else {
        format!("{:.0}{}", value, UNITS[unit])
    }
}
