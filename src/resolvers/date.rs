// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Date placeholders: `{year}`, `{month}`, `{day}`, `{date}`, `{date:FORMAT}`

use chrono::{DateTime, Utc};

use super::{ResolveContext, ResolveOptions, ResolutionSource, ResolvedValue};
use crate::context::FileContext;
use crate::template::registry::{self, PlaceholderFamily};

pub fn is_date_placeholder(name: &str) -> bool {
    registry::family_of(name) == Some(PlaceholderFamily::Date)
}

/// Best date for a file: EXIF capture, document creation, then filesystem times
fn pick_date(file: &FileContext) -> Option<(DateTime<Utc>, ResolutionSource)> {
    if let Some(taken) = file.image.as_ref().and_then(|i| i.date_taken) {
        return Some((taken, ResolutionSource::Exif));
    }
    if let Some(created) = file.document.as_ref().and_then(|d| d.created_at.or(d.modified_at)) {
        return Some((created, ResolutionSource::Document));
    }
    file.modified_at
        .or(file.created_at)
        .map(|at| (at, ResolutionSource::Filesystem))
}

pub fn resolve_date(
    name: &str,
    ctx: &ResolveContext<'_>,
    options: &ResolveOptions,
) -> ResolvedValue {
    let Some((date, source)) = pick_date(ctx.file) else {
        return options.fallback(name);
    };

    let (base, format) = registry::split_format(name);
    let value = match (base, format) {
        ("year", _) => date.format("%Y").to_string(),
        ("month", _) => date.format("%m").to_string(),
        ("day", _) => date.format("%d").to_string(),
        ("date", Some(custom)) => format_date(&date, custom),
        ("date", None) => format_date(&date, &options.date_format),
        _ => return options.fallback(name),
    };

    ResolvedValue::new(value, source)
}

/// Format a date with `YYYY YY MM DD HH mm ss` tokens; other text is kept verbatim
pub fn format_date(date: &DateTime<Utc>, format: &str) -> String {
    const TOKENS: &[(&str, &str)] = &[
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ];

    let mut chrono_format = String::with_capacity(format.len() * 2);
    let mut rest = format;
    'outer: while !rest.is_empty() {
        for (token, spec) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                chrono_format.push_str(spec);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                chrono_format.push_str("%%");
            } else {
                chrono_format.push(c);
            }
        }
        rest = chars.as_str();
    }

    date.format(&chrono_format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DocumentMetadata, ImageMetadata};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_filesystem_date() {
        let file = FileContext::new("/p/IMG_0001.jpg").with_modified(at(2026, 3, 9));
        let ctx = ResolveContext::new(&file, "{year}");
        let options = ResolveOptions::default();

        let year = resolve_date("year", &ctx, &options);
        assert_eq!(year, ResolvedValue::new("2026", ResolutionSource::Filesystem));
        assert_eq!(resolve_date("month", &ctx, &options).value, "03");
        assert_eq!(resolve_date("day", &ctx, &options).value, "09");
        assert_eq!(resolve_date("date", &ctx, &options).value, "2026-03-09");
    }

    #[test]
    fn test_exif_beats_document_and_filesystem() {
        let file = FileContext::new("/p/a.jpg")
            .with_modified(at(2026, 3, 9))
            .with_document(DocumentMetadata {
                created_at: Some(at(2020, 1, 1)),
                ..Default::default()
            })
            .with_image(ImageMetadata {
                date_taken: Some(at(2019, 7, 4)),
                ..Default::default()
            });
        let ctx = ResolveContext::new(&file, "{date}");
        let resolved = resolve_date("date", &ctx, &ResolveOptions::default());
        assert_eq!(resolved, ResolvedValue::new("2019-07-04", ResolutionSource::Exif));
    }

    #[test]
    fn test_document_date() {
        let file = FileContext::new("/p/report.pdf")
            .with_modified(at(2026, 3, 9))
            .with_document(DocumentMetadata {
                created_at: Some(at(2021, 11, 30)),
                ..Default::default()
            });
        let ctx = ResolveContext::new(&file, "{year}");
        let resolved = resolve_date("year", &ctx, &ResolveOptions::default());
        assert_eq!(resolved, ResolvedValue::new("2021", ResolutionSource::Document));
    }

    #[test]
    fn test_no_date_uses_fallback() {
        let file = FileContext::new("/p/a.jpg");
        let ctx = ResolveContext::new(&file, "{year}");
        let mut options = ResolveOptions::default();
        assert_eq!(resolve_date("year", &ctx, &options).value, "");

        options.fallbacks.insert("year".to_string(), "undated".to_string());
        let resolved = resolve_date("year", &ctx, &options);
        assert_eq!(resolved, ResolvedValue::new("undated", ResolutionSource::Fallback));
    }

    #[test]
    fn test_custom_format() {
        let date = Utc.with_ymd_and_hms(2024, 7, 15, 8, 5, 3).unwrap();
        assert_eq!(format_date(&date, "YYYYMMDD"), "20240715");
        assert_eq!(format_date(&date, "DD.MM.YY HH-mm-ss"), "15.07.24 08-05-03");
        assert_eq!(format_date(&date, "100%"), "100%");
    }

    #[test]
    fn test_date_with_format_placeholder() {
        let file = FileContext::new("/p/a.jpg").with_modified(at(2024, 7, 15));
        let ctx = ResolveContext::new(&file, "{date:YYYYMMDD}");
        let resolved = resolve_date("date:YYYYMMDD", &ctx, &ResolveOptions::default());
        assert_eq!(resolved.value, "20240715");
    }
}
