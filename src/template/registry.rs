// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Known placeholder registry

use serde::Serialize;

/// Placeholder families, in resolver priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderFamily {
    Date,
    Metadata,
    File,
}

/// A placeholder the resolvers know how to fill
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlaceholderSpec {
    pub name: &'static str,
    pub family: PlaceholderFamily,
    pub description: &'static str,
    /// Whether `{name:FORMAT}` is accepted
    pub accepts_format: bool,
}

/// Every known placeholder
pub static PLACEHOLDERS: &[PlaceholderSpec] = &[
    PlaceholderSpec {
        name: "year",
        family: PlaceholderFamily::Date,
        description: "Four-digit year",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "month",
        family: PlaceholderFamily::Date,
        description: "Two-digit month",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "day",
        family: PlaceholderFamily::Date,
        description: "Two-digit day of month",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "date",
        family: PlaceholderFamily::Date,
        description: "Full date, optionally {date:FORMAT}",
        accepts_format: true,
    },
    PlaceholderSpec {
        name: "title",
        family: PlaceholderFamily::Metadata,
        description: "Document title",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "author",
        family: PlaceholderFamily::Metadata,
        description: "Document author or image artist",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "camera",
        family: PlaceholderFamily::Metadata,
        description: "Camera make and model",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "location",
        family: PlaceholderFamily::Metadata,
        description: "Place name or GPS coordinates",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "name",
        family: PlaceholderFamily::File,
        description: "AI suggestion, else original name (dates de-duplicated)",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "original",
        family: PlaceholderFamily::File,
        description: "Original file name without extension",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "ext",
        family: PlaceholderFamily::File,
        description: "Original extension without dot",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "extension",
        family: PlaceholderFamily::File,
        description: "Alias of {ext}",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "category",
        family: PlaceholderFamily::File,
        description: "Type folder from the extension, such as Images",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "size",
        family: PlaceholderFamily::File,
        description: "Human-readable file size",
        accepts_format: false,
    },
    PlaceholderSpec {
        name: "ai",
        family: PlaceholderFamily::File,
        description: "AI suggestion only",
        accepts_format: false,
    },
];

/// Upper bound on edit distance for "did you mean" suggestions
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Split `date:YYYYMMDD` into `("date", Some("YYYYMMDD"))`
pub fn split_format(name: &str) -> (&str, Option<&str>) {
    match name.split_once(':') {
        Some((base, format)) => (base, Some(format)),
        None => (name, None),
    }
}

/// Look up a placeholder, honouring the `:FORMAT` suffix rules
pub fn lookup(name: &str) -> Option<&'static PlaceholderSpec> {
    let (base, format) = split_format(name);
    let spec = PLACEHOLDERS.iter().find(|p| p.name == base)?;
    match format {
        Some(f) if !spec.accepts_format || f.is_empty() => None,
        _ => Some(spec),
    }
}

/// Whether a placeholder name is known
pub fn is_known(name: &str) -> bool {
    lookup(name).is_some()
}

/// Family of a known placeholder
pub fn family_of(name: &str) -> Option<PlaceholderFamily> {
    lookup(name).map(|p| p.family)
}

/// Closest known placeholder within a small edit distance
pub fn suggest(name: &str) -> Option<&'static str> {
    let (base, _) = split_format(name);
    let needle = base.trim().to_lowercase();

    PLACEHOLDERS
        .iter()
        .map(|p| (p.name, levenshtein_distance(&needle, p.name)))
        .filter(|(candidate, distance)| {
            *distance <= MAX_SUGGESTION_DISTANCE && *distance < candidate.len().max(needle.len())
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_names() {
        assert_eq!(family_of("year"), Some(PlaceholderFamily::Date));
        assert_eq!(family_of("camera"), Some(PlaceholderFamily::Metadata));
        assert_eq!(family_of("ai"), Some(PlaceholderFamily::File));
        assert_eq!(family_of("category"), Some(PlaceholderFamily::File));
        assert!(is_known("extension"));
        assert!(!is_known("unknwn"));
    }

    #[test]
    fn test_format_suffix_only_for_date() {
        assert!(is_known("date:YYYYMMDD"));
        assert!(!is_known("date:"));
        assert!(!is_known("year:YY"));
    }

    #[test]
    fn test_suggest_close_names() {
        assert_eq!(suggest("yeer"), Some("year"));
        assert_eq!(suggest("Year"), Some("year"));
        assert_eq!(suggest("orignal"), Some("original"));
        assert_eq!(suggest("camra"), Some("camera"));
    }

    #[test]
    fn test_suggest_nothing_for_distant_names() {
        assert_eq!(suggest("unknwn"), None);
        assert_eq!(suggest("resolution"), None);
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }
}
