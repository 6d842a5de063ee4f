// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Before/after highlighting for proposed names
//!
//! The diff is deliberately coarse: common prefix and common suffix are
//! unchanged, and whatever sits between them is removed on the original side
//! and added on the proposed side.

use serde::Serialize;

use crate::proposal::RenameProposal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    Unchanged,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    pub text: String,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
}

impl DiffSegment {
    fn new(text: &[char], segment_type: SegmentType) -> Self {
        Self {
            text: text.iter().collect(),
            segment_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub original: Vec<DiffSegment>,
    pub proposed: Vec<DiffSegment>,
}

impl DiffResult {
    pub fn is_identical(&self) -> bool {
        self.original
            .iter()
            .chain(&self.proposed)
            .all(|s| s.segment_type == SegmentType::Unchanged)
    }
}

/// Character-level prefix/suffix diff; empty segments are omitted, except
/// that identical names (even two empty ones) give one `Unchanged` segment
/// per side
pub fn diff(original: &str, proposed: &str) -> DiffResult {
    if original == proposed {
        let whole = |text: &str| {
            vec![DiffSegment {
                text: text.to_string(),
                segment_type: SegmentType::Unchanged,
            }]
        };
        return DiffResult {
            original: whole(original),
            proposed: whole(proposed),
        };
    }

    let a: Vec<char> = original.chars().collect();
    let b: Vec<char> = proposed.chars().collect();

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let max_suffix = a.len().min(b.len()) - prefix;
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take(max_suffix)
        .take_while(|(x, y)| x == y)
        .count();

    let side = |chars: &[char], changed: SegmentType| {
        let middle_end = chars.len() - suffix;
        [
            (&chars[..prefix], SegmentType::Unchanged),
            (&chars[prefix..middle_end], changed),
            (&chars[middle_end..], SegmentType::Unchanged),
        ]
        .into_iter()
        .filter(|(text, _)| !text.is_empty())
        .map(|(text, kind)| DiffSegment::new(text, kind))
        .collect::<Vec<_>>()
    };

    DiffResult {
        original: side(&a, SegmentType::Removed),
        proposed: side(&b, SegmentType::Added),
    }
}

/// Diff of a proposal's names
pub fn diff_proposal(proposal: &RenameProposal) -> DiffResult {
    diff(&proposal.original_name, &proposal.proposed_name)
}

/// Inline rendering: `IMG_[-0001-]{+beach+}.jpg`
pub fn render_plain(result: &DiffResult) -> String {
    let changed = |segments: &[DiffSegment], kind: SegmentType| {
        segments.iter().find(|s| s.segment_type == kind).map(|s| s.text.clone())
    };
    let removed = changed(&result.original, SegmentType::Removed);
    let added = changed(&result.proposed, SegmentType::Added);

    // Walk the side that carries the change; a pure deletion only shows on the original side
    let walk = if added.is_some() { &result.proposed } else { &result.original };
    let mut out = String::new();
    for segment in walk {
        match segment.segment_type {
            SegmentType::Unchanged => out.push_str(&segment.text),
            SegmentType::Added | SegmentType::Removed => {
                if let Some(r) = &removed {
                    out.push_str(&format!("[-{}-]", r));
                }
                if let Some(a) = &added {
                    out.push_str(&format!("{{+{}+}}", a));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, segment_type: SegmentType) -> DiffSegment {
        DiffSegment {
            text: text.to_string(),
            segment_type,
        }
    }

    #[test]
    fn test_identical() {
        let d = diff("photo.jpg", "photo.jpg");
        assert_eq!(d.original, vec![seg("photo.jpg", SegmentType::Unchanged)]);
        assert_eq!(d.proposed, vec![seg("photo.jpg", SegmentType::Unchanged)]);
        assert!(d.is_identical());
    }

    #[test]
    fn test_middle_change() {
        let d = diff("IMG_0001.jpg", "2026-03-IMG_0001.jpg");
        assert_eq!(d.original, vec![seg("IMG_0001.jpg", SegmentType::Unchanged)]);
        assert_eq!(
            d.proposed,
            vec![
                seg("2026-03-", SegmentType::Added),
                seg("IMG_0001.jpg", SegmentType::Unchanged),
            ]
        );
    }

    #[test]
    fn test_disjoint() {
        let d = diff("abc", "xyz");
        assert_eq!(d.original, vec![seg("abc", SegmentType::Removed)]);
        assert_eq!(d.proposed, vec![seg("xyz", SegmentType::Added)]);
    }

    #[test]
    fn test_prefix_and_suffix_do_not_overlap() {
        let d = diff("aa", "aaa");
        assert_eq!(d.original, vec![seg("aa", SegmentType::Unchanged)]);
        assert_eq!(
            d.proposed,
            vec![seg("aa", SegmentType::Unchanged), seg("a", SegmentType::Added)]
        );
    }

    #[test]
    fn test_multibyte() {
        let d = diff("café.txt", "cafe.txt");
        assert_eq!(
            d.original,
            vec![
                seg("caf", SegmentType::Unchanged),
                seg("é", SegmentType::Removed),
                seg(".txt", SegmentType::Unchanged),
            ]
        );
    }

    #[test]
    fn test_render_plain() {
        assert_eq!(
            render_plain(&diff("IMG_0001.jpg", "IMG_beach.jpg")),
            "IMG_[-0001-]{+beach+}.jpg"
        );
        assert_eq!(render_plain(&diff("a.txt", "a.txt")), "a.txt");
        assert_eq!(render_plain(&diff("photo_old.jpg", "photo.jpg")), "photo[-_old-].jpg");
        assert_eq!(render_plain(&diff("", "new")), "{+new+}");
    }

    #[test]
    fn test_empty_names_give_one_unchanged_segment() {
        let d = diff("", "");
        assert!(d.is_identical());
        assert_eq!(d.original, vec![seg("", SegmentType::Unchanged)]);
        assert_eq!(d.proposed, vec![seg("", SegmentType::Unchanged)]);
        assert_eq!(render_plain(&d), "");
    }
}
