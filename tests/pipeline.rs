// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use std::path::PathBuf;

use onoma::diff::{diff, render_plain};
use onoma::grouped::GroupedPreview;
use onoma::proposal::codes;
use onoma::{
    detect_conflicts, generate_proposals, preview, sanitize, validate, ConflictOptions,
    FileContext, Platform, PreviewOptions, ProposalOptions, RenameStatus, SanitizeOptions,
};

fn no_fs() -> ConflictOptions {
    ConflictOptions {
        check_filesystem: false,
        case_sensitive: None,
    }
}

fn resolved<'a>(preview: &'a onoma::preview::FilePreview, placeholder: &str) -> &'a str {
    preview
        .resolutions
        .iter()
        .find(|r| r.placeholder == placeholder)
        .map(|r| r.value.as_str())
        .unwrap()
}

#[test]
fn test_dated_photo_rename() {
    let file = FileContext::new("/photos/IMG_0001.jpg")
        .with_modified(Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap());

    let options = ProposalOptions::default();
    let batch = generate_proposals("{year}-{month}-{original}", &[file], &options);
    let report = detect_conflicts(batch.proposals, &no_fs());

    let p = &report.proposals[0];
    assert_eq!(p.proposed_name, "2026-03-IMG_0001.jpg");
    assert_eq!(p.proposed_path, PathBuf::from("/photos/2026-03-IMG_0001.jpg"));
    assert_eq!(p.status, RenameStatus::Ready);
    assert!(report.can_execute());
    assert_eq!(
        render_plain(&diff(&p.original_name, &p.proposed_name)),
        "{+2026-03-+}IMG_0001.jpg"
    );
}

#[test]
fn test_smart_name_drops_leading_date() {
    let file = FileContext::new("/docs/2026-01-15-vacation.txt")
        .with_modified(Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap());

    let result = preview("{year}-{name}", &file, &PreviewOptions::default()).unwrap();
    assert_eq!(resolved(&result, "name"), "vacation");
    assert_eq!(result.proposed_name, "2026-vacation.txt");
}

#[test]
fn test_smart_name_keeps_middle_date() {
    let file = FileContext::new("/docs/vacation-2024-party.txt")
        .with_modified(Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap());

    let result = preview("{year}_{name}", &file, &PreviewOptions::default()).unwrap();
    assert_eq!(resolved(&result, "name"), "vacation-2024-party");
    assert_eq!(result.proposed_name, "2024_vacation-2024-party.txt");
}

#[test]
fn test_duplicate_targets_get_distinct_suggestions() {
    let files = vec![FileContext::new("/p/a.jpg"), FileContext::new("/p/b.jpg")];
    let batch = generate_proposals("photo", &files, &ProposalOptions::default());
    let report = detect_conflicts(batch.proposals, &no_fs());

    assert_eq!(report.duplicate_groups.len(), 1);
    assert!(!report.can_execute());

    let suggestions: HashSet<String> = report
        .proposals
        .iter()
        .map(|p| {
            assert_eq!(p.status, RenameStatus::Conflict);
            p.issues
                .iter()
                .find(|i| i.code == codes::DUPLICATE_PROPOSED)
                .and_then(|i| i.suggestion.clone())
                .unwrap()
        })
        .collect();
    assert_eq!(suggestions.len(), 2);
    assert!(!suggestions.contains("photo.jpg"));

    let grouped = GroupedPreview::new(&report.proposals);
    assert_eq!(grouped.issues.conflicts.len(), 2);
    assert_eq!(grouped.summary.blocked_count, 2);
}

#[test]
fn test_reserved_name_per_platform() {
    let all = sanitize("CON.txt", &SanitizeOptions::for_platform(Platform::All));
    assert_eq!(all.sanitized, "CON_file.txt");
    assert!(all.was_modified);

    let linux = sanitize("CON.txt", &SanitizeOptions::for_platform(Platform::Linux));
    assert_eq!(linux.sanitized, "CON.txt");
    assert!(linux.changes.is_empty());
}

#[test]
fn test_misspelled_placeholder() {
    let result = validate("{unknwn}");
    assert!(!result.valid);
    assert!(result.errors().any(|i| i.code == "unknown_placeholder"));

    let close = validate("{orignal}");
    let issue = close.errors().next().unwrap();
    assert_eq!(issue.suggestion.as_deref(), Some("original"));
}

#[test]
fn test_invalid_template_blocks_batch() {
    let files = vec![FileContext::new("/p/a.jpg")];
    let batch = generate_proposals("{year", &files, &ProposalOptions::default());
    let p = &batch.proposals[0];
    assert_eq!(p.status, RenameStatus::InvalidName);
    assert!(p.has_issue(codes::INVALID_TEMPLATE));
    assert!(!p.can_proceed());
}

#[test]
fn test_sanitize_is_idempotent() {
    let long_ext = format!("CONSOLE.{}", "e".repeat(251));
    let inputs = [
        "report: final?.pdf",
        "CON.txt",
        "CONSOLE.txt",
        "trailing dots...",
        "a/b\\c*d",
        "  spaced  ",
        "ümlaut<>|.md",
        long_ext.as_str(),
        "",
    ];
    for platform in [Platform::Windows, Platform::Macos, Platform::Linux, Platform::All] {
        for max_length in [7, 255] {
            let options = SanitizeOptions {
                max_length,
                ..SanitizeOptions::for_platform(platform)
            };
            for input in inputs {
                let once = sanitize(input, &options);
                assert!(once.sanitized.len() <= options.max_length, "{input:?} on {platform}");
                let twice = sanitize(&once.sanitized, &options);
                assert_eq!(twice.sanitized, once.sanitized, "{input:?} on {platform}");
                assert!(!twice.was_modified, "{input:?} on {platform}");
            }
        }
    }
}

#[test]
fn test_reapplying_template_with_stripping_is_stable() {
    let taken = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
    let mut options = PreviewOptions::default();
    options.resolve.strip_existing_patterns = true;

    let first = preview(
        "{date}_{original}",
        &FileContext::new("/photos/beach.jpg").with_modified(taken),
        &options,
    )
    .unwrap();
    assert_eq!(first.proposed_name, "2026-03-14_beach.jpg");

    let renamed = FileContext::new(format!("/photos/{}", first.proposed_name)).with_modified(taken);
    let second = preview("{date}_{original}", &renamed, &options).unwrap();
    assert_eq!(second.proposed_name, first.proposed_name);

    let counted = FileContext::new("/photos/photo_1.jpg");
    let p = preview("{original}", &counted, &options).unwrap();
    assert_eq!(p.proposed_name, "photo.jpg");

    // Without the option the date stacks up
    let stacked = preview("{date}_{original}", &renamed, &PreviewOptions::default()).unwrap();
    assert_eq!(stacked.proposed_name, "2026-03-14_2026-03-14_beach.jpg");
}

#[test]
fn test_organize_by_category() {
    let options = ProposalOptions {
        folder_pattern: Some("{category}".to_string()),
        destination_root: Some(PathBuf::from("/sorted")),
        ..ProposalOptions::default()
    };
    let files = vec![FileContext::new("/inbox/a.jpg"), FileContext::new("/inbox/notes.md")];
    let batch = generate_proposals("{original}.{extension}", &files, &options);
    assert_eq!(batch.proposals[0].proposed_path, PathBuf::from("/sorted/Images/a.jpg"));
    assert_eq!(batch.proposals[1].proposed_path, PathBuf::from("/sorted/Documents/notes.md"));
}

#[test]
fn test_self_diff_is_unchanged() {
    let d = diff("holiday.png", "holiday.png");
    assert!(d.is_identical());
    assert_eq!(d.original, d.proposed);
    assert_eq!(render_plain(&d), "holiday.png");
}

#[test]
fn test_existing_file_collision_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("report.txt"), b"old").unwrap();
    let source = dir.path().join("draft.txt");
    std::fs::write(&source, b"new").unwrap();

    let file = FileContext::from_path(&source).unwrap();
    let batch = generate_proposals("report", &[file], &ProposalOptions::default());
    let report = detect_conflicts(batch.proposals, &ConflictOptions::default());

    let p = &report.proposals[0];
    assert!(p.has_issue(codes::FILE_EXISTS));
    assert_eq!(p.status, RenameStatus::Conflict);
    assert_eq!(report.summary.existing_files, 1);
}
