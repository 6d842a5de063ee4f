// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Conflict and issue detection over a batch of proposals
//!
//! Two passes run over the proposals in scan order:
//!
//! 1. **Batch duplicates**: proposals sharing a destination directory and a
//!    case-insensitive name all get a `DUPLICATE_PROPOSED` error naming the
//!    other members, plus a counter-suffixed alternative.
//! 2. **Filesystem collisions**: proposals whose target already exists on disk
//!    get a `FILE_EXISTS` error with a timestamp-suffixed alternative.
//!
//! Disk check failures (permission denied and the like) never stop the batch; they
//! are collected into the report.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::proposal::{
    codes, ActionSummary, FileAction, Issue, ProposalSummary, RenameProposal, RenameStatus,
};
use crate::sanitize::split_filename;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictOptions {
    /// Check the filesystem for existing targets
    pub check_filesystem: bool,
    /// Override filesystem case sensitivity; `None` uses the platform default
    pub case_sensitive: Option<bool>,
}

impl Default for ConflictOptions {
    fn default() -> Self {
        Self {
            check_filesystem: true,
            case_sensitive: None,
        }
    }
}

impl ConflictOptions {
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
            .unwrap_or(!cfg!(any(windows, target_os = "macos")))
    }
}

/// Proposals competing for one destination name
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub directory: PathBuf,
    /// Lower-cased proposed name shared by the group
    pub name: String,
    /// Proposal ids in scan order
    pub members: Vec<String>,
}

/// A filesystem check that could not be answered
#[derive(Debug, Clone, Serialize)]
pub struct DiskCheckError {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictSummary {
    pub duplicate_groups: usize,
    pub duplicate_proposals: usize,
    pub existing_files: usize,
    pub disk_check_failures: usize,
    pub blocked: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub proposals: Vec<RenameProposal>,
    pub duplicate_groups: Vec<DuplicateGroup>,
    pub disk_errors: Vec<DiskCheckError>,
    pub summary: ConflictSummary,
}

impl ConflictReport {
    /// True iff every proposal can proceed
    pub fn can_execute(&self) -> bool {
        self.proposals.iter().all(RenameProposal::can_proceed)
    }

    pub fn proposal_summary(&self) -> ProposalSummary {
        ProposalSummary::from_proposals(&self.proposals)
    }

    pub fn action_summary(&self) -> ActionSummary {
        ActionSummary::from_proposals(&self.proposals)
    }
}

/// Run both passes using the current local time for collision suggestions
pub fn detect_conflicts(
    proposals: Vec<RenameProposal>,
    options: &ConflictOptions,
) -> ConflictReport {
    detect_conflicts_at(proposals, options, Local::now())
}

/// Run both passes with a fixed timestamp for collision suggestions
pub fn detect_conflicts_at(
    mut proposals: Vec<RenameProposal>,
    options: &ConflictOptions,
    now: DateTime<Local>,
) -> ConflictReport {
    let duplicate_groups = flag_duplicates(&mut proposals);

    let mut disk_errors = Vec::new();
    let mut existing_files = 0;
    if options.check_filesystem {
        let case_sensitive = options.is_case_sensitive();
        for proposal in proposals.iter_mut() {
            match target_exists(proposal, case_sensitive) {
                Ok(false) => {}
                Ok(true) => {
                    existing_files += 1;
                    let issue = Issue::new(
                        codes::FILE_EXISTS,
                        format!("A file already exists at {}", proposal.proposed_path.display()),
                    )
                    .with_suggestion(timestamp_alternative(&proposal.proposed_name, &now))
                    .with_conflicts([proposal.proposed_path.to_string_lossy().to_string()]);
                    mark_conflict(proposal, issue);
                }
                Err(error) => {
                    warn!("Could not check {}: {}", proposal.proposed_path.display(), error);
                    disk_errors.push(DiskCheckError {
                        path: proposal.proposed_path.clone(),
                        message: error.to_string(),
                    });
                }
            }
        }
    }

    let summary = ConflictSummary {
        duplicate_groups: duplicate_groups.len(),
        duplicate_proposals: duplicate_groups.iter().map(|g| g.members.len()).sum(),
        existing_files,
        disk_check_failures: disk_errors.len(),
        blocked: proposals.iter().filter(|p| !p.can_proceed()).count(),
    };

    info!(
        "Conflict check: {} proposals, {} duplicate groups, {} existing targets, {} blocked",
        proposals.len(),
        summary.duplicate_groups,
        summary.existing_files,
        summary.blocked
    );

    ConflictReport {
        proposals,
        duplicate_groups,
        disk_errors,
        summary,
    }
}

fn mark_conflict(proposal: &mut RenameProposal, issue: Issue) {
    proposal.issues.push(issue);
    if proposal.status != RenameStatus::InvalidName {
        proposal.status = RenameStatus::Conflict;
        proposal.action = FileAction::Conflict;
    }
}

type GroupKey = (PathBuf, String);

fn group_key(proposal: &RenameProposal) -> GroupKey {
    (
        proposal.destination_dir().to_path_buf(),
        proposal.proposed_name.to_lowercase(),
    )
}

/// Flag every member of every duplicate group, in first-occurrence order
fn flag_duplicates(proposals: &mut [RenameProposal]) -> Vec<DuplicateGroup> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, Vec<usize>> = HashMap::new();
    let mut taken: HashMap<PathBuf, HashSet<String>> = HashMap::new();

    for (index, proposal) in proposals.iter().enumerate() {
        if proposal.status == RenameStatus::InvalidName {
            continue;
        }
        let key = group_key(proposal);
        taken.entry(key.0.clone()).or_default().insert(key.1.clone());
        let members = groups.entry(key.clone()).or_default();
        if members.is_empty() {
            order.push(key);
        }
        members.push(index);
    }

    let mut result = Vec::new();
    for key in order {
        let members = &groups[&key];
        if members.len() < 2 {
            continue;
        }
        debug!("Duplicate target {:?} in {} ({} proposals)", key.1, key.0.display(), members.len());

        let used = taken.entry(key.0.clone()).or_default();
        let paths: Vec<String> = members
            .iter()
            .map(|&i| proposals[i].original_path.to_string_lossy().to_string())
            .collect();

        let mut counter = 0;
        for (position, &index) in members.iter().enumerate() {
            let proposal = &mut proposals[index];
            let suggestion = next_counter_name(&proposal.proposed_name, &mut counter, used);
            let others = paths
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != position)
                .map(|(_, path)| path.clone());
            let issue = Issue::new(
                codes::DUPLICATE_PROPOSED,
                format!(
                    "{} other file(s) in this batch would also be named \"{}\"",
                    members.len() - 1,
                    proposal.proposed_name
                ),
            )
            .with_suggestion(suggestion)
            .with_conflicts(others);
            mark_conflict(proposal, issue);
        }

        result.push(DuplicateGroup {
            directory: key.0.clone(),
            name: key.1.clone(),
            members: members.iter().map(|&i| proposals[i].id.clone()).collect(),
        });
    }
    result
}

/// `stem_N.ext` with the smallest counter above the last one that is free
fn next_counter_name(name: &str, counter: &mut usize, used: &mut HashSet<String>) -> String {
    let (stem, ext) = split_filename(name);
    loop {
        *counter += 1;
        let candidate = if ext.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, ext)
        };
        if used.insert(candidate.to_lowercase()) {
            return candidate;
        }
    }
}

fn timestamp_alternative(name: &str, now: &DateTime<Local>) -> String {
    let (stem, ext) = split_filename(name);
    let stamp = now.format("%H%M%S");
    if ext.is_empty() {
        format!("{}_{}", stem, stamp)
    } else {
        format!("{}_{}.{}", stem, stamp, ext)
    }
}

/// Whether the target exists and is not the source itself
fn target_exists(proposal: &RenameProposal, case_sensitive: bool) -> std::io::Result<bool> {
    if proposal.proposed_path == proposal.original_path {
        return Ok(false);
    }
    if !case_sensitive && same_ignoring_case(&proposal.proposed_path, &proposal.original_path) {
        return Ok(false);
    }
    match std::fs::symlink_metadata(&proposal.proposed_path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn same_ignoring_case(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}
