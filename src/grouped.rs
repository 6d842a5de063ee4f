// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Display-oriented partition of a proposal batch

use serde::Serialize;

use crate::proposal::{codes, RenameProposal, RenameStatus};

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueGroups<'a> {
    pub conflicts: Vec<&'a RenameProposal>,
    pub missing_data: Vec<&'a RenameProposal>,
    pub invalid_names: Vec<&'a RenameProposal>,
    pub other: Vec<&'a RenameProposal>,
}

impl IssueGroups<'_> {
    pub fn len(&self) -> usize {
        self.conflicts.len() + self.missing_data.len() + self.invalid_names.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedSummary {
    pub total: usize,
    pub total_ready: usize,
    pub total_issues: usize,
    pub total_unchanged: usize,
    /// Proposals with at least one error-severity issue
    pub blocked_count: usize,
    pub can_proceed_count: usize,
    pub ready_percent: f64,
    pub issues_percent: f64,
    pub unchanged_percent: f64,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedPreview<'a> {
    pub ready: Vec<&'a RenameProposal>,
    pub unchanged: Vec<&'a RenameProposal>,
    pub issues: IssueGroups<'a>,
    pub summary: GroupedSummary,
}

enum Bucket {
    Ready,
    Unchanged,
    Conflict,
    MissingData,
    InvalidName,
    Other,
}

/// Status decides first; proposals still marked ready are sorted by their issue codes
fn bucket_for(proposal: &RenameProposal) -> Bucket {
    match proposal.status {
        RenameStatus::NoChange => return Bucket::Unchanged,
        RenameStatus::Conflict => return Bucket::Conflict,
        RenameStatus::MissingData => return Bucket::MissingData,
        RenameStatus::InvalidName => return Bucket::InvalidName,
        RenameStatus::Ready => {}
    }

    let blocking: Vec<&str> = proposal
        .issues
        .iter()
        .filter(|i| i.is_blocking())
        .map(|i| i.code.as_str())
        .collect();
    if blocking.is_empty() {
        return Bucket::Ready;
    }
    let is_conflict = |c: &&str| {
        *c == codes::DUPLICATE_PROPOSED || *c == codes::FILE_EXISTS || c.starts_with("CONFLICT")
    };
    if blocking.iter().any(is_conflict) {
        Bucket::Conflict
    } else if blocking.iter().any(|c| c.starts_with("INVALID")) {
        Bucket::InvalidName
    } else {
        Bucket::Other
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

impl<'a> GroupedPreview<'a> {
    pub fn new(proposals: &'a [RenameProposal]) -> Self {
        let mut grouped = GroupedPreview::default();
        for proposal in proposals {
            match bucket_for(proposal) {
                Bucket::Ready => grouped.ready.push(proposal),
                Bucket::Unchanged => grouped.unchanged.push(proposal),
                Bucket::Conflict => grouped.issues.conflicts.push(proposal),
                Bucket::MissingData => grouped.issues.missing_data.push(proposal),
                Bucket::InvalidName => grouped.issues.invalid_names.push(proposal),
                Bucket::Other => grouped.issues.other.push(proposal),
            }
        }

        let total = proposals.len();
        let can_proceed_count = proposals.iter().filter(|p| p.can_proceed()).count();
        let total_issues = grouped.issues.len();
        grouped.summary = GroupedSummary {
            total,
            total_ready: grouped.ready.len(),
            total_issues,
            total_unchanged: grouped.unchanged.len(),
            blocked_count: total - can_proceed_count,
            can_proceed_count,
            ready_percent: percent(grouped.ready.len(), total),
            issues_percent: percent(total_issues, total),
            unchanged_percent: percent(grouped.unchanged.len(), total),
        };
        grouped
    }
}
