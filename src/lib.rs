// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Onoma: template-driven rename proposals
//!
//! Turns a naming template plus per-file metadata into a validated,
//! conflict-checked batch of rename and move proposals. Nothing here touches
//! the filesystem beyond read-only metadata and existence checks.

pub mod case;
pub mod config;
pub mod conflict;
pub mod context;
pub mod diff;
pub mod error;
pub mod grouped;
pub mod preview;
pub mod proposal;
pub mod resolvers;
pub mod sanitize;
pub mod template;

pub use config::AppConfig;
pub use conflict::{detect_conflicts, ConflictOptions, ConflictReport};
pub use context::FileContext;
pub use error::{OnomaError, Result};
pub use grouped::GroupedPreview;
pub use preview::{preview, preview_batch, PreviewOptions};
pub use proposal::{generate_proposals, ProposalOptions, RenameProposal, RenameStatus};
pub use sanitize::{sanitize, Platform, SanitizeOptions};
pub use template::{parse, validate, Template};
