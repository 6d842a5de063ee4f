// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Onoma

use thiserror::Error;

use crate::preview::PreviewError;
use crate::template::ParseError;

/// Result type alias for Onoma operations
pub type Result<T> = std::result::Result<T, OnomaError>;

/// Onoma error types
#[derive(Error, Debug)]
pub enum OnomaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] ParseError),

    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
