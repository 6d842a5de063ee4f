// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Naming templates: parsing, the placeholder registry and validation

pub mod parser;
pub mod registry;
pub mod validator;

pub use parser::{parse, ParseError, ParseErrorKind, Template, Token};
pub use registry::{PlaceholderFamily, PlaceholderSpec, PLACEHOLDERS};
pub use validator::{validate, Severity, ValidationIssue, ValidationResult};
