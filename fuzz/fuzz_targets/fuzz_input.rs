// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use onoma::sanitize::{sanitize, Platform, SanitizeOptions};
use onoma::template::{parse, validate};

#[derive(Debug, Arbitrary)]
struct Input {
    pattern: String,
    filename: String,
    platform: u8,
    max_length: u8,
}

fuzz_target!(|input: Input| {
    // Parsing must never panic, and a parsed template must print back to itself
    if let Ok(template) = parse(&input.pattern) {
        assert_eq!(template.to_pattern(), input.pattern);
    }
    let _ = validate(&input.pattern);

    let platform = match input.platform % 4 {
        0 => Platform::Windows,
        1 => Platform::Macos,
        2 => Platform::Linux,
        _ => Platform::All,
    };
    let options = SanitizeOptions {
        max_length: usize::from(input.max_length).max(1),
        ..SanitizeOptions::for_platform(platform)
    };

    let once = sanitize(&input.filename, &options);
    assert!(once.sanitized.len() <= options.max_length);
    let twice = sanitize(&once.sanitized, &options);
    assert_eq!(twice.sanitized, once.sanitized);
    assert!(!twice.was_modified);
});
