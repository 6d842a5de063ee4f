// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Case styles for proposed names

use serde::{Deserialize, Serialize};
use std::str::FromStr;

const WORD_SEPARATORS: &[char] = &[' ', '_', '-', '.'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStyle {
    #[default]
    None,
    Lowercase,
    Uppercase,
    Capitalize,
    TitleCase,
    KebabCase,
    SnakeCase,
    CamelCase,
    PascalCase,
}

impl FromStr for CaseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let style = match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "none" => CaseStyle::None,
            "lowercase" | "lower" => CaseStyle::Lowercase,
            "uppercase" | "upper" => CaseStyle::Uppercase,
            "capitalize" => CaseStyle::Capitalize,
            "title-case" | "title" => CaseStyle::TitleCase,
            "kebab-case" | "kebab" => CaseStyle::KebabCase,
            "snake-case" | "snake" => CaseStyle::SnakeCase,
            "camel-case" | "camelcase" | "camel" => CaseStyle::CamelCase,
            "pascal-case" | "pascalcase" | "pascal" => CaseStyle::PascalCase,
            other => return Err(format!("unknown case style: {}", other)),
        };
        Ok(style)
    }
}

/// Split on separators and lower-to-upper camelCase boundaries
pub fn split_into_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in input.chars() {
        if WORD_SEPARATORS.contains(&c) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev_lower = c.is_lowercase();
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn join_mapped(words: &[String], sep: &str, f: impl Fn(&str) -> String) -> String {
    words.iter().map(|w| f(w.as_str())).collect::<Vec<_>>().join(sep)
}

/// Apply a style to a base name (no extension handling)
pub fn apply_case(name: &str, style: CaseStyle) -> String {
    if style == CaseStyle::None || name.is_empty() {
        return name.to_string();
    }

    let words = split_into_words(name);
    match style {
        CaseStyle::None => name.to_string(),
        CaseStyle::Lowercase => join_mapped(&words, " ", str::to_lowercase),
        CaseStyle::Uppercase => join_mapped(&words, " ", str::to_uppercase),
        CaseStyle::Capitalize => words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { capitalize_word(w) } else { w.to_lowercase() })
            .collect::<Vec<_>>()
            .join(" "),
        CaseStyle::TitleCase => join_mapped(&words, " ", capitalize_word),
        CaseStyle::KebabCase => join_mapped(&words, "-", str::to_lowercase),
        CaseStyle::SnakeCase => join_mapped(&words, "_", str::to_lowercase),
        CaseStyle::CamelCase => words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize_word(w) })
            .collect(),
        CaseStyle::PascalCase => join_mapped(&words, "", capitalize_word),
    }
}

/// Apply a style to a full filename: the base name is restyled, the
/// extension lower-cased, and a leading dotfile dot kept.
pub fn normalize_filename(filename: &str, style: CaseStyle) -> String {
    if style == CaseStyle::None || filename.is_empty() {
        return filename.to_string();
    }

    let (prefix, working) = match filename.strip_prefix('.') {
        Some(rest) => (".", rest),
        None => ("", filename),
    };
    let (name, extension) = match working.rfind('.') {
        Some(0) | None => (working, ""),
        Some(pos) => working.split_at(pos),
    };

    format!("{}{}{}", prefix, apply_case(name, style), extension.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_into_words() {
        assert_eq!(split_into_words("hello world"), vec!["hello", "world"]);
        assert_eq!(split_into_words("my_file-name.v2"), vec!["my", "file", "name", "v2"]);
        assert_eq!(split_into_words("helloWorld"), vec!["hello", "World"]);
        assert_eq!(split_into_words("HelloWorld"), vec!["Hello", "World"]);
        assert_eq!(split_into_words("IMG"), vec!["IMG"]);
    }

    #[test]
    fn test_styles() {
        let name = "my vacation_Photo";
        assert_eq!(apply_case(name, CaseStyle::None), name);
        assert_eq!(apply_case(name, CaseStyle::Lowercase), "my vacation photo");
        assert_eq!(apply_case(name, CaseStyle::Uppercase), "MY VACATION PHOTO");
        assert_eq!(apply_case(name, CaseStyle::Capitalize), "My vacation photo");
        assert_eq!(apply_case(name, CaseStyle::TitleCase), "My Vacation Photo");
        assert_eq!(apply_case(name, CaseStyle::KebabCase), "my-vacation-photo");
        assert_eq!(apply_case(name, CaseStyle::SnakeCase), "my_vacation_photo");
        assert_eq!(apply_case(name, CaseStyle::CamelCase), "myVacationPhoto");
        assert_eq!(apply_case(name, CaseStyle::PascalCase), "MyVacationPhoto");
    }

    #[test]
    fn test_normalize_filename() {
        assert_eq!(normalize_filename("My Photo.JPG", CaseStyle::SnakeCase), "my_photo.jpg");
        assert_eq!(normalize_filename(".Hidden File", CaseStyle::KebabCase), ".hidden-file");
        assert_eq!(normalize_filename("Keep.JPG", CaseStyle::None), "Keep.JPG");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("snake_case".parse::<CaseStyle>(), Ok(CaseStyle::SnakeCase));
        assert_eq!("camelCase".parse::<CaseStyle>(), Ok(CaseStyle::CamelCase));
        assert_eq!("Title".parse::<CaseStyle>(), Ok(CaseStyle::TitleCase));
        assert!("shouting".parse::<CaseStyle>().is_err());
    }
}
