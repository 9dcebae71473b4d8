//! Name and version formatting helpers.

use crate::registry::VersionInfo;
use std::cmp::Ordering;

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title-case each space separated word: "a string" -> "A String".
pub fn format_name(input: &str) -> String {
    input
        .to_lowercase()
        .split(' ')
        .map(upper_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse a free-form name into PascalCase: "cool_block" -> "CoolBlock".
///
/// Dashes and underscores separate words, other punctuation is dropped. The first
/// word keeps its inner casing, which makes the conversion idempotent on input that
/// is already PascalCase; later words are lower-cased after their first letter.
pub fn to_pascal_case(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut words = cleaned.split_whitespace();
    let mut out = match words.next() {
        Some(first) => upper_first(first),
        None => return String::new(),
    };

    for word in words {
        if word.chars().count() < 2 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Newest first: by version, then by creation time, both descending.
pub fn sort_versions(mut versions: Vec<VersionInfo>) -> Vec<VersionInfo> {
    versions.sort_by(|a, b| match b.version.cmp(&a.version) {
        Ordering::Equal => b.created_on.cmp(&a.created_on),
        other => other,
    });
    versions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    const WORD: &str = "word";
    const A_STRING: &str = "a string";
    const ANOTHER_STRING: &str = "this is another string";

    #[test]
    fn format_name_upper_cases_each_word() {
        assert_eq!(format_name(WORD), "Word");
        assert_eq!(format_name(A_STRING), "A String");
        assert_eq!(format_name(ANOTHER_STRING), "This Is Another String");
        assert_eq!(format_name("MY WIDGET"), "My Widget");
    }

    #[test]
    fn pascal_case_single_word() {
        assert_eq!(to_pascal_case(WORD), "Word");
    }

    #[test]
    fn pascal_case_multiple_words() {
        assert_eq!(to_pascal_case(A_STRING), "AString");
        assert_eq!(to_pascal_case(ANOTHER_STRING), "ThisIsAnotherString");
        assert_eq!(to_pascal_case("my widget"), "MyWidget");
    }

    #[test]
    fn pascal_case_separators_and_punctuation() {
        assert_eq!(to_pascal_case("cool_block"), "CoolBlock");
        assert_eq!(to_pascal_case("hero--banner"), "HeroBanner");
        assert_eq!(to_pascal_case("what's new!"), "WhatsNew");
    }

    #[test]
    fn pascal_case_is_idempotent() {
        assert_eq!(to_pascal_case("PascalCase"), "PascalCase");
        assert_eq!(
            to_pascal_case(&to_pascal_case(ANOTHER_STRING)),
            "ThisIsAnotherString"
        );
    }

    fn at(ts: &str) -> Option<DateTime<Utc>> {
        Some(ts.parse().unwrap())
    }

    fn version(version: u32, created_on: &str) -> VersionInfo {
        VersionInfo {
            version,
            created_on: at(created_on),
            ..VersionInfo::default()
        }
    }

    #[test]
    fn sorts_by_version_then_created_on() {
        let versions = vec![
            version(1, "2019-03-05T16:52:30.276Z"),
            version(1, "2020-03-05T16:52:30.276Z"),
            version(2, "2019-03-05T16:52:30.276Z"),
            version(2, "2020-03-05T16:52:30.276Z"),
        ];

        let sorted: Vec<_> = sort_versions(versions)
            .into_iter()
            .map(|v| (v.version, v.created_on))
            .collect();

        assert_eq!(
            sorted,
            vec![
                (2, at("2020-03-05T16:52:30.276Z")),
                (2, at("2019-03-05T16:52:30.276Z")),
                (1, at("2020-03-05T16:52:30.276Z")),
                (1, at("2019-03-05T16:52:30.276Z")),
            ]
        );
    }
}
