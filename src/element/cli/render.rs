//! # Rendering Module
//!
//! Turns command results into terminal text. Every `render_*` function returns a
//! `String` so output can be checked in tests; `print_*` writes it out. Color is
//! decided by `colored` from the terminal unless a test forces it off.

use chrono::{DateTime, Utc};
use colored::Colorize;
use element::api::{CmdMessage, MessageLevel};
use element::registry::{BlockDetails, VersionInfo};

pub fn render_messages(messages: &[CmdMessage]) -> String {
    messages
        .iter()
        .map(|message| {
            let styled = match message.level {
                MessageLevel::Info => message.content.dimmed(),
                MessageLevel::Success => message.content.green(),
                MessageLevel::Warning => message.content.yellow(),
            };
            format!("{}\n", styled)
        })
        .collect()
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

pub fn render_categories(categories: &[String]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }
    categories.iter().map(|c| format!("{}\n", c)).collect()
}

pub fn render_details(details: &BlockDetails) -> String {
    let mut out = String::new();
    let name = details.name.as_deref().unwrap_or("(unnamed)");
    out.push_str(&format!("{} {}\n", name.bold(), details.id.dimmed()));
    if let Some(category) = &details.category {
        out.push_str(&format!("Category:       {}\n", category));
    }
    if let Some(is_public) = details.is_public {
        let visibility = if is_public { "public" } else { "private" };
        out.push_str(&format!("Visibility:     {}\n", visibility));
    }
    if let Some(active) = details.active_version {
        out.push_str(&format!("Active version: v{}\n", active));
    }
    if details.versions.is_empty() {
        return out;
    }
    out.push_str("Versions:\n");
    for version in &details.versions {
        out.push_str(&render_version(version));
    }
    out
}

fn render_version(version: &VersionInfo) -> String {
    let state = match version.is_released {
        Some(true) => "released".green(),
        Some(false) => "staged  ".yellow(),
        None => "        ".normal(),
    };
    let created = version
        .created_on
        .map(format_time_ago)
        .unwrap_or_default();
    let note = version.note.as_deref().unwrap_or_default();
    let line = format!(
        "  v{:<4} {} {}  {}",
        version.version,
        state,
        format!("{:>16}", created).dimmed(),
        note
    );
    format!("{}\n", line.trim_end())
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    timeago::Formatter::new().convert(duration.to_std().unwrap_or_default())
}

pub fn print_details(details: &BlockDetails) {
    print!("{}", render_details(details));
}

pub fn print_categories(categories: &[String]) {
    print!("{}", render_categories(categories));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_messages_empty() {
        assert!(render_messages(&[]).is_empty());
    }

    #[test]
    fn test_render_messages_multiple() {
        plain();
        let output = render_messages(&[
            CmdMessage::info("Cloning boilerplate for hero..."),
            CmdMessage::warning("Problem removing hero/LICENSE"),
            CmdMessage::success("Published Hero v1 for staging\nID block-1"),
        ]);
        assert_eq!(
            output,
            "Cloning boilerplate for hero...\nProblem removing hero/LICENSE\nPublished Hero v1 for staging\nID block-1\n"
        );
    }

    #[test]
    fn test_render_categories() {
        plain();
        assert_eq!(render_categories(&[]), "No categories found.\n");
        assert_eq!(
            render_categories(&["Layout".into(), "Widgets".into()]),
            "Layout\nWidgets\n"
        );
    }

    #[test]
    fn test_render_details() {
        plain();
        let details = BlockDetails {
            id: "block-1".into(),
            name: Some("Hero".into()),
            category: Some("Layout".into()),
            is_public: Some(false),
            active_version: Some(2),
            versions: vec![
                VersionInfo {
                    version: 2,
                    created_on: Some(Utc::now() - Duration::days(3)),
                    is_released: Some(false),
                    note: None,
                },
                VersionInfo {
                    version: 1,
                    created_on: Some(Utc::now() - Duration::days(40)),
                    is_released: Some(true),
                    note: Some("First release".into()),
                },
            ],
            ..BlockDetails::default()
        };

        let output = render_details(&details);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Hero block-1");
        assert_eq!(lines[1], "Category:       Layout");
        assert_eq!(lines[2], "Visibility:     private");
        assert_eq!(lines[3], "Active version: v2");
        assert_eq!(lines[4], "Versions:");
        assert!(lines[5].starts_with("  v2    staged"));
        assert!(lines[5].contains("3 days ago"));
        assert!(lines[6].starts_with("  v1    released"));
        assert!(lines[6].ends_with("First release"));
    }
}
