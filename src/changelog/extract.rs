//! Pulls structured data out of free-form pull request descriptions.

use regex::Regex;
use std::sync::LazyLock;

/// The phrase authors use to introduce changelog bullets, plus the
/// whitespace separating it from the first bullet.
static CHANGELOG_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"This PR can be summarized in the following changelog (?:entry|entries):\s+")
        .expect("Invalid changelog marker regex")
});

static ISSUE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)fixes:?\s?#(\d+)").expect("Invalid issue reference regex"));

/// Returns the bullet lines that directly follow the changelog marker,
/// joined by `\n`. Collection stops at the first line that is not a
/// `* ` bullet, so a blank line or heading ends the section.
///
/// Bodies without the marker, or with no bullet after it, yield `""`.
pub fn extract_changelog_entries(body: &str) -> String {
    let Some(marker) = CHANGELOG_MARKER.find(body) else {
        return String::new();
    };

    body[marker.end()..]
        .lines()
        .take_while(|line| is_bullet(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the digits of the first `fixes #N` reference (case-insensitive,
/// optional colon), kept as text.
pub fn extract_issue_reference(body: &str) -> Option<String> {
    ISSUE_REFERENCE
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|number| number.as_str().to_string())
}

fn is_bullet(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some('*')
        && chars.next().is_some_and(|c| c == ' ' || c == '\t')
        && !chars.as_str().is_empty()
}
