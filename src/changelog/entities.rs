use serde::Serialize;

use super::extract::{extract_changelog_entries, extract_issue_reference};
use crate::github::types::{RawIssue, RawMilestone};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub id: u64,
    pub label: String,
}

impl From<RawMilestone> for Milestone {
    fn from(raw: RawMilestone) -> Self {
        Milestone {
            id: raw.number,
            label: raw.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub id: u64,
    pub url: String,
    pub body: String,
    pub labels: Vec<String>,
}

impl Issue {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        Issue {
            id: raw.number,
            url: raw.html_url,
            body: raw.body.unwrap_or_default(),
            labels: raw.labels.into_iter().map(|label| label.name).collect(),
        }
    }
}

/// A pull request reduced to what the changelog needs. The description is
/// parsed once, on conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    pub id: u64,
    pub url: String,
    /// Changelog bullets from the description; empty when there are none.
    pub body: String,
    /// Number from the first `fixes #N` in the description.
    pub issue_number: Option<String>,
}

impl PullRequest {
    pub fn new(id: u64, url: impl Into<String>, description: &str) -> Self {
        PullRequest {
            id,
            url: url.into(),
            body: extract_changelog_entries(description),
            issue_number: extract_issue_reference(description),
        }
    }
}

impl From<RawIssue> for PullRequest {
    fn from(raw: RawIssue) -> Self {
        PullRequest::new(raw.number, raw.html_url, raw.body.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::RawLabel;

    fn raw(number: u64, body: Option<&str>, labels: &[&str]) -> RawIssue {
        RawIssue {
            number,
            html_url: format!("https://github.com/Yoast/wordpress-seo/pull/{}", number),
            body: body.map(str::to_string),
            labels: labels
                .iter()
                .map(|name| RawLabel {
                    name: name.to_string(),
                })
                .collect(),
            pull_request: None,
        }
    }

    #[test]
    fn pull_request_extracts_entries_and_reference() {
        let pr = PullRequest::from(raw(
            42,
            Some("## Summary\n\nThis PR can be summarized in the following changelog entry:\n\n* Fixes a bug.\n\nFixes #17"),
            &[],
        ));

        assert_eq!(pr.id, 42);
        assert_eq!(pr.url, "https://github.com/Yoast/wordpress-seo/pull/42");
        assert_eq!(pr.body, "* Fixes a bug.");
        assert_eq!(pr.issue_number.as_deref(), Some("17"));
    }

    #[test]
    fn pull_request_without_description() {
        let pr = PullRequest::from(raw(1, None, &[]));

        assert_eq!(pr.body, "");
        assert_eq!(pr.issue_number, None);
    }

    #[test]
    fn issue_projects_label_names() {
        let issue = Issue::from(raw(5, Some("Broken"), &["bug", "backend"]));

        assert_eq!(issue.labels, vec!["bug", "backend"]);
        assert!(issue.has_label("bug"));
        assert!(!issue.has_label("Bug"));
    }

    #[test]
    fn issue_without_labels_has_none() {
        let issue = Issue::from(raw(5, None, &[]));

        assert!(issue.labels.is_empty());
        assert_eq!(issue.body, "");
    }

    #[test]
    fn milestone_from_record() {
        let milestone = Milestone::from(RawMilestone {
            number: 9,
            title: "12.0".to_string(),
        });

        assert_eq!(
            milestone,
            Milestone {
                id: 9,
                label: "12.0".to_string()
            }
        );
    }
}
