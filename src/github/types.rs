use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMilestone {
    pub number: u64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLabel {
    pub name: String,
}

/// A record from the issues listing. GitHub returns pull requests through
/// the same endpoint; those carry a `pull_request` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIssue {
    pub number: u64,
    pub html_url: String,
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl RawIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pull_request_marker_distinguishes_records() {
        let issue: RawIssue = serde_json::from_value(json!({
            "number": 5,
            "html_url": "https://github.com/Yoast/wordpress-seo/issues/5",
            "body": null,
        }))
        .unwrap();
        let pull: RawIssue = serde_json::from_value(json!({
            "number": 6,
            "html_url": "https://github.com/Yoast/wordpress-seo/pull/6",
            "body": "Fixes #5",
            "labels": [{ "name": "bug", "color": "ff0000" }],
            "pull_request": { "url": "https://api.github.com/repos/Yoast/wordpress-seo/pulls/6" },
        }))
        .unwrap();

        assert!(!issue.is_pull_request());
        assert!(issue.labels.is_empty());
        assert!(pull.is_pull_request());
        assert_eq!(pull.labels[0].name, "bug");
    }
}
