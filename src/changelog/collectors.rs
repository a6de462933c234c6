use super::entities::{Issue, Milestone, PullRequest};
use crate::github::types::{RawIssue, RawMilestone};

/// An entity that can be built from an API record.
pub trait Record {
    type Raw;

    /// Whether a record in a batch belongs in this collection at all.
    fn admits(_raw: &Self::Raw) -> bool {
        true
    }
}

impl Record for Milestone {
    type Raw = RawMilestone;
}

impl Record for Issue {
    type Raw = RawIssue;
}

impl Record for PullRequest {
    type Raw = RawIssue;

    // The issues listing mixes plain issues in with pull requests.
    fn admits(raw: &RawIssue) -> bool {
        raw.is_pull_request()
    }
}

/// Insertion-ordered, append-only store of one entity type.
#[derive(Debug, Clone)]
pub struct Collector<T> {
    items: Vec<T>,
}

pub type MilestoneCollector = Collector<Milestone>;
pub type PullRequestCollector = Collector<PullRequest>;
pub type IssueCollector = Collector<Issue>;

impl<T> Default for Collector<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collector<T>
where
    T: Record + From<<T as Record>::Raw>,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: impl Into<T>) {
        self.items.push(item.into());
    }

    /// Converts and appends every admitted record, keeping input order.
    pub fn add_batch(&mut self, records: impl IntoIterator<Item = T::Raw>) {
        for raw in records {
            if T::admits(&raw) {
                self.add(T::from(raw));
            }
        }
    }

    pub fn all(&self) -> &[T] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Collector<Milestone> {
    pub fn get_by_label(&self, label: &str) -> Vec<&Milestone> {
        self.items.iter().filter(|m| m.label == label).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.items.iter().map(|m| m.label.clone()).collect()
    }
}

impl Collector<Issue> {
    pub fn get_by_id(&self, id: u64) -> Option<&Issue> {
        self.items.iter().find(|issue| issue.id == id)
    }

    /// Looks up the issue a pull request refers to, if it was fetched.
    pub fn linked_to(&self, pull_request: &PullRequest) -> Option<&Issue> {
        let id = pull_request.issue_number.as_deref()?.parse().ok()?;
        self.get_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::RawLabel;
    use serde_json::json;

    fn record(number: u64, is_pull: bool) -> RawIssue {
        RawIssue {
            number,
            html_url: format!("https://github.com/Yoast/wordpress-seo/issues/{}", number),
            body: Some(format!("Fixes #{}", number + 100)),
            labels: vec![RawLabel {
                name: "bug".to_string(),
            }],
            pull_request: is_pull.then(|| json!({ "url": "https://api.github.com" })),
        }
    }

    #[test]
    fn pull_request_batch_keeps_only_pull_requests_in_order() {
        let mut collector = PullRequestCollector::new();
        collector.add_batch(vec![
            record(1, false),
            record(2, true),
            record(3, false),
            record(4, true),
            record(5, true),
        ]);

        let ids: Vec<_> = collector.all().iter().map(|pr| pr.id).collect();
        assert_eq!(ids, vec![2, 4, 5]);
        assert_eq!(collector.count(), 3);
    }

    #[test]
    fn add_accepts_records_and_entities() {
        let mut collector = IssueCollector::new();
        collector.add(record(1, false));
        collector.add(Issue {
            id: 2,
            url: String::new(),
            body: String::new(),
            labels: vec![],
        });

        assert_eq!(collector.count(), 2);
        assert_eq!(collector.all()[0].labels, vec!["bug"]);
    }

    #[test]
    fn issue_lookup_by_id() {
        let mut collector = IssueCollector::new();
        assert!(collector.get_by_id(1).is_none());

        collector.add_batch(vec![record(1, false), record(2, false)]);

        assert_eq!(collector.get_by_id(2).map(|i| i.id), Some(2));
        assert!(collector.get_by_id(3).is_none());
    }

    #[test]
    fn linked_issue_follows_the_reference() {
        let mut issues = IssueCollector::new();
        issues.add(record(101, false));

        let linked = PullRequest::new(1, "u", "Fixes #101");
        let unlinked = PullRequest::new(2, "u", "No reference");
        let dangling = PullRequest::new(3, "u", "Fixes #999");

        assert_eq!(issues.linked_to(&linked).map(|i| i.id), Some(101));
        assert!(issues.linked_to(&unlinked).is_none());
        assert!(issues.linked_to(&dangling).is_none());
    }

    #[test]
    fn milestone_lookup_by_label() {
        let mut collector = MilestoneCollector::new();
        collector.add_batch(vec![
            RawMilestone {
                number: 1,
                title: "12.0".to_string(),
            },
            RawMilestone {
                number: 2,
                title: "12.1".to_string(),
            },
        ]);

        let found = collector.get_by_label("12.1");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
        assert!(collector.get_by_label("12").is_empty());
        assert_eq!(collector.labels(), vec!["12.0", "12.1"]);
    }
}
