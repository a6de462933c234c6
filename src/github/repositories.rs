use serde::Serialize;
use tracing::debug;

use super::client::GitHubClient;
use super::types::{RawIssue, RawLabel, RawMilestone};
use crate::error::Result;

/// Upper bound GitHub allows for a single page.
pub const PAGE_SIZE: u8 = 100;

/// Returned by [`MilestonesRepository::find_or_sentinel`] when no milestone matches.
pub const MILESTONE_NOT_FOUND: i64 = -1;

#[derive(Serialize)]
struct StateQuery<'a> {
    state: &'a str,
}

#[derive(Serialize)]
struct MilestoneIssuesQuery {
    state: &'static str,
    milestone: u64,
    per_page: u8,
}

pub struct MilestonesRepository<'a> {
    client: &'a GitHubClient,
    repository: String,
}

impl<'a> MilestonesRepository<'a> {
    pub fn new(client: &'a GitHubClient, repository: impl Into<String>) -> Self {
        Self {
            client,
            repository: repository.into(),
        }
    }

    /// Open milestones, as returned by the API.
    pub async fn find_active(&self) -> Result<Vec<RawMilestone>> {
        self.list("open").await
    }

    /// Every milestone regardless of state.
    pub async fn all(&self) -> Result<Vec<RawMilestone>> {
        self.list("all").await
    }

    /// Number of the milestone titled exactly `label`.
    pub async fn find(&self, label: &str) -> Result<Option<u64>> {
        let milestones = self.all().await?;
        Ok(find_number(&milestones, label))
    }

    pub async fn find_or_sentinel(&self, label: &str) -> Result<i64> {
        Ok(self
            .find(label)
            .await?
            .and_then(|number| i64::try_from(number).ok())
            .unwrap_or(MILESTONE_NOT_FOUND))
    }

    async fn list(&self, state: &str) -> Result<Vec<RawMilestone>> {
        let route = self.client.repo_route(&self.repository, "milestones");
        let milestones: Vec<RawMilestone> = self
            .client
            .get_json(
                &format!("list {} milestones of {}", state, self.repository),
                &route,
                Some(&StateQuery { state }),
            )
            .await?;

        debug!(repository = %self.repository, state, count = milestones.len(), "fetched milestones");
        Ok(milestones)
    }
}

pub(crate) fn find_number(milestones: &[RawMilestone], label: &str) -> Option<u64> {
    milestones
        .iter()
        .find(|milestone| milestone.title == label)
        .map(|milestone| milestone.number)
}

pub struct IssuesRepository<'a> {
    client: &'a GitHubClient,
    repository: String,
}

impl<'a> IssuesRepository<'a> {
    pub fn new(client: &'a GitHubClient, repository: impl Into<String>) -> Self {
        Self {
            client,
            repository: repository.into(),
        }
    }

    /// Closed issues and pull requests in a milestone, first page only.
    pub async fn get_for_milestone_id(&self, milestone: u64) -> Result<Vec<RawIssue>> {
        let route = self.client.repo_route(&self.repository, "issues");
        let query = MilestoneIssuesQuery {
            state: "closed",
            milestone,
            per_page: PAGE_SIZE,
        };

        self.client
            .get_json(
                &format!("list issues of milestone {}", milestone),
                &route,
                Some(&query),
            )
            .await
    }

    pub async fn get_issue(&self, number: &str) -> Result<RawIssue> {
        let route = self
            .client
            .repo_route(&self.repository, &format!("issues/{}", number));

        self.client
            .get_json::<RawIssue, ()>(&format!("fetch issue #{}", number), &route, None)
            .await
    }

    pub async fn get_labels(&self, number: &str) -> Result<Vec<RawLabel>> {
        let route = self
            .client
            .repo_route(&self.repository, &format!("issues/{}/labels", number));

        self.client
            .get_json::<Vec<RawLabel>, ()>(&format!("fetch labels of #{}", number), &route, None)
            .await
    }
}
