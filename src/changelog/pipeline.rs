use std::path::PathBuf;

use tracing::{debug, info};

use super::collectors::{IssueCollector, MilestoneCollector, PullRequestCollector};
use super::entities::Milestone;
use super::report::{build_report, ReportGenerator};
use super::writer::ReportWriter;
use crate::error::{ChangelogError, Result};
use crate::github::{GitHubClient, IssuesRepository, MilestonesRepository};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogOutcome {
    pub path: PathBuf,
    pub milestone: Milestone,
    pub pull_requests: usize,
    pub issues: usize,
    pub bugs: usize,
    pub enhancements: usize,
    pub other: usize,
}

/// Builds the changelog of one milestone of one repository.
pub struct ChangelogPipeline<'a, W> {
    client: &'a GitHubClient,
    output_dir: PathBuf,
    generator: ReportGenerator,
    writer: W,
}

impl<'a, W: ReportWriter> ChangelogPipeline<'a, W> {
    pub fn new(
        client: &'a GitHubClient,
        output_dir: impl Into<PathBuf>,
        generator: ReportGenerator,
        writer: W,
    ) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
            generator,
            writer,
        }
    }

    /// Runs every step in order. `select_milestone` receives the labels of
    /// the open milestones and returns the one to use; the label must match
    /// exactly. Any failed fetch aborts the run before anything is written.
    pub async fn run<F>(&self, repository: &str, select_milestone: F) -> Result<ChangelogOutcome>
    where
        F: FnOnce(&[String]) -> Result<String>,
    {
        let milestones = self.collect_milestones(repository).await?;

        let label = select_milestone(&milestones.labels())?;
        let milestone = milestones
            .get_by_label(&label)
            .first()
            .map(|m| (*m).clone())
            .ok_or_else(|| ChangelogError::MilestoneNotFound(label.clone()))?;
        info!(repository, milestone = %milestone.label, id = milestone.id, "selected milestone");

        let issues_repository = IssuesRepository::new(self.client, repository);
        let pull_requests = self
            .collect_pull_requests(&issues_repository, milestone.id)
            .await?;
        let issues = self
            .collect_issues(&issues_repository, &pull_requests)
            .await?;

        let report = build_report(repository, &milestone, pull_requests.all(), &issues);
        let content = self.generator.generate(&report)?;

        let path = self.output_dir.join(file_name(
            repository,
            &milestone.label,
            self.generator.format().extension(),
        ));
        self.writer.write(&path, &content)?;
        info!(path = %path.display(), "changelog written");

        Ok(ChangelogOutcome {
            path,
            milestone,
            pull_requests: pull_requests.count(),
            issues: issues.count(),
            bugs: report.bugs.len(),
            enhancements: report.enhancements.len(),
            other: report.other.len(),
        })
    }

    async fn collect_milestones(&self, repository: &str) -> Result<MilestoneCollector> {
        let mut milestones = MilestoneCollector::new();
        milestones.add_batch(
            MilestonesRepository::new(self.client, repository)
                .find_active()
                .await?,
        );
        info!(repository, count = milestones.count(), "collected active milestones");
        Ok(milestones)
    }

    async fn collect_pull_requests(
        &self,
        repository: &IssuesRepository<'_>,
        milestone: u64,
    ) -> Result<PullRequestCollector> {
        let mut pull_requests = PullRequestCollector::new();
        pull_requests.add_batch(repository.get_for_milestone_id(milestone).await?);
        info!(milestone, count = pull_requests.count(), "collected pull requests");
        Ok(pull_requests)
    }

    /// Fetches the issue each pull request fixes, one request at a time.
    async fn collect_issues(
        &self,
        repository: &IssuesRepository<'_>,
        pull_requests: &PullRequestCollector,
    ) -> Result<IssueCollector> {
        let mut issues = IssueCollector::new();

        for pull_request in pull_requests.all() {
            let Some(number) = pull_request.issue_number.as_deref() else {
                debug!(pull_request = pull_request.id, "no linked issue");
                continue;
            };
            if issues.linked_to(pull_request).is_some() {
                debug!(pull_request = pull_request.id, issue = number, "issue already fetched");
                continue;
            }

            issues.add(repository.get_issue(number).await?);
            debug!(pull_request = pull_request.id, issue = number, "fetched linked issue");
        }

        info!(count = issues.count(), "collected linked issues");
        Ok(issues)
    }
}

/// `changelog-{repository}-{milestone}.{extension}`, with path separators
/// in the milestone label replaced.
pub fn file_name(repository: &str, milestone: &str, extension: &str) -> String {
    let milestone = milestone.replace(['/', '\\'], "-");
    format!("changelog-{}-{}.{}", repository, milestone, extension)
}
