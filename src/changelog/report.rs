use std::path::Path;

use chrono::Utc;
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::collectors::IssueCollector;
use super::entities::{Milestone, PullRequest};
use crate::error::{ChangelogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Markdown,
    Json,
    Html,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bug,
    Enhancement,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub link_text: String,
    pub url: String,
    pub body: String,
}

impl ReportEntry {
    fn write_markdown(&self, out: &mut String) {
        out.push_str(&format!("[{}]({})\n{}\n\n", self.link_text, self.url, self.body));
    }
}

/// Pull requests of one milestone, bucketed by the labels of their linked issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedReport {
    pub repository: String,
    pub milestone: String,
    pub total: usize,
    pub bugs: Vec<ReportEntry>,
    pub enhancements: Vec<ReportEntry>,
    pub other: Vec<ReportEntry>,
}

/// Places one pull request. `bug` wins over `enhancement`; a pull request
/// without a fetched issue reports its own URL under Other.
pub fn classify(pull_request: &PullRequest, issues: &IssueCollector) -> (Category, ReportEntry) {
    let Some(issue) = issues.linked_to(pull_request) else {
        let entry = ReportEntry {
            link_text: pull_request.url.clone(),
            url: pull_request.url.clone(),
            body: pull_request.body.clone(),
        };
        return (Category::Other, entry);
    };

    let category = if issue.has_label("bug") {
        Category::Bug
    } else if issue.has_label("enhancement") {
        Category::Enhancement
    } else {
        Category::Other
    };

    let entry = ReportEntry {
        link_text: pull_request.issue_number.clone().unwrap_or_default(),
        url: pull_request.url.clone(),
        body: pull_request.body.clone(),
    };
    (category, entry)
}

pub fn build_report(
    repository: &str,
    milestone: &Milestone,
    pull_requests: &[PullRequest],
    issues: &IssueCollector,
) -> ClassifiedReport {
    let mut report = ClassifiedReport {
        repository: repository.to_string(),
        milestone: milestone.label.clone(),
        total: pull_requests.len(),
        bugs: Vec::new(),
        enhancements: Vec::new(),
        other: Vec::new(),
    };

    for pull_request in pull_requests {
        let (category, entry) = classify(pull_request, issues);
        match category {
            Category::Bug => report.bugs.push(entry),
            Category::Enhancement => report.enhancements.push(entry),
            Category::Other => report.other.push(entry),
        }
    }

    report
}

/// Renders the Markdown changelog of a classified milestone: a title with
/// the item count, then the Bugs, Enhancements and Other sections in that
/// order, each present even when empty.
pub fn render(report: &ClassifiedReport) -> String {
    let mut output = format!(
        "# {}: {} - {} changelog items\n\n",
        report.repository, report.milestone, report.total
    );

    for (heading, entries) in [
        ("Bugs", &report.bugs),
        ("Enhancements", &report.enhancements),
        ("Other", &report.other),
    ] {
        output.push_str(&format!("## {}:\n\n", heading));
        for entry in entries {
            entry.write_markdown(&mut output);
        }
    }

    output
}

pub struct ReportGenerator {
    template_engine: Option<Handlebars<'static>>,
    format: OutputFormat,
}

impl ReportGenerator {
    pub fn new(format: OutputFormat, template_path: Option<&Path>) -> Result<Self> {
        let template_engine = match template_path {
            Some(path) => {
                let template = std::fs::read_to_string(path).map_err(|e| {
                    ChangelogError::Template(format!("cannot read {}: {}", path.display(), e))
                })?;
                let mut engine = Handlebars::new();
                engine.register_escape_fn(handlebars::no_escape);
                engine
                    .register_template_string("custom", template)
                    .map_err(|e| ChangelogError::Template(e.to_string()))?;
                Some(engine)
            }
            None => None,
        };

        Ok(Self {
            template_engine,
            format,
        })
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn generate(&self, report: &ClassifiedReport) -> Result<String> {
        match self.format {
            OutputFormat::Markdown => self.generate_markdown(report),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Html => self.generate_html(report),
        }
    }

    fn generate_markdown(&self, report: &ClassifiedReport) -> Result<String> {
        let Some(engine) = &self.template_engine else {
            return Ok(render(report));
        };

        let data = json!({
            "repository": report.repository,
            "milestone": report.milestone,
            "total": report.total,
            "date": Utc::now().format("%Y-%m-%d").to_string(),
            "bugs": report.bugs,
            "enhancements": report.enhancements,
            "other": report.other,
        });

        engine
            .render("custom", &data)
            .map_err(|e| ChangelogError::Template(e.to_string()))
    }

    fn generate_html(&self, report: &ClassifiedReport) -> Result<String> {
        let markdown = self.generate_markdown(report)?;
        let parser = pulldown_cmark::Parser::new(&markdown);
        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, parser);

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{}: {}</title>
</head>
<body>
{}
</body>
</html>
"#,
            report.repository, report.milestone, html
        ))
    }
}
