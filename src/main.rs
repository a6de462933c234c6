use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use inquire::Select;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod changelog;
mod config;
mod error;
mod github;

use changelog::collectors::MilestoneCollector;
use changelog::{ChangelogPipeline, FsWriter, OutputFormat, ReportGenerator};
use config::{Config, DEFAULT_CONFIG_PATH};
use error::ChangelogError;
use github::{GitHubClient, IssuesRepository, MilestonesRepository};

#[derive(Parser)]
#[command(name = "plugin-cli")]
#[command(about = "Changelog tooling for plugin repositories")]
struct Cli {
    /// GitHub token (can also be set via GITHUB_API_TOKEN env var)
    #[arg(long, env = "GITHUB_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Repository owner, overrides the configuration file
    #[arg(long, env = "GITHUB_OWNER")]
    owner: Option<String>,

    /// Plugin configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the changelog for a milestone
    Changelog {
        /// Plugin option or repository name (prompted if omitted)
        #[arg(short, long)]
        repo: Option<String>,

        /// Milestone title (prompted if omitted)
        #[arg(short, long)]
        milestone: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long)]
        format: Option<OutputFormat>,

        /// Handlebars template for Markdown output
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// List the milestones of a repository
    Milestones {
        #[arg(short, long)]
        repo: Option<String>,

        /// Include closed milestones
        #[arg(long)]
        all: bool,

        /// Print only the number of the milestone with this title (-1 if absent)
        #[arg(long, conflicts_with = "all")]
        find: Option<String>,
    },

    /// List the labels of an issue
    Labels {
        #[arg(short, long)]
        repo: Option<String>,

        /// Issue number
        issue: u64,
    },

    /// List the configured plugins
    Plugins {
        /// Only plugins that can be built
        #[arg(long)]
        buildable: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    load_env_file(Path::new(".env"));

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Cli {
        token,
        owner,
        config,
        command,
    } = Cli::parse();

    let config = match config {
        Some(path) => Config::load(&path, true)?,
        None => Config::load(Path::new(DEFAULT_CONFIG_PATH), false)?,
    };

    match command {
        Commands::Changelog {
            repo,
            milestone,
            output,
            format,
            template,
        } => {
            let client = github_client(&config, token, owner)?;
            let repository = select_repository(&config, repo)?;

            let format = format.unwrap_or(config.output.format);
            let template = template.or_else(|| config.output.template.as_ref().map(PathBuf::from));
            let generator = ReportGenerator::new(format, template.as_deref())?;
            let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.output.path));

            let pipeline = ChangelogPipeline::new(&client, output_dir, generator, FsWriter);
            let outcome = pipeline
                .run(&repository, |labels| match milestone {
                    Some(label) => Ok(label),
                    None => select_milestone(labels),
                })
                .await?;

            println!("Changelog generation complete");
            println!(
                "{} pull requests: {} bugs, {} enhancements, {} other",
                outcome.pull_requests, outcome.bugs, outcome.enhancements, outcome.other
            );
            println!("Changelog items can be found in: {}", outcome.path.display());
        }
        Commands::Milestones { repo, all, find } => {
            let client = github_client(&config, token, owner)?;
            let repository = select_repository(&config, repo)?;
            let milestones_repository = MilestonesRepository::new(&client, &repository);

            if let Some(label) = find {
                println!("{}", milestones_repository.find_or_sentinel(&label).await?);
                return Ok(());
            }

            let mut milestones = MilestoneCollector::new();
            if all {
                milestones.add_batch(milestones_repository.all().await?);
            } else {
                milestones.add_batch(milestones_repository.find_active().await?);
            }

            println!("Milestones of {}:", repository);
            if milestones.is_empty() {
                println!("  No milestones found");
            }
            for milestone in milestones.all() {
                println!("  - {} (#{})", milestone.label, milestone.id);
            }
        }
        Commands::Labels { repo, issue } => {
            let client = github_client(&config, token, owner)?;
            let repository = select_repository(&config, repo)?;

            let labels = IssuesRepository::new(&client, &repository)
                .get_labels(&issue.to_string())
                .await?;
            for label in labels {
                println!("{}", label.name);
            }
        }
        Commands::Plugins { buildable } => {
            let plugins = config.plugin_options(buildable);
            if plugins.is_empty() {
                println!("No plugins configured");
            }
            for plugin in plugins {
                println!("{:<12} {:<28} {}", plugin.option, plugin.label, plugin.endpoint);
            }
        }
    }

    Ok(())
}

/// Variables already present in the environment win over the file.
fn load_env_file(path: &Path) {
    dotenvy::from_path(path).ok();
}

fn github_client(config: &Config, token: Option<String>, owner: Option<String>) -> Result<GitHubClient> {
    let owner = owner.unwrap_or_else(|| config.github.owner.clone());
    let client = GitHubClient::builder(token.unwrap_or_default(), owner)
        .base_uri(config.github.api_url.clone())
        .timeout(Duration::from_secs(config.github.timeout_secs))
        .build()
        .context("set GITHUB_API_TOKEN or pass --token")?;
    Ok(client)
}

/// Maps a plugin option or repository name to the repository to query,
/// prompting when none was given.
fn select_repository(config: &Config, requested: Option<String>) -> Result<String> {
    if let Some(requested) = requested {
        return resolve_repository(config, &requested);
    }

    let plugins = config.plugin_options(false);
    if plugins.is_empty() {
        bail!("no plugins configured, pass --repo");
    }

    let plugin = Select::new(
        "Please select the repository you want to generate the changelog for",
        plugins,
    )
    .prompt()?;
    Ok(plugin.endpoint.clone())
}

fn resolve_repository(config: &Config, requested: &str) -> Result<String> {
    if let Some(plugin) = config.find_plugin(requested) {
        return Ok(plugin.endpoint.clone());
    }
    if config.plugins.is_empty() || config.plugins.iter().any(|p| p.endpoint == requested) {
        return Ok(requested.to_string());
    }
    bail!("repository '{}' doesn't exist in the configuration", requested)
}

fn select_milestone(labels: &[String]) -> error::Result<String> {
    if labels.is_empty() {
        return Err(ChangelogError::Config("there are no open milestones".to_string()));
    }

    Select::new(
        "Please select the milestone you want to generate the changelog for",
        labels.to_vec(),
    )
    .prompt()
    .map_err(|e| ChangelogError::Config(format!("no milestone selected: {}", e)))
}
