pub mod client;
pub mod repositories;
pub mod types;

pub use client::GitHubClient;
pub use repositories::{IssuesRepository, MilestonesRepository};
