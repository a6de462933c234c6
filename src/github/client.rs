use std::time::Duration;

use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{ChangelogError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated access to the GitHub REST API for one repository owner.
pub struct GitHubClient {
    client: Octocrab,
    owner: String,
    timeout: Duration,
}

impl GitHubClient {
    pub fn builder(token: String, owner: String) -> GitHubClientBuilder {
        GitHubClientBuilder {
            token,
            owner,
            base_uri: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Route for a path below `/repos/{owner}/{repo}`.
    pub fn repo_route(&self, repo: &str, path: &str) -> String {
        format!("/repos/{}/{}/{}", self.owner, repo, path.trim_start_matches('/'))
    }

    /// Issues a single GET and decodes the JSON body.
    ///
    /// Transport failures, non-success statuses, timeouts and undecodable
    /// bodies all come back as [`ChangelogError::Gateway`] tagged with
    /// `operation`.
    pub async fn get_json<T, P>(&self, operation: &str, route: &str, query: Option<&P>) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        debug!(operation, route, "GET");

        let request = self.client.get::<T, _, P>(route, query);
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ChangelogError::gateway(operation, e)),
            Err(_) => Err(ChangelogError::gateway(
                operation,
                format!("timed out after {:?}", self.timeout),
            )),
        }
    }
}

pub struct GitHubClientBuilder {
    token: String,
    owner: String,
    base_uri: Option<String>,
    timeout: Duration,
}

impl GitHubClientBuilder {
    pub fn base_uri(mut self, uri: Option<String>) -> Self {
        self.base_uri = uri;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<GitHubClient> {
        if self.token.trim().is_empty() {
            return Err(ChangelogError::Config("no GitHub access token set".to_string()));
        }

        let mut builder = Octocrab::builder().personal_token(self.token);
        if let Some(uri) = &self.base_uri {
            builder = builder
                .base_uri(uri.as_str())
                .map_err(|e| ChangelogError::Config(format!("invalid API url {}: {}", uri, e)))?;
        }
        let client = builder
            .build()
            .map_err(|e| ChangelogError::Config(format!("cannot create GitHub client: {}", e)))?;

        Ok(GitHubClient {
            client,
            owner: self.owner,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::Value;
    use std::io::Write;

    #[test]
    fn rejects_empty_token() {
        let result = GitHubClient::builder("  ".to_string(), "Yoast".to_string()).build();
        assert!(matches!(result, Err(ChangelogError::Config(_))));
    }

    #[tokio::test]
    async fn builds_repo_routes() {
        let client = GitHubClient::builder("token".to_string(), "Yoast".to_string())
            .build()
            .unwrap();
        assert_eq!(
            client.repo_route("wordpress-seo", "issues/12"),
            "/repos/Yoast/wordpress-seo/issues/12"
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_gateway_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/Yoast/wordpress-seo/milestones")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"boom","documentation_url":"https://docs.github.com"}"#)
            .expect_at_least(1)
            .create_async()
            .await;

        let client = GitHubClient::builder("token".to_string(), "Yoast".to_string())
            .base_uri(Some(server.url()))
            .build()
            .unwrap();
        let result: Result<Value> = client
            .get_json::<Value, ()>("list milestones", "/repos/Yoast/wordpress-seo/milestones", None)
            .await;

        mock.assert_async().await;
        match result {
            Err(ChangelogError::Gateway { operation, .. }) => assert_eq!(operation, "list milestones"),
            other => panic!("expected gateway error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn slow_response_times_out_as_a_gateway_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/Yoast/wordpress-seo/milestones")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(1500));
                w.write_all(b"[]")
            })
            .create_async()
            .await;

        let client = GitHubClient::builder("token".to_string(), "Yoast".to_string())
            .base_uri(Some(server.url()))
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let result = client
            .get_json::<Value, ()>("list milestones", "/repos/Yoast/wordpress-seo/milestones", None)
            .await;

        match result {
            Err(ChangelogError::Gateway { operation, reason }) => {
                assert_eq!(operation, "list milestones");
                assert_eq!(reason, "timed out after 200ms");
            }
            other => panic!("expected gateway error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_a_gateway_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/Yoast/wordpress-seo/issues/3")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create_async()
            .await;

        let client = GitHubClient::builder("token".to_string(), "Yoast".to_string())
            .base_uri(Some(server.url()))
            .build()
            .unwrap();
        let result = client
            .get_json::<crate::github::types::RawIssue, ()>(
                "fetch issue 3",
                "/repos/Yoast/wordpress-seo/issues/3",
                None,
            )
            .await;

        assert!(matches!(result, Err(ChangelogError::Gateway { .. })));
    }
}
