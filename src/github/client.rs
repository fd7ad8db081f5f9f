use crate::config::GithubConfig;
use crate::error::{Result, UnicornError};
use crate::github::{Connector, Issue, PullRequest, RepoSlug, RepositoryInfo, Tracker};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
enum Auth {
    Token(String),
    Basic { username: String, password: String },
    Anonymous,
}

/// Blocking GitHub REST v3 client
pub struct GithubClient {
    http: Client,
    endpoint: String,
    auth: Auth,
}

#[derive(Deserialize)]
struct LabelWire {
    name: String,
}

#[derive(Deserialize)]
struct RepositoryWire {
    full_name: String,
    html_url: Option<String>,
    default_branch: Option<String>,
}

#[derive(Deserialize)]
struct IssueWire {
    number: u64,
    title: String,
    state: String,
    #[serde(default)]
    labels: Vec<LabelWire>,
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct HeadWire {
    #[serde(rename = "ref")]
    ref_name: String,
}

#[derive(Deserialize)]
struct PullRequestWire {
    number: u64,
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<LabelWire>,
    html_url: Option<String>,
    head: Option<HeadWire>,
}

impl GithubClient {
    /// Builds a client from stored credentials.
    ///
    /// A token takes precedence over a password.
    pub fn new(credentials: &GithubConfig, timeout: Duration) -> Result<Self> {
        let auth = match (&credentials.oauth_token, &credentials.password) {
            (Some(token), _) => Auth::Token(token.clone()),
            (None, Some(password)) => Auth::Basic {
                username: credentials.username.clone(),
                password: password.clone(),
            },
            (None, None) => Auth::Anonymous,
        };
        let endpoint = credentials
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
            .to_string();
        Self::build(endpoint, auth, timeout)
    }

    fn build(endpoint: String, auth: Auth, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("unicorn/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(GithubClient {
            http,
            endpoint,
            auth,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let request = self
            .http
            .get(format!("{}{}", self.endpoint, path))
            .header(ACCEPT, "application/vnd.github+json");
        match &self.auth {
            Auth::Token(token) => request.bearer_auth(token),
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
            Auth::Anonymous => request,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        tracing::debug!(endpoint = %self.endpoint, path, "GET");
        let response = self.request(path).send()?;
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(UnicornError::Unauthorized(
                format!("{} returned {}", path, status),
            )),
            StatusCode::NOT_FOUND => Err(UnicornError::NotFound(what.to_string())),
            s if !s.is_success() => Err(UnicornError::tracker(format!(
                "{} returned {}",
                path, status
            ))),
            _ => Ok(response.json::<T>()?),
        }
    }
}

impl Tracker for GithubClient {
    fn is_credential_valid(&self) -> Result<bool> {
        if matches!(self.auth, Auth::Anonymous) {
            return Ok(false);
        }
        let status = self.request("/user").send()?.status();
        match status {
            // Installation tokens authenticate but may not read /user
            s if s.is_success() || s == StatusCode::FORBIDDEN => Ok(true),
            StatusCode::UNAUTHORIZED => {
                tracing::debug!(%status, "credentials rejected");
                Ok(false)
            }
            s => Err(UnicornError::tracker(format!("/user returned {}", s))),
        }
    }

    fn repository(&self, slug: &RepoSlug) -> Result<RepositoryInfo> {
        let wire: RepositoryWire =
            self.get_json(&format!("/repos/{}", slug), &format!("repository {}", slug))?;
        let slug = wire
            .full_name
            .split_once('/')
            .map(|(owner, name)| RepoSlug::new(owner, name))
            .unwrap_or_else(|| slug.clone());
        Ok(RepositoryInfo {
            slug,
            html_url: wire.html_url,
            default_branch: wire.default_branch,
        })
    }

    fn pull_request(&self, slug: &RepoSlug, number: u64) -> Result<PullRequest> {
        let wire: PullRequestWire = self.get_json(
            &format!("/repos/{}/pulls/{}", slug, number),
            &format!("pull request #{} in {}", number, slug),
        )?;
        Ok(PullRequest {
            number: wire.number,
            title: wire.title,
            body: wire.body,
            labels: wire.labels.into_iter().map(|l| l.name).collect(),
            html_url: wire.html_url,
            head_ref: wire.head.map(|h| h.ref_name),
        })
    }

    fn issue(&self, slug: &RepoSlug, number: u64) -> Result<Issue> {
        let wire: IssueWire = self.get_json(
            &format!("/repos/{}/issues/{}", slug, number),
            &format!("issue #{} in {}", number, slug),
        )?;
        Ok(Issue {
            number: wire.number,
            title: wire.title,
            state: wire.state,
            labels: wire.labels.into_iter().map(|l| l.name).collect(),
            html_url: wire.html_url,
        })
    }
}

/// Connects [GithubClient]s with a fixed request timeout
#[derive(Debug, Clone)]
pub struct GithubConnector {
    pub timeout: Duration,
}

impl Default for GithubConnector {
    fn default() -> Self {
        GithubConnector {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Connector for GithubConnector {
    type Tracker = GithubClient;

    fn connect(&self, credentials: &GithubConfig) -> Result<GithubClient> {
        GithubClient::new(credentials, self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let client =
            GithubClient::new(&GithubConfig::with_token("octocat", "t"), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_custom_endpoint_trailing_slash_trimmed() {
        let mut credentials = GithubConfig::with_password("octocat", "pw");
        credentials.endpoint = Some("https://ghe.example.com/api/v3/".to_string());
        let client = GithubClient::new(&credentials, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.endpoint(), "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_anonymous_client_is_never_valid() {
        let credentials = GithubConfig {
            username: "octocat".to_string(),
            password: None,
            oauth_token: None,
            endpoint: None,
        };
        let client = GithubClient::new(&credentials, DEFAULT_TIMEOUT).unwrap();
        assert!(!client.is_credential_valid().unwrap());
    }

    #[test]
    fn test_pull_request_wire_format() {
        let wire: PullRequestWire = serde_json::from_str(
            r#"{
                "number": 12,
                "title": "Add login",
                "body": null,
                "labels": [{"id": 1, "name": "T: feat"}, {"id": 2, "name": "P: 3"}],
                "html_url": "https://github.com/o/r/pull/12",
                "head": {"ref": "issue/3-login", "sha": "abc"}
            }"#,
        )
        .unwrap();
        assert_eq!(wire.labels.len(), 2);
        assert_eq!(wire.head.map(|h| h.ref_name).as_deref(), Some("issue/3-login"));
    }
}
