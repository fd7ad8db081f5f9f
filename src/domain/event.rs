use crate::error::{Result, UnicornError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Minimal projection of a CI webhook event document.
///
/// Unknown fields are ignored so newer payloads keep parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default, alias = "pullRequest")]
    pub pull_request: Option<PullRequestRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestRef {
    pub number: u64,
    #[serde(default, alias = "htmlUrl")]
    pub html_url: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl WebhookPayload {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses the event document at `path`
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            UnicornError::repository(format!(
                "Cannot read event document {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&contents)
    }

    /// The pull request this event is about, or `UnsupportedEvent`
    pub fn require_pull_request(&self) -> Result<&PullRequestRef> {
        self.pull_request.as_ref().ok_or_else(|| {
            UnicornError::UnsupportedEvent("only pull_request events are supported".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_pull_request_event() {
        let payload = WebhookPayload::parse(
            r#"{
                "action": "opened",
                "number": 5,
                "pull_request": {
                    "number": 5,
                    "html_url": "https://github.com/o/r/pull/5",
                    "body": "Closes #3",
                    "labels": [{"name": "T: feat"}]
                },
                "repository": {"full_name": "o/r"}
            }"#,
        )
        .unwrap();

        let pr = payload.require_pull_request().unwrap();
        assert_eq!(pr.number, 5);
        assert_eq!(pr.html_url.as_deref(), Some("https://github.com/o/r/pull/5"));
        assert_eq!(pr.body.as_deref(), Some("Closes #3"));
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let payload =
            WebhookPayload::parse(r#"{"pullRequest": {"number": 9, "htmlUrl": "u"}}"#).unwrap();
        let pr = payload.require_pull_request().unwrap();
        assert_eq!(pr.number, 9);
        assert_eq!(pr.html_url.as_deref(), Some("u"));
        assert_eq!(pr.body, None);
    }

    #[test]
    fn test_push_event_is_unsupported() {
        let payload = WebhookPayload::parse(r#"{"ref": "refs/heads/main", "commits": []}"#).unwrap();
        assert!(matches!(
            payload.require_pull_request(),
            Err(UnicornError::UnsupportedEvent(_))
        ));
    }

    #[test]
    fn test_malformed_document_fails() {
        assert!(WebhookPayload::parse("not json").is_err());
    }
}
