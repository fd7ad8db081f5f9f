//! CI entry point
//!
//! Runs the pull request pipeline: authenticate with the repository token,
//! open the checkout, resolve the repository, load the project config, read the triggering
//! event, resolve the issue branch, fetch the pull request and classify its
//! labels. Each step short-circuits on failure. Nothing is read from disk
//! before the token is accepted.

use crate::auth::{Interaction, SessionManager};
use crate::config::ProjectConfig;
use crate::domain::{
    bump_version, select_bump, Branch, CategorizationConfig, IssueBranch, Label, VersionBump,
    WebhookPayload,
};
use crate::error::{Result, UnicornError};
use crate::git::Repository;
use crate::github::{Connector, Issue, PullRequest, RepoSlug, Tracker};
use semver::Version;
use std::path::{Path, PathBuf};

/// Inputs of the CI entry point
///
/// Decoupled from clap so the pipeline can be driven from tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionArgs {
    /// Repository root holding `.unicorn.toml`
    pub prefix: PathBuf,

    pub repo_token: Option<String>,

    /// Path of the triggering event document
    pub event_path: Option<PathBuf>,

    /// Branch to use when HEAD is detached, as CI checkouts usually are
    pub head_ref: Option<String>,

    /// Custom API endpoint for the token
    pub endpoint: Option<String>,
}

/// Everything the pipeline learned about the pull request
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub repository: RepoSlug,
    pub branch: IssueBranch,
    pub issue: Issue,
    pub pull_request: PullRequest,
    pub types: Vec<Label>,
    pub components: Vec<Label>,
    pub priorities: Vec<Label>,
    /// Pull request labels matching no categorization
    pub unknown_labels: Vec<String>,
    pub bump: Option<VersionBump>,
    /// Project version after applying `bump`
    pub next_version: Option<Version>,
}

/// Runs the pipeline against the checkout `open_repo` returns for
/// `args.prefix`, opened once the token is accepted
pub fn run<C, I, R, F>(
    args: &ActionArgs,
    sessions: &mut SessionManager<C, I>,
    open_repo: F,
) -> Result<ActionReport>
where
    C: Connector,
    I: Interaction,
    R: Repository,
    F: FnOnce(&Path) -> Result<R>,
{
    let token = args
        .repo_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| UnicornError::missing_parameter("repo-token"))?;

    let session = sessions.authenticate_with_token(token, args.endpoint.as_deref())?;
    let tracker = &session.tracker;

    let repo = open_repo(&args.prefix)?;
    let slug = tracker.repository(&repo.remote_slug()?)?.slug;
    tracing::debug!(repository = %slug, "resolved repository");

    let config = ProjectConfig::load(&args.prefix)?;

    let event_path = args
        .event_path
        .as_deref()
        .ok_or_else(|| UnicornError::missing_parameter("GITHUB_EVENT_PATH"))?;
    let payload = WebhookPayload::read(event_path)?;
    let pr_ref = payload.require_pull_request()?;

    let branch = current_issue_branch(&repo, args.head_ref.as_deref())?;
    let issue = tracker.issue(&slug, branch.issue_number)?;
    tracing::info!(issue = issue.number, branch = %branch.name, "resolved issue branch");

    let pull_request = tracker.pull_request(&slug, pr_ref.number)?;

    let classified = classify(&config.categorization, &pull_request.labels);
    let next_version = classified
        .bump
        .map(|bump| bump_version(&config.version, bump))
        .transpose()?;

    Ok(ActionReport {
        repository: slug,
        branch,
        issue,
        pull_request,
        types: classified.types,
        components: classified.components,
        priorities: classified.priorities,
        unknown_labels: classified.unknown_labels,
        bump: classified.bump,
        next_version,
    })
}

fn current_issue_branch<R: Repository>(repo: &R, head_ref: Option<&str>) -> Result<IssueBranch> {
    let name = match repo.current_branch()? {
        Some(name) => name,
        None => head_ref
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                UnicornError::NotAnIssueBranch(
                    "HEAD is detached and no head ref was given".to_string(),
                )
            })?,
    };
    Branch::parse(&name).into_issue_branch()
}

#[derive(Debug, Default)]
struct Classified {
    types: Vec<Label>,
    components: Vec<Label>,
    priorities: Vec<Label>,
    unknown_labels: Vec<String>,
    bump: Option<VersionBump>,
}

/// Sorts tracker labels into the three categorizations.
///
/// Labels are tried against `type`, then `component`, then `priority`.
fn classify(config: &CategorizationConfig, labels: &[String]) -> Classified {
    let mut classified = Classified::default();
    let mut bumps = Vec::new();

    for label in labels {
        if let Some(resolved) = config.type_.get_or_none(label) {
            bumps.push(resolved.value.version_bump);
            classified.types.push(resolved.to_label());
        } else if let Some(resolved) = config.component.get_or_none(label) {
            classified.components.push(resolved.to_label());
        } else if let Some(resolved) = config.priority.get_or_none(label) {
            classified.priorities.push(resolved.to_label());
        } else {
            classified.unknown_labels.push(label.clone());
        }
    }

    classified.bump = select_bump(bumps);
    classified
}
