use crate::error::{Result, UnicornError};
use regex::Regex;
use std::fmt;

/// A branch name classified against the flow conventions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    /// `main` or `master`
    Main(String),
    /// `issue/<number>` or `issue/<number>-<slug>`
    Issue(IssueBranch),
    /// `release/<version>`
    Release { name: String, version: String },
    /// Any branch following no convention
    Other(String),
}

/// A branch that carries the number of the issue it works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueBranch {
    pub name: String,
    pub issue_number: u64,
    pub slug: Option<String>,
}

impl Branch {
    /// Classify a branch name. Pure pattern match, never fails.
    ///
    /// Accepts full ref names (`refs/heads/issue/12-foo`) as well as short names.
    pub fn parse(name: &str) -> Self {
        let short = name.strip_prefix("refs/heads/").unwrap_or(name);

        if matches!(short, "main" | "master") {
            return Branch::Main(short.to_string());
        }

        if let Some(captures) = Regex::new(r"^issue/(\d+)(?:-(.+))?$")
            .ok()
            .and_then(|re| re.captures(short))
        {
            if let Some(issue_number) = captures
                .get(1)
                .and_then(|m| m.as_str().parse::<u64>().ok())
            {
                return Branch::Issue(IssueBranch {
                    name: short.to_string(),
                    issue_number,
                    slug: captures.get(2).map(|m| m.as_str().to_string()),
                });
            }
        }

        if let Some(captures) = Regex::new(r"^release/(.+)$")
            .ok()
            .and_then(|re| re.captures(short))
        {
            let version = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            return Branch::Release {
                name: short.to_string(),
                version,
            };
        }

        Branch::Other(short.to_string())
    }

    pub fn name(&self) -> &str {
        match self {
            Branch::Main(name) | Branch::Other(name) => name,
            Branch::Issue(issue) => &issue.name,
            Branch::Release { name, .. } => name,
        }
    }

    pub fn issue_number(&self) -> Option<u64> {
        match self {
            Branch::Issue(issue) => Some(issue.issue_number),
            _ => None,
        }
    }

    /// The issue branch, or `NotAnIssueBranch` for every other kind
    pub fn into_issue_branch(self) -> Result<IssueBranch> {
        match self {
            Branch::Issue(issue) => Ok(issue),
            other => Err(UnicornError::NotAnIssueBranch(format!(
                "'{}' does not match issue/<number>[-<title>]",
                other.name()
            ))),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
