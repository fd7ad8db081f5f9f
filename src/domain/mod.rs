//! Domain logic - pure rules independent of the tracker and of git

pub mod branch;
pub mod categorization;
pub mod event;
pub mod version;

pub use branch::{Branch, IssueBranch};
pub use categorization::{
    Categorization, CategorizationConfig, CategorizationValue, Component, Label, LabelConfig,
    Priority, ResolvedValue, Type,
};
pub use event::{PullRequestRef, WebhookPayload};
pub use version::{bump_version, select_bump, VersionBump};
