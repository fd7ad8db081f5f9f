//! Configuration documents.
//!
//! - [project] - `.unicorn.toml` at the repository root: identity, version and categorizations
//! - [global] - the per-installation credential store

pub mod global;
pub mod project;

pub use global::{GithubConfig, GlobalConfig, GlobalConfigStore};
pub use project::{License, ProjectConfig, PROJECT_CONFIG_FILE};
