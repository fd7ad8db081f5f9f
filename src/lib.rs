pub mod action;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod github;
pub mod ui;

pub use error::{Result, UnicornError};
