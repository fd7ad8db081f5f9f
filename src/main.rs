use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use unicorn::action::{self, ActionArgs};
use unicorn::auth::{AuthMode, AuthRequest, SessionManager};
use unicorn::config::{GlobalConfigStore, ProjectConfig};
use unicorn::domain::{select_bump, CategorizationConfig};
use unicorn::git::Git2Repository;
use unicorn::github::GithubConnector;
use unicorn::ui::{self, ConsoleInteraction};
use unicorn::UnicornError;

#[derive(Parser)]
#[command(
    name = "unicorn",
    version,
    about = "Categorize issues and pull requests and derive version bumps"
)]
struct Args {
    #[arg(long, global = true, help = "Repository root (defaults to the working directory)")]
    prefix: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory holding the credential store")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process the pull request event that triggered a CI run
    Action {
        #[arg(long, env = "INPUT_REPO-TOKEN", hide_env_values = true)]
        repo_token: Option<String>,

        #[arg(long, env = "GITHUB_EVENT_PATH")]
        event_path: Option<PathBuf>,

        #[arg(long, env = "GITHUB_HEAD_REF")]
        head_ref: Option<String>,

        #[arg(long, env = "GITHUB_API_URL")]
        endpoint: Option<String>,
    },

    /// Store and validate GitHub credentials
    Login {
        #[arg(short, long, help = "Ask for new credentials even if valid ones are stored")]
        force: bool,

        #[arg(long)]
        username: Option<String>,

        #[arg(long, help = "Personal access token")]
        token: Option<String>,

        #[arg(long, help = "Custom GitHub API endpoint")]
        endpoint: Option<String>,
    },

    /// List the labels of a categorization
    Labels {
        #[arg(help = "type, component or priority")]
        categorization: String,
    },

    /// Print the version bump implied by the given type values
    Bump {
        #[arg(required = true)]
        types: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(Args::parse()) {
        ui::display_error(&format!("{:#}", e));
        if e
            .downcast_ref::<UnicornError>()
            .is_some_and(UnicornError::is_auth_failure)
        {
            ui::display_status("Check the token, or run `unicorn login --force` to store new credentials");
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let prefix = match args.prefix {
        Some(prefix) => prefix,
        None => std::env::current_dir()?,
    };

    match args.command {
        Command::Action {
            repo_token,
            event_path,
            head_ref,
            endpoint,
        } => {
            let action_args = ActionArgs {
                prefix,
                repo_token,
                event_path,
                head_ref,
                endpoint,
            };
            let mut sessions =
                SessionManager::without_store(GithubConnector::default(), ConsoleInteraction::new());
            let report = action::run(&action_args, &mut sessions, |prefix: &Path| {
                Git2Repository::open(prefix)
            })?;
            ui::display_report(&report);
        }
        Command::Login {
            force,
            username,
            token,
            endpoint,
        } => {
            let interaction = ConsoleInteraction::new();
            let mode = if interaction.is_interactive() {
                AuthMode::default()
            } else {
                AuthMode::Headless
            };
            let mut sessions = SessionManager::new(
                GithubConnector::default(),
                open_store(args.config_dir.as_deref())?,
                interaction,
                mode,
            );
            let session = sessions.authenticate(AuthRequest {
                force_new: force,
                username,
                password: None,
                token,
                endpoint,
            })?;
            ui::display_success(&format!(
                "Authenticated as {}",
                session.credentials.username
            ));
        }
        Command::Labels { categorization } => {
            let config = ProjectConfig::load(&prefix)?;
            let labels = config.categorization.all_resolved(&categorization)?;
            ui::display_labels(&categorization, &labels);
        }
        Command::Bump { types } => {
            let config = load_or_default(&prefix)?;
            let resolved = types
                .iter()
                .map(|name| config.type_.get(name).map(|r| r.value.version_bump))
                .collect::<unicorn::Result<Vec<_>>>()?;
            ui::display_bump(select_bump(resolved));
        }
    }

    Ok(())
}

fn open_store(config_dir: Option<&Path>) -> Result<GlobalConfigStore> {
    let store = match config_dir {
        Some(dir) => GlobalConfigStore::open_in(dir)?,
        None => GlobalConfigStore::open_default()?,
    };
    Ok(store)
}

/// Categorizations of the project at `prefix`, or the defaults outside a project
fn load_or_default(prefix: &Path) -> Result<CategorizationConfig> {
    if ProjectConfig::path(prefix).exists() {
        Ok(ProjectConfig::load(prefix)?.categorization)
    } else {
        tracing::info!(prefix = %prefix.display(), "no project config, using default categorizations");
        Ok(CategorizationConfig::default())
    }
}
