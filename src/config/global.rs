use crate::error::{Result, UnicornError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the credential store inside the config directory
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Per-installation settings, currently only the tracker credentials
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubConfig>,
}

/// Stored credential material for the tracker.
///
/// Secrets are stored unencrypted; `Debug` redacts them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubConfig {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl GithubConfig {
    pub fn with_token(username: impl Into<String>, token: impl Into<String>) -> Self {
        GithubConfig {
            username: username.into(),
            password: None,
            oauth_token: Some(token.into()),
            endpoint: None,
        }
    }

    pub fn with_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        GithubConfig {
            username: username.into(),
            password: Some(password.into()),
            oauth_token: None,
            endpoint: None,
        }
    }
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("GithubConfig")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("oauth_token", &redact(&self.oauth_token))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// The on-disk credential store.
///
/// The document is created (empty) when the store is opened, so every later
/// `load` finds a readable file. Reads and writes are whole-document.
#[derive(Debug, Clone)]
pub struct GlobalConfigStore {
    path: PathBuf,
}

impl GlobalConfigStore {
    /// Default location: `<user config dir>/unicorn/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("unicorn").join(GLOBAL_CONFIG_FILE))
    }

    /// Opens the store in `dir`, creating an empty document when absent
    pub fn open_in(dir: &Path) -> Result<Self> {
        Self::open(dir.join(GLOBAL_CONFIG_FILE))
    }

    pub fn open_default() -> Result<Self> {
        let path = Self::default_path()
            .ok_or_else(|| UnicornError::config("<config dir>", "no user config directory"))?;
        Self::open(path)
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = GlobalConfigStore { path: path.into() };
        if !store.path.exists() {
            if let Some(parent) = store.path.parent() {
                fs::create_dir_all(parent)?;
            }
            store.save(&GlobalConfig::default())?;
            tracing::debug!(path = %store.path.display(), "created credential store");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<GlobalConfig> {
        let contents = fs::read_to_string(&self.path)?;
        toml::from_str(&contents).map_err(|e| {
            UnicornError::config(self.path.display().to_string(), e.message().to_string())
        })
    }

    pub fn save(&self, config: &GlobalConfig) -> Result<()> {
        let contents = toml::to_string_pretty(config)
            .map_err(|e| UnicornError::config(self.path.display().to_string(), e.to_string()))?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Replaces the stored credentials, keeping the rest of the document
    pub fn save_github(&self, github: GithubConfig) -> Result<()> {
        let config = GlobalConfig {
            github: Some(github),
            ..self.load()?
        };
        self.save(&config)
    }
}
