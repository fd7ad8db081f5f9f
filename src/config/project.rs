use crate::domain::categorization::{CategorizationConfig, Component, Priority, Type};
use crate::error::{Result, UnicornError};
use semver::Version;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// File name of the project configuration inside the repository root
pub const PROJECT_CONFIG_FILE: &str = ".unicorn.toml";

fn default_version() -> Version {
    Version::new(0, 0, 1)
}

/// Version of this tool, recorded in configs it creates
pub fn tool_version() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}

/// Project identity plus its categorizations.
///
/// Treated as an immutable value: the `with_*` methods return a new config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub unicorn_version: Version,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<Url>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(default = "default_version")]
    pub version: Version,

    #[serde(default)]
    pub categorization: CategorizationConfig,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        ProjectConfig {
            unicorn_version: tool_version(),
            name: name.into(),
            description: None,
            homepage: None,
            license: None,
            version: default_version(),
            categorization: CategorizationConfig::default(),
        }
    }

    pub fn path(dir: &Path) -> PathBuf {
        dir.join(PROJECT_CONFIG_FILE)
    }

    /// Loads `.unicorn.toml` from `dir`.
    ///
    /// Schema and keyword errors surface as `ConfigParse`; duplicate value
    /// names are rejected. Colliding label prefixes are only warned about.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::path(dir);
        let contents = fs::read_to_string(&path).map_err(|e| {
            UnicornError::config(path.display().to_string(), format!("cannot read: {}", e))
        })?;
        let config = Self::from_toml_str(&contents, &path.display().to_string())?;

        for (a, b) in config.categorization.prefix_collisions() {
            tracing::warn!(
                first = a,
                second = b,
                "label prefixes of two categorizations collide; labels may resolve ambiguously"
            );
        }
        tracing::debug!(path = %path.display(), name = %config.name, "loaded project config");
        Ok(config)
    }

    /// Parses a config document; `origin` names the document in errors
    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self> {
        let config: ProjectConfig = toml::from_str(contents)
            .map_err(|e| UnicornError::config(origin, e.message().to_string()))?;
        config.categorization.validate()?;
        Ok(config)
    }

    /// Encodes the config with `component` and `type` values sorted by name
    pub fn to_toml_string(&self) -> Result<String> {
        let mut normalized = self.clone();
        normalized.categorization.normalize();
        toml::to_string_pretty(&normalized)
            .map_err(|e| UnicornError::config(PROJECT_CONFIG_FILE, e.to_string()))
    }

    /// Writes the whole document to `dir`
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = Self::path(dir);
        fs::write(&path, self.to_toml_string()?)?;
        tracing::debug!(path = %path.display(), "saved project config");
        Ok(())
    }

    pub fn with_components(&self, values: Vec<Component>) -> Result<Self> {
        let mut config = self.clone();
        config.categorization.component = self.categorization.component.with_values(values)?;
        Ok(config)
    }

    pub fn with_priorities(&self, values: Vec<Priority>) -> Result<Self> {
        let mut config = self.clone();
        config.categorization.priority = self.categorization.priority.with_values(values)?;
        Ok(config)
    }

    pub fn with_types(&self, values: Vec<Type>) -> Result<Self> {
        let mut config = self.clone();
        config.categorization.type_ = self.categorization.type_.with_values(values)?;
        Ok(config)
    }
}

/// License of the project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum License {
    None,
    Apache2_0,
    Mit,
}

const LICENSES: [(License, &str); 3] = [
    (License::None, "none"),
    (License::Apache2_0, "apache-2.0"),
    (License::Mit, "mit"),
];

impl License {
    pub fn keyword(&self) -> &'static str {
        LICENSES
            .iter()
            .find(|(license, _)| license == self)
            .map(|(_, keyword)| *keyword)
            .unwrap_or_default()
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        LICENSES
            .iter()
            .find(|(_, k)| k.eq_ignore_ascii_case(keyword))
            .map(|(license, _)| *license)
    }
}

impl FromStr for License {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        License::from_keyword(s).ok_or_else(|| {
            let known: Vec<&str> = LICENSES.iter().map(|(_, k)| *k).collect();
            format!("Unknown license '{}'. Known licenses: {}", s, known.join(", "))
        })
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Serialize for License {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.keyword())
    }
}

impl<'de> Deserialize<'de> for License {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let keyword = String::deserialize(deserializer)?;
        keyword.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::version::VersionBump;

    #[test]
    fn test_minimal_document_uses_defaults() {
        let config =
            ProjectConfig::from_toml_str("unicorn_version = \"0.1.0\"\nname = \"demo\"\n", "test")
                .unwrap();
        assert_eq!(config.version, Version::new(0, 0, 1));
        assert_eq!(config.license, None);
        assert_eq!(config.categorization, CategorizationConfig::default());
    }

    #[test]
    fn test_license_keyword_is_case_insensitive() {
        assert_eq!(License::from_keyword("MIT"), Some(License::Mit));
        assert_eq!(License::from_keyword("Apache-2.0"), Some(License::Apache2_0));
        assert_eq!(License::from_keyword("gpl"), None);
    }

    #[test]
    fn test_unknown_license_is_config_error() {
        let result = ProjectConfig::from_toml_str(
            "unicorn_version = \"0.1.0\"\nname = \"demo\"\nlicense = \"wtfpl\"\n",
            ".unicorn.toml",
        );
        match result {
            Err(UnicornError::ConfigParse { path, message }) => {
                assert_eq!(path, ".unicorn.toml");
                assert!(message.contains("wtfpl"), "message: {}", message);
            }
            other => panic!("expected ConfigParse, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_version_is_config_error() {
        let result =
            ProjectConfig::from_toml_str("unicorn_version = \"1.2\"\nname = \"demo\"\n", "test");
        assert!(matches!(result, Err(UnicornError::ConfigParse { .. })));
    }

    #[test]
    fn test_unknown_version_bump_is_config_error() {
        let document = r#"
unicorn_version = "0.1.0"
name = "demo"

[[categorization.type.values]]
name = "feat"
version_bump = "enormous"
"#;
        let result = ProjectConfig::from_toml_str(document, "test");
        assert!(matches!(result, Err(UnicornError::ConfigParse { .. })));
    }

    #[test]
    fn test_version_bump_keyword_decodes_case_insensitively() {
        let document = r#"
unicorn_version = "0.1.0"
name = "demo"

[[categorization.type.values]]
name = "feat"
version_bump = "MINOR"
"#;
        let config = ProjectConfig::from_toml_str(document, "test").unwrap();
        let feat = config.categorization.type_.get("feat").unwrap();
        assert_eq!(feat.value.version_bump, Some(VersionBump::Minor));
        assert!(config.to_toml_string().unwrap().contains("version_bump = \"minor\""));
    }

    #[test]
    fn test_duplicate_values_rejected_on_load() {
        let document = r#"
unicorn_version = "0.1.0"
name = "demo"

[[categorization.priority.values]]
name = "1"

[[categorization.priority.values]]
name = "1"
"#;
        let result = ProjectConfig::from_toml_str(document, "test");
        assert!(matches!(
            result,
            Err(UnicornError::DuplicateCategorizationValue { .. })
        ));
    }

    #[test]
    fn test_with_types_is_copy_on_write() {
        let original = ProjectConfig::new("demo");
        let updated = original
            .with_types(vec![Type::new("perf", None, Some(VersionBump::Patch))])
            .unwrap();
        assert_eq!(updated.categorization.type_.value_names(), vec!["perf"]);
        assert_eq!(original.categorization.type_.values.len(), 6);
    }
}
