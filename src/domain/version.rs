use crate::error::UnicornError;
use semver::Version;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Semantic version increment implied by a type value.
///
/// Variants are declared lowest to highest so the derived ordering matches
/// precedence: `Major > Breaking > Minor > Feature > Patch > Fix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionBump {
    Fix,
    Patch,
    Feature,
    Minor,
    Breaking,
    Major,
}

const KEYWORDS: [(VersionBump, &str); 6] = [
    (VersionBump::Major, "major"),
    (VersionBump::Breaking, "breaking"),
    (VersionBump::Minor, "minor"),
    (VersionBump::Feature, "feature"),
    (VersionBump::Patch, "patch"),
    (VersionBump::Fix, "fix"),
];

impl VersionBump {
    /// All bumps, highest precedence first
    pub fn all() -> impl Iterator<Item = VersionBump> {
        KEYWORDS.iter().map(|(bump, _)| *bump)
    }

    pub fn keyword(&self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(bump, _)| bump == self)
            .map(|(_, keyword)| *keyword)
            .unwrap_or_default()
    }
}

impl FromStr for VersionBump {
    type Err = UnicornError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KEYWORDS
            .iter()
            .find(|(_, keyword)| keyword.eq_ignore_ascii_case(s))
            .map(|(bump, _)| *bump)
            .ok_or_else(|| {
                let known: Vec<&str> = KEYWORDS.iter().map(|(_, k)| *k).collect();
                UnicornError::config(
                    "versionBump",
                    format!("Unknown version bump '{}'. Known values: {}", s, known.join(", ")),
                )
            })
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Serialize for VersionBump {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.keyword())
    }
}

impl<'de> Deserialize<'de> for VersionBump {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keyword = String::deserialize(deserializer)?;
        keyword.parse().map_err(|e: UnicornError| match e {
            UnicornError::ConfigParse { message, .. } => serde::de::Error::custom(message),
            other => serde::de::Error::custom(other),
        })
    }
}

/// Selects the most significant bump among the given (optional) bump tags.
///
/// Untagged values are ignored. `None` means "no bump", which callers treat
/// as a no-op rather than as the lowest real bump.
pub fn select_bump<I>(bumps: I) -> Option<VersionBump>
where
    I: IntoIterator<Item = Option<VersionBump>>,
{
    bumps.into_iter().flatten().max()
}

/// Applies a bump to a version.
///
/// `Major` and `Minor` always move their component. `Breaking` and `Feature`
/// are relative to stability: below 1.0.0 they move one component lower.
/// `Patch` and `Fix` move the patch component. Pre-release and build metadata
/// are dropped. A component that would overflow is a config error.
pub fn bump_version(version: &Version, bump: VersionBump) -> Result<Version, UnicornError> {
    let next = |component: u64| {
        component.checked_add(1).ok_or_else(|| {
            UnicornError::config(
                "version",
                format!("cannot apply a {} bump to {}", bump, version),
            )
        })
    };
    let unstable = version.major == 0;
    let major = || next(version.major).map(|major| Version::new(major, 0, 0));
    let minor = || next(version.minor).map(|minor| Version::new(version.major, minor, 0));
    let patch = || {
        next(version.patch).map(|patch| Version::new(version.major, version.minor, patch))
    };

    match bump {
        VersionBump::Major => major(),
        VersionBump::Breaking if unstable => minor(),
        VersionBump::Breaking => major(),
        VersionBump::Minor => minor(),
        VersionBump::Feature if unstable => patch(),
        VersionBump::Feature => minor(),
        VersionBump::Patch | VersionBump::Fix => patch(),
    }
}
