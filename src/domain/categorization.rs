//! Categorization registry
//!
//! A categorization is a named, closed set of values (e.g. the `type` values
//! `feat`, `fix`, ...) plus a [LabelConfig] describing how each value is
//! rendered as a label on the tracker. The three categorizations a project
//! carries share one generic data structure, [Categorization], parameterized
//! by the payload of their values.
//!
//! Lookups accept either a value's short name (`feat`) or its full label
//! name (`T: feat`). When names are duplicated the first match wins; short
//! names are checked before full names.

use crate::domain::version::VersionBump;
use crate::error::{Result, UnicornError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Payload shape of one categorization's values.
pub trait CategorizationValue: Clone {
    /// Fixed name of the categorization these values belong to
    const CATEGORIZATION: &'static str;

    /// Whether persisted value lists are normalized to name order.
    /// Lists whose order encodes a rank keep their input order.
    const SORTED: bool;

    fn name(&self) -> &str;

    fn description(&self) -> Option<&str>;

    fn default_values() -> Vec<Self>;

    fn default_labels() -> LabelConfig;
}

/// How values of a categorization are rendered as tracker labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub color: String,
    pub prefix: String,
    pub description_prefix: String,
}

impl LabelConfig {
    pub fn new(
        color: impl Into<String>,
        prefix: impl Into<String>,
        description_prefix: impl Into<String>,
    ) -> Self {
        LabelConfig {
            color: color.into(),
            prefix: prefix.into(),
            description_prefix: description_prefix.into(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig::new("cfd3d7", "", "")
    }
}

/// A named set of uniquely-named values plus their label policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    default,
    bound(
        serialize = "V: Serialize",
        deserialize = "V: Deserialize<'de> + CategorizationValue"
    )
)]
pub struct Categorization<V> {
    pub values: Vec<V>,
    pub labels: LabelConfig,
}

impl<V: CategorizationValue> Default for Categorization<V> {
    fn default() -> Self {
        Categorization {
            values: V::default_values(),
            labels: V::default_labels(),
        }
    }
}

/// A value joined with the label policy of its categorization.
///
/// Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue<'a, V> {
    pub value: &'a V,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub full_description: String,
    pub color: String,
}

impl<'a, V: CategorizationValue> ResolvedValue<'a, V> {
    fn new(value: &'a V, labels: &LabelConfig) -> Self {
        let name = value.name().to_string();
        let description = value.description().map(str::to_string);
        ResolvedValue {
            value,
            full_name: format!("{}{}", labels.prefix, name),
            full_description: format!(
                "{}{}",
                labels.description_prefix,
                description.as_deref().unwrap_or(&name)
            ),
            description,
            color: labels.color.clone(),
            name,
        }
    }

    /// Owned, payload-free view of this value
    pub fn to_label(&self) -> Label {
        Label {
            categorization: V::CATEGORIZATION.to_string(),
            name: self.name.clone(),
            full_name: self.full_name.clone(),
            description: self.description.clone(),
            full_description: self.full_description.clone(),
            color: self.color.clone(),
        }
    }
}

/// A resolved value detached from its payload, as handed to the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub categorization: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub full_description: String,
    pub color: String,
}

impl<V: CategorizationValue> Categorization<V> {
    /// Builds a categorization, rejecting duplicate value names
    pub fn new(values: Vec<V>, labels: LabelConfig) -> Result<Self> {
        let categorization = Categorization { values, labels };
        categorization.validate()?;
        Ok(categorization)
    }

    pub fn name(&self) -> &'static str {
        V::CATEGORIZATION
    }

    /// Checks that value names are pairwise distinct (case-sensitive)
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for value in &self.values {
            if !seen.insert(value.name()) {
                return Err(UnicornError::DuplicateCategorizationValue {
                    categorization: V::CATEGORIZATION.to_string(),
                    value: value.name().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn value_names(&self) -> Vec<String> {
        self.values.iter().map(|v| v.name().to_string()).collect()
    }

    /// All values resolved, in stored order
    pub fn resolved_values(&self) -> Vec<ResolvedValue<'_, V>> {
        self.values
            .iter()
            .map(|value| ResolvedValue::new(value, &self.labels))
            .collect()
    }

    pub fn get_or_none(&self, name: &str) -> Option<ResolvedValue<'_, V>> {
        self.values
            .iter()
            .find(|v| v.name() == name)
            .or_else(|| {
                self.values
                    .iter()
                    .find(|v| format!("{}{}", self.labels.prefix, v.name()) == name)
            })
            .map(|value| ResolvedValue::new(value, &self.labels))
    }

    pub fn get(&self, name: &str) -> Result<ResolvedValue<'_, V>> {
        self.get_or_none(name)
            .ok_or_else(|| UnicornError::UnknownCategorizationValue {
                categorization: V::CATEGORIZATION.to_string(),
                value: name.to_string(),
                known: self.value_names(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_or_none(name).is_some()
    }

    /// Replaces the whole value list, returning a new categorization.
    ///
    /// Partial patches are not supported; callers pass the complete list.
    pub fn with_values(&self, values: Vec<V>) -> Result<Self> {
        let mut replaced = Categorization::new(values, self.labels.clone())?;
        replaced.normalize();
        Ok(replaced)
    }

    /// Applies the persisted ordering of this categorization
    pub fn normalize(&mut self) {
        if V::SORTED {
            self.values.sort_by(|a, b| a.name().cmp(b.name()));
        }
    }
}

/// A `type` value, optionally tagged with the version bump it implies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_bump: Option<VersionBump>,
}

impl Type {
    pub fn new(name: impl Into<String>, description: Option<&str>, bump: Option<VersionBump>) -> Self {
        Type {
            name: name.into(),
            description: description.map(str::to_string),
            version_bump: bump,
        }
    }
}

impl CategorizationValue for Type {
    const CATEGORIZATION: &'static str = "type";
    const SORTED: bool = true;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn default_values() -> Vec<Self> {
        vec![
            Type::new("feat", Some(":tada: New Features"), Some(VersionBump::Feature)),
            Type::new("change", Some(":boom: Changes"), Some(VersionBump::Breaking)),
            Type::new("fix", Some(":bug: Bug Fixes"), Some(VersionBump::Fix)),
            Type::new("docs", Some(":scroll: Documentation updates"), None),
            Type::new("refactor", Some(":building_construction: Refactoring"), None),
            Type::new("build", Some(":package: Build & CI"), None),
        ]
    }

    fn default_labels() -> LabelConfig {
        LabelConfig::new("c5def5", "T: ", "Type: ")
    }
}

/// A `component` value with the path globs it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

impl Component {
    pub fn new(name: impl Into<String>, description: Option<&str>, paths: &[&str]) -> Self {
        Component {
            name: name.into(),
            description: description.map(str::to_string),
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl CategorizationValue for Component {
    const CATEGORIZATION: &'static str = "component";
    const SORTED: bool = true;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn default_values() -> Vec<Self> {
        Vec::new()
    }

    fn default_labels() -> LabelConfig {
        LabelConfig::new("c2e0c6", "C: ", "Component: ")
    }
}

/// A `priority` value; list order is the rank, lowest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Priority {
    pub fn new(name: impl Into<String>, description: Option<&str>) -> Self {
        Priority {
            name: name.into(),
            description: description.map(str::to_string),
        }
    }
}

impl CategorizationValue for Priority {
    const CATEGORIZATION: &'static str = "priority";
    const SORTED: bool = false;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn default_values() -> Vec<Self> {
        vec![
            Priority::new("1", Some("1 (Lowest)")),
            Priority::new("2", Some("2 (Low)")),
            Priority::new("3", Some("3 (Medium)")),
            Priority::new("4", Some("4 (High)")),
            Priority::new("5", Some("5 (Highest)")),
        ]
    }

    fn default_labels() -> LabelConfig {
        LabelConfig::new("e5b5ff", "P: ", "Priority: ")
    }
}

/// The three categorizations of a project
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizationConfig {
    pub component: Categorization<Component>,
    pub priority: Categorization<Priority>,
    #[serde(rename = "type")]
    pub type_: Categorization<Type>,
}

impl CategorizationConfig {
    pub const NAMES: [&'static str; 3] = [
        Component::CATEGORIZATION,
        Priority::CATEGORIZATION,
        Type::CATEGORIZATION,
    ];

    fn unknown(name: &str) -> UnicornError {
        UnicornError::UnknownCategorization {
            name: name.to_string(),
            known: Self::NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Resolves `value` (short or full label name) within `categorization`
    pub fn resolve(&self, categorization: &str, value: &str) -> Result<Label> {
        match categorization {
            Component::CATEGORIZATION => self.component.get(value).map(|r| r.to_label()),
            Priority::CATEGORIZATION => self.priority.get(value).map(|r| r.to_label()),
            Type::CATEGORIZATION => self.type_.get(value).map(|r| r.to_label()),
            other => Err(Self::unknown(other)),
        }
    }

    /// Existence check; an unknown categorization contains nothing
    pub fn contains(&self, categorization: &str, value: &str) -> bool {
        match categorization {
            Component::CATEGORIZATION => self.component.contains(value),
            Priority::CATEGORIZATION => self.priority.contains(value),
            Type::CATEGORIZATION => self.type_.contains(value),
            _ => false,
        }
    }

    pub fn all_resolved(&self, categorization: &str) -> Result<Vec<Label>> {
        fn labels<V: CategorizationValue>(c: &Categorization<V>) -> Vec<Label> {
            c.resolved_values().iter().map(|r| r.to_label()).collect()
        }

        match categorization {
            Component::CATEGORIZATION => Ok(labels(&self.component)),
            Priority::CATEGORIZATION => Ok(labels(&self.priority)),
            Type::CATEGORIZATION => Ok(labels(&self.type_)),
            other => Err(Self::unknown(other)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.component.validate()?;
        self.priority.validate()?;
        self.type_.validate()
    }

    /// Sorts `component` and `type` values by name; `priority` keeps its order
    pub fn normalize(&mut self) {
        self.component.normalize();
        self.priority.normalize();
        self.type_.normalize();
    }

    /// Pairs of categorizations whose label prefixes make labels ambiguous.
    ///
    /// Two prefixes collide when one starts with the other.
    pub fn prefix_collisions(&self) -> Vec<(&'static str, &'static str)> {
        let prefixes = [
            (Component::CATEGORIZATION, &self.component.labels.prefix),
            (Priority::CATEGORIZATION, &self.priority.labels.prefix),
            (Type::CATEGORIZATION, &self.type_.labels.prefix),
        ];

        let mut collisions = Vec::new();
        for (i, (a_name, a)) in prefixes.iter().enumerate() {
            for (b_name, b) in prefixes.iter().skip(i + 1) {
                if a.starts_with(b.as_str()) || b.starts_with(a.as_str()) {
                    collisions.push((*a_name, *b_name));
                }
            }
        }
        collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> Categorization<Type> {
        Categorization::default()
    }

    #[test]
    fn test_short_and_full_name_resolve_identically() {
        let categorization = types();
        for value in &categorization.values {
            let by_short = categorization.get(&value.name).unwrap();
            let by_full = categorization.get(&format!("T: {}", value.name)).unwrap();
            assert_eq!(by_short, by_full);
        }
    }

    #[test]
    fn test_resolved_value_fields() {
        let categorization = types();
        let feat = categorization.get("feat").unwrap();
        assert_eq!(feat.name, "feat");
        assert_eq!(feat.full_name, "T: feat");
        assert_eq!(feat.full_description, "Type: :tada: New Features");
        assert_eq!(feat.color, "c5def5");
        assert_eq!(feat.value.version_bump, Some(VersionBump::Feature));
    }

    #[test]
    fn test_full_description_falls_back_to_name() {
        let categorization = Categorization::new(
            vec![Component::new("cli", None, &[])],
            Component::default_labels(),
        )
        .unwrap();
        let cli = categorization.get("C: cli").unwrap();
        assert_eq!(cli.description, None);
        assert_eq!(cli.full_description, "Component: cli");
    }

    #[test]
    fn test_unknown_value_enumerates_valid_names() {
        let err = types().get("feature").unwrap_err();
        match err {
            UnicornError::UnknownCategorizationValue { known, value, .. } => {
                assert_eq!(value, "feature");
                assert!(known.contains(&"feat".to_string()));
                assert_eq!(known.len(), 6);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_names_rejected_on_construction() {
        let result = Categorization::new(
            vec![Priority::new("1", None), Priority::new("1", Some("again"))],
            Priority::default_labels(),
        );
        assert!(matches!(
            result,
            Err(UnicornError::DuplicateCategorizationValue { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_resolve_to_first_match() {
        let categorization = Categorization {
            values: vec![Priority::new("1", Some("first")), Priority::new("1", Some("second"))],
            labels: Priority::default_labels(),
        };
        assert!(categorization.validate().is_err());
        assert_eq!(
            categorization.get("1").unwrap().description.as_deref(),
            Some("first")
        );
        assert_eq!(
            categorization.get("P: 1").unwrap().description.as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_short_name_wins_over_full_name() {
        // "x: a" is both the short name of one value and the full name of
        // the other; the short name wins.
        let categorization = Categorization {
            values: vec![Component::new("a", Some("plain"), &[]), Component::new("x: a", None, &[])],
            labels: LabelConfig::new("ffffff", "x: ", ""),
        };
        assert_eq!(categorization.get("x: a").unwrap().name, "x: a");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(types().contains("fix"));
        assert!(!types().contains("Fix"));
    }

    #[test]
    fn test_with_values_sorts_types_and_components() {
        let components = Categorization::<Component>::default()
            .with_values(vec![Component::new("b", None, &[]), Component::new("a", None, &[])])
            .unwrap();
        assert_eq!(components.value_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_with_values_keeps_priority_order() {
        let priorities = Categorization::<Priority>::default()
            .with_values(vec![Priority::new("high", None), Priority::new("low", None)])
            .unwrap();
        assert_eq!(priorities.value_names(), vec!["high", "low"]);
        assert_eq!(priorities.labels, Priority::default_labels());
    }

    #[test]
    fn test_registry_resolve_by_name() {
        let config = CategorizationConfig::default();
        let label = config.resolve("priority", "P: 5").unwrap();
        assert_eq!(label.categorization, "priority");
        assert_eq!(label.name, "5");
        assert_eq!(label.full_description, "Priority: 5 (Highest)");
    }

    #[test]
    fn test_registry_unknown_categorization() {
        let config = CategorizationConfig::default();
        assert!(matches!(
            config.resolve("severity", "high"),
            Err(UnicornError::UnknownCategorization { .. })
        ));
        assert!(!config.contains("severity", "high"));
    }

    #[test]
    fn test_registry_all_resolved_keeps_order() {
        let config = CategorizationConfig::default();
        let priorities = config.all_resolved("priority").unwrap();
        let names: Vec<&str> = priorities.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["1", "2", "3", "4", "5"]);
        assert!(config.all_resolved("component").unwrap().is_empty());
    }

    #[test]
    fn test_default_prefixes_do_not_collide() {
        assert!(CategorizationConfig::default().prefix_collisions().is_empty());
    }

    #[test]
    fn test_prefix_collision_detected() {
        let mut config = CategorizationConfig::default();
        config.component.labels.prefix = "T".to_string();
        assert_eq!(config.prefix_collisions(), vec![("component", "type")]);
    }
}
