//! TOML configuration parser for events.toml.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use event_facade::{EventMember, EventSource, GenerateOptions, SourceKind};

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
struct RawConfig {
    /// Enables the single-member-area informational check (EVF0005).
    #[serde(default)]
    report_single_member_areas: bool,
    /// Source definitions, in file order.
    #[serde(default, rename = "source")]
    sources: Vec<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: String,
    namespace: Option<String>,
    root_name: Option<String>,
    base_path: Option<String>,
    /// Member table, in file order. Values are checked per source so one
    /// bad entry never fails the whole file.
    #[serde(default)]
    members: IndexMap<String, toml::Value>,
}

/// Why one source entry was rejected while the rest of the file loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceConfigError {
    #[error("member '{member}' has a non-integer value")]
    NonIntegerValue { member: String },
    #[error("member name is empty")]
    EmptyMemberName,
}

/// A source entry the loader rejected, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub name: String,
    pub reason: SourceConfigError,
}

/// Parsed and validated events configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsConfig {
    pub options: GenerateOptions,
    /// Usable sources, in file order.
    pub sources: Vec<EventSource>,
    /// Source entries rejected during loading.
    pub skipped: Vec<SkippedSource>,
}

impl EventsConfig {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_str(&content)
    }

    /// Parse from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        {
            let mut seen = HashSet::new();
            for source in &raw.sources {
                if source.name.trim().is_empty() {
                    return Err(ConfigError::Validation(
                        "empty source name is not allowed".into(),
                    ));
                }
                if !seen.insert(source.name.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "duplicate source name: {}",
                        source.name
                    )));
                }
            }
        }

        let options =
            GenerateOptions { report_single_member_areas: raw.report_single_member_areas };
        let mut sources = Vec::new();
        let mut skipped = Vec::new();
        for raw_source in raw.sources {
            let name = raw_source.name.clone();
            match convert_source(raw_source) {
                Ok(source) => sources.push(source),
                Err(reason) => skipped.push(SkippedSource { name, reason }),
            }
        }

        Ok(Self { options, sources, skipped })
    }
}

fn convert_source(raw: RawSource) -> Result<EventSource, SourceConfigError> {
    let mut members = Vec::with_capacity(raw.members.len());
    for (name, value) in &raw.members {
        if name.trim().is_empty() {
            return Err(SourceConfigError::EmptyMemberName);
        }
        let Some(value) = value.as_integer() else {
            return Err(SourceConfigError::NonIntegerValue { member: name.clone() });
        };
        members.push(EventMember::new(name.clone(), value));
    }
    Ok(EventSource {
        name: raw.name,
        namespace: raw.namespace,
        root_name: raw.root_name,
        base_path: raw.base_path,
        kind: SourceKind::ConstantSet,
        members,
    })
}

/// Errors during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse events config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid events config: {0}")]
    Validation(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_source() {
        let toml = r#"
[[source]]
name = "Telemetry"
namespace = "acme.telemetry"
root_name = "AcmeEvents"
base_path = "Acme"

[source.members]
APP_Startup = 1000
DB_Connection_Open = 2000
"#;
        let config = EventsConfig::from_str(toml).unwrap();
        assert!(config.skipped.is_empty());
        assert_eq!(config.sources.len(), 1);

        let source = &config.sources[0];
        assert_eq!(source.name, "Telemetry");
        assert_eq!(source.namespace.as_deref(), Some("acme.telemetry"));
        assert_eq!(source.root_name.as_deref(), Some("AcmeEvents"));
        assert_eq!(source.base_path.as_deref(), Some("Acme"));
        assert_eq!(source.kind, SourceKind::ConstantSet);
        assert_eq!(source.members.len(), 2);
        assert_eq!(source.members[0], EventMember::new("APP_Startup", 1000));
        assert_eq!(source.members[1], EventMember::new("DB_Connection_Open", 2000));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let toml = r#"
[[source]]
name = "Telemetry"

[source.members]
APP_Startup = 1
"#;
        let config = EventsConfig::from_str(toml).unwrap();
        let source = &config.sources[0];
        assert_eq!(source.namespace, None);
        assert_eq!(source.root_name, None);
        assert_eq!(source.base_path, None);
    }

    #[test]
    fn member_order_follows_the_file() {
        // Declaration order drives suffix allocation, so it must survive
        // parsing even when it is not alphabetical.
        let toml = r#"
[[source]]
name = "Telemetry"

[source.members]
ZZZ_Last = 3
AAA_First = 1
MMM_Middle = 2
"#;
        let config = EventsConfig::from_str(toml).unwrap();
        let names: Vec<&str> =
            config.sources[0].members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["ZZZ_Last", "AAA_First", "MMM_Middle"]);
    }

    #[test]
    fn non_integer_value_skips_only_that_source() {
        let toml = r#"
[[source]]
name = "Broken"

[source.members]
APP_Startup = "oops"

[[source]]
name = "Fine"

[source.members]
APP_Startup = 1
"#;
        let config = EventsConfig::from_str(toml).unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].name, "Fine");
        assert_eq!(config.skipped.len(), 1);
        assert_eq!(config.skipped[0].name, "Broken");
        assert_eq!(
            config.skipped[0].reason,
            SourceConfigError::NonIntegerValue { member: "APP_Startup".to_string() }
        );
    }

    #[test]
    fn float_values_are_not_integers() {
        let toml = r#"
[[source]]
name = "Broken"

[source.members]
APP_Startup = 1.5
"#;
        let config = EventsConfig::from_str(toml).unwrap();
        assert!(config.sources.is_empty());
        assert_eq!(config.skipped.len(), 1);
    }

    #[test]
    fn empty_member_name_skips_the_source() {
        let toml = r#"
[[source]]
name = "Broken"

[source.members]
"" = 1
"#;
        let config = EventsConfig::from_str(toml).unwrap();
        assert_eq!(config.skipped.len(), 1);
        assert_eq!(config.skipped[0].reason, SourceConfigError::EmptyMemberName);
    }

    #[test]
    fn rejects_empty_source_name() {
        let toml = r#"
[[source]]
name = ""

[source.members]
APP_Startup = 1
"#;
        let err = EventsConfig::from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_duplicate_source_names() {
        let toml = r#"
[[source]]
name = "Telemetry"

[source.members]
A_B = 1

[[source]]
name = "Telemetry"

[source.members]
C_D = 2
"#;
        let err = EventsConfig::from_str(toml).unwrap_err();
        assert!(err.to_string().contains("duplicate source name"));
    }

    #[test]
    fn option_flag_defaults_off() {
        let config = EventsConfig::from_str("").unwrap();
        assert!(!config.options.report_single_member_areas);
        assert!(config.sources.is_empty());

        let config =
            EventsConfig::from_str("report_single_member_areas = true\n").unwrap();
        assert!(config.options.report_single_member_areas);
    }

    #[test]
    fn missing_member_table_yields_empty_source() {
        // Loading succeeds; the generator rejects the empty source later.
        let toml = r#"
[[source]]
name = "Telemetry"
"#;
        let config = EventsConfig::from_str(toml).unwrap();
        assert!(config.sources[0].members.is_empty());
    }
}
