//! Input model: one flat set of named integer event constants.
//!
//! A discovery layer (config file, annotation scanner, test fixture) hands
//! the generator a fully materialized [`EventSource`]. Everything downstream
//! is derived from this snapshot, so two value-equal sources always produce
//! value-equal output.

use serde::{Deserialize, Serialize};

/// What kind of declaration a source was discovered on.
///
/// Only [`SourceKind::ConstantSet`] is accepted by the generator. Anything
/// else is rejected as a whole before any tree is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A closed set of uniquely named integer constants.
    #[default]
    ConstantSet,
    /// Any other declaration shape the discovery layer may hand over.
    Other,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::ConstantSet => write!(f, "a named constant set"),
            SourceKind::Other => write!(f, "an unsupported declaration"),
        }
    }
}

/// One named constant inside a source.
///
/// `value` is carried at full input width; the generator narrows it to the
/// 32-bit event-id space and rejects members that do not fit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventMember {
    pub name: String,
    pub value: i64,
}

impl EventMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self { name: name.into(), value }
    }
}

/// A flat set of event definitions, in declaration order.
///
/// Declaration order is part of the input: it drives collision-suffix
/// allocation and is preserved in diagnostics. Member names are expected to
/// be unique within a source; the discovery layer enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventSource {
    /// Simple name of the source, e.g. `"Telemetry"`.
    pub name: String,
    /// Namespace the emitted facade types are declared in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Override for the root facade type name. Defaults to `<name>Logger`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_name: Option<String>,
    /// Prefix prepended to every composed event path, without a trailing dot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default)]
    pub members: Vec<EventMember>,
}

impl EventSource {
    /// A constant-set source with no namespace, base path, or name override.
    pub fn new(name: impl Into<String>, members: Vec<EventMember>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            root_name: None,
            base_path: None,
            kind: SourceKind::ConstantSet,
            members,
        }
    }

    /// The root facade type name: the configured override, or `<name>Logger`.
    pub fn root_facade_name(&self) -> String {
        match &self.root_name {
            Some(name) => name.clone(),
            None => format!("{}Logger", self.name),
        }
    }

    /// The path prefix, `""` when none was configured.
    pub fn base_path(&self) -> &str {
        self.base_path.as_deref().unwrap_or("")
    }
}

// ============================================================================
// Tests
// ============================================================================
