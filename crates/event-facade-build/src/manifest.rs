//! Generation manifest: on-disk change detection across driver runs.
//!
//! One entry per source records the structural fingerprint of the input at
//! the last successful generation. A matching fingerprint means the source
//! is unchanged and its artifact can be kept as is.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use event_facade::{EventSource, source_fingerprint};

/// One recorded source from a previous run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    /// Hex form of the source fingerprint, as written to disk.
    pub fingerprint: String,
    /// RFC 3339 timestamp of the last successful generation.
    pub generated_at: String,
}

/// The record of the previous generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "entry")]
    pub entries: Vec<ManifestEntry>,
}

/// Source names partitioned by how they compare against a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
    pub unchanged: Vec<String>,
}

/// Hex form used in the manifest. Fingerprints are 64-bit, which TOML
/// integers cannot hold in full, so they are stored as strings.
pub fn format_fingerprint(fingerprint: u64) -> String {
    format!("{fingerprint:016x}")
}

impl Manifest {
    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ManifestError::Io { path: path.display().to_string(), source })?;
        Ok(toml::from_str(&content)?)
    }

    /// Write to a TOML file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|source| ManifestError::Io { path: path.display().to_string(), source })
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// True when the recorded fingerprint matches the source as given.
    pub fn is_current(&self, source: &EventSource) -> bool {
        self.get(&source.name)
            .is_some_and(|entry| entry.fingerprint == format_fingerprint(source_fingerprint(source)))
    }

    /// Upsert the entry for one freshly generated source.
    pub fn record(&mut self, source: &EventSource) {
        let fingerprint = format_fingerprint(source_fingerprint(source));
        let generated_at = Utc::now().to_rfc3339();
        match self.entries.iter_mut().find(|entry| entry.name == source.name) {
            Some(entry) => {
                entry.fingerprint = fingerprint;
                entry.generated_at = generated_at;
            }
            None => self.entries.push(ManifestEntry {
                name: source.name.clone(),
                fingerprint,
                generated_at,
            }),
        }
    }

    /// Drop every entry whose name is not in `keep`; returns the dropped
    /// names so the caller can clean up their artifacts.
    pub fn prune(&mut self, keep: &HashSet<&str>) -> Vec<String> {
        let mut removed = Vec::new();
        self.entries.retain(|entry| {
            if keep.contains(entry.name.as_str()) {
                true
            } else {
                removed.push(entry.name.clone());
                false
            }
        });
        removed
    }

    /// Compare this manifest against the sources of the current config.
    pub fn diff(&self, sources: &[EventSource]) -> ManifestDiff {
        let mut diff = ManifestDiff::default();
        let current: HashMap<&str, String> = sources
            .iter()
            .map(|s| (s.name.as_str(), format_fingerprint(source_fingerprint(s))))
            .collect();

        for source in sources {
            match self.get(&source.name) {
                None => diff.added.push(source.name.clone()),
                Some(entry) if entry.fingerprint == current[source.name.as_str()] => {
                    diff.unchanged.push(source.name.clone());
                }
                Some(_) => diff.changed.push(source.name.clone()),
            }
        }
        for entry in &self.entries {
            if !current.contains_key(entry.name.as_str()) {
                diff.removed.push(entry.name.clone());
            }
        }
        diff
    }
}

/// Errors during manifest reading and writing.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ============================================================================
// Tests
// ============================================================================
