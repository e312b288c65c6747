//! Build-time driver for event-facade.
//!
//! This crate provides tools for:
//! - Parsing `events.toml` configuration files
//! - Tracking source fingerprints in `events.manifest.toml` across runs
//! - Writing one `<SourceName>.facade.json` description per source
//!
//! # Usage in build.rs
//!
//! ```ignore
//! // build.rs
//! fn main() {
//!     println!("cargo:rerun-if-changed=events.toml");
//!     let report = event_facade_build::generate_from_config("events.toml")
//!         .expect("failed to generate event facades");
//!     assert!(!report.has_failures(), "event facade generation reported failures");
//! }
//! ```
//!
//! # Incremental Runs
//!
//! Each run records a structural fingerprint per source in the manifest:
//!
//! - First run: generates every source and writes the manifest
//! - Later runs: sources whose fingerprint and artifact are intact are kept as is
//! - Edited sources: regenerated and re-recorded
//! - Removed sources: pruned from the manifest, their artifacts deleted
//! - Skipped sources (config-rejected or fatal): pruned the same way, so a
//!   failing source leaves no artifact from an earlier run behind
//!
//! Diagnostics are reported only for sources generated in this run; an
//! unchanged source keeps its artifact without replaying its warnings.

mod cache;
mod config;
mod manifest;

pub use cache::GenerationCache;
pub use config::{ConfigError, EventsConfig, SkippedSource, SourceConfigError};
pub use manifest::{Manifest, ManifestDiff, ManifestEntry, ManifestError, format_fingerprint};

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use event_facade::{Diagnostic, Severity, validate};

/// Manifest file name, placed next to the config file by [`BuildDriver::run`].
pub const MANIFEST_FILE: &str = "events.manifest.toml";

/// What happened to one configured source during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// Freshly generated; its artifact was (re)written.
    Generated,
    /// Fingerprint and artifact intact; nothing was done.
    Unchanged,
    /// Not generated, with the reason (config skip or fatal error).
    Skipped { reason: String },
}

/// Per-source outcome of one driver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub name: String,
    pub status: SourceStatus,
    /// Diagnostics observed for this source, empty for unchanged sources.
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of one driver run across all configured sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub sources: Vec<SourceReport>,
}

impl BuildReport {
    pub fn generated(&self) -> usize {
        self.count(|status| matches!(status, SourceStatus::Generated))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|status| matches!(status, SourceStatus::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, SourceStatus::Skipped { .. }))
    }

    /// True when any source was skipped or produced an error diagnostic.
    pub fn has_failures(&self) -> bool {
        self.sources.iter().any(|report| {
            matches!(report.status, SourceStatus::Skipped { .. })
                || report
                    .diagnostics
                    .iter()
                    .any(|d| d.severity() == Severity::Error)
        })
    }

    fn count(&self, matcher: impl Fn(&SourceStatus) -> bool) -> usize {
        self.sources.iter().filter(|report| matcher(&report.status)).count()
    }
}

/// Drives config loading, incremental generation, and artifact output.
///
/// The driver owns a [`GenerationCache`], so one driver reused across runs
/// (watch modes, test harnesses) skips regeneration work for sources whose
/// content reappears.
#[derive(Debug, Default)]
pub struct BuildDriver {
    cache: GenerationCache,
}

impl BuildDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run with paths derived from the config location: the manifest and
    /// artifacts land in the config file's directory.
    pub fn run(&mut self, config_path: impl AsRef<Path>) -> Result<BuildReport, BuildError> {
        let config_path = config_path.as_ref();
        let out_dir = config_path.parent().unwrap_or(Path::new("."));
        let manifest_path = out_dir.join(MANIFEST_FILE);
        self.run_with_paths(config_path, &manifest_path, out_dir)
    }

    /// Run with explicit manifest and output locations.
    #[instrument(skip_all)]
    pub fn run_with_paths(
        &mut self,
        config_path: impl AsRef<Path>,
        manifest_path: impl AsRef<Path>,
        out_dir: impl AsRef<Path>,
    ) -> Result<BuildReport, BuildError> {
        let config_path = config_path.as_ref();
        let manifest_path = manifest_path.as_ref();
        let out_dir = out_dir.as_ref();

        // 1. Parse events.toml
        let config = EventsConfig::from_file(config_path)?;

        // 2. The cache holds results for one option set only
        if self.cache.options() != &config.options {
            self.cache = GenerationCache::new(config.options);
        }

        // 3. Load the manifest from the previous run, if any, and note
        //    how the config moved against it
        let mut manifest = if manifest_path.exists() {
            Manifest::from_file(manifest_path)?
        } else {
            Manifest::default()
        };
        let diff = manifest.diff(&config.sources);
        debug!(
            added = diff.added.len(),
            changed = diff.changed.len(),
            removed = diff.removed.len(),
            unchanged = diff.unchanged.len(),
            "config reconciled against the manifest"
        );

        // 4. Generate each configured source, skipping unchanged ones
        let mut reports = Vec::with_capacity(config.sources.len() + config.skipped.len());
        for source in &config.sources {
            let artifact_path = out_dir.join(format!("{}.facade.json", source.name));

            if manifest.is_current(source) && artifact_path.exists() {
                debug!(source = %source.name, "source unchanged, keeping artifact");
                reports.push(SourceReport {
                    name: source.name.clone(),
                    status: SourceStatus::Unchanged,
                    diagnostics: Vec::new(),
                });
                continue;
            }

            match self.cache.get_or_generate(source) {
                Ok(output) => {
                    let json = serde_json::to_string_pretty(&output.facade).map_err(|e| {
                        BuildError::Artifact { source_name: source.name.clone(), source: e }
                    })?;
                    std::fs::write(&artifact_path, json).map_err(|e| BuildError::Io {
                        path: artifact_path.display().to_string(),
                        source: e,
                    })?;
                    manifest.record(source);
                    reports.push(SourceReport {
                        name: source.name.clone(),
                        status: SourceStatus::Generated,
                        diagnostics: output.diagnostics.clone(),
                    });
                }
                Err(fatal) => {
                    warn!(source = %source.name, error = %fatal, "generation failed, skipping source");
                    reports.push(SourceReport {
                        name: source.name.clone(),
                        status: SourceStatus::Skipped { reason: fatal.to_string() },
                        diagnostics: validate(source, &config.options),
                    });
                }
            }
        }

        // 5. Sources the config layer already rejected
        for skipped in &config.skipped {
            warn!(source = %skipped.name, reason = %skipped.reason, "source skipped by config");
            reports.push(SourceReport {
                name: skipped.name.clone(),
                status: SourceStatus::Skipped { reason: skipped.reason.to_string() },
                diagnostics: Vec::new(),
            });
        }

        // 6. Prune manifest entries and artifacts for sources gone from
        //    the config. Skipped sources are pruned too: a source that
        //    stopped generating keeps no stale facade on disk.
        let keep: HashSet<&str> = reports
            .iter()
            .filter(|report| !matches!(report.status, SourceStatus::Skipped { .. }))
            .map(|report| report.name.as_str())
            .collect();
        for removed in manifest.prune(&keep) {
            let stale = out_dir.join(format!("{removed}.facade.json"));
            if let Err(e) = std::fs::remove_file(&stale)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                return Err(BuildError::Io { path: stale.display().to_string(), source: e });
            }
            debug!(source = %removed, "pruned stale artifact");
        }

        // 7. Persist the manifest for the next run
        manifest.write_to_file(manifest_path)?;

        let report = BuildReport { sources: reports };
        info!(
            generated = report.generated(),
            unchanged = report.unchanged(),
            skipped = report.skipped(),
            "generation run complete"
        );
        Ok(report)
    }
}

/// Main entry point for build.rs integration.
///
/// Reads the config, regenerates what changed, and writes one
/// `<SourceName>.facade.json` per source next to the config file, along
/// with the manifest used for change detection.
///
/// # Errors
///
/// Returns an error if the config or manifest cannot be read or parsed,
/// or if an artifact cannot be written. Per-source problems (unsupported
/// declarations, out-of-range values) do not error the run; they appear
/// as skipped entries in the returned [`BuildReport`].
pub fn generate_from_config(config_path: impl AsRef<Path>) -> Result<BuildReport, BuildError> {
    BuildDriver::new().run(config_path)
}

/// Errors that abort a driver run.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize facade for source '{source_name}': {source}")]
    Artifact {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
}
