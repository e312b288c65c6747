//! In-memory generation cache keyed by source fingerprint.
//!
//! Repeated driver runs within one process (watch modes, test harnesses)
//! reuse generation results for sources that have not changed. The cache
//! is keyed by the structural fingerprint, so renaming a source back and
//! forth still hits.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use event_facade::{
    EventSource, FacadeOutput, GenerateError, GenerateOptions, generate_with, source_fingerprint,
};

/// Cache of generation results for one fixed set of options.
#[derive(Debug, Default)]
pub struct GenerationCache {
    options: GenerateOptions,
    entries: HashMap<u64, Arc<FacadeOutput>>,
}

impl GenerationCache {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options, entries: HashMap::new() }
    }

    /// The options every cached result was generated with.
    #[inline]
    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Return the cached output for `source`, generating on a miss.
    ///
    /// Fatal generation errors are not cached; a later call with a fixed
    /// source regenerates from scratch.
    pub fn get_or_generate(
        &mut self,
        source: &EventSource,
    ) -> Result<Arc<FacadeOutput>, GenerateError> {
        let fingerprint = source_fingerprint(source);
        if let Some(output) = self.entries.get(&fingerprint) {
            trace!(source = %source.name, "generation cache hit");
            return Ok(Arc::clone(output));
        }
        let output = Arc::new(generate_with(source, &self.options)?);
        self.entries.insert(fingerprint, Arc::clone(&output));
        Ok(output)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use event_facade::{EventMember, Severity};

    fn source(name: &str, members: &[(&str, i64)]) -> EventSource {
        EventSource::new(
            name,
            members.iter().map(|&(n, v)| EventMember::new(n, v)).collect(),
        )
    }

    #[test]
    fn repeated_lookups_share_one_result() {
        let mut cache = GenerationCache::default();
        let telemetry = source("Telemetry", &[("APP_Start", 1)]);

        let first = cache.get_or_generate(&telemetry).unwrap();
        let second = cache.get_or_generate(&telemetry).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_sources_get_distinct_entries() {
        let mut cache = GenerationCache::default();
        cache.get_or_generate(&source("A", &[("X_Y", 1)])).unwrap();
        cache.get_or_generate(&source("B", &[("X_Y", 1)])).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn fatal_errors_are_not_cached() {
        let mut cache = GenerationCache::default();
        let empty = source("Empty", &[]);

        assert!(cache.get_or_generate(&empty).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn options_flow_into_generation() {
        let options = GenerateOptions { report_single_member_areas: true };
        let mut cache = GenerationCache::new(options);
        let output = cache
            .get_or_generate(&source("Telemetry", &[("APP_Start", 1), ("DB_Open", 2)]))
            .unwrap();

        let infos = output
            .diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Info)
            .count();
        assert_eq!(infos, 2);
    }
}
