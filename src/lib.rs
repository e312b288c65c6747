//! # Event Facade Generator (event-facade)
//!
//! Turns a flat set of uniquely named integer constants ("event
//! definitions") into a hierarchical, collision-free description of nested
//! logging entry points, plus static diagnostics over the same input.
//!
//! ## Design
//!
//! A small compiler pass over one [`EventSource`]:
//!
//! ```text
//! Tokenizer ──▶ Taxonomy Builder ──▶ Path Composer ──▶ Facade Emitter
//!                (normalizer +
//!                 name allocator)
//!
//! Validator ──▶ diagnostics (independent of the tree)
//! ```
//!
//! Member names are split on `_`: the first token selects an Area, middle
//! tokens nest Groups, the last token becomes a leaf Event with a stable
//! dotted path like `MyApp.Db.Connection.Open`. Identifier collisions get
//! deterministic numeric suffixes; suffixes never leak into paths.
//!
//! ## One-Shot Generation
//!
//! ```
//! use event_facade::{generate, EventMember, EventSource};
//!
//! let source = EventSource::new(
//!     "Telemetry",
//!     vec![
//!         EventMember::new("APP_Startup", 1000),
//!         EventMember::new("DB_Connection_Open", 2000),
//!     ],
//! );
//! let output = generate(&source).unwrap();
//! assert_eq!(output.facade.root.type_name, "TelemetryLogger");
//! assert!(output.diagnostics.is_empty());
//! ```
//!
//! Generation is pure: a value-equal source always yields a value-equal
//! output, which is what [`fingerprint::source_fingerprint`] keys
//! memoization and manifest-based change detection on.

pub mod facade;
pub mod fingerprint;
pub mod naming;
pub mod path;
pub mod runtime;
pub mod source;
pub mod taxonomy;
pub mod validate;

use thiserror::Error;
use tracing::{debug, instrument};

pub use facade::{EventPointDef, FacadeDef, FacadeDescription, RegistrationDef, RootFacadeDef};
pub use fingerprint::source_fingerprint;
pub use naming::{NameAllocator, SEGMENT_SEPARATOR, Tokens, normalize_segment, tokenize};
pub use path::{PATH_SEPARATOR, compose_path};
pub use runtime::{CaptureSink, CapturedEvent, EventPoint, EventRecord, EventSink, Level};
pub use source::{EventMember, EventSource, SourceKind};
pub use taxonomy::{BranchKind, BranchNode, EventNode, Taxonomy};
pub use validate::{Diagnostic, DiagnosticKind, Severity, validate};

/// Failures that reject a whole source before any facade is produced.
///
/// These are the fatal class: one failing source never affects other
/// sources in the same run, and no partial output exists for it. Advisory
/// findings are [`Diagnostic`]s, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("source '{source_name}' has no members")]
    EmptySource { source_name: String },
    #[error("source '{source_name}' is declared on {kind}; only constant sets are supported")]
    UnsupportedTarget { source_name: String, kind: SourceKind },
    #[error(
        "member '{member}' of source '{source_name}' has value {value}, \
         outside the 32-bit event-id range"
    )]
    ValueOutOfRange { source_name: String, member: String, value: i64 },
}

/// Knobs for one generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Also report areas used by exactly one member (EVF0005, off by
    /// default).
    pub report_single_member_areas: bool,
}

/// Everything one successful generation pass produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacadeOutput {
    pub facade: FacadeDescription,
    pub diagnostics: Vec<Diagnostic>,
}

impl FacadeOutput {
    /// True when any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity() == Severity::Error)
    }
}

/// Run the full pipeline with default options.
pub fn generate(source: &EventSource) -> Result<FacadeOutput, GenerateError> {
    generate_with(source, &GenerateOptions::default())
}

/// Run the full pipeline: validate, build the tree, emit the description.
///
/// Diagnostics never stop generation; the fatal cases are the
/// [`GenerateError`] variants. On a fatal error no facade exists, but
/// [`validate`] can still be called directly for the advisory view of the
/// same source.
#[instrument(skip(source, options), fields(source = %source.name))]
pub fn generate_with(
    source: &EventSource,
    options: &GenerateOptions,
) -> Result<FacadeOutput, GenerateError> {
    let diagnostics = validate(source, options);
    let taxonomy = Taxonomy::build(source)?;
    let facade = FacadeDescription::emit(source, &taxonomy);
    debug!(
        areas = taxonomy.areas().len(),
        events = taxonomy.event_count(),
        diagnostics = diagnostics.len(),
        "facade description generated"
    );
    Ok(FacadeOutput { facade, diagnostics })
}

// ============================================================================
// Tests
// ============================================================================
