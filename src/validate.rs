//! Validator: structural diagnostics over the raw member list.
//!
//! Runs independently of the taxonomy builder: it never looks at the built
//! tree, and a source that fails generation can still be validated. Every
//! check scans the full member list; nothing short-circuits on the first
//! violation. The one exception is a source that is not a constant set,
//! which reports exactly one diagnostic and nothing else.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GenerateOptions;
use crate::naming::{self, SEGMENT_SEPARATOR};
use crate::source::{EventSource, SourceKind};

/// Diagnostic severity, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What one diagnostic is about. The `Display` form is the human message;
/// code and severity are fixed per variant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticKind {
    #[error("value {value} is assigned to more than one member of '{source_name}'")]
    DuplicateValue { source_name: String, value: i64 },
    #[error("'{source_name}' is declared on {kind}; only constant sets are supported")]
    UnsupportedTarget { source_name: String, kind: SourceKind },
    #[error("name contains no '_' separator; the whole name becomes both area and event")]
    MissingSeparator,
    #[error("value {value} is not positive")]
    NonPositiveValue { value: i64 },
    #[error("area token '{area}' is used by only one member")]
    SingleMemberArea { area: String },
}

impl DiagnosticKind {
    /// Stable diagnostic code, never reused across releases.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::DuplicateValue { .. } => "EVF0001",
            DiagnosticKind::UnsupportedTarget { .. } => "EVF0002",
            DiagnosticKind::MissingSeparator => "EVF0003",
            DiagnosticKind::NonPositiveValue { .. } => "EVF0004",
            DiagnosticKind::SingleMemberArea { .. } => "EVF0005",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::DuplicateValue { .. } => Severity::Error,
            DiagnosticKind::UnsupportedTarget { .. } => Severity::Error,
            DiagnosticKind::MissingSeparator => Severity::Warning,
            DiagnosticKind::NonPositiveValue { .. } => Severity::Warning,
            DiagnosticKind::SingleMemberArea { .. } => Severity::Info,
        }
    }
}

/// One diagnostic record: the member (or source) it is about plus the kind
/// carrying the message arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub subject: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(subject: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self { subject: subject.into(), kind }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} [{}]: {}", self.code(), self.severity(), self.subject, self.kind)
    }
}

/// Run all checks over one source's raw member list.
///
/// Diagnostics are ordered by check, members in declaration order within
/// each check. Generation proceeds regardless of anything reported here.
pub fn validate(source: &EventSource, options: &GenerateOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if source.kind != SourceKind::ConstantSet {
        diagnostics.push(Diagnostic::new(
            source.name.clone(),
            DiagnosticKind::UnsupportedTarget {
                source_name: source.name.clone(),
                kind: source.kind,
            },
        ));
        return diagnostics;
    }

    // EVF0001: every member of a shared-value group is flagged once.
    let mut value_counts: HashMap<i64, usize> = HashMap::new();
    for member in &source.members {
        *value_counts.entry(member.value).or_insert(0) += 1;
    }
    for member in &source.members {
        if value_counts[&member.value] > 1 {
            diagnostics.push(Diagnostic::new(
                member.name.clone(),
                DiagnosticKind::DuplicateValue {
                    source_name: source.name.clone(),
                    value: member.value,
                },
            ));
        }
    }

    // EVF0003
    for member in &source.members {
        if !member.name.contains(SEGMENT_SEPARATOR) {
            diagnostics.push(Diagnostic::new(member.name.clone(), DiagnosticKind::MissingSeparator));
        }
    }

    // EVF0004
    for member in &source.members {
        if member.value <= 0 {
            diagnostics.push(Diagnostic::new(
                member.name.clone(),
                DiagnosticKind::NonPositiveValue { value: member.value },
            ));
        }
    }

    // EVF0005 is opt-in. Areas are counted by raw first token, exactly as
    // the taxonomy builder keys them.
    if options.report_single_member_areas {
        let firsts: Vec<String> =
            source.members.iter().map(|m| naming::tokenize(&m.name).first).collect();
        let mut area_counts: HashMap<&str, usize> = HashMap::new();
        for first in &firsts {
            *area_counts.entry(first).or_insert(0) += 1;
        }
        for (member, first) in source.members.iter().zip(&firsts) {
            if area_counts[first.as_str()] == 1 {
                diagnostics.push(Diagnostic::new(
                    member.name.clone(),
                    DiagnosticKind::SingleMemberArea { area: first.clone() },
                ));
            }
        }
    }

    diagnostics
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EventMember;

    fn source(members: &[(&str, i64)]) -> EventSource {
        EventSource::new(
            "Telemetry",
            members.iter().map(|&(name, value)| EventMember::new(name, value)).collect(),
        )
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
        diagnostics.iter().map(Diagnostic::code).collect()
    }

    #[test]
    fn clean_source_has_no_diagnostics() {
        let diagnostics =
            validate(&source(&[("APP_Start", 1), ("APP_Stop", 2)]), &GenerateOptions::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn duplicate_values_flag_every_member_once() {
        let diagnostics = validate(
            &source(&[("APP_Start", 7), ("APP_Restart", 7), ("APP_Stop", 8)]),
            &GenerateOptions::default(),
        );
        assert_eq!(codes(&diagnostics), ["EVF0001", "EVF0001"]);
        let subjects: Vec<&str> = diagnostics.iter().map(|d| d.subject.as_str()).collect();
        assert_eq!(subjects, ["APP_Start", "APP_Restart"]);
        assert!(diagnostics.iter().all(|d| d.severity() == Severity::Error));
    }

    #[test]
    fn missing_separator_is_a_warning() {
        let diagnostics = validate(&source(&[("STARTUP", 5)]), &GenerateOptions::default());
        assert_eq!(codes(&diagnostics), ["EVF0003"]);
        assert_eq!(diagnostics[0].severity(), Severity::Warning);
    }

    #[test]
    fn non_positive_covers_zero_and_negative() {
        let diagnostics = validate(
            &source(&[("APP_Zero", 0), ("APP_Neg", -3), ("APP_Ok", 1)]),
            &GenerateOptions::default(),
        );
        assert_eq!(codes(&diagnostics), ["EVF0004", "EVF0004"]);
        let subjects: Vec<&str> = diagnostics.iter().map(|d| d.subject.as_str()).collect();
        assert_eq!(subjects, ["APP_Zero", "APP_Neg"]);
    }

    #[test]
    fn single_member_area_is_off_by_default() {
        let input = source(&[("APP_Start", 1), ("ONCE_Only", 2)]);
        assert!(validate(&input, &GenerateOptions::default()).is_empty());

        let options = GenerateOptions { report_single_member_areas: true };
        let diagnostics = validate(&input, &options);
        assert_eq!(codes(&diagnostics), ["EVF0005", "EVF0005"]);
        assert!(diagnostics.iter().all(|d| d.severity() == Severity::Info));
    }

    #[test]
    fn single_member_area_counts_raw_tokens() {
        let options = GenerateOptions { report_single_member_areas: true };
        // DB and Db are distinct raw tokens, so each area has one member.
        let diagnostics = validate(&source(&[("DB_Open", 1), ("Db_Close", 2)]), &options);
        assert_eq!(codes(&diagnostics), ["EVF0005", "EVF0005"]);
    }

    #[test]
    fn unsupported_target_reports_only_itself() {
        let mut input = source(&[("APP_Start", 0), ("APP_Restart", 0), ("BAD", -1)]);
        input.kind = SourceKind::Other;
        let diagnostics = validate(&input, &GenerateOptions::default());
        assert_eq!(codes(&diagnostics), ["EVF0002"]);
        assert_eq!(diagnostics[0].subject, "Telemetry");
        assert_eq!(diagnostics[0].severity(), Severity::Error);
    }

    #[test]
    fn mixed_scenario_reports_all_checks_independently() {
        let input = source(&[("APP_Start", 0), ("APP_Restart", 0), ("APPNoSeparator", -1)]);
        let options = GenerateOptions { report_single_member_areas: true };
        let diagnostics = validate(&input, &options);

        let count = |code: &str| codes(&diagnostics).iter().filter(|c| **c == code).count();
        assert_eq!(count("EVF0001"), 2);
        assert_eq!(count("EVF0003"), 1);
        assert_eq!(count("EVF0004"), 3);
        assert_eq!(count("EVF0005"), 1);
        assert_eq!(diagnostics.len(), 7);
    }

    #[test]
    fn diagnostics_render_code_severity_and_subject() {
        let diagnostic = Diagnostic::new(
            "APP_Start",
            DiagnosticKind::NonPositiveValue { value: 0 },
        );
        assert_eq!(
            diagnostic.to_string(),
            "EVF0004 warning [APP_Start]: value 0 is not positive"
        );
    }

    #[test]
    fn severity_ordering_matches_escalation() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn diagnostic_kinds_have_no_underlying_cause() {
        // The source name travels in the message, not as a chained error.
        let kind =
            DiagnosticKind::DuplicateValue { source_name: "Telemetry".to_string(), value: 7 };
        assert!(std::error::Error::source(&kind).is_none());
        assert_eq!(
            kind.to_string(),
            "value 7 is assigned to more than one member of 'Telemetry'"
        );
    }
}
