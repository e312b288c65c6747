//! Name segmentation, identifier normalization, and collision-free
//! identifier allocation.
//!
//! `tokenize` and `normalize_segment` are pure functions. [`NameAllocator`]
//! is the only stateful piece: one instance per sibling scope, so suffix
//! assignment depends on insertion order within that scope and nothing else.

use std::collections::{HashMap, HashSet};

/// Separator between raw name segments in a member name.
pub const SEGMENT_SEPARATOR: char = '_';

/// Substitute identifier for segments that normalize to nothing.
const EMPTY_SEGMENT_IDENT: &str = "Value";

/// Letter prepended when a normalized segment does not start like an
/// identifier (e.g. it starts with a digit).
const IDENT_START_PREFIX: char = 'E';

/// Reserved words that need a trailing underscore. Normalized segments
/// always start with an uppercase letter (or the prepended prefix), so the
/// only reachable Rust keyword is `Self`.
const RESERVED: &[&str] = &["Self"];

/// Raw name segments of one member, split on [`SEGMENT_SEPARATOR`].
///
/// Never empty: a name with no separator (or nothing but separators) yields
/// a single degenerate token, so `first` always exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub first: String,
    pub rest: Vec<String>,
}

impl Tokens {
    /// True when the name produced exactly one usable token.
    pub fn is_degenerate(&self) -> bool {
        self.rest.is_empty()
    }

    /// The leaf segment: the last token, or `first` for degenerate names.
    pub fn last(&self) -> &str {
        match self.rest.last() {
            Some(last) => last,
            None => &self.first,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.first.as_str()).chain(self.rest.iter().map(String::as_str))
    }
}

/// Splits a member name into raw segments.
///
/// Consecutive or boundary separators produce no segments, and each segment
/// is whitespace-trimmed. A name that yields no segments at all falls back
/// to a single token holding the original name verbatim.
pub fn tokenize(name: &str) -> Tokens {
    let mut segments = name
        .split(SEGMENT_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string);
    match segments.next() {
        Some(first) => Tokens { first, rest: segments.collect() },
        None => Tokens { first: name.to_string(), rest: Vec::new() },
    }
}

/// Converts one raw segment into a capitalized identifier.
///
/// Words are maximal alphanumeric runs. The first letter of each word is
/// uppercased, later letters are lowercased, digits pass through, and
/// everything else is dropped. The result is then patched into identifier
/// shape: empty becomes [`EMPTY_SEGMENT_IDENT`], a non-letter start gets
/// [`IDENT_START_PREFIX`] prepended, and reserved words grow a trailing
/// underscore. Never fails.
pub fn normalize_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    let mut word_has_letter = false;
    for ch in raw.chars() {
        if !ch.is_alphanumeric() {
            in_word = false;
            continue;
        }
        if !in_word {
            in_word = true;
            word_has_letter = false;
        }
        if ch.is_alphabetic() {
            if word_has_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
                word_has_letter = true;
            }
        } else {
            out.push(ch);
        }
    }

    if out.is_empty() {
        return EMPTY_SEGMENT_IDENT.to_string();
    }
    let starts_like_ident = out.chars().next().is_some_and(char::is_alphabetic);
    if !starts_like_ident {
        out.insert(0, IDENT_START_PREFIX);
    }
    if RESERVED.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// Collision-free identifier allocation for one sibling scope.
///
/// The first request for a base name returns it unchanged; each repeat
/// returns `base` + a numeric suffix starting at 1, skipping candidates
/// already issued in this scope (a literal `Foo1` may have been handed out
/// before the second `Foo` arrives).
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    next_suffix: HashMap<String, u32>,
    issued: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a name unique within this scope, derived from `base`.
    pub fn allocate(&mut self, base: &str) -> String {
        let suffix = self.next_suffix.entry(base.to_string()).or_insert(0);
        loop {
            let candidate = if *suffix == 0 {
                base.to_string()
            } else {
                format!("{base}{suffix}")
            };
            *suffix += 1;
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
