//! Dotted path composition for taxonomy nodes.

/// Separator between path segments in a composed event path.
pub const PATH_SEPARATOR: char = '.';

/// Joins normalized path segments into the stable dotted event path.
///
/// An empty `base_path` yields the plain join with no leading separator;
/// a non-empty one is prepended followed by one separator. No further
/// normalization happens here.
pub fn compose_path<S: AsRef<str>>(base_path: &str, segments: &[S]) -> String {
    let mut out = String::new();
    if !base_path.is_empty() {
        out.push_str(base_path);
        out.push(PATH_SEPARATOR);
    }
    for (index, segment) in segments.iter().enumerate() {
        if index > 0 {
            out.push(PATH_SEPARATOR);
        }
        out.push_str(segment.as_ref());
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
