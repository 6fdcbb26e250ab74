use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Extensions accepted for upload, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("filename pattern is valid"));

/// Result of validating a single path segment.
#[derive(Debug, PartialEq, Eq)]
pub enum SegmentError {
    /// Segment is empty or whitespace-only.
    Empty,
    /// Segment contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Segment is a `..` traversal.
    PathTraversal,
    /// Segment contains null bytes.
    NullByte,
    /// Segment starts with a dot (hidden entry).
    Hidden,
    /// Segment contains control characters (CR, LF, etc.).
    ControlCharacter,
}

impl SegmentError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "must not be empty",
            Self::ContainsPathSeparator => "path separators are not allowed",
            Self::PathTraversal => "'..' is not allowed",
            Self::NullByte => "null bytes are not allowed",
            Self::Hidden => "must not start with '.'",
            Self::ControlCharacter => "control characters are not allowed",
        }
    }
}

/// Validates a value that becomes one directory level under the upload root.
///
/// Returns the trimmed segment.
pub fn validate_path_segment(segment: &str) -> Result<&str, SegmentError> {
    let trimmed = segment.trim();

    if trimmed.is_empty() {
        return Err(SegmentError::Empty);
    }

    if trimmed.contains('\0') {
        return Err(SegmentError::NullByte);
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(SegmentError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(SegmentError::ContainsPathSeparator);
    }

    if trimmed == ".." {
        return Err(SegmentError::PathTraversal);
    }

    if trimmed.starts_with('.') {
        return Err(SegmentError::Hidden);
    }

    Ok(trimmed)
}

/// Lowercased text after the last `.` of a declared filename.
pub fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    Some(ext.to_lowercase())
}

/// Whether the declared filename carries one of [`ALLOWED_EXTENSIONS`].
pub fn has_allowed_extension(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduce a client-supplied filename to a flat, filesystem-safe name.
///
/// The name is NFKD-decomposed first so accented letters keep their base
/// letter. Path separators become word breaks, remaining non-ASCII is
/// dropped, whitespace runs collapse to `_`, anything outside
/// `[A-Za-z0-9_.-]` is removed and leading or trailing `.`/`_` are trimmed.
/// May return an empty string.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_FILENAME_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
