use std::path::{Component, Path, PathBuf};

/// Canonical form of a stored relative path: `/` separators only, no empty
/// segments, no leading or trailing slash.
///
/// Accepts either separator convention and collapses doubled separators.
/// Idempotent.
pub fn normalize_stored_path(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a stored path onto `root` without ever leaving it.
///
/// The path is normalized first. Returns `None` when it is empty or contains
/// anything other than plain name segments (`..`, `.`, drive prefixes).
/// This is a lexical check only; callers that follow symlinks must also
/// compare canonicalized paths.
pub fn resolve_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let normalized = normalize_stored_path(relative);
    if normalized.is_empty() {
        return None;
    }

    let mut resolved = root.to_path_buf();
    for segment in normalized.split('/') {
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => resolved.push(name),
            _ => return None,
        }
    }
    Some(resolved)
}
