/*!
 * Path Components
 * String helpers for splitting normalized VFS paths
 */

/// Split a path into its components, dropping empty and `.` segments
pub fn split(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}

/// Check whether a path starts at the root
#[inline]
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// Everything before the last component
///
/// `dirname("/a/b")` is `/a`, `dirname("/a")` is `/`, and a bare name yields `.`.
pub fn dirname(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }
    match trimmed.rfind('/') {
        None => ".",
        Some(pos) => {
            let parent = trimmed[..pos].trim_end_matches('/');
            if parent.is_empty() {
                "/"
            } else {
                parent
            }
        }
    }
}

/// Last component of a path; `/` for the root
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "" } else { "/" };
    }
    match trimmed.rfind('/') {
        None => trimmed,
        Some(pos) => &trimmed[pos + 1..],
    }
}

/// Extension of the last component, without the dot
///
/// Dotfiles such as `.profile` have no extension.
pub fn extension(path: &str) -> Option<&str> {
    let name = basename(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(pos) if pos + 1 == name.len() => None,
        Some(pos) => Some(&name[pos + 1..]),
    }
}
