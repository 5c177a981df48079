/*!
 * Path Security
 * Sanitization, normalization and traversal detection for VFS path strings
 *
 * Every path handed to the tree passes through `normalize_with_limit` before a
 * single node is touched. Traversal detection resolves `.` and `..` against an
 * implicit root instead of searching for `"../"`, so `/a/../b` is accepted
 * while `/a/../../etc` is not.
 */

use tracing::warn;

use crate::core::limits::{MAX_NAME_LEN, MAX_PATH_LEN};
use crate::core::{VfsError, VfsResult};

/// Characters kept by `sanitize` besides ASCII letters and digits
const SANITIZE_EXTRA: &[char] = &['/', '.', '-', '_', ' '];

/// Drop every character outside `[A-Za-z0-9/._- ]`
///
/// Never fails; an input made only of disallowed characters yields `""`.
pub fn sanitize(path: &str) -> String {
    path.chars()
        .filter(|c| c.is_ascii_alphanumeric() || SANITIZE_EXTRA.contains(c))
        .collect()
}

/// Resolve `.` and `..` against an implicit root
///
/// Returns `None` when a `..` would climb above the root.
fn resolve_components(path: &str) -> Option<Vec<&str>> {
    let mut stack: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            name => stack.push(name),
        }
    }
    Some(stack)
}

/// Check whether a path resolves above the root
///
/// Works on the string alone; the tree is never consulted.
#[must_use]
pub fn is_traversal(path: &str) -> bool {
    resolve_components(path).is_none()
}

/// Check `path.len() <= max`
#[inline]
#[must_use]
pub fn validate_length(path: &str, max: usize) -> bool {
    path.len() <= max
}

/// Check that `[offset, offset + size)` lies inside a buffer of `len` bytes
///
/// Overflow-safe: never computes `offset + size` directly.
#[inline]
#[must_use]
pub const fn validate_bounds(offset: usize, size: usize, len: usize) -> bool {
    offset <= len && size <= len - offset
}

/// Normalize a path with the default length limit
pub fn normalize(path: &str) -> VfsResult<String> {
    normalize_with_limit(path, MAX_PATH_LEN)
}

/// Normalize a path
///
/// Collapses repeated `/`, resolves `.` and `..`, and strips a trailing `/`
/// (except for `/` itself). Absolute inputs stay absolute; a relative input
/// that resolves to nothing becomes `"."`.
///
/// # Errors
/// - `InvalidInput` for an empty path
/// - `LengthExceeded` when the input is longer than `max`
/// - `PathTraversal` when the path climbs above the root
pub fn normalize_with_limit(path: &str, max: usize) -> VfsResult<String> {
    if path.is_empty() {
        return Err(VfsError::InvalidInput("path is empty".into()));
    }
    if !validate_length(path, max) {
        return Err(VfsError::LengthExceeded(format!(
            "path is {} bytes, limit is {}",
            path.len(),
            max
        )));
    }

    let Some(components) = resolve_components(path) else {
        warn!(path, "Rejected path traversal attempt");
        return Err(VfsError::PathTraversal(path.to_string()));
    };

    let absolute = path.starts_with('/');
    let joined = components.join("/");
    Ok(match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    })
}

/// Join `path` onto `base` with the default length limit
pub fn join(base: &str, path: &str) -> VfsResult<String> {
    join_with_limit(base, path, MAX_PATH_LEN)
}

/// Join `path` onto `base` and normalize the result
///
/// A leading `/` on `path` is dropped, so `join("/a", "/b")` is `/a/b`.
/// The combined string is length-checked before normalization.
pub fn join_with_limit(base: &str, path: &str, max: usize) -> VfsResult<String> {
    if base.is_empty() {
        return Err(VfsError::InvalidInput("base path is empty".into()));
    }
    let relative = path.trim_start_matches('/');
    let combined = if relative.is_empty() {
        base.to_string()
    } else if base.ends_with('/') {
        format!("{}{}", base, relative)
    } else {
        format!("{}/{}", base, relative)
    };
    normalize_with_limit(&combined, max)
}

/// Validate a single node name with the default length limit
pub fn validate_filename(name: &str) -> VfsResult<()> {
    validate_filename_with_limit(name, MAX_NAME_LEN)
}

/// Validate a single node name
///
/// Names must be non-empty, at most `max` bytes, free of `/` and NUL, and must
/// not be `.` or start with `..`.
pub fn validate_filename_with_limit(name: &str, max: usize) -> VfsResult<()> {
    if name.is_empty() {
        return Err(VfsError::InvalidInput("name is empty".into()));
    }
    if name.len() > max {
        return Err(VfsError::LengthExceeded(format!(
            "name is {} bytes, limit is {}",
            name.len(),
            max
        )));
    }
    if name.contains('/') || name.contains('\0') {
        return Err(VfsError::InvalidInput(format!(
            "name contains a forbidden character: {:?}",
            name
        )));
    }
    if name == "." || name.starts_with("..") {
        return Err(VfsError::InvalidInput(format!(
            "name cannot be '.' or start with '..': {}",
            name
        )));
    }
    Ok(())
}
