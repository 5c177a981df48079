/*!
 * VFS Error Types
 * Structured, type-safe error handling for tree, path and store operations
 */

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// VFS operation result
///
/// # Must Use
/// VFS operations can fail and must be handled to prevent data loss
#[must_use = "VFS operations can fail and must be handled"]
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors with structured, type-safe error handling
///
/// All error variants include context strings that should be non-empty.
/// Serialization uses tagged enum pattern for type safety.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    #[error("Invalid input: {0}")]
    #[diagnostic(
        code(vfs::invalid_input),
        help("An argument was empty or malformed. Check the path or name passed in.")
    )]
    InvalidInput(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not found: {0}")]
    #[diagnostic(code(vfs::not_found), help("The path or node handle does not exist in the tree."))]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Already exists: {0}")]
    #[diagnostic(
        code(vfs::already_exists),
        help("Another node with the same name lives in the target directory.")
    )]
    AlreadyExists(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Permission denied: {0}")]
    #[diagnostic(
        code(vfs::permission_denied),
        help("The root directory cannot be deleted, renamed or moved.")
    )]
    PermissionDenied(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Path traversal rejected: {0}")]
    #[diagnostic(
        code(vfs::path_traversal),
        help("The path resolves above the root directory. Remove the extra `..` components.")
    )]
    PathTraversal(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Length exceeded: {0}")]
    #[diagnostic(code(vfs::length_exceeded), help("Shorten the path or name."))]
    LengthExceeded(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not a directory: {0}")]
    #[diagnostic(code(vfs::not_a_directory))]
    NotADirectory(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Is a directory: {0}")]
    #[diagnostic(code(vfs::is_a_directory))]
    IsADirectory(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(vfs::io_error), help("Check that the store path is readable and writable."))]
    IoError(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Corrupt data: {0}")]
    #[diagnostic(
        code(vfs::corrupt_data),
        help("The store is damaged or was written with a different passphrase.")
    )]
    CorruptData(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Out of memory")]
    #[diagnostic(code(vfs::out_of_memory))]
    OutOfMemory,
}

/// Error category without context, for callers that only branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    PathTraversal,
    LengthExceeded,
    NotADirectory,
    IsADirectory,
    IoError,
    CorruptData,
    OutOfMemory,
}

impl VfsError {
    /// Category of this error
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            VfsError::InvalidInput(_) => ErrorKind::InvalidInput,
            VfsError::NotFound(_) => ErrorKind::NotFound,
            VfsError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            VfsError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            VfsError::PathTraversal(_) => ErrorKind::PathTraversal,
            VfsError::LengthExceeded(_) => ErrorKind::LengthExceeded,
            VfsError::NotADirectory(_) => ErrorKind::NotADirectory,
            VfsError::IsADirectory(_) => ErrorKind::IsADirectory,
            VfsError::IoError(_) => ErrorKind::IoError,
            VfsError::CorruptData(_) => ErrorKind::CorruptData,
            VfsError::OutOfMemory => ErrorKind::OutOfMemory,
        }
    }

    pub(crate) fn corrupt(context: impl fmt::Display) -> Self {
        VfsError::CorruptData(context.to_string())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::NotFound => "not found",
            ErrorKind::AlreadyExists => "already exists",
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::PathTraversal => "path traversal",
            ErrorKind::LengthExceeded => "length exceeded",
            ErrorKind::NotADirectory => "not a directory",
            ErrorKind::IsADirectory => "is a directory",
            ErrorKind::IoError => "i/o error",
            ErrorKind::CorruptData => "corrupt data",
            ErrorKind::OutOfMemory => "out of memory",
        };
        f.write_str(s)
    }
}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::OutOfMemory => VfsError::OutOfMemory,
            _ => VfsError::IoError(err.to_string()),
        }
    }
}

impl From<std::collections::TryReserveError> for VfsError {
    fn from(_: std::collections::TryReserveError) -> Self {
        VfsError::OutOfMemory
    }
}

/// Deserialize and validate non-empty string for error messages
pub(super) fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
