/*!
 * VFS Configuration
 *
 * Path and name limits applied by a tree. Defaults come from `core::limits`;
 * the environment can tighten or relax them.
 */

use super::limits::{MAX_NAME_LEN, MAX_PATH_LEN};
use tracing::warn;

/// Environment variable overriding the path length limit
pub const ENV_MAX_PATH_LEN: &str = "YUNVFS_MAX_PATH_LEN";

/// Environment variable overriding the name length limit
pub const ENV_MAX_NAME_LEN: &str = "YUNVFS_MAX_NAME_LEN";

/// Limits applied to every path and name handled by a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfsConfig {
    /// Longest accepted path in bytes (default: 4096)
    pub max_path_len: usize,

    /// Longest accepted node name in bytes (default: 255)
    pub max_name_len: usize,
}

impl VfsConfig {
    /// Create default configuration
    pub const fn new() -> Self {
        Self {
            max_path_len: MAX_PATH_LEN,
            max_name_len: MAX_NAME_LEN,
        }
    }

    /// Set the path length limit
    #[must_use]
    pub const fn with_max_path_len(mut self, max: usize) -> Self {
        self.max_path_len = max;
        self
    }

    /// Set the name length limit
    #[must_use]
    pub const fn with_max_name_len(mut self, max: usize) -> Self {
        self.max_name_len = max;
        self
    }

    /// Build configuration from the environment
    ///
    /// Environment variables:
    /// - YUNVFS_MAX_PATH_LEN: path length limit (default: 4096)
    /// - YUNVFS_MAX_NAME_LEN: name length limit (default: 255)
    ///
    /// Unparseable or zero values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Some(max) = read_limit(ENV_MAX_PATH_LEN) {
            config.max_path_len = max;
        }
        if let Some(max) = read_limit(ENV_MAX_NAME_LEN) {
            config.max_name_len = max;
        }
        config
    }
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_limit(var: &str) -> Option<usize> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => {
            warn!(var, value = %raw, "Ignoring invalid limit override");
            None
        }
        Ok(value) => Some(value),
    }
}
