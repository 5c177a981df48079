/*!
 * VFS Metadata
 * Node metadata and tree-wide counters
 */

use super::node_kind::NodeKind;
use crate::core::time::{to_system_time, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Snapshot of one node's metadata
///
/// `size` is the byte count for files and the direct child count for
/// directories. Timestamps are whole seconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Metadata {
    pub kind: NodeKind,
    pub size: u64,
    pub mtime: Timestamp,
    pub ctime: Timestamp,
}

impl Metadata {
    /// Check if this is a directory
    #[inline(always)]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    /// Check if this is a regular file
    #[inline(always)]
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    /// Last modification time
    #[inline]
    pub fn modified(&self) -> SystemTime {
        to_system_time(self.mtime)
    }

    /// Creation time
    #[inline]
    pub fn created(&self) -> SystemTime {
        to_system_time(self.ctime)
    }
}

/// Aggregate tree counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct VfsStats {
    /// Every node in the tree, root included
    pub total_nodes: usize,
    /// Sum of all file sizes in bytes
    pub total_size: usize,
}
