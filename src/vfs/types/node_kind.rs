/*!
 * VFS Node Kind
 * Files and directories, plus their store type markers
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    Directory,
}

impl NodeKind {
    /// Type marker written to the store
    ///
    /// Offset by one so that 0 stays free for the absent-node sentinel.
    #[inline]
    #[must_use]
    pub const fn marker(self) -> u32 {
        match self {
            NodeKind::File => 1,
            NodeKind::Directory => 2,
        }
    }

    /// Parse a store type marker; `None` for the sentinel or unknown values
    #[inline]
    #[must_use]
    pub const fn from_marker(marker: u32) -> Option<Self> {
        match marker {
            1 => Some(NodeKind::File),
            2 => Some(NodeKind::Directory),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Directory => write!(f, "directory"),
        }
    }
}
