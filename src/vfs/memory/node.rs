/*!
 * Tree Node Types
 * Arena handles and the file/directory node representation
 */

use smartstring::alias::String as NameString;
use std::collections::VecDeque;

use super::super::types::{Metadata, NodeKind};
use crate::core::time::Timestamp;
use crate::core::SecureBuffer;

/// Stable handle to a node inside one `VfsTree`
///
/// Handles carry a generation, so a handle to a deleted node stays invalid even
/// after its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(super) index: u32,
    pub(super) generation: u32,
}

/// Node payload
#[derive(Debug)]
pub(crate) enum NodeContent {
    File { data: SecureBuffer },
    /// Front of the deque is the most recently attached child
    Directory { children: VecDeque<NodeId> },
}

/// A file or directory in the tree
#[derive(Debug)]
pub struct VfsNode {
    pub(super) name: NameString,
    pub(crate) content: NodeContent,
    pub(super) mtime: Timestamp,
    pub(super) ctime: Timestamp,
    pub(super) parent: Option<NodeId>,
}

impl VfsNode {
    pub(crate) fn file(name: &str, data: SecureBuffer, mtime: Timestamp, ctime: Timestamp) -> Self {
        Self {
            name: name.into(),
            content: NodeContent::File { data },
            mtime,
            ctime,
            parent: None,
        }
    }

    pub(crate) fn directory(name: &str, mtime: Timestamp, ctime: Timestamp) -> Self {
        Self {
            name: name.into(),
            content: NodeContent::Directory {
                children: VecDeque::new(),
            },
            mtime,
            ctime,
            parent: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self.content {
            NodeContent::File { .. } => NodeKind::File,
            NodeContent::Directory { .. } => NodeKind::Directory,
        }
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        matches!(self.content, NodeContent::File { .. })
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        matches!(self.content, NodeContent::Directory { .. })
    }

    /// Byte count for files, direct child count for directories
    ///
    /// Derived from the payload, so it cannot drift from the data it describes.
    #[inline]
    pub fn size(&self) -> u64 {
        match &self.content {
            NodeContent::File { data } => data.len() as u64,
            NodeContent::Directory { children } => children.len() as u64,
        }
    }

    #[inline]
    pub fn mtime(&self) -> Timestamp {
        self.mtime
    }

    #[inline]
    pub fn ctime(&self) -> Timestamp {
        self.ctime
    }

    /// Parent handle; `None` only for the root
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// File contents; `None` for directories
    #[inline]
    pub fn data(&self) -> Option<&[u8]> {
        match &self.content {
            NodeContent::File { data } => Some(data),
            NodeContent::Directory { .. } => None,
        }
    }

    /// Child handles in storage order; empty for files
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        let children = match &self.content {
            NodeContent::Directory { children } => Some(children),
            NodeContent::File { .. } => None,
        };
        children.into_iter().flatten().copied()
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            kind: self.kind(),
            size: self.size(),
            mtime: self.mtime,
            ctime: self.ctime,
        }
    }

    pub(super) fn children_mut(&mut self) -> Option<&mut VecDeque<NodeId>> {
        match &mut self.content {
            NodeContent::Directory { children } => Some(children),
            NodeContent::File { .. } => None,
        }
    }
}
