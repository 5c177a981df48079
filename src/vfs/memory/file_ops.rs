/*!
 * File Operations Implementation
 * Creating, reading and overwriting file nodes
 */

use tracing::debug;

use super::super::types::{VfsError, VfsResult};
use super::node::NodeContent;
use super::{NodeId, VfsNode, VfsTree};
use crate::core::time;
use crate::core::SecureBuffer;

impl VfsTree {
    /// Create a file holding a copy of `data`
    ///
    /// Missing ancestor directories are created. Every check runs before the
    /// first node is allocated, so a failed call leaves the tree as it was.
    ///
    /// # Errors
    /// - `AlreadyExists` when the name is taken in the parent
    /// - `NotADirectory` when an ancestor is a file
    /// - `OutOfMemory` when the contents cannot be copied
    pub fn create_file(&mut self, path: &str, data: &[u8]) -> VfsResult<NodeId> {
        let normalized = self.normalize_path(path)?;
        let placement = self.place(&normalized)?;
        let contents = SecureBuffer::try_from_slice(data)?;

        let parent = self.realize(&placement)?;
        let now = time::now();
        let id = self.insert_child(parent, VfsNode::file(&placement.name, contents, now, now))?;

        self.total_nodes += 1;
        self.total_size += data.len();
        debug!(path = %normalized, size = data.len(), "Created file");
        Ok(id)
    }

    /// Copy out the contents of a file
    ///
    /// # Errors
    /// `IsADirectory` for directories, `NotFound` for stale handles.
    pub fn read(&self, id: NodeId) -> VfsResult<SecureBuffer> {
        match self.node(id)?.data() {
            Some(data) => Ok(SecureBuffer::try_from_slice(data)?),
            None => Err(VfsError::IsADirectory(self.path_of(id)?)),
        }
    }

    /// Replace the contents of a file
    ///
    /// The old buffer is zeroed before it is released. Updates the size, the
    /// modification time and the tree's byte counter.
    pub fn write(&mut self, id: NodeId, data: &[u8]) -> VfsResult<()> {
        if !self.node(id)?.is_file() {
            return Err(VfsError::IsADirectory(self.path_of(id)?));
        }
        let contents = SecureBuffer::try_from_slice(data)?;

        let node = self.node_mut(id)?;
        let NodeContent::File { data: current } = &mut node.content else {
            return Err(VfsError::IsADirectory(node.name.to_string()));
        };
        let old = std::mem::replace(current, contents);
        node.mtime = time::now();

        self.total_size = self.total_size.saturating_sub(old.len()) + data.len();
        debug!(old = old.len(), new = data.len(), "Rewrote file");
        Ok(())
    }
}
