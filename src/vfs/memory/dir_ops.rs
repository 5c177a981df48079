/*!
 * Directory Operations Implementation
 * Directory creation, listing, and structural changes to the tree
 */

use tracing::debug;

use super::super::paths;
use super::super::types::{VfsError, VfsResult};
use super::resolve::{check_depth, Placement};
use super::{NodeId, VfsNode, VfsTree};
use crate::core::time;
use crate::core::SecureBuffer;
use crate::security::path::validate_filename_with_limit;

impl VfsTree {
    /// Create a directory, creating missing ancestors as well
    ///
    /// # Errors
    /// `AlreadyExists` when any node occupies the path, including `/`.
    pub fn create_dir(&mut self, path: &str) -> VfsResult<NodeId> {
        let normalized = self.normalize_path(path)?;
        let placement = self.place(&normalized)?;

        let parent = self.realize(&placement)?;
        let now = time::now();
        let id = self.insert_child(parent, VfsNode::directory(&placement.name, now, now))?;

        self.total_nodes += 1;
        debug!(path = %normalized, "Created directory");
        Ok(id)
    }

    /// Direct children of a directory, most recently attached first
    pub fn list(&self, dir: NodeId) -> VfsResult<Vec<NodeId>> {
        let node = self.node(dir)?;
        if !node.is_dir() {
            return Err(VfsError::NotADirectory(self.path_of(dir)?));
        }
        Ok(node.children().collect())
    }

    /// Delete a node and everything below it
    ///
    /// File contents are zeroed as they are released; the counters drop by
    /// the nodes and bytes actually removed.
    ///
    /// # Errors
    /// `PermissionDenied` for the root, `NotFound` when the path is absent.
    pub fn delete(&mut self, path: &str) -> VfsResult<()> {
        let normalized = self.normalize_path(path)?;
        let id = self.lookup(&normalized)?;
        if id == self.root {
            return Err(VfsError::PermissionDenied("cannot delete the root directory".into()));
        }

        self.detach(id)?;
        let (nodes, bytes) = self.remove_subtree(id);
        self.total_nodes = self.total_nodes.saturating_sub(nodes);
        self.total_size = self.total_size.saturating_sub(bytes);

        debug!(path = %normalized, nodes, bytes, "Deleted node");
        Ok(())
    }

    /// Give a node a new name in the same directory
    ///
    /// Only the last component of `new_path` is used.
    ///
    /// # Errors
    /// - `PermissionDenied` for the root
    /// - `AlreadyExists` when a sibling already has the new name, including
    ///   the node itself
    pub fn rename(&mut self, old_path: &str, new_path: &str) -> VfsResult<()> {
        let old = self.normalize_path(old_path)?;
        let new = self.normalize_path(new_path)?;
        let id = self.lookup(&old)?;
        let Some(parent) = self.node(id)?.parent() else {
            return Err(VfsError::PermissionDenied("cannot rename the root directory".into()));
        };

        let new_name = paths::basename(&new);
        validate_filename_with_limit(new_name, self.config.max_name_len)?;
        if self.find_child(parent, new_name).is_some() {
            return Err(VfsError::AlreadyExists(new_name.to_string()));
        }

        let node = self.node_mut(id)?;
        node.name = new_name.into();
        node.mtime = time::now();
        debug!(from = %old, to = new_name, "Renamed node");
        Ok(())
    }

    /// Reparent a node, taking the last component of `dst` as its new name
    ///
    /// Missing ancestors of `dst` are created. The destination is checked
    /// before the source is detached, so a failed move changes nothing.
    ///
    /// # Errors
    /// - `PermissionDenied` when `src` is the root
    /// - `AlreadyExists` when `dst` is taken
    /// - `InvalidInput` when `dst` lies inside `src`
    /// - `LengthExceeded` when the moved subtree would nest too deep or
    ///   outgrow the path limit
    pub fn move_node(&mut self, src: &str, dst: &str) -> VfsResult<()> {
        let from = self.normalize_path(src)?;
        let to = self.normalize_path(dst)?;
        let id = self.lookup(&from)?;
        let Some(old_parent) = self.node(id)?.parent() else {
            return Err(VfsError::PermissionDenied("cannot move the root directory".into()));
        };

        let placement = self.place(&to)?;
        self.check_placement(id, &placement, &from)?;

        let new_parent = self.realize(&placement)?;
        self.detach(id)?;
        if let Err(e) = self.attach(new_parent, id) {
            self.attach(old_parent, id)?;
            return Err(e);
        }
        let node = self.node_mut(id)?;
        node.name = placement.name.as_str().into();
        node.mtime = time::now();

        debug!(from = %from, to = %to, "Moved node");
        Ok(())
    }

    /// Duplicate a file or a whole directory subtree at `dst`
    ///
    /// Child order is preserved in the copy. Copies get fresh timestamps.
    ///
    /// # Errors
    /// - `AlreadyExists` when `dst` is taken
    /// - `InvalidInput` when `dst` lies inside `src`
    /// - `LengthExceeded` when the copy would nest too deep or outgrow the
    ///   path limit
    pub fn copy(&mut self, src: &str, dst: &str) -> VfsResult<NodeId> {
        let from = self.normalize_path(src)?;
        let to = self.normalize_path(dst)?;
        let id = self.lookup(&from)?;

        let placement = self.place(&to)?;
        self.check_placement(id, &placement, &from)?;

        let (copy, nodes, bytes) = self.clone_subtree(id, &placement.name)?;
        let parent = match self.realize(&placement) {
            Ok(parent) => parent,
            Err(e) => {
                self.remove_subtree(copy);
                return Err(e);
            }
        };
        if let Err(e) = self.attach(parent, copy) {
            self.remove_subtree(copy);
            return Err(e);
        }

        self.total_nodes += nodes;
        self.total_size += bytes;
        debug!(from = %from, to = %to, nodes, bytes, "Copied node");
        Ok(copy)
    }

    /// Check that `id` and everything below it fits at `placement`
    fn check_placement(&self, id: NodeId, placement: &Placement, src: &str) -> VfsResult<()> {
        if self.is_ancestor(id, placement.parent) {
            return Err(VfsError::InvalidInput(format!(
                "cannot place {} inside itself at {}",
                src, placement.path
            )));
        }

        let (height, suffix) = self.subtree_extent(id)?;
        let components = paths::split(&placement.path);
        check_depth(components.len() + height, &placement.path)?;

        let longest = components.iter().map(|c| c.len() + 1).sum::<usize>() + suffix;
        if longest > self.config.max_path_len {
            return Err(VfsError::LengthExceeded(format!(
                "placing {} at {} gives a {} byte path, limit is {}",
                src, placement.path, longest, self.config.max_path_len
            )));
        }
        Ok(())
    }

    /// Deepest nesting below `id` and the longest path suffix it adds
    ///
    /// The suffix counts `/name` for every level under `id`, not `id` itself.
    fn subtree_extent(&self, id: NodeId) -> VfsResult<(usize, usize)> {
        let (mut height, mut suffix) = (0, 0);
        let mut stack = vec![(id, 0usize, 0usize)];
        while let Some((current, depth, len)) = stack.pop() {
            height = height.max(depth);
            suffix = suffix.max(len);
            for child in self.node(current)?.children() {
                let name_len = self.node(child)?.name().len();
                stack.push((child, depth + 1, len + 1 + name_len));
            }
        }
        Ok((height, suffix))
    }

    /// Detached deep copy of `src` named `name`
    ///
    /// Returns the copy's handle plus the nodes and file bytes it holds.
    fn clone_subtree(&mut self, src: NodeId, name: &str) -> VfsResult<(NodeId, usize, usize)> {
        let top = self.clone_node(src, name)?;
        let mut nodes = 1;
        let mut bytes = self.node(top)?.data().map_or(0, <[u8]>::len);

        let mut stack = vec![(src, top)];
        while let Some((from, to)) = stack.pop() {
            let children: Vec<NodeId> = self.node(from)?.children().collect();
            for child in children {
                let child_name = self.node(child)?.name.clone();
                let copied = match self.clone_node(child, &child_name) {
                    Ok(copied) => copied,
                    Err(e) => {
                        self.remove_subtree(top);
                        return Err(e);
                    }
                };
                if let Err(e) = self.attach_back(to, copied) {
                    self.remove_subtree(copied);
                    self.remove_subtree(top);
                    return Err(e);
                }
                nodes += 1;
                bytes += self.node(copied)?.data().map_or(0, <[u8]>::len);
                stack.push((child, copied));
            }
        }
        Ok((top, nodes, bytes))
    }

    /// Detached shallow copy of one node
    fn clone_node(&mut self, src: NodeId, name: &str) -> VfsResult<NodeId> {
        let now = time::now();
        let node = match self.node(src)?.data() {
            Some(data) => VfsNode::file(name, SecureBuffer::try_from_slice(data)?, now, now),
            None => VfsNode::directory(name, now, now),
        };
        self.alloc(node)
    }
}
