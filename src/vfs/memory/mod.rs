/*!
 * In-Memory VFS Tree
 * Arena-backed node graph with owned child lists and index parent links
 */

mod dir_ops;
mod file_ops;
mod metadata_ops;
mod node;
mod resolve;

use tracing::debug;

use super::types::{VfsError, VfsResult};
use crate::core::time::{self, Timestamp};
use crate::core::VfsConfig;

use node::NodeContent;
pub use node::{NodeId, VfsNode};

/// Root directory name
pub const ROOT_NAME: &str = "/";

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<VfsNode>,
}

/// In-memory virtual file system
///
/// Nodes live in a slot arena addressed by `NodeId`. Directories own their
/// child handle lists; children point back through a plain `NodeId`, so there
/// are no reference cycles and no shared ownership. Newly attached children go
/// to the front of the list, which makes `list` return reverse creation order.
///
/// Single-threaded: callers serialize mutation.
#[derive(Debug)]
pub struct VfsTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    pub(super) total_nodes: usize,
    pub(super) total_size: usize,
    config: VfsConfig,
}

impl VfsTree {
    /// Create a tree holding only the root directory
    pub fn new() -> Self {
        Self::with_config(VfsConfig::default())
    }

    /// Create an empty tree with custom limits
    pub fn with_config(config: VfsConfig) -> Self {
        Self::with_root(config, time::now(), time::now())
    }

    /// Create a tree whose root carries the given timestamps
    pub(crate) fn with_root(config: VfsConfig, mtime: Timestamp, ctime: Timestamp) -> Self {
        let root = VfsNode::directory(ROOT_NAME, mtime, ctime);
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            total_nodes: 1,
            total_size: 0,
            config,
        }
    }

    /// Tear the tree down, zeroing every file buffer
    pub fn destroy(self) {
        debug!(nodes = self.total_nodes, bytes = self.total_size, "Destroying VFS tree");
        drop(self);
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn config(&self) -> &VfsConfig {
        &self.config
    }

    /// Borrow a node by handle
    ///
    /// # Errors
    /// `NotFound` when the handle belongs to a deleted node or another tree.
    pub fn node(&self, id: NodeId) -> VfsResult<&VfsNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or_else(|| stale(id))
    }

    pub(super) fn node_mut(&mut self, id: NodeId) -> VfsResult<&mut VfsNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| stale(id))
    }

    /// Store a detached node and hand out its handle
    pub(crate) fn alloc(&mut self, node: VfsNode) -> VfsResult<NodeId> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return Ok(NodeId {
                index,
                generation: slot.generation,
            });
        }

        let index = u32::try_from(self.slots.len()).map_err(|_| VfsError::OutOfMemory)?;
        self.slots.try_reserve(1)?;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        Ok(NodeId {
            index,
            generation: 0,
        })
    }

    /// Free a slot and invalidate every handle to it
    fn release(&mut self, id: NodeId) -> Option<VfsNode> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    /// Attach `child` at the front of `parent`'s children and touch the parent
    pub(super) fn attach(&mut self, parent: NodeId, child: NodeId) -> VfsResult<()> {
        let now = time::now();
        let dir = self.node_mut(parent)?;
        dir.mtime = now;
        let Some(children) = dir.children_mut() else {
            return Err(VfsError::NotADirectory("attach target is a file".into()));
        };
        children.try_reserve(1)?;
        children.push_front(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Attach `child` at the back of `parent`'s children, leaving timestamps alone
    ///
    /// Used when rebuilding a tree whose child order is already known.
    pub(crate) fn attach_back(&mut self, parent: NodeId, child: NodeId) -> VfsResult<()> {
        let Some(children) = self.node_mut(parent)?.children_mut() else {
            return Err(VfsError::NotADirectory("attach target is a file".into()));
        };
        children.try_reserve(1)?;
        children.push_back(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink `child` from its parent and touch the parent
    pub(super) fn detach(&mut self, child: NodeId) -> VfsResult<()> {
        let Some(parent) = self.node(child)?.parent else {
            return Err(VfsError::PermissionDenied("root cannot be detached".into()));
        };
        let now = time::now();
        let dir = self.node_mut(parent)?;
        dir.mtime = now;
        if let Some(children) = dir.children_mut() {
            if let Some(pos) = children.iter().position(|&id| id == child) {
                children.remove(pos);
            }
        }
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    /// Child of `dir` with exactly this name
    pub(super) fn find_child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        let node = self.node(dir).ok()?;
        node.children()
            .find(|&id| self.node(id).is_ok_and(|child| child.name() == name))
    }

    /// Release `id` and everything below it
    ///
    /// Returns the number of nodes and file bytes freed. The node must already
    /// be detached. File buffers are zeroed as they are dropped.
    pub(super) fn remove_subtree(&mut self, id: NodeId) -> (usize, usize) {
        let mut nodes = 0;
        let mut bytes = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.release(current) else {
                continue;
            };
            nodes += 1;
            match node.content {
                NodeContent::File { mut data } => {
                    bytes += data.len();
                    data.clear();
                }
                NodeContent::Directory { children } => stack.extend(children),
            }
        }
        (nodes, bytes)
    }

    /// Whether `ancestor` is `id` or lies on its parent chain
    pub(super) fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.node(node_id).ok().and_then(VfsNode::parent);
        }
        false
    }

    /// Recount nodes and bytes from the tree itself
    pub(crate) fn recompute_counters(&mut self) {
        let mut nodes = 0;
        let mut bytes = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Ok(node) = self.node(id) else {
                continue;
            };
            nodes += 1;
            if let Some(data) = node.data() {
                bytes += data.len();
            }
            stack.extend(node.children());
        }
        self.total_nodes = nodes;
        self.total_size = bytes;
    }
}

impl Default for VfsTree {
    fn default() -> Self {
        Self::new()
    }
}

fn stale(id: NodeId) -> VfsError {
    VfsError::NotFound(format!("node handle {}:{} is no longer valid", id.index, id.generation))
}
