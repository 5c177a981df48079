/*!
 * Metadata Operations Implementation
 * Read-only inspection: paths, metadata, counters, traversal
 */

use super::super::types::{Metadata, VfsResult, VfsStats};
use super::{NodeId, VfsNode, VfsTree, ROOT_NAME};

impl VfsTree {
    /// Metadata snapshot of one node
    #[inline]
    pub fn metadata(&self, id: NodeId) -> VfsResult<Metadata> {
        Ok(self.node(id)?.metadata())
    }

    /// Absolute path of a node, built from its parent chain
    pub fn path_of(&self, id: NodeId) -> VfsResult<String> {
        let mut names = Vec::new();
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent() {
            names.push(current.name());
            current = self.node(parent)?;
        }

        if names.is_empty() {
            return Ok(ROOT_NAME.to_string());
        }
        let mut path = String::with_capacity(names.iter().map(|n| n.len() + 1).sum());
        for name in names.iter().rev() {
            path.push('/');
            path.push_str(name);
        }
        Ok(path)
    }

    /// Aggregate node and byte counters
    #[inline]
    pub fn stats(&self) -> VfsStats {
        VfsStats {
            total_nodes: self.total_nodes,
            total_size: self.total_size,
        }
    }

    /// Visit every node in pre-order, children in storage order
    ///
    /// The callback receives each node's absolute path.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&str, NodeId, &VfsNode),
    {
        let mut stack = vec![(self.root, ROOT_NAME.to_string())];
        while let Some((id, path)) = stack.pop() {
            let Ok(node) = self.node(id) else {
                continue;
            };
            visit(&path, id, node);

            let children: Vec<NodeId> = node.children().collect();
            for child in children.into_iter().rev() {
                let Ok(child_node) = self.node(child) else {
                    continue;
                };
                let child_path = if path == ROOT_NAME {
                    format!("/{}", child_node.name())
                } else {
                    format!("{}/{}", path, child_node.name())
                };
                stack.push((child, child_path));
            }
        }
    }
}
