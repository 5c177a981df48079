/*!
 * Path Resolution
 * Walks normalized paths through the tree and plans node creation
 */

use tracing::debug;

use super::super::paths;
use super::super::types::{VfsError, VfsResult};
use super::{NodeId, VfsNode, VfsTree};
use crate::core::limits::MAX_DECODE_DEPTH;
use crate::core::time;
use crate::security::path::{normalize_with_limit, validate_filename_with_limit};

/// Where a new node would be attached
///
/// Built by `place` without touching the tree; `realize` then creates the
/// missing directories. Keeping the two apart lets callers validate every
/// precondition before the first mutation.
#[derive(Debug)]
pub(super) struct Placement {
    /// Deepest directory on the way that already exists
    pub parent: NodeId,
    /// Directories still to create below `parent`, outermost first
    pub missing: Vec<String>,
    /// Name of the node itself
    pub name: String,
    /// Normalized target path
    pub path: String,
}

impl VfsTree {
    /// Normalize and security-check a path against this tree's limits
    pub(crate) fn normalize_path(&self, path: &str) -> VfsResult<String> {
        normalize_with_limit(path, self.config.max_path_len)
    }

    /// Resolve a path, optionally creating missing intermediate directories
    ///
    /// The root path (`/`, or any path that normalizes to no components)
    /// resolves to the root. With `create_missing_dirs`, every missing
    /// component except the last is created as a directory; a missing last
    /// component is still `NotFound`.
    ///
    /// # Errors
    /// - `PathTraversal`, `LengthExceeded`, `InvalidInput` from normalization
    /// - `NotADirectory` when a non-final component is a file
    /// - `NotFound` when a component is missing
    pub fn resolve(&mut self, path: &str, create_missing_dirs: bool) -> VfsResult<NodeId> {
        let normalized = self.normalize_path(path)?;
        let components = paths::split(&normalized);
        if !create_missing_dirs {
            return self.walk_components(&components, &normalized);
        }

        let Some((last, dirs)) = components.split_last() else {
            return Ok(self.root);
        };
        check_depth(components.len(), &normalized)?;
        let parent = self.ensure_dirs(dirs, &normalized)?;
        self.find_child(parent, last)
            .ok_or_else(|| VfsError::NotFound(normalized.clone()))
    }

    /// Resolve a path without creating anything
    pub fn lookup(&self, path: &str) -> VfsResult<NodeId> {
        let normalized = self.normalize_path(path)?;
        self.walk_components(&paths::split(&normalized), &normalized)
    }

    /// Resolve a path, mapping every failure to `None`
    #[inline]
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.lookup(path).ok()
    }

    #[inline]
    pub fn exists(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    pub(super) fn walk_components(&self, components: &[&str], path: &str) -> VfsResult<NodeId> {
        let mut current = self.root;
        for component in components {
            if !self.node(current)?.is_dir() {
                return Err(VfsError::NotADirectory(path.to_string()));
            }
            current = self
                .find_child(current, component)
                .ok_or_else(|| VfsError::NotFound(path.to_string()))?;
        }
        Ok(current)
    }

    /// Deepest existing directory along `dirs` and how many components it covers
    fn existing_prefix(&self, dirs: &[&str], path: &str) -> VfsResult<(NodeId, usize)> {
        let mut current = self.root;
        for (depth, component) in dirs.iter().enumerate() {
            let Some(child) = self.find_child(current, component) else {
                return Ok((current, depth));
            };
            if !self.node(child)?.is_dir() {
                return Err(VfsError::NotADirectory(format!(
                    "{}: '{}' is a file",
                    path, component
                )));
            }
            current = child;
        }
        Ok((current, dirs.len()))
    }

    /// Plan where a node at `normalized` would go
    ///
    /// # Errors
    /// - `AlreadyExists` when the path is the root or is already taken
    /// - `NotADirectory` when an ancestor is a file
    /// - `InvalidInput` / `LengthExceeded` for an unusable name
    /// - `LengthExceeded` when the path nests deeper than a store can hold
    pub(super) fn place(&self, normalized: &str) -> VfsResult<Placement> {
        let components = paths::split(normalized);
        let Some((&name, dirs)) = components.split_last() else {
            return Err(VfsError::AlreadyExists(normalized.to_string()));
        };
        check_depth(components.len(), normalized)?;

        let (parent, depth) = self.existing_prefix(dirs, normalized)?;
        let missing = &dirs[depth..];
        let max = self.config.max_name_len;
        for component in missing {
            validate_filename_with_limit(component, max)?;
        }
        validate_filename_with_limit(name, max)?;

        if missing.is_empty() && self.find_child(parent, name).is_some() {
            return Err(VfsError::AlreadyExists(normalized.to_string()));
        }

        Ok(Placement {
            parent,
            missing: missing.iter().map(|c| c.to_string()).collect(),
            name: name.to_string(),
            path: normalized.to_string(),
        })
    }

    /// Create the directories a placement is missing and return the final parent
    pub(super) fn realize(&mut self, placement: &Placement) -> VfsResult<NodeId> {
        self.create_chain(placement.parent, &placement.missing, &placement.path)
    }

    fn ensure_dirs(&mut self, dirs: &[&str], path: &str) -> VfsResult<NodeId> {
        let (parent, depth) = self.existing_prefix(dirs, path)?;
        let missing = &dirs[depth..];
        for component in missing {
            validate_filename_with_limit(component, self.config.max_name_len)?;
        }
        self.create_chain(parent, missing, path)
    }

    /// Create nested directories under `parent`
    ///
    /// All or nothing: if one allocation fails, the directories created so far
    /// are removed again.
    fn create_chain<S: AsRef<str>>(
        &mut self,
        parent: NodeId,
        names: &[S],
        path: &str,
    ) -> VfsResult<NodeId> {
        let mut current = parent;
        let mut first_created = None;
        for name in names {
            let now = time::now();
            match self.insert_child(current, VfsNode::directory(name.as_ref(), now, now)) {
                Ok(id) => {
                    first_created.get_or_insert(id);
                    current = id;
                }
                Err(e) => {
                    if let Some(first) = first_created {
                        self.detach(first)?;
                        self.remove_subtree(first);
                    }
                    return Err(e);
                }
            }
        }

        if !names.is_empty() {
            self.total_nodes += names.len();
            debug!(path, created = names.len(), "Auto-created parent directories");
        }
        Ok(current)
    }

    /// Store `node` and attach it at the front of `parent`
    ///
    /// Does not touch the counters.
    pub(super) fn insert_child(&mut self, parent: NodeId, node: VfsNode) -> VfsResult<NodeId> {
        let id = self.alloc(node)?;
        if let Err(e) = self.attach(parent, id) {
            self.remove_subtree(id);
            return Err(e);
        }
        Ok(id)
    }
}

/// Reject nesting a saved store could not be decoded from
pub(super) fn check_depth(depth: usize, path: &str) -> VfsResult<()> {
    if depth > MAX_DECODE_DEPTH {
        return Err(VfsError::LengthExceeded(format!(
            "{} nests {} levels, limit is {}",
            path, depth, MAX_DECODE_DEPTH
        )));
    }
    Ok(())
}
