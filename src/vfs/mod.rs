/*!
 * Virtual File System
 * In-memory file/directory tree with path resolution
 */

pub mod memory;
pub mod paths;
pub mod types;

pub use memory::{NodeId, VfsNode, VfsTree, ROOT_NAME};
pub use types::{ErrorKind, Metadata, NodeKind, VfsError, VfsResult, VfsStats};
