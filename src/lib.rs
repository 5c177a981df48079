/*!
 * YunVFS Library
 * In-memory virtual file system with encrypted on-disk persistence
 */

pub mod core;
pub mod crypto;
pub mod monitoring;
pub mod persist;
pub mod security;
pub mod vfs;

// Re-exports
pub use crate::core::{ErrorKind, SecretKey, SecureBuffer, VfsConfig, VfsError, VfsResult};
pub use crypto::{derive_key, encrypt, ChaCha20};
pub use monitoring::init_tracing;
pub use persist::{load, load_with_config, save};
pub use security::{is_traversal, join, normalize, sanitize, validate_length};
pub use vfs::{Metadata, NodeId, NodeKind, VfsNode, VfsStats, VfsTree};

/// Create an empty tree with default limits
#[inline]
pub fn init() -> VfsTree {
    VfsTree::new()
}

/// Tear a tree down, zeroing every file buffer
#[inline]
pub fn destroy(tree: VfsTree) {
    tree.destroy();
}
