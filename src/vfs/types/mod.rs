/*!
 * VFS Types
 * Shared types for tree operations with serde support
 */

mod errors;
mod metadata;
mod node_kind;

pub use errors::{ErrorKind, VfsError, VfsResult};
pub use metadata::{Metadata, VfsStats};
pub use node_kind::NodeKind;
