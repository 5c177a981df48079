/*!
 * Error Types
 * Centralized re-export of the error taxonomy shared by every subsystem
 */

pub use crate::vfs::types::{ErrorKind, VfsError, VfsResult};
