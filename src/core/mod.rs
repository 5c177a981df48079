/*!
 * Core Module
 * Shared infrastructure: errors, limits, configuration, secure memory and time
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod memory;
pub mod time;

pub use config::VfsConfig;
pub use errors::{ErrorKind, VfsError, VfsResult};
pub use memory::{SecretKey, SecureBuffer};
pub use time::Timestamp;
