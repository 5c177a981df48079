/*!
 * Memory Utilities
 *
 * Buffers holding sensitive bytes (file contents, store plaintext, keys) are
 * wiped before their memory goes back to the allocator.
 */

mod secure;

pub use secure::{secure_zero, secure_zero_words, SecretKey, SecureBuffer};
