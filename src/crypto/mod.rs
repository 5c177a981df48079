/*!
 * Crypto Module
 * ChaCha20 stream cipher and the store's passphrase key derivation
 */

pub mod chacha20;
pub mod kdf;

pub use chacha20::{encrypt, ChaCha20};
pub use kdf::{crypt_with_passphrase, derive_key};
