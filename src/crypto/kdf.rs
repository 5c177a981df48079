/*!
 * Passphrase Key Derivation
 *
 * WEAK: this is a reversible byte shuffle of the
 * passphrase, not a KDF. There is no salt and no work factor, and together with
 * the fixed nonce every store written with one passphrase shares a keystream.
 * It is reproduced bit for bit because existing stores are encrypted with it.
 */

use crate::core::limits::{FIXED_NONCE, KEY_LEN};
use crate::core::{SecretKey, SecureBuffer, VfsError, VfsResult};

use super::chacha20;

/// Derive the 32-byte store key from a passphrase
///
/// `key[i] = pass[i % len] ^ (i * 7)`, then each byte in order is XORed with
/// its right neighbor (wrapping at 32, so byte 31 sees the already-mixed byte
/// 0) and rotated left by one bit.
///
/// # Errors
/// `InvalidInput` for an empty passphrase.
pub fn derive_key(passphrase: &str) -> VfsResult<SecretKey> {
    let pass = passphrase.as_bytes();
    if pass.is_empty() {
        return Err(VfsError::InvalidInput("passphrase is empty".into()));
    }

    let mut key = [0u8; KEY_LEN];
    for (i, byte) in key.iter_mut().enumerate() {
        *byte = pass[i % pass.len()] ^ (i as u8).wrapping_mul(7);
    }
    for i in 0..KEY_LEN {
        key[i] ^= key[(i + 1) % KEY_LEN];
        key[i] = key[i].rotate_left(1);
    }

    let secret = SecretKey::from_bytes(key);
    crate::core::memory::secure_zero(&mut key);
    Ok(secret)
}

/// Encrypt or decrypt a store payload with the passphrase key and the fixed nonce
pub fn crypt_with_passphrase(passphrase: &str, input: &[u8]) -> VfsResult<SecureBuffer> {
    let key = derive_key(passphrase)?;
    Ok(chacha20::encrypt(input, key.as_bytes(), &FIXED_NONCE))
}
