/*!
 * Encrypted Store Envelope
 *
 * On disk a store is `[u64 LE ciphertext length][ciphertext]`. The ciphertext
 * is the codec output under ChaCha20 with the passphrase key and the fixed
 * nonce (see `crypto::kdf` for why both are weak). A wrong passphrase shows up
 * as a magic mismatch after decryption.
 */

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use bytes::{Buf, BufMut};
use tracing::{info, warn};

use super::codec;
use crate::core::limits::LENGTH_PREFIX_LEN;
use crate::core::{SecureBuffer, VfsConfig, VfsError, VfsResult};
use crate::crypto::crypt_with_passphrase;
use crate::monitoring::OperationSpan;
use crate::security::path::validate_bounds;
use crate::vfs::VfsTree;

/// Encrypt `tree` with `key` and write it to `path`
///
/// Plaintext, ciphertext and the file image are all zeroed once written.
///
/// # Errors
/// - `InvalidInput` for an empty key
/// - `LengthExceeded` when a name or the nesting would not load back; the
///   file is left untouched
/// - `IoError` when the file cannot be written
pub fn save(tree: &VfsTree, path: impl AsRef<Path>, key: &str) -> VfsResult<()> {
    let path = path.as_ref();
    let op = OperationSpan::new("save", &path.display().to_string());
    let result = op.in_scope(|| write_store(tree, path, key));
    op.finish(&result);
    result
}

fn write_store(tree: &VfsTree, path: &Path, key: &str) -> VfsResult<()> {
    let plaintext = codec::encode(tree)?;
    let ciphertext = crypt_with_passphrase(key, &plaintext)?;
    drop(plaintext);

    let mut image = SecureBuffer::try_with_capacity(LENGTH_PREFIX_LEN + ciphertext.len())?;
    let out = image.as_mut_vec();
    out.put_u64_le(ciphertext.len() as u64);
    out.put_slice(&ciphertext);

    fs::write(path, &image[..])
        .map_err(|e| VfsError::IoError(format!("{}: {}", path.display(), e)))?;

    let stats = tree.stats();
    info!(
        path = %path.display(),
        nodes = stats.total_nodes,
        bytes = image.len(),
        "Saved store"
    );
    Ok(())
}

/// Load a store with default limits
pub fn load(path: impl AsRef<Path>, key: &str) -> VfsResult<VfsTree> {
    load_with_config(path, key, VfsConfig::default())
}

/// Read, decrypt and decode the store at `path`
///
/// A missing file is not an error: it yields a fresh tree holding only the
/// root. Bytes after the ciphertext are ignored.
///
/// # Errors
/// - `InvalidInput` for an empty key
/// - `IoError` when the file exists but cannot be read
/// - `CorruptData` for a bad length prefix, a wrong key or a damaged payload
pub fn load_with_config(path: impl AsRef<Path>, key: &str, config: VfsConfig) -> VfsResult<VfsTree> {
    let path = path.as_ref();
    let op = OperationSpan::new("load", &path.display().to_string());
    let result = op.in_scope(|| read_store(path, key, config));
    op.finish(&result);
    result
}

fn read_store(path: &Path, key: &str, config: VfsConfig) -> VfsResult<VfsTree> {
    if key.is_empty() {
        return Err(VfsError::InvalidInput("passphrase is empty".into()));
    }

    let image = match fs::read(path) {
        Ok(bytes) => SecureBuffer::from(bytes),
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            info!(path = %path.display(), "No store found, starting with an empty tree");
            return Ok(VfsTree::with_config(config));
        }
        Err(e) => return Err(VfsError::IoError(format!("{}: {}", path.display(), e))),
    };

    let ciphertext = ciphertext_of(&image).map_err(|e| {
        warn!(path = %path.display(), error = %e, "Rejected store envelope");
        e
    })?;
    let plaintext = crypt_with_passphrase(key, ciphertext)?;
    let tree = codec::decode(&plaintext, config).map_err(|e| {
        warn!(path = %path.display(), error = %e, "Rejected store contents");
        e
    })?;

    let stats = tree.stats();
    info!(
        path = %path.display(),
        nodes = stats.total_nodes,
        bytes = stats.total_size,
        "Loaded store"
    );
    Ok(tree)
}

/// Slice the ciphertext out of a file image using its length prefix
fn ciphertext_of(image: &[u8]) -> VfsResult<&[u8]> {
    if image.len() < LENGTH_PREFIX_LEN {
        return Err(VfsError::corrupt(format_args!(
            "store is {} bytes, shorter than its length prefix",
            image.len()
        )));
    }
    let (mut prefix, body) = image.split_at(LENGTH_PREFIX_LEN);
    let declared = prefix.get_u64_le();
    let len = usize::try_from(declared)
        .ok()
        .filter(|&len| validate_bounds(0, len, body.len()))
        .ok_or_else(|| {
            VfsError::corrupt(format_args!(
                "length prefix {} exceeds the {} bytes present",
                declared,
                body.len()
            ))
        })?;
    Ok(&body[..len])
}
