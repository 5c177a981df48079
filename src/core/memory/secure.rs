/*!
 * Zero-on-Drop Buffers
 * Byte buffers that overwrite their contents before the memory is released
 */

use std::collections::TryReserveError;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{compiler_fence, Ordering};

use crate::core::limits::KEY_LEN;

/// Overwrite a byte slice with zeroes
///
/// Uses volatile writes followed by a compiler fence so the stores are not
/// elided even when the buffer is freed right after.
#[inline]
pub fn secure_zero(buf: &mut [u8]) {
    for b in buf.iter_mut() {
        // SAFETY: `b` is a valid, exclusive reference into `buf`.
        unsafe { std::ptr::write_volatile(b, 0) };
    }
    compiler_fence(Ordering::SeqCst);
}

/// Overwrite a word slice with zeroes
#[inline]
pub fn secure_zero_words(buf: &mut [u32]) {
    for w in buf.iter_mut() {
        // SAFETY: `w` is a valid, exclusive reference into `buf`.
        unsafe { std::ptr::write_volatile(w, 0) };
    }
    compiler_fence(Ordering::SeqCst);
}

/// Owned byte buffer that is zeroed on drop
///
/// Holds file contents, serialized store plaintext and ciphertext. The whole
/// allocation (including spare capacity) is wiped, so growth through
/// `as_mut_vec` must go through `reserve_exact` up front or the old
/// allocation escapes unwiped.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct SecureBuffer {
    inner: Vec<u8>,
}

impl SecureBuffer {
    /// Copy `data` into a new buffer
    #[inline]
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            inner: data.to_vec(),
        }
    }

    /// Copy `data` into a new buffer, reporting allocation failure
    pub fn try_from_slice(data: &[u8]) -> Result<Self, TryReserveError> {
        let mut inner = Vec::new();
        inner.try_reserve_exact(data.len())?;
        inner.extend_from_slice(data);
        Ok(Self { inner })
    }

    /// Create an empty buffer with room for `capacity` bytes, reporting
    /// allocation failure
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut inner = Vec::new();
        inner.try_reserve_exact(capacity)?;
        Ok(Self { inner })
    }

    /// Wipe the contents and leave the buffer empty
    pub fn clear(&mut self) {
        self.wipe();
        self.inner.clear();
    }

    /// Mutable access to the backing vector for in-place encoding
    #[inline]
    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<u8> {
        &mut self.inner
    }

    /// Copy the contents out into a plain vector
    #[inline]
    pub fn to_vec(&self) -> Vec<u8> {
        self.inner.clone()
    }

    fn wipe(&mut self) {
        let len = self.inner.len();
        let capacity = self.inner.capacity();
        // Zero the full allocation, not just the initialized prefix.
        self.inner.resize(capacity, 0);
        secure_zero(&mut self.inner);
        self.inner.truncate(len);
    }
}

impl Drop for SecureBuffer {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl Deref for SecureBuffer {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.inner
    }
}

impl DerefMut for SecureBuffer {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.inner
    }
}

impl From<Vec<u8>> for SecureBuffer {
    #[inline]
    fn from(inner: Vec<u8>) -> Self {
        Self { inner }
    }
}

impl fmt::Debug for SecureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureBuffer({} bytes)", self.inner.len())
    }
}

/// 256-bit key that is zeroed on drop
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    #[inline]
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        secure_zero(&mut self.0);
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}
