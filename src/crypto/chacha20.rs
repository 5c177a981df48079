/*!
 * ChaCha20 Stream Cipher
 * RFC 7539 state layout, 20 rounds, 32-bit block counter
 *
 * Each `ChaCha20` value is an independent context; nothing is shared between
 * instances. Encryption and decryption are the same XOR pass.
 */

use crate::core::limits::{BLOCK_LEN, KEY_LEN, NONCE_LEN};
use crate::core::memory::{secure_zero, secure_zero_words};
use crate::core::SecureBuffer;

/// "expand 32-byte k"
pub(crate) const CHACHA_CONSTANT: [u32; 4] = [0x61707865, 0x3320646e, 0x79622d32, 0x6b206574];

/// Index of the block counter word
const COUNTER_WORD: usize = 12;

#[inline(always)]
fn load32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// The ChaCha20 quarter-round on four words of `state`
#[inline(always)]
pub fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(16);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(12);

    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(8);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(7);
}

/// ChaCha20 cipher context
pub struct ChaCha20 {
    state: [u32; 16],
}

impl ChaCha20 {
    /// Set up the state from a key, a 96-bit nonce and an initial counter
    pub fn new(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], counter: u32) -> Self {
        let mut state = [0u32; 16];
        state[..4].copy_from_slice(&CHACHA_CONSTANT);
        for (i, chunk) in key.chunks_exact(4).enumerate() {
            state[4 + i] = load32_le(chunk);
        }
        state[COUNTER_WORD] = counter;
        for (i, chunk) in nonce.chunks_exact(4).enumerate() {
            state[13 + i] = load32_le(chunk);
        }
        Self { state }
    }

    /// Current block counter
    #[inline]
    pub fn counter(&self) -> u32 {
        self.state[COUNTER_WORD]
    }

    /// Produce the next 64 keystream bytes and advance the counter
    ///
    /// When the counter wraps to zero the carry goes into word 13, the first
    /// nonce word. Stores depend on this exact behavior past 256 GiB of
    /// keystream, so it is kept as is.
    pub fn next_block(&mut self, out: &mut [u8; BLOCK_LEN]) {
        let mut working = self.state;

        for _ in 0..10 {
            // Column rounds
            quarter_round(&mut working, 0, 4, 8, 12);
            quarter_round(&mut working, 1, 5, 9, 13);
            quarter_round(&mut working, 2, 6, 10, 14);
            quarter_round(&mut working, 3, 7, 11, 15);
            // Diagonal rounds
            quarter_round(&mut working, 0, 5, 10, 15);
            quarter_round(&mut working, 1, 6, 11, 12);
            quarter_round(&mut working, 2, 7, 8, 13);
            quarter_round(&mut working, 3, 4, 9, 14);
        }

        for (i, chunk) in out.chunks_exact_mut(4).enumerate() {
            let word = working[i].wrapping_add(self.state[i]);
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        secure_zero_words(&mut working);

        self.state[COUNTER_WORD] = self.state[COUNTER_WORD].wrapping_add(1);
        if self.state[COUNTER_WORD] == 0 {
            self.state[COUNTER_WORD + 1] = self.state[COUNTER_WORD + 1].wrapping_add(1);
        }
    }

    /// XOR `data` in place with the keystream
    ///
    /// Every call starts on a fresh block; the unused tail of the last block of
    /// a previous call is discarded.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        let mut block = [0u8; BLOCK_LEN];
        for chunk in data.chunks_mut(BLOCK_LEN) {
            self.next_block(&mut block);
            for (byte, key) in chunk.iter_mut().zip(block.iter()) {
                *byte ^= key;
            }
        }
        secure_zero(&mut block);
    }
}

impl Drop for ChaCha20 {
    fn drop(&mut self) {
        secure_zero_words(&mut self.state);
    }
}

/// Encrypt or decrypt `input` with a counter starting at zero
///
/// The same call decrypts what it encrypted.
pub fn encrypt(input: &[u8], key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN]) -> SecureBuffer {
    let mut output = SecureBuffer::from_slice(input);
    ChaCha20::new(key, nonce, 0).apply_keystream(&mut output);
    output
}
