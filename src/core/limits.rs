/*!
 * System Limits and Constants
 *
 * Centralized location for path limits, store format constants and cipher sizes.
 * Organized by domain for maintainability and discoverability.
 *
 * - Security-critical constants are marked with [SECURITY]
 * - Constants fixed by the on-disk format are marked with [FORMAT]
 */

// =============================================================================
// PATH LIMITS
// =============================================================================

/// Maximum path length in bytes (POSIX PATH_MAX)
/// [SECURITY] Checked before any normalization work is done
pub const MAX_PATH_LEN: usize = 4096;

/// Maximum length of a single node name in bytes (POSIX NAME_MAX)
pub const MAX_NAME_LEN: usize = 255;

// =============================================================================
// STORE FORMAT
// =============================================================================

/// Magic bytes at the start of every decrypted store
/// [FORMAT]
pub const STORE_MAGIC: &[u8; 8] = b"YUNVFS01";

/// Store format version
/// [FORMAT]
pub const STORE_VERSION: u32 = 1;

/// Width of the ciphertext length prefix
/// [FORMAT]
pub const LENGTH_PREFIX_LEN: usize = 8;

/// Smallest possible encoded node: marker, name length, the NUL of an empty
/// name, size and two timestamps
/// [FORMAT]
pub const MIN_ENCODED_NODE_LEN: usize = 4 + 4 + 1 + 8 + 8 + 8;

/// Deepest directory nesting accepted when decoding a store
/// [SECURITY] A path of MAX_PATH_LEN bytes cannot nest deeper than this
pub const MAX_DECODE_DEPTH: usize = MAX_PATH_LEN / 2;

// =============================================================================
// CIPHER
// =============================================================================

/// ChaCha20 key length
pub const KEY_LEN: usize = 32;

/// ChaCha20 nonce length (96-bit, RFC 7539 layout)
pub const NONCE_LEN: usize = 12;

/// ChaCha20 keystream block length
pub const BLOCK_LEN: usize = 64;

/// Nonce used for every store
///
/// [SECURITY] This value never changes between saves, so every store written with
/// the same passphrase reuses the same keystream. Kept only so existing stores
/// stay readable.
/// [FORMAT]
pub const FIXED_NONCE: [u8; NONCE_LEN] = *b"yunhongisbes";
