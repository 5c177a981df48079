/*!
 * Stream Cipher Tests
 * ChaCha20 symmetry and the store key derivation
 */

use proptest::prelude::*;
use yunvfs::core::limits::FIXED_NONCE;
use yunvfs::crypto::crypt_with_passphrase;
use yunvfs::{derive_key, encrypt, ChaCha20, VfsError};

#[test]
fn test_chunked_keystream_matches_one_shot() {
    let key = [9u8; 32];
    let nonce = [3u8; 12];
    let plaintext = vec![0x5au8; 64 * 3];

    let whole = encrypt(&plaintext, &key, &nonce);

    let mut chunked = plaintext.clone();
    let mut cipher = ChaCha20::new(&key, &nonce, 0);
    for block in chunked.chunks_mut(64) {
        cipher.apply_keystream(block);
    }
    assert_eq!(&whole[..], &chunked[..]);
    assert_eq!(cipher.counter(), 3);
}

#[test]
fn test_kdf_is_deterministic() {
    let a = derive_key("key123").unwrap();
    let b = derive_key("key123").unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
    assert!(matches!(derive_key(""), Err(VfsError::InvalidInput(_))));
}

#[test]
fn test_fixed_nonce_reuses_keystream() {
    // Same passphrase, same nonce: XOR of two ciphertexts leaks the XOR of
    // the plaintexts. Kept for format compatibility.
    let a = crypt_with_passphrase("pw", b"aaaa").unwrap();
    let b = crypt_with_passphrase("pw", b"bbbb").unwrap();
    let leaked: Vec<u8> = a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect();
    assert_eq!(leaked, vec![b'a' ^ b'b'; 4]);
    assert_eq!(&FIXED_NONCE, b"yunhongisbes");
}

proptest! {
    #[test]
    fn cipher_is_symmetric(
        key in prop::array::uniform32(any::<u8>()),
        plaintext in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let ciphertext = encrypt(&plaintext, &key, &FIXED_NONCE);
        prop_assert_eq!(ciphertext.len(), plaintext.len());
        let decrypted = encrypt(&ciphertext, &key, &FIXED_NONCE);
        prop_assert_eq!(&decrypted[..], &plaintext[..]);
    }

    #[test]
    fn passphrase_crypt_is_symmetric(
        passphrase in "[ -~]{1,40}",
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let ciphertext = crypt_with_passphrase(&passphrase, &plaintext).unwrap();
        let decrypted = crypt_with_passphrase(&passphrase, &ciphertext).unwrap();
        prop_assert_eq!(&decrypted[..], &plaintext[..]);
    }
}
