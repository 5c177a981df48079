/*!
 * Store Envelope Tests
 * Saving, loading and rejecting damaged or foreign stores on disk
 */

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use yunvfs::core::limits::{MAX_DECODE_DEPTH, MAX_NAME_LEN};
use yunvfs::vfs::VfsTree;
use yunvfs::{load, load_with_config, save, VfsConfig, VfsError};

use crate::ops::chain;

fn sample_tree() -> VfsTree {
    let mut tree = VfsTree::new();
    tree.create_file("/x.txt", b"hello").unwrap();
    tree.create_file("/docs/readme.md", b"# title\n").unwrap();
    tree.create_dir("/docs/empty").unwrap();
    tree.create_file("/bin/blob", &[0u8, 255, 1, 254]).unwrap();
    tree
}

fn snapshot(tree: &VfsTree) -> Vec<(String, yunvfs::Metadata, Option<Vec<u8>>)> {
    let mut entries = Vec::new();
    tree.walk(|path, _, node| {
        entries.push((path.to_string(), node.metadata(), node.data().map(<[u8]>::to_vec)));
    });
    entries
}

#[test]
fn test_save_load_scenario() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.dat");
    let tree = sample_tree();

    save(&tree, &path, "key123").unwrap();
    let loaded = load(&path, "key123").unwrap();

    assert_eq!(snapshot(&loaded), snapshot(&tree));
    assert_eq!(loaded.stats(), tree.stats());
}

#[test]
fn test_wrong_key_is_corrupt_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.dat");
    save(&sample_tree(), &path, "key123").unwrap();

    assert!(matches!(load(&path, "wrong-key"), Err(VfsError::CorruptData(_))));
}

#[test]
fn test_missing_store_is_empty_tree() {
    let dir = TempDir::new().unwrap();
    let tree = load(dir.path().join("never-written.dat"), "key123").unwrap();
    assert_eq!(tree.stats().total_nodes, 1);
    assert_eq!(tree.list(tree.root()).unwrap().len(), 0);
}

#[test]
fn test_damaged_stores_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.dat");
    save(&sample_tree(), &path, "key123").unwrap();
    let original = fs::read(&path).unwrap();

    // Too short for the length prefix
    fs::write(&path, &original[..5]).unwrap();
    assert!(matches!(load(&path, "key123"), Err(VfsError::CorruptData(_))));

    // Ciphertext cut short
    fs::write(&path, &original[..original.len() - 1]).unwrap();
    assert!(matches!(load(&path, "key123"), Err(VfsError::CorruptData(_))));

    // Length prefix shrunk so the payload is truncated after decryption
    let mut shrunk = original.clone();
    let len = u64::from_le_bytes(shrunk[..8].try_into().unwrap());
    shrunk[..8].copy_from_slice(&(len - 3).to_le_bytes());
    fs::write(&path, &shrunk).unwrap();
    assert!(matches!(load(&path, "key123"), Err(VfsError::CorruptData(_))));

    // Empty file
    fs::write(&path, b"").unwrap();
    assert!(matches!(load(&path, "key123"), Err(VfsError::CorruptData(_))));
}

#[test]
fn test_trailing_file_bytes_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.dat");
    let tree = sample_tree();
    save(&tree, &path, "key123").unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes.extend_from_slice(b"appended garbage");
    fs::write(&path, &bytes).unwrap();

    assert_eq!(snapshot(&load(&path, "key123").unwrap()), snapshot(&tree));
}

#[test]
fn test_unreadable_store_is_io_error() {
    let dir = TempDir::new().unwrap();
    // A directory cannot be read as a file
    assert!(matches!(load(dir.path(), "key123"), Err(VfsError::IoError(_))));
}

#[test]
fn test_load_applies_name_limit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.dat");
    let mut tree = VfsTree::new();
    tree.create_file("/longname.txt", b"").unwrap();
    save(&tree, &path, "key123").unwrap();

    let strict = VfsConfig::new().with_max_name_len(4);
    assert!(matches!(
        load_with_config(&path, "key123", strict),
        Err(VfsError::CorruptData(_))
    ));
}

#[test]
fn test_overwrite_replaces_previous_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.dat");
    let mut tree = sample_tree();
    save(&tree, &path, "key123").unwrap();

    tree.delete("/docs").unwrap();
    save(&tree, &path, "key123").unwrap();

    let loaded = load(&path, "key123").unwrap();
    assert!(!loaded.exists("/docs"));
    assert_eq!(loaded.stats(), tree.stats());
}

#[test]
fn test_deepest_tree_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.dat");
    let mut tree = VfsTree::new();
    tree.create_dir(&chain("a", 1000)).unwrap();
    let deep_b = chain("b", MAX_DECODE_DEPTH - 1000);
    tree.create_dir(&deep_b).unwrap();
    tree.move_node("/a", &format!("{}/a", deep_b)).unwrap();

    save(&tree, &path, "key123").unwrap();
    let loaded = load(&path, "key123").unwrap();
    assert!(loaded.exists(&format!("{}{}", deep_b, chain("a", 1000))));
    assert_eq!(snapshot(&loaded), snapshot(&tree));
}

#[test]
fn test_save_refuses_names_load_would_reject() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.dat");
    let mut tree = VfsTree::with_config(VfsConfig::new().with_max_name_len(1024));
    tree.create_file(&format!("/{}", "n".repeat(MAX_NAME_LEN)), b"fits").unwrap();
    save(&tree, &path, "key123").unwrap();
    let stored = fs::read(&path).unwrap();

    tree.create_file(&format!("/{}", "n".repeat(MAX_NAME_LEN + 1)), b"").unwrap();
    assert!(matches!(save(&tree, &path, "key123"), Err(VfsError::LengthExceeded(_))));
    assert_eq!(fs::read(&path).unwrap(), stored);

    let loaded = load(&path, "key123").unwrap();
    assert!(loaded.exists(&format!("/{}", "n".repeat(MAX_NAME_LEN))));
    assert_eq!(loaded.stats().total_nodes, 2);
}
