/*!
 * VFS Tree Tests
 * End-to-end behavior of the public tree operations
 */

use pretty_assertions::assert_eq;
use yunvfs::core::limits::{MAX_DECODE_DEPTH, MAX_NAME_LEN};
use yunvfs::vfs::VfsTree;
use yunvfs::{NodeKind, VfsConfig, VfsError};

use crate::ops::chain;

fn names(tree: &VfsTree, path: &str) -> Vec<String> {
    let dir = tree.lookup(path).unwrap();
    tree.list(dir)
        .unwrap()
        .into_iter()
        .map(|id| tree.node(id).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_create_dir_scenario() {
    let mut tree = yunvfs::init();
    tree.create_dir("/a/b").unwrap();

    let a = tree.find("/a").unwrap();
    let b = tree.find("/a/b").unwrap();
    assert_eq!(tree.node(a).unwrap().kind(), NodeKind::Directory);
    assert_eq!(tree.node(b).unwrap().kind(), NodeKind::Directory);
    assert_eq!(tree.node(b).unwrap().parent(), Some(a));
    yunvfs::destroy(tree);
}

#[test]
fn test_read_write_scenario() {
    let mut tree = VfsTree::new();
    tree.create_file("/x.txt", b"hello").unwrap();

    let id = tree.find("/x.txt").unwrap();
    assert_eq!(&tree.read(id).unwrap()[..], b"hello");

    tree.write(id, b"hi").unwrap();
    assert_eq!(&tree.read(tree.find("/x.txt").unwrap()).unwrap()[..], b"hi");
    assert_eq!(tree.metadata(id).unwrap().size, 2);
}

#[test]
fn test_auto_create_ancestors() {
    let mut tree = VfsTree::new();
    let file = tree.create_file("/a/b/c.txt", b"data").unwrap();

    assert!(tree.node(tree.find("/a").unwrap()).unwrap().is_dir());
    assert!(tree.node(tree.find("/a/b").unwrap()).unwrap().is_dir());
    assert_eq!(tree.path_of(file).unwrap(), "/a/b/c.txt");
    assert_eq!(tree.stats().total_nodes, 4);
}

#[test]
fn test_file_ancestor_rejected() {
    let mut tree = VfsTree::new();
    tree.create_file("/a", b"not a dir").unwrap();
    let before = tree.stats();

    assert!(matches!(
        tree.create_file("/a/b/c.txt", b""),
        Err(VfsError::NotADirectory(_))
    ));
    assert!(matches!(tree.create_dir("/a/sub"), Err(VfsError::NotADirectory(_))));
    assert_eq!(tree.stats(), before);
}

#[test]
fn test_failed_create_leaves_no_ancestors() {
    let mut tree = VfsTree::new();
    let bad_name = "n".repeat(300);

    assert!(matches!(
        tree.create_file(&format!("/new/dirs/{}", bad_name), b""),
        Err(VfsError::LengthExceeded(_))
    ));
    assert!(!tree.exists("/new"));
    assert_eq!(tree.stats().total_nodes, 1);
}

#[test]
fn test_root_protection() {
    let mut tree = VfsTree::new();
    assert!(matches!(tree.delete("/"), Err(VfsError::PermissionDenied(_))));
    assert!(matches!(tree.rename("/", "/x"), Err(VfsError::PermissionDenied(_))));
    assert!(matches!(tree.move_node("/", "/x"), Err(VfsError::PermissionDenied(_))));
    assert!(tree.node(tree.root()).is_ok());
}

#[test]
fn test_traversal_rejected_by_every_entry_point() {
    let mut tree = VfsTree::new();
    tree.create_file("/safe.txt", b"x").unwrap();

    let escape = "/a/../../etc/passwd";
    assert!(matches!(tree.create_file(escape, b""), Err(VfsError::PathTraversal(_))));
    assert!(matches!(tree.create_dir(escape), Err(VfsError::PathTraversal(_))));
    assert!(matches!(tree.lookup(escape), Err(VfsError::PathTraversal(_))));
    assert!(matches!(tree.delete(escape), Err(VfsError::PathTraversal(_))));
    assert!(matches!(tree.rename("/safe.txt", escape), Err(VfsError::PathTraversal(_))));
    assert!(matches!(tree.move_node("/safe.txt", escape), Err(VfsError::PathTraversal(_))));
    assert!(tree.find(escape).is_none());

    // Dots that stay inside the root are fine
    tree.create_file("/a/../b.txt", b"").unwrap();
    assert!(tree.exists("/b.txt"));
}

#[test]
fn test_listing_is_reverse_creation_order() {
    let mut tree = VfsTree::new();
    tree.create_dir("/d").unwrap();
    for name in ["one", "two", "three"] {
        tree.create_file(&format!("/d/{}", name), name.as_bytes()).unwrap();
    }
    assert_eq!(names(&tree, "/d"), vec!["three", "two", "one"]);

    tree.delete("/d/two").unwrap();
    assert_eq!(names(&tree, "/d"), vec!["three", "one"]);
}

#[test]
fn test_move_and_rename() {
    let mut tree = VfsTree::new();
    let id = tree.create_file("/inbox/draft.txt", b"body").unwrap();

    tree.rename("/inbox/draft.txt", "final.txt").unwrap();
    tree.move_node("/inbox/final.txt", "/archive/2024/final.txt").unwrap();

    assert_eq!(tree.path_of(id).unwrap(), "/archive/2024/final.txt");
    assert!(names(&tree, "/inbox").is_empty());
    assert_eq!(&tree.read(id).unwrap()[..], b"body");
}

#[test]
fn test_move_directory_carries_subtree() {
    let mut tree = VfsTree::new();
    tree.create_file("/src/lib/mod.rs", b"mod").unwrap();
    let before = tree.stats();

    tree.move_node("/src", "/moved").unwrap();
    assert!(tree.exists("/moved/lib/mod.rs"));
    assert!(!tree.exists("/src"));
    assert_eq!(tree.stats(), before);
}

#[test]
fn test_copy_is_independent() {
    let mut tree = VfsTree::new();
    let original = tree.create_file("/a/file", b"v1").unwrap();
    let copy = tree.copy("/a/file", "/b/file").unwrap();

    tree.write(original, b"version two").unwrap();
    assert_eq!(&tree.read(copy).unwrap()[..], b"v1");
    assert_eq!(tree.stats().total_size, "version two".len() + 2);
}

#[test]
fn test_stale_handles() {
    let mut tree = VfsTree::new();
    let id = tree.create_file("/gone", b"secret").unwrap();
    tree.delete("/gone").unwrap();

    assert!(matches!(tree.read(id), Err(VfsError::NotFound(_))));
    assert!(matches!(tree.write(id, b"x"), Err(VfsError::NotFound(_))));
    assert!(matches!(tree.path_of(id), Err(VfsError::NotFound(_))));
}

#[test]
fn test_config_limits_apply() {
    let config = VfsConfig::new().with_max_path_len(16).with_max_name_len(4);
    let mut tree = VfsTree::with_config(config);

    tree.create_file("/abcd", b"").unwrap();
    assert!(matches!(tree.create_file("/abcde", b""), Err(VfsError::LengthExceeded(_))));
    assert!(matches!(
        tree.create_dir("/aaaa/bbbb/cccc/dddd"),
        Err(VfsError::LengthExceeded(_))
    ));
}

#[test]
fn test_walk_reports_paths() {
    let mut tree = VfsTree::new();
    tree.create_file("/x/y", b"").unwrap();

    let mut paths = Vec::new();
    tree.walk(|path, id, _| {
        assert_eq!(tree.path_of(id).unwrap(), path);
        paths.push(path.to_string());
    });
    assert_eq!(paths, vec!["/", "/x", "/x/y"]);
}

#[test]
fn test_move_cannot_nest_past_store_depth() {
    let config = VfsConfig::new().with_max_path_len(4 * MAX_DECODE_DEPTH);
    let mut tree = VfsTree::with_config(config);
    let leaf = format!("{}/leaf", chain("a", 1500));
    tree.create_file(&leaf, b"deep").unwrap();
    let deep_b = chain("b", 1500);
    tree.create_dir(&deep_b).unwrap();
    let before = tree.stats();

    let target = format!("{}/a", deep_b);
    assert!(matches!(tree.move_node("/a", &target), Err(VfsError::LengthExceeded(_))));
    assert!(matches!(tree.copy("/a", &target), Err(VfsError::LengthExceeded(_))));
    assert!(tree.exists(&leaf));
    assert!(!tree.exists(&target));
    assert_eq!(tree.stats(), before);
}

#[test]
fn test_move_and_copy_up_to_store_depth() {
    let mut tree = VfsTree::new();
    tree.create_dir(&chain("a", 1000)).unwrap();
    let deep_b = chain("b", MAX_DECODE_DEPTH - 1000);

    tree.create_dir(&deep_b).unwrap();
    tree.copy("/a", &format!("{}/c", deep_b)).unwrap();
    tree.move_node("/a", &format!("{}/a", deep_b)).unwrap();
    let deepest = format!("{}{}", deep_b, chain("a", 1000));
    assert!(tree.exists(&deepest));
    assert!(matches!(
        tree.create_dir(&format!("{}/x", deepest)),
        Err(VfsError::LengthExceeded(_))
    ));

    // One level more than a store can hold, with the missing parent still
    // to be created
    tree.create_dir(&chain("e", 1000)).unwrap();
    let before = tree.stats();
    let one_deeper = format!("{}/b/e", deep_b);
    assert!(matches!(tree.move_node("/e", &one_deeper), Err(VfsError::LengthExceeded(_))));
    assert!(matches!(tree.copy("/e", &one_deeper), Err(VfsError::LengthExceeded(_))));
    assert!(!tree.exists(&format!("{}/b", deep_b)));
    assert_eq!(tree.stats(), before);
}

#[test]
fn test_name_length_edge() {
    let mut tree = VfsTree::new();
    let longest = format!("/{}", "n".repeat(MAX_NAME_LEN));
    tree.create_file(&longest, b"").unwrap();
    assert!(matches!(
        tree.create_file(&format!("/{}", "n".repeat(MAX_NAME_LEN + 1)), b""),
        Err(VfsError::LengthExceeded(_))
    ));
    assert!(matches!(
        tree.rename(&longest, &"m".repeat(MAX_NAME_LEN + 1)),
        Err(VfsError::LengthExceeded(_))
    ));
    tree.rename(&longest, &"m".repeat(MAX_NAME_LEN - 1)).unwrap();
}
