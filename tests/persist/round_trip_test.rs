/*!
 * Round Trip Property Tests
 * Any tree built from random operations survives save and load intact
 */

use proptest::prelude::*;
use tempfile::TempDir;
use yunvfs::persist::{decode, encode, encoded_size};
use yunvfs::vfs::VfsTree;
use yunvfs::{load, save, VfsConfig};

use crate::ops::{apply, ops_strategy};

fn snapshot(tree: &VfsTree) -> Vec<(String, yunvfs::Metadata, Option<Vec<u8>>)> {
    let mut entries = Vec::new();
    tree.walk(|path, _, node| {
        entries.push((path.to_string(), node.metadata(), node.data().map(<[u8]>::to_vec)));
    });
    entries
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn codec_round_trip(ops in ops_strategy()) {
        let mut tree = VfsTree::new();
        apply(&mut tree, &ops);

        let bytes = encode(&tree).unwrap();
        prop_assert_eq!(bytes.len(), encoded_size(&tree));

        let decoded = decode(&bytes, VfsConfig::default()).unwrap();
        prop_assert_eq!(snapshot(&decoded), snapshot(&tree));
        prop_assert_eq!(decoded.stats(), tree.stats());
    }

    #[test]
    fn store_round_trip(ops in ops_strategy(), key in "[a-zA-Z0-9]{1,16}") {
        let mut tree = VfsTree::new();
        apply(&mut tree, &ops);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.dat");
        save(&tree, &path, &key).unwrap();
        let loaded = load(&path, &key).unwrap();

        prop_assert_eq!(snapshot(&loaded), snapshot(&tree));
    }

    #[test]
    fn decoder_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut input = b"YUNVFS01\x01\x00\x00\x00".to_vec();
        input.extend_from_slice(&bytes);
        let _ = decode(&input, VfsConfig::default());
        let _ = decode(&bytes, VfsConfig::default());
    }
}
