/*!
 * Counter Consistency Tests
 * Random operation sequences must keep the aggregate counters exact
 */

use proptest::prelude::*;
use yunvfs::vfs::VfsTree;

use crate::ops::{apply, ops_strategy};

fn recount(tree: &VfsTree) -> (usize, usize) {
    let mut nodes = 0;
    let mut bytes = 0;
    tree.walk(|_, _, node| {
        nodes += 1;
        bytes += node.data().map_or(0, <[u8]>::len);
    });
    (nodes, bytes)
}

proptest! {
    #[test]
    fn counters_match_tree(ops in ops_strategy()) {
        let mut tree = VfsTree::new();
        apply(&mut tree, &ops);

        let stats = tree.stats();
        prop_assert_eq!((stats.total_nodes, stats.total_size), recount(&tree));
    }

    #[test]
    fn structure_invariants_hold(ops in ops_strategy()) {
        let mut tree = VfsTree::new();
        apply(&mut tree, &ops);

        let mut violations = Vec::new();
        tree.walk(|path, id, node| {
            // Every child points back at its parent
            for child in node.children() {
                if tree.node(child).map(|c| c.parent()) != Ok(Some(id)) {
                    violations.push(format!("bad parent link under {}", path));
                }
            }
            // Sibling names are unique
            let mut names: Vec<&str> = node
                .children()
                .filter_map(|c| tree.node(c).ok().map(|n| n.name()))
                .collect();
            names.sort_unstable();
            let total = names.len();
            names.dedup();
            if names.len() != total {
                violations.push(format!("duplicate names in {}", path));
            }
        });
        prop_assert!(violations.is_empty(), "{:?}", violations);
    }
}
