//! Property tests: any source and destination converge in one pass

use std::collections::BTreeMap;

use mirror_core::{MemorySink, TreeDiffApplier};
use mirror_test_utils::{FakeClock, MirrorFixture, Node, snapshot};
use proptest::prelude::*;

/// Small trees over a tiny name alphabet so that source and destination
/// collide often, including file/directory clashes at the same path.
fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    let segment = prop::sample::select(vec!["a", "b", "c"]);
    let path = prop::collection::vec(segment, 1..4).prop_map(|parts| parts.join("/"));
    let content = prop::collection::vec(any::<u8>(), 0..16);
    prop::collection::btree_map(path, content, 0..8)
}

/// Write files, skipping any whose path is blocked by an earlier file.
fn populate(root: &std::path::Path, files: &BTreeMap<String, Vec<u8>>) {
    for (rel, content) in files {
        let path = root.join(rel);
        let blocked = path
            .ancestors()
            .skip(1)
            .take_while(|a| *a != root)
            .any(|a| a.is_file());
        if blocked || path.is_dir() {
            continue;
        }
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn one_pass_converges_and_second_is_quiet(
        source in tree_strategy(),
        destination in tree_strategy(),
    ) {
        let fixture = MirrorFixture::new();
        populate(&fixture.source(), &source);
        populate(&fixture.destination(), &destination);
        let applier = TreeDiffApplier::new(fixture.source(), fixture.destination());
        let clock = FakeClock::new();

        let first = applier.run_pass(&mut MemorySink::new(), &clock);
        prop_assert!(first.is_clean(), "failures: {:?}", first.failures);
        prop_assert_eq!(snapshot(&fixture.source()), snapshot(&fixture.destination()));

        let second = applier.run_pass(&mut MemorySink::new(), &clock);
        prop_assert_eq!(second.mutations(), 0);
        let files = snapshot(&fixture.source())
            .values()
            .filter(|n| matches!(n, Node::File(_)))
            .count();
        prop_assert_eq!(second.unchanged.len(), files);
    }
}
