use radium_router::{RadixError, Tree};

#[test]
fn static_dominates_wildcard_at_equal_specificity() {
    let mut tree: Tree<&str> = Tree::new();
    let a = tree.add("/a/b").unwrap();
    tree.replace(a, "static");
    let b = tree.add("/a/:x").unwrap();
    tree.replace(b, "wildcard");

    let m = tree.lookup("/a/b").unwrap();
    assert_eq!(*m.value, "static");
}

#[test]
fn capture_one_never_crosses_a_slash() {
    let mut tree: Tree<&str> = Tree::new();
    let node = tree.add("/a/:x").unwrap();
    tree.replace(node, "one-segment");

    assert!(tree.lookup("/a/b/c").is_none());
    assert!(tree.lookup("/a/b").is_some());
}

#[test]
fn add_after_optimize_is_rejected() {
    let mut tree: Tree<&str> = Tree::new();
    let node = tree.add("/a").unwrap();
    tree.replace(node, "a");
    tree.optimize().unwrap();

    let err = tree.add("/b").unwrap_err();
    assert!(matches!(err, RadixError::AlreadyOptimized));
}

#[test]
fn optimize_may_run_only_once() {
    let mut tree: Tree<&str> = Tree::new();
    let node = tree.add("/a").unwrap();
    tree.replace(node, "a");
    tree.optimize().unwrap();

    let err = tree.optimize().unwrap_err();
    assert!(matches!(err, RadixError::OptimizeAlreadyRan));
}

#[test]
fn conflicting_capture_one_name_at_the_same_node_is_rejected() {
    let mut tree: Tree<&str> = Tree::new();
    tree.add("/a/:x").unwrap();
    let err = tree.add("/a/:y").unwrap_err();
    assert!(matches!(err, RadixError::ConflictingParamName { .. }));
}

#[test]
fn conflicting_wildcard_kind_at_the_same_node_is_rejected() {
    let mut tree: Tree<&str> = Tree::new();
    tree.add("/a/:x").unwrap();
    let err = tree.add("/a/*y").unwrap_err();
    assert!(matches!(err, RadixError::ConflictingParamKind { .. }));
}

#[test]
fn capture_rest_not_last_is_rejected() {
    let mut tree: Tree<&str> = Tree::new();
    let err = tree.add("/a/*rest/tail").unwrap_err();
    assert!(matches!(err, RadixError::Pattern(_)));
}

mod proptest_suite {
    use super::*;
    use proptest::prelude::*;

    /// Generates a small alphabet of path segments so that generated patterns have a
    /// realistic chance of sharing prefixes (exercising splits), rather than a uniform
    /// random-string generator that would almost always just append siblings.
    fn segment_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["alpha", "beta", "gamma", "42", "x", "y"])
    }

    fn pattern_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(segment_strategy(), 1..5)
    }

    proptest! {
        /// Round-trip: a path built from a registered pattern's own literal segments
        /// always resolves back to that pattern's payload.
        #[test]
        fn round_trip_resolves_the_registering_pattern(segments in pattern_strategy()) {
            let pattern = format!("/{}", segments.join("/"));
            let mut tree: Tree<String> = Tree::new();
            let node = tree.add(&pattern).unwrap();
            tree.replace(node, pattern.clone());

            let found = tree.lookup(&pattern).expect("registered pattern must resolve");
            prop_assert_eq!(found.value, &pattern);
        }

        /// Idempotent optimize: every path that resolved before `optimize()` still
        /// resolves to the same payload afterwards.
        #[test]
        fn optimize_preserves_existing_resolutions(
            patterns in prop::collection::vec(pattern_strategy(), 1..8)
        ) {
            let mut tree: Tree<String> = Tree::new();
            let mut registered = Vec::new();
            for segments in &patterns {
                let pattern = format!("/{}", segments.join("/"));
                if let Ok(node) = tree.add(&pattern) {
                    let (_, had_value) = tree.replace(node, pattern.clone());
                    if !had_value {
                        registered.push(pattern);
                    }
                }
            }

            let before: Vec<Option<String>> = registered
                .iter()
                .map(|p| tree.lookup(p).map(|m| m.value.clone()))
                .collect();

            tree.optimize().unwrap();

            let after: Vec<Option<String>> = registered
                .iter()
                .map(|p| tree.lookup(p).map(|m| m.value.clone()))
                .collect();

            prop_assert_eq!(before, after);
        }
    }
}
