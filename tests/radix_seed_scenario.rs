use radium_router::Tree;

fn seeded_tree() -> Tree<&'static str> {
    let mut tree = Tree::new();
    let routes: &[(&str, &str)] = &[
        ("", "h0"),
        ("/", "h1"),
        ("/pkg", "h2"),
        ("/pkg/", "h3"),
        ("/pkg/net", "h4"),
        ("/doc/", "h5"),
        ("/pkg/net/http/httputil", "h6"),
        ("/pkg/net/http", "h7"),
        ("/pkg/net/html", "h12"),
        ("/pkg/net/http/httptest", "h13"),
        ("/pkg/nnn", "h14"),
        ("/pkg/nnnn", "h15"),
        ("/pkg/nn", "h16"),
        ("/pkg/:first/:second/*rest", "h17"),
        ("/pkg/:first", "h18"),
        ("/pkg/:first/:second", "h19"),
    ];
    for (pattern, payload) in routes {
        let node = tree.add(pattern).expect("pattern should register");
        tree.replace(node, payload);
    }
    tree
}

fn lookup_value<'t>(tree: &'t Tree<&'static str>, path: &str) -> Option<&'t str> {
    tree.lookup(path).map(|m| *m.value)
}

#[test]
fn seed_scenario_resolves_before_optimize() {
    let tree = seeded_tree();
    assert_eq!(lookup_value(&tree, ""), Some("h0"));
    assert_eq!(lookup_value(&tree, "/"), Some("h1"));
    assert_eq!(lookup_value(&tree, "/pkg"), Some("h2"));
    assert_eq!(lookup_value(&tree, "/pkg/net"), Some("h4"));
    assert_eq!(lookup_value(&tree, "/pkg/net/http"), Some("h7"));
    assert_eq!(lookup_value(&tree, "/pkg/net/http/httputil"), Some("h6"));
    assert_eq!(lookup_value(&tree, "/pkg/nn"), Some("h16"));
    assert_eq!(lookup_value(&tree, "/pkg/nnnn"), Some("h15"));
    assert_eq!(lookup_value(&tree, "/pkg/1"), Some("h18"));
    assert_eq!(lookup_value(&tree, "/pkg/1/"), Some("h19"));
    assert_eq!(lookup_value(&tree, "/pkg/1/2"), Some("h19"));
    assert_eq!(lookup_value(&tree, "/pkg/1/2/"), Some("h17"));
    assert_eq!(lookup_value(&tree, "/pkg/1/2/3/4"), Some("h17"));
}

#[test]
fn capture_rest_consumes_the_remainder_including_slashes() {
    let tree = seeded_tree();
    let m = tree.lookup("/pkg/1/2/3/4").expect("should match capture-rest");
    assert_eq!(*m.value, "h17");
    let rest = m
        .params
        .iter()
        .find(|(name, _)| *name == "rest")
        .map(|(_, value)| *value);
    assert_eq!(rest, Some("3/4"));
}

#[test]
fn capture_rest_matches_empty_remainder() {
    let tree = seeded_tree();
    let m = tree.lookup("/pkg/1/2/").expect("should match capture-rest");
    assert_eq!(*m.value, "h17");
    let rest = m
        .params
        .iter()
        .find(|(name, _)| *name == "rest")
        .map(|(_, value)| *value);
    assert_eq!(rest, Some(""));
}

#[test]
fn seed_scenario_resolves_identically_after_optimize() {
    let mut tree = seeded_tree();
    tree.optimize().expect("optimize should succeed once");

    assert_eq!(lookup_value(&tree, ""), Some("h0"));
    assert_eq!(lookup_value(&tree, "/"), Some("h1"));
    assert_eq!(lookup_value(&tree, "/pkg"), Some("h2"));
    assert_eq!(lookup_value(&tree, "/pkg/net"), Some("h4"));
    assert_eq!(lookup_value(&tree, "/pkg/net/http"), Some("h7"));
    assert_eq!(lookup_value(&tree, "/pkg/net/http/httputil"), Some("h6"));
    assert_eq!(lookup_value(&tree, "/pkg/nn"), Some("h16"));
    assert_eq!(lookup_value(&tree, "/pkg/nnnn"), Some("h15"));
    assert_eq!(lookup_value(&tree, "/pkg/1"), Some("h18"));
    assert_eq!(lookup_value(&tree, "/pkg/1/"), Some("h19"));
    assert_eq!(lookup_value(&tree, "/pkg/1/2"), Some("h19"));
    assert_eq!(lookup_value(&tree, "/pkg/1/2/"), Some("h17"));
    assert_eq!(lookup_value(&tree, "/pkg/1/2/3/4"), Some("h17"));
}
