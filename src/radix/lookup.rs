use smallvec::SmallVec;

use super::indices::candidates;
use super::node::{NodeId, NodeKind};
use super::tree::Tree;

/// A successful lookup: the matched node, its bound value, and the
/// captured parameters in left-to-right order.
pub struct Match<'t, 'p, V> {
    pub node: NodeId,
    pub value: &'t V,
    pub params: SmallVec<[(&'t str, &'p str); 4]>,
}

/// Walks `tree` against `path`, backtracking from a failed static or
/// wildcard descent to try the next alternative, per invariant 3's
/// lookup tie-break (static wins over wildcard at equal specificity).
pub fn lookup<'t, 'p, V>(tree: &'t Tree<V>, path: &'p str) -> Option<Match<'t, 'p, V>> {
    let mut params = SmallVec::new();
    let node = descend(tree, tree.root(), path, &mut params)?;
    let value = tree.node_ref(node).value()?;
    Some(Match {
        node,
        value,
        params,
    })
}

fn descend<'t, 'p, V>(
    tree: &'t Tree<V>,
    current: NodeId,
    remaining: &'p str,
    params: &mut SmallVec<[(&'t str, &'p str); 4]>,
) -> Option<NodeId> {
    match tree.node_kind(current) {
        NodeKind::Static => {
            let node_path = tree.node_path(current);
            let rest = remaining.strip_prefix(node_path)?;
            continue_from(tree, current, rest, params)
        }
        NodeKind::CaptureOne => {
            let (value, rest) = split_one_segment(remaining);
            if value.is_empty() {
                return None;
            }
            let name = param_name(tree.node_path(current));
            let mark = params.len();
            params.push((name, value));
            match continue_from(tree, current, rest, params) {
                Some(id) => Some(id),
                None => {
                    params.truncate(mark);
                    None
                }
            }
        }
        NodeKind::CaptureRest => {
            if !tree.node_ref(current).has_value() {
                return None;
            }
            let name = param_name(tree.node_path(current));
            params.push((name, remaining));
            Some(current)
        }
    }
}

fn param_name(node_path: &str) -> &str {
    &node_path[1..]
}

fn split_one_segment(s: &str) -> (&str, &str) {
    match s.find('/') {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}

/// After a node consumes its own bytes, either the path is exhausted
/// (success iff the node has a value) or the next byte is the `/`
/// delimiter to the next token, which this function strips before trying
/// static children (in index order) and then the wildcard child.
fn continue_from<'t, 'p, V>(
    tree: &'t Tree<V>,
    current: NodeId,
    remaining: &'p str,
    params: &mut SmallVec<[(&'t str, &'p str); 4]>,
) -> Option<NodeId> {
    if remaining.is_empty() {
        return if tree.node_ref(current).has_value() {
            Some(current)
        } else {
            None
        };
    }

    if !remaining.starts_with('/') {
        return None;
    }
    let after_slash = &remaining[1..];

    let b = after_slash.as_bytes().first().copied().unwrap_or(b'/');
    let index = tree.node_index(current);
    for pos in candidates(index, b) {
        let child = tree.node_ref(current).children()[pos];
        if tree.node_kind(child) != NodeKind::Static {
            continue;
        }
        let mark = params.len();
        if let Some(id) = descend(tree, child, after_slash, params) {
            return Some(id);
        }
        params.truncate(mark);
    }

    if let Some(wildcard) = tree.node_ref(current).wildcard_child() {
        let mark = params.len();
        if let Some(id) = descend(tree, wildcard, after_slash, params) {
            return Some(id);
        }
        params.truncate(mark);
    }

    None
}
