use crate::pattern::{Segment, parse_pattern};

use super::error::{RadixError, RadixResult};
use super::indices::candidates;
use super::node::{NodeId, NodeKind};
use super::tree::Tree;

/// Registers `pattern` against `tree`, returning the node the payload
/// should be bound to.
///
/// Patterns are walked raw-token by raw-token (the same granularity
/// `pattern::parse_pattern` returns); a run of consecutive static tokens
/// only gets folded into one compound node path at the point a new node is
/// created, never as a precondition of matching against existing nodes.
pub(crate) fn add<V>(tree: &mut Tree<V>, pattern: &str) -> RadixResult<NodeId> {
    if tree.is_optimized() {
        return Err(RadixError::AlreadyOptimized);
    }

    let tokens = parse_pattern(pattern)?;
    tracing::trace!(pattern, segments = tokens.len(), "radix::add");

    let mut current = tree.root();
    let mut parent_slot: Option<(NodeId, usize)> = None;
    let mut depth = 0usize;

    loop {
        let current_path = tree.node_path(current).to_string();
        let q: Vec<&str> = current_path.split('/').collect();
        let rest = &tokens[depth..];

        let mut n = 0usize;
        while n < q.len() && n < rest.len() && stored_segment_matches(q[n], &rest[n]) {
            n += 1;
        }

        if n < q.len() {
            return split(tree, current, parent_slot, &q, n, &tokens, depth);
        }

        if n == rest.len() {
            return Ok(current);
        }

        depth += n;
        match descend(tree, current, &tokens, depth)? {
            Descend::Existing { child, slot } => {
                parent_slot = Some((current, slot));
                current = child;
            }
            Descend::Appended(id) => return Ok(id),
        }
    }
}

fn token_text(segment: &Segment) -> &str {
    match segment {
        Segment::Static(s) => s,
        Segment::CaptureOne(name) | Segment::CaptureRest(name) => name.as_ref(),
    }
}

/// Compares a stored node-path segment (`q[n]`, sigil-and-all for a wildcard
/// node's own path, e.g. `":first"`) against an incoming pattern token. A
/// naive `q[n] == token_text(segment)` strips the sigil from one side only,
/// so re-descending into an existing wildcard child always read as a
/// mismatch (`n` stuck at 0) and took the split branch instead of matching
/// the current node in place.
fn stored_segment_matches(stored: &str, segment: &Segment) -> bool {
    match segment {
        Segment::Static(s) => stored == s.as_ref(),
        Segment::CaptureOne(name) => {
            stored.as_bytes().first() == Some(&b':') && &stored[1..] == name.as_ref()
        }
        Segment::CaptureRest(name) => {
            stored.as_bytes().first() == Some(&b'*') && &stored[1..] == name.as_ref()
        }
    }
}

enum Descend {
    Existing { child: NodeId, slot: usize },
    Appended(NodeId),
}

/// Tries to route into an existing child for `tokens[depth]`; on failure
/// appends a fresh chain for the remaining tokens.
fn descend<V>(
    tree: &mut Tree<V>,
    current: NodeId,
    tokens: &[Segment],
    depth: usize,
) -> RadixResult<Descend> {
    match &tokens[depth] {
        Segment::Static(_) => {
            let b = NodeKind::dispatch_byte(token_text(&tokens[depth]));
            let index = tree.node_index(current).to_vec();
            for pos in candidates(&index, b) {
                let child = tree.node_ref(current).children()[pos];
                if tree.node_kind(child) == NodeKind::Static {
                    let child_first = first_token(tree.node_path(child));
                    if child_first == token_text(&tokens[depth]) {
                        return Ok(Descend::Existing { child, slot: pos });
                    }
                }
            }
            let id = append_chain(tree, current, &tokens[depth..]);
            Ok(Descend::Appended(id))
        }
        wildcard @ (Segment::CaptureOne(_) | Segment::CaptureRest(_)) => {
            let wanted_kind = match wildcard {
                Segment::CaptureOne(_) => NodeKind::CaptureOne,
                Segment::CaptureRest(_) => NodeKind::CaptureRest,
                Segment::Static(_) => unreachable!(),
            };
            if let Some(existing) = tree.node_ref(current).wildcard_child() {
                let existing_kind = tree.node_kind(existing);
                if existing_kind != wanted_kind {
                    return Err(RadixError::ConflictingParamKind {
                        existing: existing_kind.label(),
                        found: wanted_kind.label(),
                    });
                }
                let existing_name = &tree.node_path(existing)[1..];
                let wanted_name = token_text(wildcard);
                if existing_name != wanted_name {
                    return Err(RadixError::ConflictingParamName {
                        existing: existing_name.to_string(),
                        found: wanted_name.to_string(),
                    });
                }
                let slot = tree
                    .node_ref(current)
                    .children()
                    .iter()
                    .position(|&c| c == existing)
                    .expect("wildcard child is tracked in children");
                return Ok(Descend::Existing {
                    child: existing,
                    slot,
                });
            }
            let id = append_chain(tree, current, &tokens[depth..]);
            Ok(Descend::Appended(id))
        }
    }
}

fn first_token(path: &str) -> &str {
    path.split('/').next().unwrap_or("")
}

/// Groups consecutive static tokens into one compound node path each;
/// every wildcard token gets its own node. Returns the id of the node
/// bound to the last token (where the caller's payload attaches).
fn append_chain<V>(tree: &mut Tree<V>, mut parent: NodeId, tokens: &[Segment]) -> NodeId {
    let mut i = 0;
    let mut last = parent;

    while i < tokens.len() {
        match &tokens[i] {
            Segment::Static(_) => {
                let mut j = i;
                let mut joined = String::new();
                while j < tokens.len() && matches!(tokens[j], Segment::Static(_)) {
                    if j > i {
                        joined.push('/');
                    }
                    joined.push_str(token_text(&tokens[j]));
                    j += 1;
                }
                let id = tree.alloc_node(joined.into_boxed_str());
                let first_byte = NodeKind::dispatch_byte(tree.node_path(id));
                tree.node_mut(parent).insert_static_child(id, first_byte);
                parent = id;
                last = id;
                i = j;
            }
            wildcard => {
                let path = format!("{wildcard}").into_boxed_str();
                let id = tree.alloc_node(path);
                let first_byte = NodeKind::dispatch_byte(tree.node_path(id));
                tree.node_mut(parent).set_wildcard_child(id, first_byte);
                parent = id;
                last = id;
                i += 1;
            }
        }
    }

    last
}

/// Splits `current`'s compound path at raw-token offset `n`, inserting a
/// fresh interior node that takes over `current`'s slot in its parent (or
/// becomes the new root). `current` keeps its [`NodeId`] — only its `path`
/// shrinks to the unmatched tail — so any external table keyed by that id
/// stays valid without a rebinding pass.
fn split<V>(
    tree: &mut Tree<V>,
    current: NodeId,
    parent_slot: Option<(NodeId, usize)>,
    q: &[&str],
    n: usize,
    tokens: &[Segment],
    depth: usize,
) -> RadixResult<NodeId> {
    let prefix = q[..n].join("/").into_boxed_str();
    let tail = q[n..].join("/").into_boxed_str();

    let interior = tree.alloc_node(prefix);
    let current_kind = tree.node_ref(current).kind();
    tree.node_mut(current).set_path(tail);

    let first_byte = NodeKind::dispatch_byte(tree.node_path(current));
    if current_kind == NodeKind::Static {
        tree.node_mut(interior).insert_static_child(current, first_byte);
    } else {
        tree.node_mut(interior).set_wildcard_child(current, first_byte);
    }

    match parent_slot {
        Some((parent, slot)) => tree.node_mut(parent).children[slot] = interior,
        None => tree.set_root(interior),
    }

    let rest = &tokens[depth + n..];
    if rest.is_empty() {
        return Ok(interior);
    }
    Ok(append_chain(tree, interior, rest))
}
