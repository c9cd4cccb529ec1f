use super::alloc;
use super::node::{Node, NodeId, Storage};
use super::traversal::bfs_order;

/// Result of compacting a tree's arena: the rebuilt, BFS-ordered nodes,
/// the new root, the two shared backing buffers, and the id remap table
/// callers use to fix up any external structure keyed by the old
/// [`NodeId`]s (the method-fanout dispatch tables and endpoint registry
/// live above this module, in `Mux`).
pub(crate) struct Compacted<V> {
    pub(crate) nodes: Vec<Node<V>>,
    pub(crate) root: NodeId,
    pub(crate) path_buf: Box<str>,
    pub(crate) index_buf: Box<[u8]>,
    pub(crate) remap: Vec<NodeId>,
}

/// Reorders `nodes` into breadth-first arena order starting at `root`,
/// then concatenates every node's owned bytes into the two shared
/// buffers. Wildcard children are already kept last by construction
/// (`Node::insert_static_child`/`set_wildcard_child`), so no separate
/// reordering pass is needed for that invariant.
pub(crate) fn compact<V>(nodes: Vec<Node<V>>, root: NodeId) -> Compacted<V> {
    let (order, remap) = bfs_order(&nodes, root);

    let mut slots: Vec<Option<Node<V>>> = nodes.into_iter().map(Some).collect();
    let mut rebuilt: Vec<Node<V>> = Vec::with_capacity(order.len());
    for &old_id in &order {
        let mut node = slots[old_id.index()]
            .take()
            .expect("bfs_order visits every old id exactly once");
        for child in node.children.iter_mut() {
            *child = remap[child.index()];
        }
        rebuilt.push(node);
    }

    let (buffers, ranges) = alloc::build(&rebuilt);
    for (node, (path_range, index_range)) in rebuilt.iter_mut().zip(ranges) {
        node.storage = Storage::Shared {
            path: path_range,
            index: index_range,
        };
    }

    Compacted {
        nodes: rebuilt,
        root: remap[root.index()],
        path_buf: buffers.path,
        index_buf: buffers.index,
        remap,
    }
}
