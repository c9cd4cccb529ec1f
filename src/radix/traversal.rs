use std::collections::VecDeque;

use super::node::{Node, NodeId};

const UNVISITED: NodeId = NodeId(u32::MAX);

/// Computes a breadth-first arena order starting at `root`.
///
/// Returns `(order, remap)` where `order[new_id]` is the old id visited at
/// that BFS position, and `remap[old_id.index()]` is the new id it was
/// assigned. `root` always lands at new id 0.
pub(crate) fn bfs_order<V>(nodes: &[Node<V>], root: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
    let mut order: Vec<NodeId> = Vec::with_capacity(nodes.len());
    let mut remap: Vec<NodeId> = vec![UNVISITED; nodes.len()];
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    remap[root.index()] = NodeId(0);
    order.push(root);
    queue.push_back(root);

    while let Some(id) = queue.pop_front() {
        for &child in nodes[id.index()].children() {
            if remap[child.index()] == UNVISITED {
                remap[child.index()] = NodeId(order.len() as u32);
                order.push(child);
                queue.push_back(child);
            }
        }
    }

    (order, remap)
}
