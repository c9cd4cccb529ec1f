use super::node::{BufRange, Node, Storage};

/// The two contiguous buffers every node's `path`/`index` bytes are folded
/// into once a tree is compacted by `Optimize`.
#[derive(Debug, Default)]
pub(crate) struct Buffers {
    pub(crate) path: Box<str>,
    pub(crate) index: Box<[u8]>,
}

/// Concatenates every node's owned `path`/`index` bytes, in arena order,
/// into one `path` buffer and one `index` buffer.
///
/// Returns the buffers alongside a per-node `(path_range, index_range)`
/// pair, aligned by arena position, which the caller installs back onto
/// each node as `Storage::Shared`. Panics if any node has already been
/// switched to `Shared` storage — compaction runs exactly once, over the
/// freshly BFS-rebuilt arena, before any node is converted.
pub(crate) fn build<V>(nodes: &[Node<V>]) -> (Buffers, Vec<(BufRange, BufRange)>) {
    let mut path_buf = String::new();
    let mut index_buf: Vec<u8> = Vec::new();
    let mut ranges = Vec::with_capacity(nodes.len());

    for node in nodes {
        let Storage::Owned { path, index } = &node.storage else {
            panic!("alloc::build called on an already-compacted node");
        };

        let path_range = BufRange {
            start: path_buf.len() as u32,
            len: path.len() as u32,
        };
        path_buf.push_str(path);

        let index_range = BufRange {
            start: index_buf.len() as u32,
            len: index.len() as u32,
        };
        index_buf.extend_from_slice(index);

        ranges.push((path_range, index_range));
    }

    let buffers = Buffers {
        path: path_buf.into_boxed_str(),
        index: index_buf.into_boxed_slice(),
    };
    (buffers, ranges)
}
