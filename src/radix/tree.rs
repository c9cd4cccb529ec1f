use super::error::{RadixError, RadixResult};
use super::insert;
use super::lookup::{self, Match};
use super::node::{Node, NodeId, NodeKind, Storage};
use super::optimize;

/// A compressed radix trie mapping registered patterns to a payload `V`.
///
/// Build phase (`add`) and optional `optimize` happen single-writer; once
/// built, `lookup` only takes shared borrows, so a `Tree` can be served
/// from many readers concurrently behind a single lock at the `Mux` layer
/// (see `crate::mux`).
#[derive(Debug)]
pub struct Tree<V> {
    arena: Vec<Node<V>>,
    root: NodeId,
    optimized: bool,
    buffers: Option<Buffers>,
}

#[derive(Debug)]
struct Buffers {
    path: Box<str>,
    index: Box<[u8]>,
}

impl<V> Default for Tree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Tree<V> {
    pub fn new() -> Self {
        Tree {
            arena: vec![Node::new("".into())],
            root: NodeId::ROOT,
            optimized: false,
            buffers: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_optimized(&self) -> bool {
        self.optimized
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Registers `pattern`, returning the node its payload should bind to.
    /// Callers typically follow this with [`Tree::replace`].
    pub fn add(&mut self, pattern: &str) -> RadixResult<NodeId> {
        insert::add(self, pattern)
    }

    /// Binds `value` at `node`, returning the previous payload (if any)
    /// and whether one was already present.
    pub fn replace(&mut self, node: NodeId, value: V) -> (Option<V>, bool) {
        self.node_mut(node).replace(value)
    }

    /// Looks up `path`, backtracking from static to wildcard alternatives
    /// as needed. `path` must already be normalized by the caller (see
    /// `crate::path`).
    pub fn lookup<'t, 'p>(&'t self, path: &'p str) -> Option<Match<'t, 'p, V>> {
        lookup::lookup(self, path)
    }

    /// Compacts the arena into breadth-first order and folds every node's
    /// bytes into two shared buffers. May run only once; rejects further
    /// `add` calls afterwards. Returns the old-id -> new-id remap table
    /// for callers (`Mux`) to apply to any table keyed by `NodeId`.
    pub fn optimize(&mut self) -> RadixResult<Vec<NodeId>> {
        if self.optimized {
            return Err(RadixError::OptimizeAlreadyRan);
        }
        let nodes = std::mem::take(&mut self.arena);
        let compacted = optimize::compact(nodes, self.root);
        self.arena = compacted.nodes;
        self.root = compacted.root;
        self.buffers = Some(Buffers {
            path: compacted.path_buf,
            index: compacted.index_buf,
        });
        self.optimized = true;
        Ok(compacted.remap)
    }

    pub(crate) fn alloc_node(&mut self, path: Box<str>) -> NodeId {
        let id = NodeId(self.arena.len() as u32);
        self.arena.push(Node::new(path));
        id
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub fn node_ref(&self, id: NodeId) -> &Node<V> {
        &self.arena[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.arena[id.index()]
    }

    pub fn node_kind(&self, id: NodeId) -> NodeKind {
        self.arena[id.index()].kind()
    }

    pub fn node_path(&self, id: NodeId) -> &str {
        match &self.arena[id.index()].storage {
            Storage::Owned { path, .. } => path,
            Storage::Shared { path, .. } => {
                &self.buffers.as_ref().expect("optimized tree has buffers").path[path.as_range()]
            }
        }
    }

    pub(crate) fn node_index(&self, id: NodeId) -> &[u8] {
        match &self.arena[id.index()].storage {
            Storage::Owned { index, .. } => index,
            Storage::Shared { index, .. } => {
                &self.buffers.as_ref().expect("optimized tree has buffers").index[index.as_range()]
            }
        }
    }
}

