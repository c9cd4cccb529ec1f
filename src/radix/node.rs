use bitflags::bitflags;
use smallvec::SmallVec;

/// Index into a [`Tree`](super::tree::Tree)'s node arena.
///
/// Stable across `Add`: splitting a node never reallocates its id (see
/// `radix::insert`). `Optimize` *does* permute the arena for cache locality;
/// it returns a remap table rather than leaving old `NodeId`s dangling (see
/// `radix::optimize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct NodeFlags: u8 {
        const HAS_VALUE = 0b0000_0001;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Static,
    CaptureOne,
    CaptureRest,
}

impl NodeKind {
    pub(crate) fn of(path: &str) -> NodeKind {
        match path.as_bytes().first() {
            Some(b':') => NodeKind::CaptureOne,
            Some(b'*') => NodeKind::CaptureRest,
            _ => NodeKind::Static,
        }
    }

    pub(crate) fn dispatch_byte(path: &str) -> u8 {
        path.as_bytes().first().copied().unwrap_or(b'/')
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            NodeKind::Static => "static",
            NodeKind::CaptureOne => "capture-one",
            NodeKind::CaptureRest => "capture-rest",
        }
    }
}

/// Byte range `start..start+len` into one of `Tree`'s shared post-`Optimize`
/// buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BufRange {
    pub start: u32,
    pub len: u32,
}

impl BufRange {
    pub(crate) fn as_range(self) -> std::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

/// A node's `path`/`index` storage, before and after `Optimize`.
///
/// Before compaction every node owns its bytes individually. `Optimize`
/// concatenates every node's `path` and `index` into two tree-level shared
/// buffers and switches every node over to `Shared`, so that after
/// compaction every node's bytes live in one contiguous allocation.
#[derive(Debug, Clone)]
pub(crate) enum Storage {
    Owned {
        path: Box<str>,
        index: SmallVec<[u8; 4]>,
    },
    Shared {
        path: BufRange,
        index: BufRange,
    },
}

/// A node in the compressed radix trie.
#[derive(Debug, Clone)]
pub struct Node<V> {
    pub(crate) storage: Storage,
    pub(crate) kind: NodeKind,
    pub(crate) flags: NodeFlags,
    pub(crate) value: Option<V>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    /// Position in `children` of the single wildcard child, if any.
    pub(crate) cap_slot: Option<usize>,
}

impl<V> Node<V> {
    pub(crate) fn new(path: Box<str>) -> Self {
        let kind = NodeKind::of(&path);
        Node {
            storage: Storage::Owned {
                path,
                index: SmallVec::new(),
            },
            kind,
            flags: NodeFlags::empty(),
            value: None,
            children: SmallVec::new(),
            cap_slot: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn has_value(&self) -> bool {
        self.flags.contains(NodeFlags::HAS_VALUE)
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn owned_path_mut(&mut self) -> &mut Box<str> {
        match &mut self.storage {
            Storage::Owned { path, .. } => path,
            Storage::Shared { .. } => panic!("node storage already compacted"),
        }
    }

    pub(crate) fn owned_index_mut(&mut self) -> &mut SmallVec<[u8; 4]> {
        match &mut self.storage {
            Storage::Owned { index, .. } => index,
            Storage::Shared { .. } => panic!("node storage already compacted"),
        }
    }

    pub(crate) fn set_path(&mut self, path: Box<str>) {
        self.kind = NodeKind::of(&path);
        *self.owned_path_mut() = path;
    }

    /// Replaces the payload bound at this node.
    ///
    /// Returns the previous payload, if any, and whether one was already
    /// present.
    pub(crate) fn replace(&mut self, value: V) -> (Option<V>, bool) {
        let had_value = self.has_value();
        let old = self.value.replace(value);
        self.flags.insert(NodeFlags::HAS_VALUE);
        (old, had_value)
    }

    /// Inserts `child` into `children`/`index` immediately before the
    /// wildcard slot (if any), keeping the wildcard child last.
    pub(crate) fn insert_static_child(&mut self, child: NodeId, first_byte: u8) -> usize {
        let pos = self.cap_slot.unwrap_or(self.children.len());
        self.children.insert(pos, child);
        self.owned_index_mut().insert(pos, first_byte);
        if let Some(slot) = self.cap_slot.as_mut() {
            *slot += 1;
        }
        pos
    }

    pub(crate) fn set_wildcard_child(&mut self, child: NodeId, first_byte: u8) -> usize {
        debug_assert!(self.cap_slot.is_none());
        let pos = self.children.len();
        self.children.push(child);
        self.owned_index_mut().push(first_byte);
        self.cap_slot = Some(pos);
        pos
    }

    pub(crate) fn wildcard_child(&self) -> Option<NodeId> {
        self.cap_slot.map(|slot| self.children[slot])
    }
}
