//! Skip list nodes and the arena index used to link them.

/// An index into the sorted set's node arena.
///
/// Wraps a `u32` to keep link arrays compact. `NONE` doubles as "no node"
/// in forward/backward links and as "the header" in update arrays.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(u32);

impl NodeIdx {
    pub(crate) const NONE: Self = Self(u32::MAX);

    /// # Panics
    ///
    /// Panics if `idx` does not fit below the `NONE` sentinel.
    #[inline(always)]
    pub(crate) fn new(idx: usize) -> Self {
        match u32::try_from(idx) {
            Ok(raw) if raw != u32::MAX => Self(raw),
            _ => panic!("sorted set arena exhausted: slot {idx} exceeds u32::MAX - 1"),
        }
    }

    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub(crate) fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    pub(crate) fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

/// One forward link of a node, with the number of level-0 steps it skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Level {
    pub(crate) forward: NodeIdx,
    pub(crate) span: usize,
}

impl Level {
    pub(crate) const EMPTY: Self = Self {
        forward: NodeIdx::NONE,
        span: 0,
    };
}

/// An entry of a [`SortedSet`](super::SortedSet).
///
/// The key and score are fixed for the lifetime of the node; changing the
/// score of a key goes through the set, which replaces the node.
#[derive(Clone)]
pub struct Node<K, S, V> {
    key: K,
    score: S,
    value: V,
    pub(crate) backward: NodeIdx,
    // Sized exactly to the sampled level.
    pub(crate) levels: Vec<Level>,
}

impl<K, S, V> Node<K, S, V> {
    pub(crate) fn new(key: K, score: S, value: V, level: usize) -> Self {
        Self {
            key,
            score,
            value,
            backward: NodeIdx::NONE,
            levels: vec![Level::EMPTY; level],
        }
    }

    /// Returns the node's key.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the node's score.
    #[inline]
    pub fn score(&self) -> &S {
        &self.score
    }

    /// Returns the node's value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns a mutable reference to the node's value.
    #[inline]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Number of levels this node was linked into.
    ///
    /// Sampled once at insertion and never changed.
    #[inline]
    pub fn level(&self) -> usize {
        self.levels.len()
    }

    /// Consumes the node, returning its key, score and value.
    pub fn into_parts(self) -> (K, S, V) {
        (self.key, self.score, self.value)
    }

    pub(crate) fn set_value(&mut self, value: V) {
        self.value = value;
    }
}

impl<K, S, V> core::fmt::Debug for Node<K, S, V>
where
    K: core::fmt::Debug,
    S: core::fmt::Debug,
    V: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("score", &self.score)
            .field("value", &self.value)
            .field("level", &self.levels.len())
            .finish()
    }
}
