//! `SortedSet` — unique keys ordered by score, addressable by key and by rank.
//!
//! The set pairs a span-indexed skip list with a `HashMap` from key to node.
//! The map answers existence and point lookups in O(1); the skip list keeps
//! the global `(score, key)` order and answers positional and range queries
//! in O(log n).
//!
//! Key features:
//! - Equal scores are ordered by key, so ranks are deterministic.
//! - Ranks are 1-based; negative ranks count from the end (`-1` is last).
//! - Ranges given high-to-low come back in descending order.
//! - Keys are `Clone` as they are stored in both the map and the list.
//!
//! The set is not synchronized. Share it behind a lock when needed.

mod engine;
mod iter;
mod level;
mod node;
mod query;
mod serde_impl;

pub use iter::{Iter, Keys};
pub use level::MAX_LEVEL;
pub use node::Node;
pub use query::ScoreRange;

pub(crate) use self::node::{Level, NodeIdx};

use self::engine::SkipList;
use self::level::XorShift64;
use core::hash::Hash;
use std::borrow::Borrow;
use std::collections::HashMap;

/// An ordered set of unique keys, each carrying a score and a value.
///
/// ```rust
/// use rankset::{ScoreRange, SortedSet};
///
/// let mut board = SortedSet::new();
/// board.add_or_update("alice", 120, "Alice");
/// board.add_or_update("bob", 95, "Bob");
/// board.add_or_update("carol", 120, "Carol");
///
/// assert_eq!(board.find_rank("bob"), 1);
/// assert_eq!(board.peek_max().map(|n| *n.key()), Some("carol"));
///
/// let top: Vec<_> = board.get_by_rank_range(-1, -2).iter().map(|n| *n.key()).collect();
/// assert_eq!(top, ["carol", "alice"]);
///
/// let at_least_100 = board.get_by_score_range(&100, &i32::MAX, ScoreRange::new());
/// assert_eq!(at_least_100.len(), 2);
/// ```
pub struct SortedSet<K, S, V> {
    list: SkipList<K, S, V>,
    dict: HashMap<K, NodeIdx>,
}

impl<K, S, V> SortedSet<K, S, V> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::with_seed_and_capacity(XorShift64::default(), 0)
    }

    /// Creates an empty set whose level sampling is seeded with `seed`.
    ///
    /// Two sets built with the same seed and the same sequence of operations
    /// end up with identical structure.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_seed_and_capacity(XorShift64::new(seed), 0)
    }

    /// Creates an empty set with room for `capacity` entries.
    ///
    /// A set holds at most `u32::MAX - 1` entries at once.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_seed_and_capacity(XorShift64::default(), capacity)
    }

    fn with_seed_and_capacity(rng: XorShift64, capacity: usize) -> Self {
        Self {
            list: SkipList::with_rng(rng, capacity),
            dict: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the set holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.list.clear();
        self.dict.clear();
    }

    /// The entry with the lowest `(score, key)`. O(1).
    pub fn peek_min(&self) -> Option<&Node<K, S, V>> {
        let first = self.list.first();
        first.is_some().then(|| self.list.node(first))
    }

    /// The entry with the highest `(score, key)`. O(1).
    pub fn peek_max(&self) -> Option<&Node<K, S, V>> {
        let last = self.list.last();
        last.is_some().then(|| self.list.node(last))
    }

    /// Nodes ranked `start..=end` (1-based, negative counts from the end).
    ///
    /// `start > end` after resolving negatives returns the range in
    /// descending order. Out-of-range ranks yield fewer or no nodes.
    pub fn get_by_rank_range(&self, start: isize, end: isize) -> Vec<&Node<K, S, V>> {
        self.list
            .rank_range(start, end)
            .into_iter()
            .map(|x| self.list.node(x))
            .collect()
    }

    /// The node at `rank`, or `None` past the end.
    pub fn get_by_rank(&self, rank: isize) -> Option<&Node<K, S, V>> {
        let nodes = self.list.rank_range(rank, rank);
        match nodes.as_slice() {
            [x] => Some(self.list.node(*x)),
            _ => None,
        }
    }

    /// Calls `f(key, value)` on each entry ranked `start..=end` until it
    /// returns `false`.
    ///
    /// A descending range is gathered in full before `f` first runs, so an
    /// early stop there saves callback invocations but not the traversal.
    pub fn iter_by_rank_range<F>(&self, start: isize, end: isize, f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.list.for_each_in_rank_range(start, end, f);
    }

    /// Iterates over all entries in ascending `(score, key)` order.
    pub fn iter(&self) -> Iter<'_, K, S, V> {
        Iter::new(&self.list)
    }

    /// Iterates over all keys in ascending `(score, key)` order.
    pub fn keys(&self) -> Keys<'_, K, S, V> {
        Keys::new(self.iter())
    }
}

impl<K, S, V> SortedSet<K, S, V>
where
    K: Hash + Eq,
{
    /// Returns the node for `key`. O(1).
    pub fn get_by_key<Q>(&self, key: &Q) -> Option<&Node<K, S, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.dict.get(key).map(|&x| self.list.node(x))
    }

    /// Returns a mutable reference to the value stored for `key`. O(1).
    ///
    /// Scores can only change through [`add_or_update`](Self::add_or_update).
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let x = *self.dict.get(key)?;
        Some(self.list.node_mut(x).value_mut())
    }

    /// Returns `true` if `key` is present. O(1).
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.dict.contains_key(key)
    }

    /// Removes and returns the nodes ranked `start..=end`.
    ///
    /// Same rank rules and result order as
    /// [`get_by_rank_range`](Self::get_by_rank_range).
    pub fn remove_by_rank_range(&mut self, start: isize, end: isize) -> Vec<Node<K, S, V>> {
        let removed = self.list.remove_rank_range(start, end);
        for node in &removed {
            self.dict.remove(node.key());
        }
        removed
    }

    /// Removes and returns the node at `rank`, or `None` past the end.
    pub fn remove_by_rank(&mut self, rank: isize) -> Option<Node<K, S, V>> {
        let mut removed = self.remove_by_rank_range(rank, rank);
        debug_assert!(removed.len() <= 1);
        removed.pop()
    }
}

impl<K, S, V> SortedSet<K, S, V>
where
    S: PartialOrd,
{
    /// Nodes whose score lies between `start` and `end`.
    ///
    /// With `start > end` the interval `[end, start]` is returned in
    /// descending order; `exclude_start`/`exclude_end` still refer to the
    /// `start`/`end` arguments. An empty or disjoint range yields nothing.
    pub fn get_by_score_range(&self, start: &S, end: &S, opts: ScoreRange) -> Vec<&Node<K, S, V>> {
        self.list
            .score_range(start, end, opts)
            .into_iter()
            .map(|x| self.list.node(x))
            .collect()
    }
}

impl<K, S, V> SortedSet<K, S, V>
where
    K: Hash + Eq + Ord + Clone,
    S: PartialOrd,
{
    /// Inserts `key` or updates it in place.
    ///
    /// Returns `true` if the key was new. An unchanged score only replaces
    /// the value; a changed score re-links the entry at its new position.
    ///
    /// # Panics
    ///
    /// Panics if a new key would push the set past `u32::MAX - 1` entries.
    pub fn add_or_update(&mut self, key: K, score: S, value: V) -> bool {
        match self.dict.get(&key).copied() {
            Some(x) if *self.list.node(x).score() == score => {
                self.list.node_mut(x).set_value(value);
                false
            }
            Some(x) => {
                self.list.remove(x);
                let x = self.list.insert(key.clone(), score, value);
                self.dict.insert(key, x);
                false
            }
            None => {
                let x = self.list.insert(key.clone(), score, value);
                self.dict.insert(key, x);
                true
            }
        }
    }

    /// Removes `key`, returning its node. O(log n).
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Node<K, S, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let x = self.dict.remove(key)?;
        Some(self.list.remove(x))
    }

    /// Removes and returns the lowest entry. O(log n).
    pub fn pop_min(&mut self) -> Option<Node<K, S, V>> {
        let first = self.list.first();
        first.is_some().then(|| self.take(first))
    }

    /// Removes and returns the highest entry. O(log n).
    pub fn pop_max(&mut self) -> Option<Node<K, S, V>> {
        let last = self.list.last();
        last.is_some().then(|| self.take(last))
    }

    fn take(&mut self, x: NodeIdx) -> Node<K, S, V> {
        let node = self.list.remove(x);
        self.dict.remove(node.key());
        node
    }

    /// 1-based rank of `key`, or 0 if it is absent. O(log n).
    pub fn find_rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.dict.get(key) {
            Some(&x) => {
                let node = self.list.node(x);
                self.list.rank_of(node.score(), node.key())
            }
            None => 0,
        }
    }
}

impl<K, S, V> Default for SortedSet<K, S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, S: Clone, V: Clone> Clone for SortedSet<K, S, V> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            dict: self.dict.clone(),
        }
    }
}

impl<K, S, V> core::fmt::Debug for SortedSet<K, S, V>
where
    K: core::fmt::Debug,
    S: core::fmt::Debug,
    V: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|n| (n.key(), (n.score(), n.value()))))
            .finish()
    }
}

impl<'a, K, S, V> IntoIterator for &'a SortedSet<K, S, V> {
    type Item = &'a Node<K, S, V>;
    type IntoIter = Iter<'a, K, S, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, S, V> Extend<(K, S, V)> for SortedSet<K, S, V>
where
    K: Hash + Eq + Ord + Clone,
    S: PartialOrd,
{
    fn extend<I: IntoIterator<Item = (K, S, V)>>(&mut self, iter: I) {
        for (key, score, value) in iter {
            self.add_or_update(key, score, value);
        }
    }
}

impl<K, S, V> FromIterator<(K, S, V)> for SortedSet<K, S, V>
where
    K: Hash + Eq + Ord + Clone,
    S: PartialOrd,
{
    fn from_iter<I: IntoIterator<Item = (K, S, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
