//! The skip list engine behind `SortedSet`.
//!
//! Nodes live in a slot arena and link to each other by `NodeIdx`. Every
//! forward link carries a span (the number of level-0 steps it covers), which
//! lets searches accumulate the exact 1-based rank of the position they reach.
//!
//! Ordering is `(score, key)`: scores first, ties broken by key ascending.
//!
//! The engine knows nothing about the key index; the facade keeps the two in
//! step.

use super::level::{random_level, XorShift64, MAX_LEVEL};
use super::node::{Level, Node, NodeIdx};

enum Slot<K, S, V> {
    Occupied(Node<K, S, V>),
    Vacant { next_free: NodeIdx },
}

impl<K: Clone, S: Clone, V: Clone> Clone for Slot<K, S, V> {
    fn clone(&self) -> Self {
        match self {
            Slot::Occupied(node) => Slot::Occupied(node.clone()),
            Slot::Vacant { next_free } => Slot::Vacant {
                next_free: *next_free,
            },
        }
    }
}

/// Per-level predecessors of a search position. `NodeIdx::NONE` is the header.
pub(crate) type Update = [NodeIdx; MAX_LEVEL];

#[derive(Clone)]
pub(crate) struct SkipList<K, S, V> {
    slots: Vec<Slot<K, S, V>>,
    free_head: NodeIdx,
    head: [Level; MAX_LEVEL],
    tail: NodeIdx,
    len: usize,
    level: usize,
    rng: XorShift64,
}

impl<K, S, V> SkipList<K, S, V> {
    pub(crate) fn with_rng(rng: XorShift64, capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: NodeIdx::NONE,
            head: [Level::EMPTY; MAX_LEVEL],
            tail: NodeIdx::NONE,
            len: 0,
            level: 1,
            rng,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Highest active level, always at least 1.
    #[inline]
    pub(crate) fn level(&self) -> usize {
        self.level
    }

    #[inline]
    pub(crate) fn first(&self) -> NodeIdx {
        self.head[0].forward
    }

    #[inline]
    pub(crate) fn last(&self) -> NodeIdx {
        self.tail
    }

    #[inline]
    pub(crate) fn next(&self, idx: NodeIdx) -> NodeIdx {
        self.node(idx).levels[0].forward
    }

    #[inline]
    pub(crate) fn prev(&self, idx: NodeIdx) -> NodeIdx {
        self.node(idx).backward
    }

    #[inline]
    pub(crate) fn node(&self, idx: NodeIdx) -> &Node<K, S, V> {
        match &self.slots[idx.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("vacant slot {} is linked", idx.index()),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<K, S, V> {
        match &mut self.slots[idx.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("vacant slot {} is linked", idx.index()),
        }
    }

    /// Link at level `i` of `at`, where `NONE` addresses the header.
    #[inline(always)]
    pub(crate) fn link(&self, at: NodeIdx, i: usize) -> Level {
        if at.is_none() {
            self.head[i]
        } else {
            self.node(at).levels[i]
        }
    }

    #[inline(always)]
    fn link_mut(&mut self, at: NodeIdx, i: usize) -> &mut Level {
        if at.is_none() {
            &mut self.head[i]
        } else {
            &mut self.node_mut(at).levels[i]
        }
    }

    fn alloc(&mut self, node: Node<K, S, V>) -> NodeIdx {
        if self.free_head.is_some() {
            let idx = self.free_head;
            let slot = std::mem::replace(&mut self.slots[idx.index()], Slot::Occupied(node));
            match slot {
                Slot::Vacant { next_free } => self.free_head = next_free,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            }
            idx
        } else {
            let idx = NodeIdx::new(self.slots.len());
            self.slots.push(Slot::Occupied(node));
            idx
        }
    }

    /// Moves an unlinked node out of the arena and recycles its slot.
    pub(crate) fn release(&mut self, idx: NodeIdx) -> Node<K, S, V> {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match std::mem::replace(&mut self.slots[idx.index()], vacant) {
            Slot::Occupied(node) => {
                self.free_head = idx;
                node
            }
            Slot::Vacant { .. } => unreachable!("released slot {} twice", idx.index()),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = NodeIdx::NONE;
        self.head = [Level::EMPTY; MAX_LEVEL];
        self.tail = NodeIdx::NONE;
        self.len = 0;
        self.level = 1;
    }

    /// Unlinks `x` given the predecessors captured by a prior search.
    ///
    /// The slot stays occupied; pair with [`release`](Self::release).
    pub(crate) fn delete_node(&mut self, x: NodeIdx, update: &Update) {
        for i in 0..self.level {
            let x_link = self.node(x).levels.get(i).copied();
            let pred = self.link_mut(update[i], i);
            match x_link {
                Some(x_link) if pred.forward == x => {
                    pred.span = pred.span + x_link.span - 1;
                    pred.forward = x_link.forward;
                }
                _ => pred.span -= 1,
            }
        }

        let (next, backward) = {
            let node = self.node(x);
            (node.levels[0].forward, node.backward)
        };
        if next.is_some() {
            self.node_mut(next).backward = backward;
        } else {
            self.tail = backward;
        }

        while self.level > 1 && self.head[self.level - 1].forward.is_none() {
            self.level -= 1;
            crate::debug!(new_level = self.level, "trimmed skip list level");
        }
        self.len -= 1;
        crate::trace!(len = self.len, "unlinked node");
    }

    /// Walks to the node just before `rank` (1-based).
    ///
    /// Returns the rank reached and that node (`NONE` for the header). With
    /// `capture` set the per-level predecessors are recorded for a deletion at
    /// `rank`; otherwise the walk stops as soon as it is adjacent.
    pub(crate) fn find_node_by_rank(&self, rank: usize, capture: bool) -> (usize, NodeIdx, Update) {
        let mut update = [NodeIdx::NONE; MAX_LEVEL];
        let mut traversed = 0;
        let mut x = NodeIdx::NONE;

        for i in (0..self.level).rev() {
            loop {
                let link = self.link(x, i);
                if link.forward.is_some() && traversed + link.span < rank {
                    traversed += link.span;
                    x = link.forward;
                } else {
                    break;
                }
            }
            if capture {
                update[i] = x;
            } else if traversed + 1 == rank {
                break;
            }
        }
        (traversed, x, update)
    }
}

impl<K, S, V> SkipList<K, S, V>
where
    K: Ord,
    S: PartialOrd,
{
    /// `true` if `node` sorts strictly before `(score, key)`.
    #[inline(always)]
    fn precedes(node: &Node<K, S, V>, score: &S, key: &K) -> bool {
        node.score() < score || (node.score() == score && node.key() < key)
    }

    /// Descends from the top level, recording the last node before
    /// `(score, key)` on each level and the rank crossed to reach it.
    fn search(&self, score: &S, key: &K) -> (Update, [usize; MAX_LEVEL]) {
        let mut update = [NodeIdx::NONE; MAX_LEVEL];
        let mut rank = [0usize; MAX_LEVEL];
        let mut x = NodeIdx::NONE;

        for i in (0..self.level).rev() {
            rank[i] = if i == self.level - 1 { 0 } else { rank[i + 1] };
            loop {
                let link = self.link(x, i);
                if link.forward.is_some() && Self::precedes(self.node(link.forward), score, key) {
                    rank[i] += link.span;
                    x = link.forward;
                } else {
                    break;
                }
            }
            update[i] = x;
        }
        (update, rank)
    }

    /// Links a new node in order. The key must not already be present.
    pub(crate) fn insert(&mut self, key: K, score: S, value: V) -> NodeIdx {
        let (mut update, mut rank) = self.search(&score, &key);

        let level = random_level(&mut self.rng);
        if level > self.level {
            for i in self.level..level {
                rank[i] = 0;
                update[i] = NodeIdx::NONE;
                self.head[i].span = self.len;
            }
            self.level = level;
            crate::debug!(new_level = level, "raised skip list level");
        }

        let x = self.alloc(Node::new(key, score, value, level));
        for i in 0..level {
            let pred = self.link(update[i], i);
            let crossed = rank[0] - rank[i];
            self.node_mut(x).levels[i] = Level {
                forward: pred.forward,
                span: pred.span - crossed,
            };
            *self.link_mut(update[i], i) = Level {
                forward: x,
                span: crossed + 1,
            };
        }

        // Levels above the new node now cover one more entry.
        for i in level..self.level {
            self.link_mut(update[i], i).span += 1;
        }

        self.node_mut(x).backward = update[0];
        let next = self.node(x).levels[0].forward;
        if next.is_some() {
            self.node_mut(next).backward = x;
        } else {
            self.tail = x;
        }
        self.len += 1;
        crate::trace!(node_level = level, rank = rank[0] + 1, len = self.len, "linked node");
        x
    }

    /// Unlinks the node at `x` and moves it out of the arena.
    pub(crate) fn remove(&mut self, x: NodeIdx) -> Node<K, S, V> {
        let (update, _) = {
            let node = self.node(x);
            self.search(node.score(), node.key())
        };
        debug_assert!(self.link(update[0], 0).forward == x);
        self.delete_node(x, &update);
        self.release(x)
    }

    /// 1-based rank of the node with `(score, key)`, or 0 if it is absent.
    pub(crate) fn rank_of(&self, score: &S, key: &K) -> usize {
        let mut rank = 0;
        let mut x = NodeIdx::NONE;

        for i in (0..self.level).rev() {
            loop {
                let link = self.link(x, i);
                if link.forward.is_none() {
                    break;
                }
                let next = self.node(link.forward);
                if next.score() < score || (next.score() == score && next.key() <= key) {
                    rank += link.span;
                    x = link.forward;
                } else {
                    break;
                }
            }
            if x.is_some() && self.node(x).key() == key {
                return rank;
            }
        }
        0
    }
}

#[cfg(test)]
impl<K, S, V> SkipList<K, S, V>
where
    K: Ord + core::fmt::Debug,
    S: PartialOrd + core::fmt::Debug,
{
    /// Checks order, spans, backward links, tail, level and length.
    pub(crate) fn check_invariants(&self) {
        assert!(self.level >= 1 && self.level <= MAX_LEVEL);

        // Level 0 walk: order, backward links, tail.
        let mut positions = std::collections::HashMap::new();
        let mut prev = NodeIdx::NONE;
        let mut x = self.first();
        let mut rank = 0;
        while x.is_some() {
            rank += 1;
            let node = self.node(x);
            assert_eq!(node.backward, prev, "backward link of rank {}", rank);
            if prev.is_some() {
                let p = self.node(prev);
                assert!(
                    Self::precedes(p, node.score(), node.key()),
                    "{:?} is not before {:?}",
                    (p.score(), p.key()),
                    (node.score(), node.key())
                );
            }
            assert!(node.level() >= 1 && node.level() <= MAX_LEVEL);
            positions.insert(x, rank);
            prev = x;
            x = node.levels[0].forward;
        }
        assert_eq!(rank, self.len);
        assert_eq!(self.tail, prev);

        // Spans: each link skips exactly the rank difference.
        for i in 0..MAX_LEVEL {
            let mut at = NodeIdx::NONE;
            let mut at_rank = 0;
            loop {
                if at.is_some() && i >= self.node(at).level() {
                    break;
                }
                let link = self.link(at, i);
                if link.forward.is_none() {
                    break;
                }
                assert!(i < self.level, "level {} above active level {}", i, self.level);
                let next_rank = positions[&link.forward];
                assert_eq!(link.span, next_rank - at_rank, "span at level {}", i);
                at = link.forward;
                at_rank = next_rank;
            }
        }
        if self.level > 1 {
            assert!(self.head[self.level - 1].forward.is_some());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn list(seed: u64) -> SkipList<u32, i64, ()> {
        SkipList::with_rng(XorShift64::new(seed), 0)
    }

    fn keys(list: &SkipList<u32, i64, ()>) -> Vec<u32> {
        let mut out = Vec::new();
        let mut x = list.first();
        while x.is_some() {
            out.push(*list.node(x).key());
            x = list.next(x);
        }
        out
    }

    #[test]
    fn test_insert_orders_by_score_then_key() {
        let mut list = list(1);
        list.insert(3, 10, ());
        list.insert(1, 10, ());
        list.insert(2, 5, ());
        list.insert(4, -1, ());
        list.check_invariants();
        assert_eq!(keys(&list), vec![4, 2, 1, 3]);
        assert_eq!(*list.node(list.last()).key(), 3);
    }

    #[test]
    fn test_rank_of_and_find_by_rank() {
        let mut list = list(2);
        for k in 0..200u32 {
            list.insert(k, i64::from(k % 17), ());
        }
        list.check_invariants();
        let ordered = keys(&list);
        for (pos, k) in ordered.iter().enumerate() {
            let score = i64::from(k % 17);
            assert_eq!(list.rank_of(&score, k), pos + 1);

            let (traversed, x, _) = list.find_node_by_rank(pos + 1, false);
            let at = if x.is_none() { list.first() } else { list.next(x) };
            assert_eq!(traversed, pos);
            assert_eq!(list.node(at).key(), k);
        }
        assert_eq!(list.rank_of(&3, &999), 0);
    }

    #[test]
    fn test_remove_last_node_resets_list() {
        let mut list = list(3);
        let x = list.insert(1, 10, ());
        let node = list.remove(x);
        assert_eq!(*node.key(), 1);
        assert_eq!(list.len(), 0);
        assert!(list.first().is_none());
        assert!(list.last().is_none());
        assert_eq!(list.level(), 1);
        list.check_invariants();
    }

    #[test]
    fn test_remove_among_equal_scores() {
        let mut list = list(8);
        let idx: Vec<_> = (0..30u32).map(|k| list.insert(k, 7, ())).collect();
        list.remove(idx[12]);
        list.remove(idx[0]);
        list.remove(idx[29]);
        list.check_invariants();
        let ordered = keys(&list);
        assert_eq!(ordered.len(), 27);
        assert!(!ordered.contains(&12));
        assert_eq!(ordered.first(), Some(&1));
        assert_eq!(ordered.last(), Some(&28));
    }

    #[test]
    fn test_slots_are_reused() {
        let mut list = list(4);
        let idx: Vec<_> = (0..10).map(|k| list.insert(k, i64::from(k), ())).collect();
        for &x in &idx[..5] {
            list.remove(x);
        }
        for k in 10..15 {
            list.insert(k, i64::from(k), ());
        }
        assert_eq!(list.slots.len(), 10);
        list.check_invariants();
    }

    #[test]
    fn test_clear_resets() {
        let mut list = list(5);
        for k in 0..50 {
            list.insert(k, 0, ());
        }
        list.clear();
        assert_eq!(list.len(), 0);
        assert_eq!(list.level(), 1);
        assert!(list.first().is_none());
        list.check_invariants();
    }

    #[test]
    fn test_consecutive_deletes_with_one_update_array() {
        let mut list = list(6);
        for k in 0..100u32 {
            list.insert(k, i64::from(k), ());
        }
        let (_, _, update) = list.find_node_by_rank(10, true);
        for _ in 0..20 {
            let x = list.link(update[0], 0).forward;
            list.delete_node(x, &update);
            list.release(x);
        }
        list.check_invariants();
        assert_eq!(list.len(), 80);
        let ordered = keys(&list);
        assert_eq!(ordered[8], 8);
        assert_eq!(ordered[9], 29);
    }

    proptest! {
        #[test]
        fn test_spans_hold_under_random_ops(
            seed in any::<u64>(),
            ops in proptest::collection::vec((any::<bool>(), 0u32..64, -8i64..8), 1..200)
        ) {
            let mut list = list(seed);
            let mut present = std::collections::BTreeMap::new();
            for (insert, key, score) in ops {
                if insert && !present.contains_key(&key) {
                    present.insert(key, list.insert(key, score, ()));
                } else if let Some(x) = present.remove(&key) {
                    prop_assert_eq!(*list.remove(x).key(), key);
                }
            }
            list.check_invariants();
            prop_assert_eq!(list.len(), present.len());
        }
    }
}
