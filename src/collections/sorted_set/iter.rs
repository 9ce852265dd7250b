//! Borrowing iterators over a `SortedSet` in `(score, key)` order.

use super::engine::SkipList;
use super::node::{Node, NodeIdx};
use core::iter::FusedIterator;

/// Iterator over the nodes of a [`SortedSet`](super::SortedSet), lowest rank first.
///
/// Walks level-0 forward links from the front and `backward` links from the back.
pub struct Iter<'a, K, S, V> {
    list: &'a SkipList<K, S, V>,
    front: NodeIdx,
    back: NodeIdx,
    remaining: usize,
}

impl<'a, K, S, V> Iter<'a, K, S, V> {
    pub(crate) fn new(list: &'a SkipList<K, S, V>) -> Self {
        Self {
            list,
            front: list.first(),
            back: list.last(),
            remaining: list.len(),
        }
    }
}

impl<'a, K, S, V> Clone for Iter<'a, K, S, V> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, S, V> Iterator for Iter<'a, K, S, V> {
    type Item = &'a Node<K, S, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.front);
        self.front = self.list.next(self.front);
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, S, V> DoubleEndedIterator for Iter<'a, K, S, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.back);
        self.back = self.list.prev(self.back);
        self.remaining -= 1;
        Some(node)
    }
}

impl<'a, K, S, V> ExactSizeIterator for Iter<'a, K, S, V> {}

impl<'a, K, S, V> FusedIterator for Iter<'a, K, S, V> {}

/// Iterator over the keys of a [`SortedSet`](super::SortedSet), lowest rank first.
pub struct Keys<'a, K, S, V> {
    inner: Iter<'a, K, S, V>,
}

impl<'a, K, S, V> Keys<'a, K, S, V> {
    pub(crate) fn new(inner: Iter<'a, K, S, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, S, V> Iterator for Keys<'a, K, S, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Node::key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, S, V> DoubleEndedIterator for Keys<'a, K, S, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Node::key)
    }
}

impl<'a, K, S, V> ExactSizeIterator for Keys<'a, K, S, V> {}

impl<'a, K, S, V> FusedIterator for Keys<'a, K, S, V> {}
