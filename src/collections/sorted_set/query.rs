//! Score-range and rank-range traversal.
//!
//! Ranks are 1-based. Negative ranks count from the end (`-1` is the last
//! entry) and a range given high-to-low is served in descending order.

use super::engine::SkipList;
use super::node::{Node, NodeIdx};

/// Options for [`SortedSet::get_by_score_range`](super::SortedSet::get_by_score_range).
///
/// The default is the closed interval `[start, end]` with no limit.
///
/// ```rust
/// use rankset::ScoreRange;
///
/// let opts = ScoreRange::new().limit(10).exclude_start();
/// assert_eq!(opts.limit, Some(10));
/// assert!(opts.exclude_start && !opts.exclude_end);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreRange {
    /// Maximum number of nodes to return; `None` is unbounded.
    pub limit: Option<usize>,
    /// Leave out nodes whose score equals `start`.
    pub exclude_start: bool,
    /// Leave out nodes whose score equals `end`.
    pub exclude_end: bool,
}

impl ScoreRange {
    /// Closed interval, unbounded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of returned nodes.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Opens the interval at `start`.
    #[must_use]
    pub fn exclude_start(mut self) -> Self {
        self.exclude_start = true;
        self
    }

    /// Opens the interval at `end`.
    #[must_use]
    pub fn exclude_end(mut self) -> Self {
        self.exclude_end = true;
        self
    }
}

/// Resolves negative ranks against `len` and orders the pair.
///
/// Returns `(start, end, reverse)` with `1 <= start <= end`; `reverse` is set
/// when the caller asked for a descending range.
pub(crate) fn sanitize_indexes(start: isize, end: isize, len: usize) -> (usize, usize, bool) {
    let resolve = |rank: isize| -> usize {
        let rank = if rank < 0 {
            (len as isize).saturating_add(rank).saturating_add(1)
        } else {
            rank
        };
        if rank <= 0 {
            1
        } else {
            rank as usize
        }
    };
    let (start, end) = (resolve(start), resolve(end));
    if start > end {
        (end, start, true)
    } else {
        (start, end, false)
    }
}

impl<K, S, V> SkipList<K, S, V>
where
    S: PartialOrd,
{
    /// Nodes with scores between `start` and `end`.
    ///
    /// `start > end` walks the interval `[end, start]` backwards, with the
    /// exclusion flags following the literal endpoints.
    pub(crate) fn score_range(&self, start: &S, end: &S, opts: ScoreRange) -> Vec<NodeIdx> {
        let mut limit = opts.limit.unwrap_or(usize::MAX);
        let (mut lo, mut hi) = (start, end);
        let (mut exclude_lo, mut exclude_hi) = (opts.exclude_start, opts.exclude_end);
        let reverse = start > end;
        if reverse {
            core::mem::swap(&mut lo, &mut hi);
            core::mem::swap(&mut exclude_lo, &mut exclude_hi);
        }

        let mut nodes = Vec::new();
        if self.len() == 0 {
            return nodes;
        }

        if reverse {
            // Last node inside the upper bound.
            let mut x = NodeIdx::NONE;
            for i in (0..self.level()).rev() {
                loop {
                    let forward = self.link(x, i).forward;
                    if forward.is_none() {
                        break;
                    }
                    let score = self.node(forward).score();
                    let inside = if exclude_hi { score < hi } else { score <= hi };
                    if !inside {
                        break;
                    }
                    x = forward;
                }
            }

            while x.is_some() && limit > 0 {
                let score = self.node(x).score();
                let below = if exclude_lo { score <= lo } else { score < lo };
                if below {
                    break;
                }
                nodes.push(x);
                limit -= 1;
                x = self.prev(x);
            }
        } else {
            // Last node below the lower bound.
            let mut x = NodeIdx::NONE;
            for i in (0..self.level()).rev() {
                loop {
                    let forward = self.link(x, i).forward;
                    if forward.is_none() {
                        break;
                    }
                    let score = self.node(forward).score();
                    let before = if exclude_lo { score <= lo } else { score < lo };
                    if !before {
                        break;
                    }
                    x = forward;
                }
            }

            let mut x = self.link(x, 0).forward;
            while x.is_some() && limit > 0 {
                let score = self.node(x).score();
                let above = if exclude_hi { score >= hi } else { score > hi };
                if above {
                    break;
                }
                nodes.push(x);
                limit -= 1;
                x = self.next(x);
            }
        }
        nodes
    }
}

impl<K, S, V> SkipList<K, S, V> {
    /// Nodes ranked `start..=end`, in the requested direction.
    pub(crate) fn rank_range(&self, start: isize, end: isize) -> Vec<NodeIdx> {
        let (start, end, reverse) = sanitize_indexes(start, end, self.len());
        let (mut traversed, x, _) = self.find_node_by_rank(start, false);

        let mut nodes = Vec::new();
        traversed += 1;
        let mut x = self.link(x, 0).forward;
        while x.is_some() && traversed <= end {
            nodes.push(x);
            traversed += 1;
            x = self.next(x);
        }

        if reverse {
            nodes.reverse();
        }
        nodes
    }

    /// Unlinks and returns the nodes ranked `start..=end`.
    ///
    /// One search captures the predecessors at `start`; every removal
    /// reuses them since the next node slides into the same rank.
    pub(crate) fn remove_rank_range(&mut self, start: isize, end: isize) -> Vec<Node<K, S, V>> {
        let (start, end, reverse) = sanitize_indexes(start, end, self.len());
        let (mut traversed, x, update) = self.find_node_by_rank(start, true);

        let mut removed = Vec::new();
        traversed += 1;
        let mut x = self.link(x, 0).forward;
        while x.is_some() && traversed <= end {
            let next = self.next(x);
            self.delete_node(x, &update);
            removed.push(self.release(x));
            traversed += 1;
            x = next;
        }

        if reverse {
            removed.reverse();
        }
        removed
    }

    /// Calls `f` on each node ranked `start..=end` until it returns `false`.
    ///
    /// Ascending ranges stream. Descending ranges are collected by a forward
    /// walk first and then replayed backwards, so `f` only starts after the
    /// whole range has been visited.
    pub(crate) fn for_each_in_rank_range<F>(&self, start: isize, end: isize, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let (start, end, reverse) = sanitize_indexes(start, end, self.len());
        let (mut traversed, x, _) = self.find_node_by_rank(start, false);

        let mut buffered = Vec::new();
        let mut x = self.link(x, 0).forward;
        while x.is_some() && traversed < end {
            let node = self.node(x);
            if reverse {
                buffered.push(x);
            } else if !f(node.key(), node.value()) {
                return;
            }
            traversed += 1;
            x = node.levels[0].forward;
        }

        for &x in buffered.iter().rev() {
            let node = self.node(x);
            if !f(node.key(), node.value()) {
                return;
            }
        }
    }
}
