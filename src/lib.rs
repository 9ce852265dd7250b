//! # `rankset` - Score-Ordered Sets
//!
//! An ordered associative container: unique keys, each carrying a score and a
//! value, kept in global `(score, key)` order. Equal scores fall back to the
//! key, so every entry has one deterministic position.
//!
//! ## Key Features
//!
//! - **Point access**: existence checks and lookups by key in O(1)
//! - **Ordered mutation**: insert, remove and re-score in O(log n)
//! - **Rank queries**: the n-th entry, or the rank of a key, in O(log n)
//! - **Range queries**: by score (open or closed bounds, limits) or by rank
//! - **Descending reads**: pass bounds high-to-low to read in reverse
//!
//! ## Architecture
//!
//! A `SortedSet` pairs two indexes that always hold the same keys:
//!
//! 1. **Skip list**: nodes live in an index-addressed arena. Each node gets a
//!    geometric level (p = 1/4, at most [`MAX_LEVEL`]) once, at insertion.
//!    Every forward link records its span, the number of entries it skips,
//!    so descending searches accumulate exact ranks.
//! 2. **Direct index**: a `HashMap` from key to arena slot.
//!
//! Every public operation updates both or neither.
//!
//! ## Example
//!
//! ```rust
//! use rankset::{ScoreRange, SortedSet};
//!
//! let mut set = SortedSet::new();
//! set.add_or_update("a", 89, "Kelly");
//! set.add_or_update("c", 100, "Jordon");
//! set.add_or_update("d", -321, "Park");
//! set.add_or_update("f", 99, "Lyman");
//! set.add_or_update("g", 99, "Singleton");
//!
//! // Rank 1 is the lowest score; -1 is the highest.
//! assert_eq!(*set.get_by_rank(1).unwrap().key(), "d");
//! assert_eq!(*set.get_by_rank(-1).unwrap().key(), "c");
//! assert_eq!(set.find_rank("g"), 4);
//!
//! // Bounds given high-to-low come back in descending order.
//! let keys: Vec<_> = set
//!     .get_by_score_range(&100, &99, ScoreRange::new().exclude_start())
//!     .into_iter()
//!     .map(|n| *n.key())
//!     .collect();
//! assert_eq!(keys, ["g", "f"]);
//! ```
//!
//! ## Logging
//!
//! With the `tracing` feature, structural changes (node linked or unlinked,
//! level raised or trimmed) are reported as `trace`/`debug` events.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod macros;

pub(crate) use macros::{debug, trace};

pub mod collections;

pub use collections::sorted_set::MAX_LEVEL;
pub use collections::{Iter, Keys, Node, ScoreRange, SortedSet};

// Compile-time assertions for memory layout
const _: () = {
    use core::mem;
    use crate::collections::sorted_set::{Level, NodeIdx};

    // Arena indices stay 32-bit.
    assert!(mem::size_of::<NodeIdx>() == mem::size_of::<u32>());

    // A link is an index plus a span, nothing more.
    assert!(mem::size_of::<Level>() <= mem::size_of::<usize>() * 2);

    // Options are passed by value on every range query.
    assert!(mem::size_of::<ScoreRange>() <= mem::size_of::<usize>() * 3);
};
