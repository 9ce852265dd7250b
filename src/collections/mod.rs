//! Collections.
//!
//! - `sorted_set`: score-ordered sets with key and rank access

pub mod sorted_set;

pub use sorted_set::{Iter, Keys, Node, ScoreRange, SortedSet};
