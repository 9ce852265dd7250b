//! Serde support: a set is a sequence of `(key, score, value)` in rank order.

use super::SortedSet;
use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;
use serde::de::{Deserialize, Deserializer, Error, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Upper bound on the capacity reserved from a length the input reports.
const MAX_PREALLOC: usize = 4096;

impl<K, S, V> Serialize for SortedSet<K, S, V>
where
    K: Serialize,
    S: Serialize,
    V: Serialize,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for node in self.iter() {
            seq.serialize_element(&(node.key(), node.score(), node.value()))?;
        }
        seq.end()
    }
}

struct SortedSetVisitor<K, S, V>(PhantomData<fn() -> SortedSet<K, S, V>>);

impl<'de, K, S, V> Visitor<'de> for SortedSetVisitor<K, S, V>
where
    K: Deserialize<'de> + Hash + Eq + Ord + Clone,
    S: Deserialize<'de> + PartialOrd,
    V: Deserialize<'de>,
{
    type Value = SortedSet<K, S, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of (key, score, value) entries")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut set = SortedSet::with_capacity(seq.size_hint().map_or(0, |n| n.min(MAX_PREALLOC)));
        while let Some((key, score, value)) = seq.next_element::<(K, S, V)>()? {
            if set.contains_key(&key) {
                return Err(A::Error::custom(format_args!(
                    "duplicate key at entry {}",
                    set.len()
                )));
            }
            set.add_or_update(key, score, value);
        }
        Ok(set)
    }
}

impl<'de, K, S, V> Deserialize<'de> for SortedSet<K, S, V>
where
    K: Deserialize<'de> + Hash + Eq + Ord + Clone,
    S: Deserialize<'de> + PartialOrd,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SortedSetVisitor(PhantomData))
    }
}
