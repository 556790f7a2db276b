//! The hash-set used for topological bookkeeping.

/// Hashset using [`hashbrown::HashSet`] and its default (fast, non-cryptographic) hasher.
pub type HashSet<K> = hashbrown::HashSet<K>;
