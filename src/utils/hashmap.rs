//! The hash-map used to index tracked meshes.

/// Hashmap using [`hashbrown::HashMap`] and its default (fast, non-cryptographic) hasher.
pub type HashMap<K, V> = hashbrown::HashMap<K, V>;
