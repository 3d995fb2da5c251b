//! Collection aliases used across the crate.
//!
//! Hash-based collections use the Fx hasher; keys are short, trusted strings.

pub use std::collections::BTreeMap;

pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type HashSet<T> = rustc_hash::FxHashSet<T>;
