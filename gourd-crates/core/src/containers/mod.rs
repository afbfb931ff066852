//! Contains containers which are used by the solver.
mod keyed_vec;

pub use keyed_vec::*;

pub type HashMap<K, V, Hasher = fnv::FnvBuildHasher> = std::collections::HashMap<K, V, Hasher>;
pub type HashSet<K, Hasher = fnv::FnvBuildHasher> = std::collections::HashSet<K, Hasher>;
