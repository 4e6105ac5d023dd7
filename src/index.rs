use std::hash::Hash;

use crate::common::{HashMap, NodeId};

/// Hands out a stable integer for every distinct key it is asked about.
///
/// The first call with a key returns a fresh index, every later call with
/// the same key returns the same index. Indices grow monotonically from 0;
/// the caller offsets them past the terminal identities. Keys are never
/// forgotten, so a node that expires from the unique table and is rebuilt
/// later gets its old identity back.
#[derive(Debug)]
pub struct IndexAllocator<K> {
    table: HashMap<K, NodeId>,
}

impl<K> IndexAllocator<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            table: HashMap::default(),
        }
    }

    pub fn allocate(&mut self, key: K) -> NodeId {
        if let Some(&ix) = self.table.get(&key) {
            return ix;
        }
        let ix = self.table.len();
        self.table.insert(key, ix);
        ix
    }

    /// Number of distinct keys ever seen.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<K> Default for IndexAllocator<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
