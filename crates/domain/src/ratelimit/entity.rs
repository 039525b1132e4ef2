use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use rrl_common::bucket::{Bucket, BUCKET_KEY_V4_LEN, BUCKET_KEY_V6_LEN};

/// Result of resolving a key to its bucket slot.
///
/// A brand-new source is `Created` with a fresh frame already started; the
/// caller passes it without accounting. `TableFull` means the key is absent
/// and no bucket could be created.
pub enum BucketSlot<'a> {
    Existing(&'a mut Bucket),
    Created,
    TableFull,
}

/// Bounded map from address key to measurement bucket.
///
/// Each shard owns its own tables, so no locking happens here; the bound
/// caps memory when a scan sprays source addresses.
pub struct BucketTable<K> {
    map: HashMap<K, Bucket>,
    capacity: usize,
}

impl<K: Eq + Hash> BucketTable<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Resolve `key` to its bucket, creating `{start_time: now, n_packets:
    /// 0}` on first sight.
    pub fn slot(&mut self, key: K, now_ns: u64) -> BucketSlot<'_> {
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            return BucketSlot::TableFull;
        }
        match self.map.entry(key) {
            Entry::Occupied(entry) => BucketSlot::Existing(entry.into_mut()),
            Entry::Vacant(entry) => {
                entry.insert(Bucket::started_at(now_ns));
                BucketSlot::Created
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&Bucket> {
        self.map.get(key)
    }
}

/// The bucket tables owned by one shard. IPv6 buckets are keyed on the
/// first eight address bytes only.
pub struct ShardState {
    pub v4: BucketTable<[u8; BUCKET_KEY_V4_LEN]>,
    pub v6: BucketTable<[u8; BUCKET_KEY_V6_LEN]>,
}

impl ShardState {
    pub fn new(capacity_per_family: usize) -> Self {
        Self {
            v4: BucketTable::new(capacity_per_family),
            v6: BucketTable::new(capacity_per_family),
        }
    }
}
