use std::sync::atomic::{AtomicU64, Ordering};

/// A single excluded prefix together with its match counter.
///
/// `N` is the key width in bytes: 4 for IPv4, 8 for the truncated IPv6 key.
/// The hit counter is shared across shards, so it is atomic; counts are
/// advisory and use relaxed ordering.
#[derive(Debug)]
pub struct ExclusionEntry<const N: usize> {
    prefix: [u8; N],
    prefix_len: u8,
    hits: AtomicU64,
}

impl<const N: usize> ExclusionEntry<N> {
    pub(crate) fn new(prefix: [u8; N], prefix_len: u8) -> Self {
        Self {
            prefix,
            prefix_len,
            hits: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> [u8; N] {
        self.prefix
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hit_count(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}
