use rrl_common::bucket::{Bucket, BUCKET_KEY_V6_LEN, FRAME_SIZE_NS};

use super::entity::{BucketSlot, ShardState};

/// Outcome of rate accounting for one response packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Under the per-shard threshold, let the response through.
    Pass,
    /// Over the threshold, rewrite into a truncated reply and bounce it.
    Bounce,
}

/// Core accounting step, applied to the bucket for one source address.
///
/// The ordering is load-bearing: the packet is counted first, then a stale
/// or uninitialized frame is restarted with its counter cleared, and only
/// then is the threshold compared. A packet that restarts a frame is
/// therefore never charged against the new frame.
pub fn account(bucket: &mut Bucket, now_ns: u64, threshold: u64) -> RateDecision {
    bucket.n_packets += 1;

    let elapsed = now_ns.wrapping_sub(bucket.start_time_ns);
    if bucket.start_time_ns == 0 || elapsed >= FRAME_SIZE_NS {
        *bucket = Bucket::started_at(now_ns);
    }

    if bucket.n_packets < threshold {
        RateDecision::Pass
    } else {
        RateDecision::Bounce
    }
}

/// Per-shard rate accountant: owns the shard's bucket tables and applies
/// [`account`] with the shard-local threshold.
pub struct RateAccountant {
    shard: ShardState,
    threshold: u64,
}

impl RateAccountant {
    pub fn new(threshold: u64, bucket_capacity_per_family: usize) -> Self {
        Self {
            shard: ShardState::new(bucket_capacity_per_family),
            threshold,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn check_v4(&mut self, addr: [u8; 4], now_ns: u64) -> RateDecision {
        match self.shard.v4.slot(addr, now_ns) {
            BucketSlot::Existing(bucket) => account(bucket, now_ns, self.threshold),
            // First sight creates the bucket and passes without accounting;
            // an exhausted table fails open rather than bounce traffic we
            // cannot account.
            BucketSlot::Created | BucketSlot::TableFull => RateDecision::Pass,
        }
    }

    /// IPv6 accounting keys on the first eight address bytes, so all hosts
    /// in a /64 share one bucket.
    pub fn check_v6(&mut self, addr: [u8; 16], now_ns: u64) -> RateDecision {
        let mut key = [0u8; BUCKET_KEY_V6_LEN];
        key.copy_from_slice(&addr[..BUCKET_KEY_V6_LEN]);
        match self.shard.v6.slot(key, now_ns) {
            BucketSlot::Existing(bucket) => account(bucket, now_ns, self.threshold),
            BucketSlot::Created | BucketSlot::TableFull => RateDecision::Pass,
        }
    }

    #[cfg(test)]
    pub(crate) fn shard(&self) -> &ShardState {
        &self.shard
    }
}
