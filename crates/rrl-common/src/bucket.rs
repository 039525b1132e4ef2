//! Per-source rate accounting state.

/// Fixed time frame over which packets accumulate before the counter
/// resets: 1 second in nanoseconds. This is a frame, not a sliding window;
/// the trade is short-term burst inaccuracy for O(1) space per source.
pub const FRAME_SIZE_NS: u64 = 1_000_000_000;

/// Rate state for one source address within one shard.
///
/// `start_time_ns == 0` means "never initialized"; the first accounting
/// pass starts a fresh frame. Only the owning shard ever reads or writes a
/// bucket, so the fields are plain integers.
/// Size: 16 bytes.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Monotonic timestamp (ns) when the current frame started.
    pub start_time_ns: u64,
    /// Packets counted within the current frame.
    pub n_packets: u64,
}

impl Bucket {
    /// A bucket whose frame starts at `now_ns` with nothing counted yet.
    pub const fn started_at(now_ns: u64) -> Self {
        Self {
            start_time_ns: now_ns,
            n_packets: 0,
        }
    }
}

/// Width of the IPv4 bucket key: the full source address.
pub const BUCKET_KEY_V4_LEN: usize = 4;

/// Width of the IPv6 bucket key: the first 8 bytes of the source address.
/// Intentional truncation, trading accuracy for space: sources sharing the
/// top 64 bits of their address share a bucket.
pub const BUCKET_KEY_V6_LEN: usize = 8;
