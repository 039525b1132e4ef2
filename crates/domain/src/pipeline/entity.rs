use serde::{Deserialize, Serialize};

use crate::common::entity::Verdict;

use super::error::SettingsError;

fn default_rate_limit() -> u64 {
    20
}

fn default_shard_count() -> u32 {
    2
}

fn default_bucket_capacity() -> usize {
    1_000_000
}

/// Runtime parameters of the filter.
///
/// `rate_limit` is the global responses-per-second budget per source; each
/// shard enforces `rate_limit / shard_count` locally, truncating like the
/// per-CPU split it models. A rate limit below the shard count therefore
/// yields a per-shard threshold of zero and bounces every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSettings {
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u64,
    #[serde(default = "default_shard_count")]
    pub shard_count: u32,
    #[serde(default = "default_bucket_capacity")]
    pub bucket_capacity: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            rate_limit: default_rate_limit(),
            shard_count: default_shard_count(),
            bucket_capacity: default_bucket_capacity(),
        }
    }
}

impl FilterSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rate_limit == 0 {
            return Err(SettingsError::ZeroRateLimit);
        }
        if self.shard_count == 0 {
            return Err(SettingsError::ZeroShardCount);
        }
        if self.bucket_capacity == 0 {
            return Err(SettingsError::ZeroBucketCapacity);
        }
        Ok(())
    }

    pub fn per_shard_threshold(&self) -> u64 {
        self.rate_limit / u64::from(self.shard_count)
    }
}

/// Running verdict tally for one shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictCounters {
    pub passed: u64,
    pub transmitted: u64,
    pub aborted: u64,
}

impl VerdictCounters {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Transmit => self.transmitted += 1,
            Verdict::Abort => self.aborted += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.passed + self.transmitted + self.aborted
    }
}
