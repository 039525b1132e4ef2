use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("rate limit must be at least 1")]
    ZeroRateLimit,

    #[error("shard count must be at least 1")]
    ZeroShardCount,

    #[error("bucket capacity must be at least 1")]
    ZeroBucketCapacity,
}
