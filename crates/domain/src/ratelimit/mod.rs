//! Fixed-frame rate accounting over per-shard bucket tables.

pub mod engine;
pub mod entity;

pub use engine::{account, RateAccountant, RateDecision};
pub use entity::{BucketSlot, BucketTable, ShardState};
