//! Per-shard filtering pipeline: classify, account, mutate.

pub mod engine;
pub mod entity;
pub mod error;

pub use engine::ShardPipeline;
pub use entity::{FilterSettings, VerdictCounters};
pub use error::SettingsError;
