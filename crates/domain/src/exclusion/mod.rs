//! Longest-prefix-match exclusion tables for source addresses that bypass
//! rate accounting.

pub mod entity;
pub mod error;
pub mod table;

pub use entity::ExclusionEntry;
pub use error::ExclusionError;
pub use table::{ExclusionTables, PrefixTrie};
