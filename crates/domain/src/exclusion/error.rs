use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExclusionError {
    #[error("prefix length {got} exceeds maximum {max}")]
    InvalidPrefixLength { got: u8, max: u8 },

    #[error("prefix already present")]
    DuplicatePrefix,

    #[error("prefix not found")]
    PrefixNotFound,

    #[error("exclusion table full (capacity {capacity})")]
    TableFull { capacity: usize },
}
