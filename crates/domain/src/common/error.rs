use thiserror::Error;

use crate::exclusion::error::ExclusionError;
use crate::pipeline::error::SettingsError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    #[error("exclusion table: {0}")]
    Exclusion(#[from] ExclusionError),
}
