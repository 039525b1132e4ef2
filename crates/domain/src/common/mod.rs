pub mod clock;
pub mod entity;
pub mod error;
