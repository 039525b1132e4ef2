#![forbid(unsafe_code)]

pub mod common;
pub mod exclusion;
pub mod packet;
pub mod pipeline;
pub mod ratelimit;
