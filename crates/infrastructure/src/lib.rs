#![forbid(unsafe_code)]

pub mod config;
pub mod logging;
pub mod prefix_file;
