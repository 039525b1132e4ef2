#![cfg_attr(not(feature = "std"), no_std)]

pub mod bucket;
pub mod exclusion;
pub mod wire;
