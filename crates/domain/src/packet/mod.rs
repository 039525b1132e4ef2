//! Bounds-checked frame parsing and in-place header rewriting.
//!
//! Every parser is built on [`cursor::Cursor`]; each parsed header records
//! the byte offset it was read from, so the mutation path can write back
//! into the same frame without re-deriving positions. Parsing performs
//! bounds checks only; field values are never validated here.

pub mod checksum;
pub mod cursor;
pub mod headers;
pub mod link;
