//! Exclusion (allowlist) lookup key layouts.
//!
//! Two independent tables, one per address family, with family-fixed lookup
//! key construction: the pipeline always looks up a host-exact IPv4 key
//! (/32) and a 64-bit-truncated IPv6 key (/64). Entries provisioned into
//! the tables may carry any shorter prefix; longest-prefix match decides.

/// Width of the IPv4 exclusion key in bytes.
pub const EXCLUDE_KEY_V4_LEN: usize = 4;
/// Width of the IPv6 exclusion key in bytes (the address's first 8 bytes).
pub const EXCLUDE_KEY_V6_LEN: usize = 8;

/// Prefix length the pipeline uses when constructing an IPv4 lookup key.
pub const LOOKUP_PREFIX_LEN_V4: u8 = 32;
/// Prefix length the pipeline uses when constructing an IPv6 lookup key.
pub const LOOKUP_PREFIX_LEN_V6: u8 = 64;

/// IPv4 exclusion lookup key. Size: 8 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcludeV4Key {
    pub prefix_len: u32,
    pub addr: [u8; EXCLUDE_KEY_V4_LEN],
}

impl ExcludeV4Key {
    /// Host-exact key for a source address.
    pub const fn host(addr: [u8; EXCLUDE_KEY_V4_LEN]) -> Self {
        Self {
            prefix_len: LOOKUP_PREFIX_LEN_V4 as u32,
            addr,
        }
    }
}

/// IPv6 exclusion lookup key, truncated to the address's top 64 bits.
/// Size: 12 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcludeV6Key {
    pub prefix_len: u32,
    pub addr: [u8; EXCLUDE_KEY_V6_LEN],
}

impl ExcludeV6Key {
    /// /64 key from a full IPv6 source address.
    pub const fn from_addr(addr: &[u8; 16]) -> Self {
        Self {
            prefix_len: LOOKUP_PREFIX_LEN_V6 as u32,
            addr: [
                addr[0], addr[1], addr[2], addr[3], addr[4], addr[5], addr[6], addr[7],
            ],
        }
    }
}
