//! On-wire constants and explicit byte layouts.
//!
//! All multi-byte header fields are network byte order (big endian); parsers
//! convert to host order at the accessor boundary. DNS header flags are
//! handled as a plain host-order `u16` with explicit bit masks rather than a
//! bitfield, so the layout does not depend on any compiler's packing rules.

// ── Ethertypes ──────────────────────────────────────────────────────

/// IPv4.
pub const ETH_P_IP: u16 = 0x0800;
/// IPv6.
pub const ETH_P_IPV6: u16 = 0x86DD;
/// 802.1Q VLAN tag.
pub const ETH_P_8021Q: u16 = 0x8100;
/// 802.1ad (QinQ) service VLAN tag.
pub const ETH_P_8021AD: u16 = 0x88A8;

// ── IP protocol numbers ─────────────────────────────────────────────

pub const IPPROTO_UDP: u8 = 17;

// ── Ports ───────────────────────────────────────────────────────────

pub const DNS_PORT: u16 = 53;

// ── Header lengths (fixed; no options / extension headers) ─────────

/// Ethernet: dst MAC (6) + src MAC (6) + ethertype (2).
pub const ETHERNET_HDR_LEN: usize = 14;
/// VLAN tag: TCI (2) + encapsulated protocol (2).
pub const VLAN_HDR_LEN: usize = 4;
/// IPv4 fixed header, IHL == 5. Options are not walked.
pub const IPV4_HDR_LEN: usize = 20;
/// IPv6 fixed header. Extension headers are not walked.
pub const IPV6_HDR_LEN: usize = 40;
/// UDP: source (2) + dest (2) + length (2) + checksum (2).
pub const UDP_HDR_LEN: usize = 8;
/// DNS fixed header: id + flags + qd/an/ns/ar counts.
pub const DNS_HDR_LEN: usize = 12;

/// Maximum number of stacked VLAN tags the frame parser unwraps. A third
/// tag is left in place and the subsequent IP parse fails (packet passes).
pub const VLAN_MAX_DEPTH: usize = 2;

// ── DNS header flag bits (host-order view of the 16-bit flags word) ─

/// QR: this message is a response.
pub const DNS_FLAG_QR: u16 = 0x8000;
/// AA: authoritative answer.
pub const DNS_FLAG_AA: u16 = 0x0400;
/// TC: truncated, retry over TCP.
pub const DNS_FLAG_TC: u16 = 0x0200;
/// RD: recursion desired.
pub const DNS_FLAG_RD: u16 = 0x0100;
/// RA: recursion available.
pub const DNS_FLAG_RA: u16 = 0x0080;
/// AD: authenticated data (DNSSEC).
pub const DNS_FLAG_AD: u16 = 0x0020;
/// CD: checking disabled (DNSSEC).
pub const DNS_FLAG_CD: u16 = 0x0010;
