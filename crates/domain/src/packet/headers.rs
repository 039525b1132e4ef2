//! Fixed-layout header accessors.
//!
//! Each `parse` reads the header's fixed length through the cursor and
//! records the offset it started at; the `swap_*` / `write_*` methods
//! rewrite fields of an already-parsed header in place. Offsets were
//! bounds-checked during parsing, so write-backs index the frame directly.
//!
//! Field offsets below are byte offsets from the start of each header;
//! multi-byte fields are network byte order.

use super::cursor::{Cursor, Truncated};
use rrl_common::wire::{
    DNS_HDR_LEN, ETHERNET_HDR_LEN, IPV4_HDR_LEN, IPV6_HDR_LEN, UDP_HDR_LEN, VLAN_HDR_LEN,
};

fn be16(hi: u8, lo: u8) -> u16 {
    u16::from_be_bytes([hi, lo])
}

// ── Ethernet ────────────────────────────────────────────────────────
//
// 0..6 destination MAC, 6..12 source MAC, 12..14 ethertype.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHdr {
    pub offset: usize,
    pub dst: [u8; 6],
    pub src: [u8; 6],
    pub ether_type: u16,
}

impl EthernetHdr {
    pub const LEN: usize = ETHERNET_HDR_LEN;
    const OFF_DST: usize = 0;
    const OFF_SRC: usize = 6;

    pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self, Truncated> {
        let offset = cursor.position();
        let b: [u8; Self::LEN] = cursor.read()?;
        Ok(Self {
            offset,
            dst: [b[0], b[1], b[2], b[3], b[4], b[5]],
            src: [b[6], b[7], b[8], b[9], b[10], b[11]],
            ether_type: be16(b[12], b[13]),
        })
    }

    /// Swap source and destination MAC addresses in place.
    pub fn swap_addresses(&self, frame: &mut [u8]) {
        let dst = self.offset + Self::OFF_DST;
        let src = self.offset + Self::OFF_SRC;
        frame[dst..dst + 6].copy_from_slice(&self.src);
        frame[src..src + 6].copy_from_slice(&self.dst);
    }
}

// ── 802.1Q / 802.1ad VLAN tag ───────────────────────────────────────
//
// 0..2 TCI, 2..4 encapsulated protocol.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanHdr {
    pub tci: u16,
    pub encap_proto: u16,
}

impl VlanHdr {
    pub const LEN: usize = VLAN_HDR_LEN;

    pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self, Truncated> {
        let b: [u8; Self::LEN] = cursor.read()?;
        Ok(Self {
            tci: be16(b[0], b[1]),
            encap_proto: be16(b[2], b[3]),
        })
    }
}

// ── IPv4 (fixed 20 bytes, options not walked) ──────────────────────
//
// 9 protocol, 12..16 source address, 16..20 destination address.
// Swapping the two addresses leaves both the IP header checksum and the
// UDP pseudo-header sum unchanged (same 16-bit words, different order),
// so neither needs repair on bounce.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Hdr {
    pub offset: usize,
    pub protocol: u8,
    pub src: [u8; 4],
    pub dst: [u8; 4],
}

impl Ipv4Hdr {
    pub const LEN: usize = IPV4_HDR_LEN;
    const OFF_SRC: usize = 12;
    const OFF_DST: usize = 16;

    pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self, Truncated> {
        let offset = cursor.position();
        let b: [u8; Self::LEN] = cursor.read()?;
        Ok(Self {
            offset,
            protocol: b[9],
            src: [b[12], b[13], b[14], b[15]],
            dst: [b[16], b[17], b[18], b[19]],
        })
    }

    pub fn swap_addresses(&self, frame: &mut [u8]) {
        let src = self.offset + Self::OFF_SRC;
        let dst = self.offset + Self::OFF_DST;
        frame[src..src + 4].copy_from_slice(&self.dst);
        frame[dst..dst + 4].copy_from_slice(&self.src);
    }
}

// ── IPv6 (fixed 40 bytes, extension headers not walked) ────────────
//
// 6 next header, 8..24 source address, 24..40 destination address.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Hdr {
    pub offset: usize,
    pub next_header: u8,
    pub src: [u8; 16],
    pub dst: [u8; 16],
}

impl Ipv6Hdr {
    pub const LEN: usize = IPV6_HDR_LEN;
    const OFF_SRC: usize = 8;
    const OFF_DST: usize = 24;

    pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self, Truncated> {
        let offset = cursor.position();
        let b: [u8; Self::LEN] = cursor.read()?;
        let mut src = [0u8; 16];
        let mut dst = [0u8; 16];
        src.copy_from_slice(&b[Self::OFF_SRC..Self::OFF_SRC + 16]);
        dst.copy_from_slice(&b[Self::OFF_DST..Self::OFF_DST + 16]);
        Ok(Self {
            offset,
            next_header: b[6],
            src,
            dst,
        })
    }

    pub fn swap_addresses(&self, frame: &mut [u8]) {
        let src = self.offset + Self::OFF_SRC;
        let dst = self.offset + Self::OFF_DST;
        frame[src..src + 16].copy_from_slice(&self.dst);
        frame[dst..dst + 16].copy_from_slice(&self.src);
    }
}

// ── UDP ─────────────────────────────────────────────────────────────
//
// 0..2 source port, 2..4 destination port, 4..6 length, 6..8 checksum.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHdr {
    pub offset: usize,
    pub source: u16,
    pub dest: u16,
    pub length: u16,
    pub checksum: u16,
}

impl UdpHdr {
    pub const LEN: usize = UDP_HDR_LEN;
    const OFF_SOURCE: usize = 0;
    const OFF_DEST: usize = 2;
    const OFF_CHECKSUM: usize = 6;

    pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self, Truncated> {
        let offset = cursor.position();
        let b: [u8; Self::LEN] = cursor.read()?;
        Ok(Self {
            offset,
            source: be16(b[0], b[1]),
            dest: be16(b[2], b[3]),
            length: be16(b[4], b[5]),
            checksum: be16(b[6], b[7]),
        })
    }

    /// Rewrite the port pair for a bounce: new source port is `new_source`
    /// (always 53 in practice), new destination is the original source.
    pub fn write_reply_ports(&self, frame: &mut [u8], new_source: u16) {
        let src = self.offset + Self::OFF_SOURCE;
        let dst = self.offset + Self::OFF_DEST;
        frame[src..src + 2].copy_from_slice(&new_source.to_be_bytes());
        frame[dst..dst + 2].copy_from_slice(&self.source.to_be_bytes());
    }

    pub fn write_checksum(&self, frame: &mut [u8], checksum: u16) {
        let off = self.offset + Self::OFF_CHECKSUM;
        frame[off..off + 2].copy_from_slice(&checksum.to_be_bytes());
    }
}

// ── DNS fixed header ────────────────────────────────────────────────
//
// 0..2 id, 2..4 flags, 4..6 qdcount, 6..8 ancount, 8..10 nscount,
// 10..12 arcount. Only the flags word is ever rewritten.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHdr {
    pub offset: usize,
    pub id: u16,
    pub flags: u16,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl DnsHdr {
    pub const LEN: usize = DNS_HDR_LEN;
    const OFF_FLAGS: usize = 2;

    pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self, Truncated> {
        let offset = cursor.position();
        let b: [u8; Self::LEN] = cursor.read()?;
        Ok(Self {
            offset,
            id: be16(b[0], b[1]),
            flags: be16(b[2], b[3]),
            qdcount: be16(b[4], b[5]),
            ancount: be16(b[6], b[7]),
            nscount: be16(b[8], b[9]),
            arcount: be16(b[10], b[11]),
        })
    }

    pub fn write_flags(&self, frame: &mut [u8], flags: u16) {
        let off = self.offset + Self::OFF_FLAGS;
        frame[off..off + 2].copy_from_slice(&flags.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ethernet_parse_and_swap() {
        let mut frame = vec![
            0x02, 0, 0, 0, 0, 1, // dst
            0x02, 0, 0, 0, 0, 2, // src
            0x08, 0x00, // IPv4
        ];
        let mut c = Cursor::new(&frame);
        let eth = EthernetHdr::parse(&mut c).unwrap();
        assert_eq!(eth.dst, [0x02, 0, 0, 0, 0, 1]);
        assert_eq!(eth.src, [0x02, 0, 0, 0, 0, 2]);
        assert_eq!(eth.ether_type, 0x0800);
        assert_eq!(c.position(), EthernetHdr::LEN);

        eth.swap_addresses(&mut frame);
        assert_eq!(&frame[0..6], &[0x02, 0, 0, 0, 0, 2]);
        assert_eq!(&frame[6..12], &[0x02, 0, 0, 0, 0, 1]);
        assert_eq!(&frame[12..14], &[0x08, 0x00]);
    }

    #[test]
    fn ethernet_truncated() {
        let mut c = Cursor::new(&[0u8; 13]);
        assert!(EthernetHdr::parse(&mut c).is_err());
    }

    #[test]
    fn ipv4_parse_fields() {
        let mut hdr = [0u8; 20];
        hdr[0] = 0x45;
        hdr[9] = 17; // UDP
        hdr[12..16].copy_from_slice(&[192, 0, 2, 1]);
        hdr[16..20].copy_from_slice(&[198, 51, 100, 9]);
        let mut c = Cursor::new(&hdr);
        let ip = Ipv4Hdr::parse(&mut c).unwrap();
        assert_eq!(ip.protocol, 17);
        assert_eq!(ip.src, [192, 0, 2, 1]);
        assert_eq!(ip.dst, [198, 51, 100, 9]);
    }

    #[test]
    fn ipv4_swap_at_recorded_offset() {
        // Header not at frame start: offset must be honored.
        let mut frame = vec![0u8; 24];
        frame[4] = 0x45;
        frame[16..20].copy_from_slice(&[10, 0, 0, 1]);
        frame[20..24].copy_from_slice(&[10, 0, 0, 2]);
        let mut c = Cursor::new(&frame);
        c.read::<4>().unwrap();
        let ip = Ipv4Hdr::parse(&mut c).unwrap();
        assert_eq!(ip.offset, 4);
        ip.swap_addresses(&mut frame);
        assert_eq!(&frame[16..20], &[10, 0, 0, 2]);
        assert_eq!(&frame[20..24], &[10, 0, 0, 1]);
    }

    #[test]
    fn ipv6_parse_and_swap() {
        let mut hdr = [0u8; 40];
        hdr[0] = 0x60;
        hdr[6] = 17;
        hdr[8] = 0x20;
        hdr[9] = 0x01;
        hdr[24] = 0xfd;
        let mut frame = hdr.to_vec();
        let mut c = Cursor::new(&frame);
        let ip6 = Ipv6Hdr::parse(&mut c).unwrap();
        assert_eq!(ip6.next_header, 17);
        assert_eq!(ip6.src[0], 0x20);
        assert_eq!(ip6.dst[0], 0xfd);

        ip6.swap_addresses(&mut frame);
        assert_eq!(frame[8], 0xfd);
        assert_eq!(frame[24], 0x20);
        assert_eq!(frame[25], 0x01);
    }

    #[test]
    fn udp_parse_and_reply_ports() {
        let mut frame = vec![
            0xd4, 0x31, // source 54321
            0x00, 0x35, // dest 53
            0x00, 0x20, // length
            0xab, 0xcd, // checksum
        ];
        let mut c = Cursor::new(&frame);
        let udp = UdpHdr::parse(&mut c).unwrap();
        assert_eq!(udp.source, 54321);
        assert_eq!(udp.dest, 53);
        assert_eq!(udp.checksum, 0xabcd);

        udp.write_reply_ports(&mut frame, 53);
        assert_eq!(&frame[0..2], &[0x00, 0x35]); // new source: 53
        assert_eq!(&frame[2..4], &[0xd4, 0x31]); // new dest: old source
    }

    #[test]
    fn dns_parse_and_flag_write() {
        let mut frame = vec![
            0x1a, 0x2b, // id
            0x01, 0x20, // flags: RD | AD
            0x00, 0x01, // qdcount
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        let mut c = Cursor::new(&frame);
        let dns = DnsHdr::parse(&mut c).unwrap();
        assert_eq!(dns.id, 0x1a2b);
        assert_eq!(dns.flags, 0x0120);
        assert_eq!(dns.qdcount, 1);

        dns.write_flags(&mut frame, 0x8300);
        assert_eq!(&frame[2..4], &[0x83, 0x00]);
        // id and counts untouched
        assert_eq!(&frame[0..2], &[0x1a, 0x2b]);
        assert_eq!(&frame[4..6], &[0x00, 0x01]);
    }

    #[test]
    fn dns_truncated_header() {
        let mut c = Cursor::new(&[0u8; 11]);
        assert!(DnsHdr::parse(&mut c).is_err());
    }
}
