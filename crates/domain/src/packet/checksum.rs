//! Ones-complement checksum arithmetic.
//!
//! [`incremental_update`] is the hot-path primitive: it repairs a UDP
//! checksum after a single 16-bit word changes, without touching the rest
//! of the packet. The arithmetic (u32-wide complements, two data-dependent
//! carries, a double fold) must not be "simplified"; the carry handling is
//! the point.
//!
//! The full pseudo-header computations exist to verify the incremental
//! result in tests and are not used on the data path.

use rrl_common::wire::IPPROTO_UDP;

/// RFC 1071-style incremental checksum update: `csum` covered `old_val` at
/// some 16-bit-aligned position, which is being replaced by `new_val`.
pub fn incremental_update(csum: u16, old_val: u16, new_val: u16) -> u16 {
    let not_old = !u32::from(old_val);
    let undo = (!u32::from(csum)).wrapping_add(not_old);
    let mut sum = undo
        .wrapping_add(u32::from(undo < not_old))
        .wrapping_add(u32::from(new_val));
    sum = sum.wrapping_add(u32::from(sum < u32::from(new_val)));
    sum = (sum & 0xFFFF) + (sum >> 16);
    sum = (sum & 0xFFFF) + (sum >> 16);
    !sum as u16
}

/// Sum big-endian 16-bit words; an odd trailing byte is padded with zero.
fn sum_be_words(data: &[u8], mut acc: u64) -> u64 {
    let mut chunks = data.chunks_exact(2);
    for pair in &mut chunks {
        acc += u64::from(u16::from_be_bytes([pair[0], pair[1]]));
    }
    if let [last] = chunks.remainder() {
        acc += u64::from(u16::from_be_bytes([*last, 0]));
    }
    acc
}

fn fold(mut sum: u64) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

/// Offset of the checksum field within the UDP header.
const UDP_CHECKSUM_RANGE: core::ops::Range<usize> = 6..8;

fn udp_sum(pseudo: u64, udp_segment: &[u8]) -> u64 {
    // Sum the segment with the checksum field treated as zero.
    let mut sum = pseudo + udp_segment.len() as u64 + u64::from(IPPROTO_UDP);
    sum = sum_be_words(&udp_segment[..UDP_CHECKSUM_RANGE.start], sum);
    sum = sum_be_words(&udp_segment[UDP_CHECKSUM_RANGE.end..], sum);
    sum
}

/// Full UDP checksum over an IPv4 pseudo-header plus the UDP segment
/// (header + payload). A computed value of zero is transmitted as 0xFFFF.
pub fn udp_checksum_v4(src: [u8; 4], dst: [u8; 4], udp_segment: &[u8]) -> u16 {
    let mut pseudo = 0u64;
    pseudo = sum_be_words(&src, pseudo);
    pseudo = sum_be_words(&dst, pseudo);
    match !fold(udp_sum(pseudo, udp_segment)) {
        0 => 0xFFFF,
        c => c,
    }
}

/// Full UDP checksum over an IPv6 pseudo-header plus the UDP segment.
pub fn udp_checksum_v6(src: [u8; 16], dst: [u8; 16], udp_segment: &[u8]) -> u16 {
    let mut pseudo = 0u64;
    pseudo = sum_be_words(&src, pseudo);
    pseudo = sum_be_words(&dst, pseudo);
    match !fold(udp_sum(pseudo, udp_segment)) {
        0 => 0xFFFF,
        c => c,
    }
}

/// True when the stored checksum verifies: the ones-complement sum over the
/// pseudo-header and the whole segment (checksum field included) is -0.
pub fn udp_checksum_valid_v4(src: [u8; 4], dst: [u8; 4], udp_segment: &[u8]) -> bool {
    let mut pseudo = 0u64;
    pseudo = sum_be_words(&src, pseudo);
    pseudo = sum_be_words(&dst, pseudo);
    let check = sum_be_words(&udp_segment[UDP_CHECKSUM_RANGE], 0);
    fold(udp_sum(pseudo, udp_segment) + check) == 0xFFFF
}

/// IPv6 variant of [`udp_checksum_valid_v4`].
pub fn udp_checksum_valid_v6(src: [u8; 16], dst: [u8; 16], udp_segment: &[u8]) -> bool {
    let mut pseudo = 0u64;
    pseudo = sum_be_words(&src, pseudo);
    pseudo = sum_be_words(&dst, pseudo);
    let check = sum_be_words(&udp_segment[UDP_CHECKSUM_RANGE], 0);
    fold(udp_sum(pseudo, udp_segment) + check) == 0xFFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_segment(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
        let len = (8 + payload.len()) as u16;
        let mut seg = Vec::with_capacity(len as usize);
        seg.extend_from_slice(&src_port.to_be_bytes());
        seg.extend_from_slice(&dst_port.to_be_bytes());
        seg.extend_from_slice(&len.to_be_bytes());
        seg.extend_from_slice(&[0, 0]); // checksum slot
        seg.extend_from_slice(payload);
        seg
    }

    #[test]
    fn computed_checksum_verifies_v4() {
        let src = [192, 0, 2, 1];
        let dst = [198, 51, 100, 2];
        let mut seg = make_segment(40000, 53, b"\x12\x34\x01\x20\x00\x01\x00\x00");
        let c = udp_checksum_v4(src, dst, &seg);
        seg[6..8].copy_from_slice(&c.to_be_bytes());
        assert!(udp_checksum_valid_v4(src, dst, &seg));
    }

    #[test]
    fn computed_checksum_verifies_v6() {
        let mut src = [0u8; 16];
        src[0] = 0x20;
        src[1] = 0x01;
        src[15] = 1;
        let mut dst = [0u8; 16];
        dst[0] = 0xfd;
        dst[15] = 2;
        let mut seg = make_segment(5353, 53, b"hello world!");
        let c = udp_checksum_v6(src, dst, &seg);
        seg[6..8].copy_from_slice(&c.to_be_bytes());
        assert!(udp_checksum_valid_v6(src, dst, &seg));
    }

    #[test]
    fn corrupted_byte_fails_verification() {
        let src = [10, 0, 0, 1];
        let dst = [10, 0, 0, 2];
        let mut seg = make_segment(1234, 53, b"abcdef");
        let c = udp_checksum_v4(src, dst, &seg);
        seg[6..8].copy_from_slice(&c.to_be_bytes());
        seg[9] ^= 0x01;
        assert!(!udp_checksum_valid_v4(src, dst, &seg));
    }

    #[test]
    fn odd_length_payload_padded() {
        let src = [10, 0, 0, 1];
        let dst = [10, 0, 0, 2];
        let mut seg = make_segment(1234, 53, b"odd");
        let c = udp_checksum_v4(src, dst, &seg);
        seg[6..8].copy_from_slice(&c.to_be_bytes());
        assert!(udp_checksum_valid_v4(src, dst, &seg));
    }

    #[test]
    fn incremental_update_preserves_validity() {
        let src = [192, 0, 2, 7];
        let dst = [203, 0, 113, 53];
        // DNS-ish payload: id, flags=RD|AD, counts.
        let payload = b"\x1a\x2b\x01\x20\x00\x01\x00\x00\x00\x00\x00\x00";
        let mut seg = make_segment(54321, 53, payload);
        let c0 = udp_checksum_v4(src, dst, &seg);
        seg[6..8].copy_from_slice(&c0.to_be_bytes());

        // Flags word lives at segment offset 8 + 2.
        let old_flags = u16::from_be_bytes([seg[10], seg[11]]);
        let new_flags = (old_flags | 0x8000 | 0x0200) & !0x0020;
        seg[10..12].copy_from_slice(&new_flags.to_be_bytes());

        let c1 = incremental_update(c0, old_flags, new_flags);
        seg[6..8].copy_from_slice(&c1.to_be_bytes());
        assert!(udp_checksum_valid_v4(src, dst, &seg));
    }

    #[test]
    fn incremental_update_reverses() {
        // Applying the inverse change restores the original checksum class.
        let src = [10, 1, 1, 1];
        let dst = [10, 1, 1, 2];
        let mut seg = make_segment(9999, 53, b"\x00\x01\x81\x80\x00\x00");
        let c0 = udp_checksum_v4(src, dst, &seg);
        seg[6..8].copy_from_slice(&c0.to_be_bytes());

        let old = u16::from_be_bytes([seg[10], seg[11]]);
        let new = 0x8380;
        let forward = incremental_update(c0, old, new);
        let back = incremental_update(forward, new, old);
        seg[6..8].copy_from_slice(&back.to_be_bytes());
        assert!(udp_checksum_valid_v4(src, dst, &seg));
    }

    #[test]
    fn incremental_noop_keeps_validity() {
        let src = [172, 16, 0, 1];
        let dst = [172, 16, 0, 2];
        let mut seg = make_segment(1053, 53, b"\x00\x02\x01\x00");
        let c0 = udp_checksum_v4(src, dst, &seg);
        seg[6..8].copy_from_slice(&c0.to_be_bytes());
        let flags = u16::from_be_bytes([seg[10], seg[11]]);
        let c1 = incremental_update(c0, flags, flags);
        seg[6..8].copy_from_slice(&c1.to_be_bytes());
        assert!(udp_checksum_valid_v4(src, dst, &seg));
    }
}
