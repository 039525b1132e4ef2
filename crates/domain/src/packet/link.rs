//! Link-layer parsing: Ethernet plus up to two stacked VLAN tags.

use super::cursor::{Cursor, Truncated};
use super::headers::{EthernetHdr, VlanHdr};
use rrl_common::wire::{ETH_P_8021AD, ETH_P_8021Q, VLAN_MAX_DEPTH};

fn is_vlan_tag(ether_type: u16) -> bool {
    ether_type == ETH_P_8021Q || ether_type == ETH_P_8021AD
}

/// Parse the Ethernet header and unwrap at most [`VLAN_MAX_DEPTH`] stacked
/// VLAN tags, returning the Ethernet header (kept for the later MAC swap)
/// and the resolved ethertype.
///
/// A third stacked tag is not unwrapped: the resolved ethertype is then the
/// tag value itself, no IP branch matches, and the frame passes. Accepted
/// limitation; triple-tagged DNS traffic is not rate limited.
pub fn parse_link_layer(cursor: &mut Cursor<'_>) -> Result<(EthernetHdr, u16), Truncated> {
    let eth = EthernetHdr::parse(cursor)?;
    let mut ether_type = eth.ether_type;

    for _ in 0..VLAN_MAX_DEPTH {
        if !is_vlan_tag(ether_type) {
            break;
        }
        let vlan = VlanHdr::parse(cursor)?;
        ether_type = vlan.encap_proto;
    }

    Ok((eth, ether_type))
}
