use std::sync::Arc;

use rrl_common::wire::{
    DNS_FLAG_AD, DNS_FLAG_QR, DNS_FLAG_TC, DNS_PORT, ETH_P_IP, ETH_P_IPV6, IPPROTO_UDP,
};

use crate::common::clock::{Clock, MonotonicClock};
use crate::common::entity::Verdict;
use crate::common::error::DomainError;
use crate::exclusion::ExclusionTables;
use crate::packet::checksum::incremental_update;
use crate::packet::cursor::Cursor;
use crate::packet::headers::{DnsHdr, EthernetHdr, Ipv4Hdr, Ipv6Hdr, UdpHdr};
use crate::packet::link::parse_link_layer;
use crate::ratelimit::{RateAccountant, RateDecision};

use super::entity::{FilterSettings, VerdictCounters};

/// What one classification pass found in the frame.
///
/// Only UDP frames addressed to destination port 53 are queries; everything
/// else is `NotDns` and passes untouched. `Malformed` is the one hard
/// failure: the frame committed to being a DNS query but ended before the
/// fixed DNS header.
enum Classification {
    NotDns,
    Malformed,
    QueryV4 {
        eth: EthernetHdr,
        ip: Ipv4Hdr,
        udp: UdpHdr,
        dns: DnsHdr,
    },
    QueryV6 {
        eth: EthernetHdr,
        ip: Ipv6Hdr,
        udp: UdpHdr,
        dns: DnsHdr,
    },
}

fn classify(frame: &[u8]) -> Classification {
    let mut cursor = Cursor::new(frame);
    let Ok((eth, ether_type)) = parse_link_layer(&mut cursor) else {
        return Classification::NotDns;
    };

    match ether_type {
        ETH_P_IP => {
            let Ok(ip) = Ipv4Hdr::parse(&mut cursor) else {
                return Classification::NotDns;
            };
            if ip.protocol != IPPROTO_UDP {
                return Classification::NotDns;
            }
            let Ok(udp) = UdpHdr::parse(&mut cursor) else {
                return Classification::NotDns;
            };
            if udp.dest != DNS_PORT {
                return Classification::NotDns;
            }
            match DnsHdr::parse(&mut cursor) {
                Ok(dns) => Classification::QueryV4 { eth, ip, udp, dns },
                Err(_) => Classification::Malformed,
            }
        }
        ETH_P_IPV6 => {
            let Ok(ip) = Ipv6Hdr::parse(&mut cursor) else {
                return Classification::NotDns;
            };
            if ip.next_header != IPPROTO_UDP {
                return Classification::NotDns;
            }
            let Ok(udp) = UdpHdr::parse(&mut cursor) else {
                return Classification::NotDns;
            };
            if udp.dest != DNS_PORT {
                return Classification::NotDns;
            }
            match DnsHdr::parse(&mut cursor) {
                Ok(dns) => Classification::QueryV6 { eth, ip, udp, dns },
                Err(_) => Classification::Malformed,
            }
        }
        _ => Classification::NotDns,
    }
}

/// Rewrite a rate-limited query in place into a truncated reply headed back
/// to the querier: QR and TC set, AD cleared, checksum repaired, port pair
/// and both address layers swapped. After this the frame is ready to
/// transmit out the interface it arrived on.
fn write_bounce(frame: &mut [u8], eth: &EthernetHdr, udp: &UdpHdr, dns: &DnsHdr) {
    let new_flags = (dns.flags | DNS_FLAG_QR | DNS_FLAG_TC) & !DNS_FLAG_AD;
    dns.write_flags(frame, new_flags);
    // Only the flags word changes the checksum: the port and address swaps
    // permute 16-bit words without altering the sum.
    udp.write_checksum(frame, incremental_update(udp.checksum, dns.flags, new_flags));
    udp.write_reply_ports(frame, DNS_PORT);
    eth.swap_addresses(frame);
}

/// One shard's view of the filter: its own rate accountant and verdict
/// counters, plus the shared exclusion tables. A shard is single-threaded;
/// run one pipeline per worker and give each a disjoint slice of traffic.
pub struct ShardPipeline<C: Clock = MonotonicClock> {
    shard_id: u32,
    accountant: RateAccountant,
    exclusions: Arc<ExclusionTables>,
    clock: C,
    counters: VerdictCounters,
}

impl ShardPipeline<MonotonicClock> {
    pub fn new(
        shard_id: u32,
        settings: &FilterSettings,
        exclusions: Arc<ExclusionTables>,
    ) -> Result<Self, DomainError> {
        Self::with_clock(shard_id, settings, exclusions, MonotonicClock::new())
    }
}

impl<C: Clock> ShardPipeline<C> {
    pub fn with_clock(
        shard_id: u32,
        settings: &FilterSettings,
        exclusions: Arc<ExclusionTables>,
        clock: C,
    ) -> Result<Self, DomainError> {
        settings.validate()?;
        Ok(Self {
            shard_id,
            accountant: RateAccountant::new(
                settings.per_shard_threshold(),
                settings.bucket_capacity,
            ),
            exclusions,
            clock,
            counters: VerdictCounters::default(),
        })
    }

    pub fn shard_id(&self) -> u32 {
        self.shard_id
    }

    pub fn counters(&self) -> VerdictCounters {
        self.counters
    }

    /// Process one frame in place and return its verdict. The buffer is
    /// only modified when the verdict is [`Verdict::Transmit`].
    ///
    /// Excluded sources are counted but never accounted; everyone else is
    /// charged against the per-source bucket keyed on the query's source
    /// address.
    pub fn process(&mut self, frame: &mut [u8]) -> Verdict {
        let verdict = match classify(frame) {
            Classification::NotDns => Verdict::Pass,
            Classification::Malformed => Verdict::Abort,
            Classification::QueryV4 { eth, ip, udp, dns } => {
                if let Some(entry) = self.exclusions.match_v4(ip.src) {
                    entry.record_hit();
                    Verdict::Pass
                } else {
                    match self.accountant.check_v4(ip.src, self.clock.now_ns()) {
                        RateDecision::Pass => Verdict::Pass,
                        RateDecision::Bounce => {
                            write_bounce(frame, &eth, &udp, &dns);
                            ip.swap_addresses(frame);
                            Verdict::Transmit
                        }
                    }
                }
            }
            Classification::QueryV6 { eth, ip, udp, dns } => {
                if let Some(entry) = self.exclusions.match_v6(ip.src) {
                    entry.record_hit();
                    Verdict::Pass
                } else {
                    match self.accountant.check_v6(ip.src, self.clock.now_ns()) {
                        RateDecision::Pass => Verdict::Pass,
                        RateDecision::Bounce => {
                            write_bounce(frame, &eth, &udp, &dns);
                            ip.swap_addresses(frame);
                            Verdict::Transmit
                        }
                    }
                }
            }
        };
        self.counters.record(verdict);
        verdict
    }
}
