// ── Flow rule types ──
//
// The unit pushed to the controller, plus the per-rule outcome reported
// back to operators.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use strum::Display;

use super::endpoint::Protocol;
use super::mac::MacAddress;

/// Ethernet payload type a rule matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum EtherType {
    #[strum(serialize = "IPv4")]
    Ipv4,
    #[strum(serialize = "ARP")]
    Arp,
}

impl EtherType {
    pub fn value(self) -> u16 {
        match self {
            Self::Ipv4 => 0x0800,
            Self::Arp => 0x0806,
        }
    }
}

/// Which way along the path a rule carries traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Direction {
    /// Student towards server.
    #[strum(serialize = "fwd")]
    Forward,
    /// Server back towards student.
    #[strum(serialize = "rev")]
    Reverse,
}

/// Data rules carry the service; ARP rules let address resolution follow
/// the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum RuleKind {
    #[strum(serialize = "data")]
    Data,
    #[strum(serialize = "arp")]
    Arp,
}

/// Header fields a rule matches. `None` is a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFields {
    pub eth_type: EtherType,
    pub in_port: u32,
    pub eth_src: Option<MacAddress>,
    pub eth_dst: Option<MacAddress>,
    pub ipv4_src: Option<Ipv4Addr>,
    pub ipv4_dst: Option<Ipv4Addr>,
    pub ip_proto: Option<Protocol>,
    pub tp_src: Option<u16>,
    pub tp_dst: Option<u16>,
}

impl MatchFields {
    /// ARP match: ethertype and ingress port only.
    pub fn arp(in_port: u32) -> Self {
        Self {
            eth_type: EtherType::Arp,
            in_port,
            eth_src: None,
            eth_dst: None,
            ipv4_src: None,
            ipv4_dst: None,
            ip_proto: None,
            tp_src: None,
            tp_dst: None,
        }
    }

    /// The return-traffic match: every source/destination pair swapped,
    /// arriving on `in_port`.
    pub fn mirrored(&self, in_port: u32) -> Self {
        Self {
            eth_type: self.eth_type,
            in_port,
            eth_src: self.eth_dst.clone(),
            eth_dst: self.eth_src.clone(),
            ipv4_src: self.ipv4_dst,
            ipv4_dst: self.ipv4_src,
            ip_proto: self.ip_proto,
            tp_src: self.tp_dst,
            tp_dst: self.tp_src,
        }
    }
}

/// What a switch does with matching packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowAction {
    Output(u32),
}

/// A fully specified rule for one switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRule {
    pub switch_id: String,
    /// Deterministic; the controller overwrites on name collision.
    pub name: String,
    pub priority: u16,
    pub kind: RuleKind,
    pub direction: Direction,
    pub match_fields: MatchFields,
    pub actions: Vec<FlowAction>,
    pub active: bool,
}

/// Outcome of pushing (or deleting) one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowResult {
    pub flow_name: String,
    pub switch_id: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A rule the controller accepted, remembered so it can be retracted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstalledFlow {
    pub name: String,
    pub switch_id: String,
}
