// ── API ↔ domain conversions ──
//
// Bridges raw `flowgate_api` wire types and `flowgate_core::model` types.
// Inbound conversions normalize controller records; the outbound one
// renders a `FlowRule` in the static flow pusher's all-strings format.

use flowgate_api::{AttachmentPointRecord, RouteHop, StaticFlowEntry};

use crate::model::{AttachmentPoint, FlowAction, FlowRule, Hop, Protocol};

// ── Inbound ────────────────────────────────────────────────────────

impl From<&AttachmentPointRecord> for AttachmentPoint {
    fn from(ap: &AttachmentPointRecord) -> Self {
        Self {
            switch_id: ap.switch_dpid.clone(),
            port: ap.port,
        }
    }
}

impl From<RouteHop> for Hop {
    fn from(hop: RouteHop) -> Self {
        Self {
            switch_id: hop.switch,
            port: hop.port,
        }
    }
}

// ── Outbound ───────────────────────────────────────────────────────

fn render_actions(actions: &[FlowAction]) -> String {
    actions
        .iter()
        .map(|a| match a {
            FlowAction::Output(port) => format!("output={port}"),
        })
        .collect::<Vec<_>>()
        .join(",")
}

impl From<&FlowRule> for StaticFlowEntry {
    fn from(rule: &FlowRule) -> Self {
        let m = &rule.match_fields;
        let tp = |port: Option<u16>, proto: Protocol| {
            port.filter(|_| m.ip_proto == Some(proto))
                .map(|p| p.to_string())
        };

        Self {
            switch: rule.switch_id.clone(),
            name: rule.name.clone(),
            priority: rule.priority.to_string(),
            in_port: m.in_port.to_string(),
            eth_type: format!("{:#06x}", m.eth_type.value()),
            eth_src: m.eth_src.as_ref().map(ToString::to_string),
            eth_dst: m.eth_dst.as_ref().map(ToString::to_string),
            ipv4_src: m.ipv4_src.map(|ip| ip.to_string()),
            ipv4_dst: m.ipv4_dst.map(|ip| ip.to_string()),
            ip_proto: m.ip_proto.map(|p| format!("{:#04x}", p.ip_number())),
            tcp_src: tp(m.tp_src, Protocol::Tcp),
            tcp_dst: tp(m.tp_dst, Protocol::Tcp),
            udp_src: tp(m.tp_src, Protocol::Udp),
            udp_dst: tp(m.tp_dst, Protocol::Udp),
            active: rule.active.to_string(),
            actions: render_actions(&rule.actions),
        }
    }
}
