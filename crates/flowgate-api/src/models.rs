// Floodlight REST response and request types
//
// Field names follow the controller's JSON. Several fields changed shape
// across Floodlight releases (attachment point key, port encoding, device
// listing envelope); the deserializers here accept every known form.

use serde::{Deserialize, Deserializer, Serialize};

// ── Port numbers ─────────────────────────────────────────────────────

/// Port values arrive as `3`, `"3"`, or `{"portNumber": 3}` depending on
/// controller version and endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum PortRepr {
    Number(u32),
    Text(String),
    Object {
        #[serde(rename = "portNumber")]
        port_number: u32,
    },
}

fn port_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match PortRepr::deserialize(deserializer)? {
        PortRepr::Number(n) | PortRepr::Object { port_number: n } => Ok(n),
        PortRepr::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port number: {s:?}"))),
    }
}

// ── Device directory ─────────────────────────────────────────────────

/// `GET /wm/device/` returns a bare array on older controllers and
/// `{"devices": [...]}` on v1.2+.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DeviceListing {
    Bare(Vec<DeviceRecord>),
    Wrapped { devices: Vec<DeviceRecord> },
}

impl DeviceListing {
    pub(crate) fn into_devices(self) -> Vec<DeviceRecord> {
        match self {
            Self::Bare(devices) | Self::Wrapped { devices } => devices,
        }
    }
}

/// One host entry from the device directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(default)]
    pub mac: Vec<String>,
    #[serde(default)]
    pub ipv4: Vec<String>,
    #[serde(default, rename = "attachmentPoint")]
    pub attachment_points: Vec<AttachmentPointRecord>,
    /// Catch-all for fields we don't model (vlan, lastSeen, entityClass...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeviceRecord {
    /// Case-insensitive MAC membership test.
    pub fn has_mac(&self, mac: &str) -> bool {
        self.mac.iter().any(|m| m.eq_ignore_ascii_case(mac))
    }

    /// Exact IPv4 membership test.
    pub fn has_ipv4(&self, ip: &str) -> bool {
        self.ipv4.iter().any(|a| a == ip)
    }
}

/// Where a device is plugged into the fabric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentPointRecord {
    #[serde(rename = "switchDPID", alias = "switch")]
    pub switch_dpid: String,
    #[serde(deserialize_with = "port_number")]
    pub port: u32,
}

// ── Topology ─────────────────────────────────────────────────────────

/// One entry in a route returned by `/wm/topology/route/...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteHop {
    pub switch: String,
    #[serde(deserialize_with = "port_number")]
    pub port: u32,
}

// ── Static flow pusher ───────────────────────────────────────────────

/// Body for `POST /wm/staticflowpusher/json`.
///
/// The pusher expects every value as a string; optional match fields are
/// omitted entirely rather than sent as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticFlowEntry {
    pub switch: String,
    pub name: String,
    pub priority: String,
    pub in_port: String,
    pub eth_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_dst: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_dst: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_proto: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_dst: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_dst: Option<String>,
    pub active: String,
    pub actions: String,
}

/// Reply from the static flow pusher, e.g. `{"status": "Entry pushed"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowStatus {
    #[serde(default)]
    pub status: String,
}

impl FlowStatus {
    /// The pusher reports refusals in-band with an `Error` prefix.
    pub fn is_error(&self) -> bool {
        self.status.trim_start().starts_with("Error")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attachment_point_accepts_legacy_and_v12_keys() {
        let old: AttachmentPointRecord =
            serde_json::from_value(json!({ "switchDPID": "00:00:00:00:00:00:00:01", "port": 3 }))
                .unwrap();
        let new: AttachmentPointRecord =
            serde_json::from_value(json!({ "switch": "00:00:00:00:00:00:00:01", "port": "3" }))
                .unwrap();
        assert_eq!(old, new);
    }

    #[test]
    fn route_hop_accepts_port_object() {
        let hop: RouteHop = serde_json::from_value(json!({
            "switch": "00:00:00:00:00:00:00:02",
            "port": { "portNumber": 5, "shortPortNumber": 5 }
        }))
        .unwrap();
        assert_eq!(hop.port, 5);
    }

    #[test]
    fn route_hop_rejects_garbage_port() {
        let result: Result<RouteHop, _> =
            serde_json::from_value(json!({ "switch": "s1", "port": "local" }));
        assert!(result.is_err());
    }

    #[test]
    fn device_listing_both_envelopes() {
        let bare: DeviceListing =
            serde_json::from_value(json!([{ "mac": ["aa:bb:cc:00:00:01"] }])).unwrap();
        let wrapped: DeviceListing =
            serde_json::from_value(json!({ "devices": [{ "mac": ["aa:bb:cc:00:00:01"] }] }))
                .unwrap();
        assert_eq!(bare.into_devices().len(), 1);
        assert_eq!(wrapped.into_devices().len(), 1);
    }

    #[test]
    fn device_mac_match_ignores_case() {
        let device: DeviceRecord =
            serde_json::from_value(json!({ "mac": ["aa:bb:cc:00:00:01"] })).unwrap();
        assert!(device.has_mac("AA:BB:CC:00:00:01"));
        assert!(!device.has_mac("aa:bb:cc:00:00:02"));
    }

    #[test]
    fn static_flow_entry_omits_absent_fields() {
        let entry = StaticFlowEntry {
            switch: "00:00:00:00:00:00:00:01".into(),
            name: "fg-arp-fwd-0-aabbcc000001-aabbcc000002".into(),
            priority: "40000".into(),
            in_port: "3".into(),
            eth_type: "0x0806".into(),
            eth_src: None,
            eth_dst: None,
            ipv4_src: None,
            ipv4_dst: None,
            ip_proto: None,
            tcp_src: None,
            tcp_dst: None,
            udp_src: None,
            udp_dst: None,
            active: "true".into(),
            actions: "output=1".into(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("ipv4_src"));
        assert_eq!(obj["actions"], "output=1");
    }

    #[test]
    fn flow_status_error_prefix() {
        let ok = FlowStatus {
            status: "Entry pushed".into(),
        };
        let bad = FlowStatus {
            status: "Error! Invalid switch DPID".into(),
        };
        assert!(!ok.is_error());
        assert!(bad.is_error());
    }
}
