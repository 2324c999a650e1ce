// ── Attachment lookups ──
//
// Maps host identities to the switch ports where they meet the fabric,
// using the controller's device directory. One directory fetch per call.

use std::net::Ipv4Addr;
use std::sync::Arc;

use flowgate_api::{DeviceRecord, FloodlightClient};
use serde::Serialize;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{AttachmentPoint, MacAddress};

/// Everything the device directory knows about one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostLocation {
    pub mac: MacAddress,
    pub attachment: AttachmentPoint,
    pub ipv4: Vec<Ipv4Addr>,
}

/// Resolves MAC (or IPv4) addresses to attachment points.
#[derive(Debug, Clone)]
pub struct AttachmentResolver {
    client: Arc<FloodlightClient>,
}

impl AttachmentResolver {
    pub fn new(client: Arc<FloodlightClient>) -> Self {
        Self { client }
    }

    /// Where `mac` is attached. Multi-homed hosts resolve to their first
    /// reported attachment point.
    pub async fn resolve(&self, mac: &MacAddress) -> Result<AttachmentPoint, CoreError> {
        self.locate(mac).await.map(|loc| loc.attachment)
    }

    /// Attachment point plus the addresses the controller has seen for `mac`.
    pub async fn locate(&self, mac: &MacAddress) -> Result<HostLocation, CoreError> {
        let devices = self.client.list_devices().await?;
        let location = find_by_mac(&devices, mac).ok_or_else(|| CoreError::not_found("host", mac))?;
        debug!(%mac, attachment = %location.attachment, "resolved attachment");
        Ok(location)
    }

    /// Reverse lookup for endpoints known only by address.
    pub async fn locate_ip(&self, ip: Ipv4Addr) -> Result<HostLocation, CoreError> {
        let devices = self.client.list_devices().await?;
        let location = find_by_ip(&devices, ip).ok_or_else(|| CoreError::not_found("host", ip))?;
        debug!(%ip, mac = %location.mac, attachment = %location.attachment, "resolved attachment");
        Ok(location)
    }
}

// ── Directory search ─────────────────────────────────────────────────

/// Devices the controller has seen but not yet placed carry no attachment
/// points; they are skipped rather than reported.
fn location_of(device: &DeviceRecord, mac: MacAddress) -> Option<HostLocation> {
    let attachment = device.attachment_points.first().map(AttachmentPoint::from)?;
    let ipv4 = device
        .ipv4
        .iter()
        .filter_map(|ip| ip.parse().ok())
        .collect();
    Some(HostLocation {
        mac,
        attachment,
        ipv4,
    })
}

pub(crate) fn find_by_mac(devices: &[DeviceRecord], mac: &MacAddress) -> Option<HostLocation> {
    devices
        .iter()
        .filter(|d| d.has_mac(mac.as_str()))
        .find_map(|d| location_of(d, mac.clone()))
}

pub(crate) fn find_by_ip(devices: &[DeviceRecord], ip: Ipv4Addr) -> Option<HostLocation> {
    let needle = ip.to_string();
    devices
        .iter()
        .filter(|d| d.has_ipv4(&needle))
        .find_map(|d| {
            let mac = MacAddress::new(d.mac.first()?);
            location_of(d, mac)
        })
}
