// ── Endpoint records ──
//
// Hosts, servers, and the services they expose. The catalog owns these;
// the engine only reads them. Serde aliases accept the Spanish keys used
// by older course data files.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::mac::MacAddress;

/// Transport protocol of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Protocol {
    #[serde(alias = "tcp", alias = "Tcp")]
    Tcp,
    #[serde(alias = "udp", alias = "Udp")]
    Udp,
}

impl Protocol {
    /// IANA protocol number carried in the IPv4 header.
    pub fn ip_number(self) -> u8 {
        match self {
            Self::Tcp => 6,
            Self::Udp => 17,
        }
    }
}

/// A transport service exposed by a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "protocolo")]
    pub protocol: Protocol,
    #[serde(alias = "puerto")]
    pub port: u16,
}

/// A network endpoint as the engine sees it (a student's machine).
///
/// `ip` may be unknown; it is then taken from the controller's device
/// directory at provisioning time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    pub mac: MacAddress,
    #[serde(default)]
    pub ip: Option<Ipv4Addr>,
    #[serde(default)]
    pub authorized: bool,
}

/// A course server and the services it offers, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "direccion_ip")]
    pub ip: Ipv4Addr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<MacAddress>,
    #[serde(default, alias = "servicios")]
    pub services: Vec<Service>,
}

impl Server {
    /// Look up an offered service by name (case-insensitive).
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Whether `service` is one of this server's services.
    pub fn offers(&self, service: &Service) -> bool {
        self.services.contains(service)
    }
}
