// ── Runtime controller configuration ──
//
// These types describe *how* to reach the SDN controller and how to shape
// the rules pushed to it. They never touch disk: the CLI builds a
// `ControllerConfig` (usually via flowgate-config) and hands it in.

use std::time::Duration;

use flowgate_api::{TlsMode, TransportConfig};
use url::Url;

/// Floodlight's static-flow default is 32768 and its reactive forwarding
/// uses 1; this sits above both.
pub const DEFAULT_FLOW_PRIORITY: u16 = 40_000;

pub const DEFAULT_CONTROLLER_URL: &str = "http://127.0.0.1:8080";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller REST root (e.g., `http://10.20.12.1:8080`).
    pub url: Url,
    /// TLS verification strategy (only relevant for https controllers).
    pub tls: TlsVerification,
    /// Bound applied to every controller request.
    pub timeout: Duration,
    /// Priority stamped on every installed rule.
    pub flow_priority: u16,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CONTROLLER_URL
                .parse()
                .expect("default controller URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(10),
            flow_priority: DEFAULT_FLOW_PRIORITY,
        }
    }
}

impl ControllerConfig {
    /// Transport settings for the api client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeout: self.timeout,
        }
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
