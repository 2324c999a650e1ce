// flowgate-api: Async Rust client for the Floodlight controller REST API

pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod static_flow;
pub mod topology;
pub mod transport;

pub use client::FloodlightClient;
pub use error::Error;
pub use models::{AttachmentPointRecord, DeviceRecord, FlowStatus, RouteHop, StaticFlowEntry};
pub use transport::{TlsMode, TransportConfig};
