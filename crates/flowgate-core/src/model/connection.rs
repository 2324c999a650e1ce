// ── Connection records ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use super::endpoint::{Host, Server, Service};
use super::flow::InstalledFlow;
use super::path::{FlowSegment, Route};

/// Provisioning progress of a connection request.
///
/// Failures at the attachment or route step drop the request, so only the
/// last two states are ever stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ProvisionPhase {
    Requested,
    AttachmentsResolved,
    RouteComputed,
    FlowsInstalled,
    PartiallyInstalled,
    Active,
}

/// Stored health of an active connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConnectionStatus {
    /// Every rule was accepted.
    Active,
    /// Some pushes failed; part of the path may still carry traffic.
    PartiallyInstalled,
}

/// An authorized path between a student and one service on a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub handler: String,
    pub student: Host,
    pub server: Server,
    pub service: Service,
    pub route: Route,
    pub segments: Vec<FlowSegment>,
    pub installed_flows: Vec<InstalledFlow>,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
