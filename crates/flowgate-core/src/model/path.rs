// ── Path types ──
//
// Where hosts attach, the hop list the controller computes between two
// attachments, and the per-switch segments derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `(switch, port)` pair where a host meets the fabric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttachmentPoint {
    pub switch_id: String,
    pub port: u32,
}

impl fmt::Display for AttachmentPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.switch_id, self.port)
    }
}

/// One `(switch, port)` entry of a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hop {
    pub switch_id: String,
    pub port: u32,
}

impl Hop {
    pub fn new(switch_id: impl Into<String>, port: u32) -> Self {
        Self {
            switch_id: switch_id.into(),
            port,
        }
    }
}

/// Ordered hop list exactly as the controller returned it.
/// Empty means the controller found no path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(Vec<Hop>);

impl Route {
    pub fn new(hops: Vec<Hop>) -> Self {
        Self(hops)
    }

    pub fn hops(&self) -> &[Hop] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Hop>> for Route {
    fn from(hops: Vec<Hop>) -> Self {
        Self(hops)
    }
}

/// One switch's forwarding decision for one direction of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowSegment {
    pub switch_id: String,
    pub in_port: u32,
    pub out_port: u32,
}

impl FlowSegment {
    pub fn new(switch_id: impl Into<String>, in_port: u32, out_port: u32) -> Self {
        Self {
            switch_id: switch_id.into(),
            in_port,
            out_port,
        }
    }

    /// The same switch seen from the return direction.
    pub fn reversed(&self) -> Self {
        Self {
            switch_id: self.switch_id.clone(),
            in_port: self.out_port,
            out_port: self.in_port,
        }
    }
}

impl fmt::Display for FlowSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}→{}", self.switch_id, self.in_port, self.out_port)
    }
}
