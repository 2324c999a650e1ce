// flowgate-core: Path resolution and flow provisioning between flowgate-api and the CLI.

pub mod catalog;
pub mod config;
pub mod convert;
pub mod error;
pub mod installer;
pub mod manager;
pub mod model;
pub mod planner;
pub mod resolve;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{Catalog, ConnectionRequest, Course, CourseServer, CourseStatus, Student};
pub use config::{ControllerConfig, DEFAULT_FLOW_PRIORITY, TlsVerification};
pub use error::CoreError;
pub use installer::FlowInstaller;
pub use manager::{ConnectionManager, CreateReport, PathPlan};
pub use planner::FlowPlanner;
pub use resolve::{AttachmentResolver, HostLocation, RouteResolver};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AttachmentPoint, Connection, ConnectionStatus, Direction, EtherType, FlowAction, FlowResult,
    FlowRule, FlowSegment, Hop, Host, InstalledFlow, MacAddress, MatchFields, Protocol,
    ProvisionPhase, Route, RuleKind, Server, Service,
};
