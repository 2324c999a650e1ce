// ── Domain model ──
//
// Canonical types shared by the engine, the catalog, and consumers.

pub mod connection;
pub mod endpoint;
pub mod flow;
pub mod mac;
pub mod path;

pub use connection::{Connection, ConnectionStatus, ProvisionPhase};
pub use endpoint::{Host, Protocol, Server, Service};
pub use flow::{
    Direction, EtherType, FlowAction, FlowResult, FlowRule, InstalledFlow, MatchFields, RuleKind,
};
pub use mac::MacAddress;
pub use path::{AttachmentPoint, FlowSegment, Hop, Route};
