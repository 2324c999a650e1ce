// Controller lookups: where hosts attach, and the path between them.

mod attachment;
mod route;

pub use attachment::{AttachmentResolver, HostLocation};
pub use route::RouteResolver;
