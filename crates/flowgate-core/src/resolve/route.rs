// ── Route lookups ──

use std::sync::Arc;

use flowgate_api::FloodlightClient;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{AttachmentPoint, Hop, Route};

/// Asks the topology service for the hop list between two attachments.
#[derive(Debug, Clone)]
pub struct RouteResolver {
    client: Arc<FloodlightClient>,
}

impl RouteResolver {
    pub fn new(client: Arc<FloodlightClient>) -> Self {
        Self { client }
    }

    /// Hops in controller order, unvalidated. An empty `Route` means the
    /// controller has no path; that is not an error at this level. A failed
    /// lookup surfaces as `ControllerUnavailable`.
    pub async fn route(
        &self,
        src: &AttachmentPoint,
        dst: &AttachmentPoint,
    ) -> Result<Route, CoreError> {
        let hops = self
            .client
            .route(&src.switch_id, src.port, &dst.switch_id, dst.port)
            .await?;
        let route: Route = hops.into_iter().map(Hop::from).collect::<Vec<_>>().into();
        debug!(%src, %dst, hops = route.len(), "computed route");
        Ok(route)
    }
}
