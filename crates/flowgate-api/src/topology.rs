// Topology route endpoint

use tracing::debug;

use crate::client::FloodlightClient;
use crate::error::Error;
use crate::models::RouteHop;

impl FloodlightClient {
    /// Ask the topology service for the path between two switch ports.
    ///
    /// `GET /wm/topology/route/{src_dpid}/{src_port}/{dst_dpid}/{dst_port}/json`
    ///
    /// Hops are returned in controller order. An empty list means the
    /// controller knows no path.
    pub async fn route(
        &self,
        src_dpid: &str,
        src_port: u32,
        dst_dpid: &str,
        dst_port: u32,
    ) -> Result<Vec<RouteHop>, Error> {
        let url = self.api_url(&format!(
            "wm/topology/route/{src_dpid}/{src_port}/{dst_dpid}/{dst_port}/json"
        ))?;
        let hops: Vec<RouteHop> = self.get(url).await?;
        debug!(src_dpid, dst_dpid, hops = hops.len(), "fetched route");
        Ok(hops)
    }
}
