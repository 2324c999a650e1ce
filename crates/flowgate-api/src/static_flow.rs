// Static flow pusher endpoints
//
// Entries are keyed by name controller-wide: pushing an existing name
// overwrites it, deleting takes only the name.

use serde_json::json;
use tracing::debug;

use crate::client::FloodlightClient;
use crate::error::Error;
use crate::models::{FlowStatus, StaticFlowEntry};

const STATIC_FLOW_PATH: &str = "wm/staticflowpusher/json";

impl FloodlightClient {
    /// Install (or overwrite) a static flow entry.
    ///
    /// `POST /wm/staticflowpusher/json`
    pub async fn push_flow(&self, entry: &StaticFlowEntry) -> Result<FlowStatus, Error> {
        let url = self.api_url(STATIC_FLOW_PATH)?;
        debug!(name = %entry.name, switch = %entry.switch, "pushing static flow");
        let status: FlowStatus = self.post(url, entry).await?;
        if status.is_error() {
            return Err(Error::FlowRejected {
                name: entry.name.clone(),
                message: status.status,
            });
        }
        Ok(status)
    }

    /// Remove a static flow entry by name.
    ///
    /// `DELETE /wm/staticflowpusher/json` with `{"name": "..."}`
    pub async fn delete_flow(&self, name: &str) -> Result<FlowStatus, Error> {
        let url = self.api_url(STATIC_FLOW_PATH)?;
        debug!(name, "deleting static flow");
        let status: FlowStatus = self.delete(url, &json!({ "name": name })).await?;
        if status.is_error() {
            return Err(Error::FlowRejected {
                name: name.to_owned(),
                message: status.status,
            });
        }
        Ok(status)
    }
}
