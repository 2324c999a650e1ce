// Device directory endpoint
//
// The controller tracks every host it has seen: MACs, learned IPv4
// addresses, and the switch ports they hang off.

use tracing::debug;

use crate::client::FloodlightClient;
use crate::error::Error;
use crate::models::{DeviceListing, DeviceRecord};

impl FloodlightClient {
    /// List every device known to the controller.
    ///
    /// `GET /wm/device/`
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.api_url("wm/device/")?;
        let listing: DeviceListing = self.get(url).await?;
        let devices = listing.into_devices();
        debug!(count = devices.len(), "listed devices");
        Ok(devices)
    }
}
