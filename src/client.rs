use async_trait::async_trait;

use crate::types::{Device, Snapshot};
use crate::Result;

/// Contract for the vendor cloud client. Authentication, token refresh and
/// transport are owned entirely by implementations; the coordinator treats
/// the client as opaque and never retries on its behalf.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Whether the stored credentials are currently valid. `Ok(false)` means
    /// the credentials were rejected and the user must re-authenticate;
    /// `Err` means the check itself could not be performed.
    async fn is_authenticated(&self) -> Result<bool>;

    /// Fetch the full device fleet across all hubs on the account.
    async fn fetch_all_devices(&self) -> Result<Snapshot>;

    /// Write the chlorinator output percentage for one device.
    async fn write_attribute(&self, device: &Device, value: u8) -> Result<()>;
}

#[async_trait]
impl<T: DeviceClient + ?Sized> DeviceClient for std::sync::Arc<T> {
    async fn is_authenticated(&self) -> Result<bool> {
        (**self).is_authenticated().await
    }

    async fn fetch_all_devices(&self) -> Result<Snapshot> {
        (**self).fetch_all_devices().await
    }

    async fn write_attribute(&self, device: &Device, value: u8) -> Result<()> {
        (**self).write_attribute(device, value).await
    }
}
