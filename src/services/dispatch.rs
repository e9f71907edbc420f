//! Setting and command dispatch
//!
//! Both send one GET request and ignore the answer body. Failures are logged
//! and returned, there are no retries.

use crate::{device_client::DeviceClient, error::Result, menu::SettingChange};
use log::{debug, error};

/// Persist the current settings on the device.
pub const COMMAND_SAVE: &str = "save";
pub const COMMAND_INFO: &str = "info";
/// Reboot the device.
pub const COMMAND_RESET: &str = "reset";

pub struct DispatchService;

impl DispatchService {
    pub async fn set_setting<C: DeviceClient>(client: &C, change: SettingChange) -> Result<()> {
        debug!("set_setting() called: {}={}", change.key, change.value);

        let key = change.key.clone();
        client.set(change).await.map_err(|e| {
            error!("set {key} failed: {e}");
            e.into()
        })
    }

    pub async fn run_command<C: DeviceClient>(client: &C, name: &str) -> Result<()> {
        debug!("run_command() called: {name}");

        client.command(name.to_string()).await.map_err(|e| {
            error!("command {name} failed: {e}");
            e.into()
        })
    }
}
