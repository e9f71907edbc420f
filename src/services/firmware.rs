//! Firmware update service
//!
//! Sends the selected firmware image to the device and, when the device
//! reports that it reboots into the new image, sends the page back to the
//! main page once the reboot had time to finish.

use crate::{
    device_client::{DeviceClient, FirmwareUpload},
    error::{Error, Result},
    page::{ESP_PWD, FIRMWARE, MAIN_PAGE, OTA_MSG, Page},
    services::{UPLOADING_MSG, failure_message},
};
use log::{debug, error, info};
use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{Instant, sleep_until},
};

/// Time the device needs to reboot into the new firmware.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(6000);

/// Whether the device's answer says it is rebooting into the new image.
pub fn reports_reboot(message: &str) -> bool {
    message.contains("booting")
}

#[derive(Debug)]
pub struct UploadOutcome {
    /// Text the device answered, as shown on the page.
    pub message: String,
    /// Pending navigation to the main page, if the device reboots.
    pub redirect: Option<JoinHandle<()>>,
}

/// Service for firmware uploads
pub struct FirmwareService;

impl FirmwareService {
    /// Upload the firmware selected on the page
    ///
    /// # Arguments
    /// * `client` - Device client the form is posted with
    /// * `page` - Page holding the password field and the selected file
    ///
    /// # Returns
    /// The device's answer and the scheduled redirect, if any
    pub async fn upload<C: DeviceClient, P: Page + 'static>(
        client: &C,
        page: &Arc<P>,
    ) -> Result<UploadOutcome> {
        let form = page
            .field_value(ESP_PWD)
            .ok_or(Error::MissingElement(ESP_PWD))
            .and_then(|password| {
                page.selected_file(FIRMWARE)
                    .map(|firmware| (password, firmware))
                    .ok_or(Error::NoFileSelected)
            });
        let (password, firmware) = match form {
            Ok(form) => form,
            Err(e) => {
                error!("firmware upload rejected: {e}");
                page.set_text(OTA_MSG, &e.to_string());
                return Err(e);
            }
        };

        debug!(
            "upload firmware {} ({} bytes)",
            firmware.name,
            firmware.bytes.len()
        );
        page.set_text(OTA_MSG, UPLOADING_MSG);

        let message = match client
            .upload_firmware(FirmwareUpload { password, firmware })
            .await
        {
            Ok(message) => message,
            Err(e) => {
                error!("firmware upload failed: {e}");
                page.set_text(OTA_MSG, &failure_message("Upload", &e));
                return Err(e.into());
            }
        };

        info!("firmware upload answered: {message}");
        page.set_text(OTA_MSG, &message);

        let redirect = reports_reboot(&message).then(|| Self::schedule_redirect(Arc::clone(page)));

        Ok(UploadOutcome { message, redirect })
    }

    fn schedule_redirect<P: Page + 'static>(page: Arc<P>) -> JoinHandle<()> {
        let deadline = Instant::now() + REDIRECT_DELAY;
        debug!("redirect to {MAIN_PAGE} in {}ms", REDIRECT_DELAY.as_millis());

        tokio::spawn(async move {
            sleep_until(deadline).await;
            page.navigate(MAIN_PAGE);
        })
    }
}
