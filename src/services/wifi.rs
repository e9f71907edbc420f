//! Wi-Fi setup service

use crate::{
    device_client::{DeviceClient, WifiSetup},
    error::{Error, Result},
    page::{ESP_PWD, Page, WIFI_MSG, WIFI_PWD, WIFI_SSID},
    services::{UPLOADING_MSG, failure_message},
};
use log::{debug, error, info};

pub struct WifiService;

impl WifiService {
    /// Send the Wi-Fi form to the device and show its answer
    ///
    /// Values the device would refuse are rejected before anything is sent.
    /// The page stays where it is, the device reboots into the new network on
    /// its own.
    pub async fn setup<C: DeviceClient, P: Page>(client: &C, page: &P) -> Result<String> {
        let field = |id: &'static str| page.field_value(id).ok_or(Error::MissingElement(id));
        let setup = WifiSetup {
            password: field(ESP_PWD)?,
            ssid: field(WIFI_SSID)?,
            wifi_password: field(WIFI_PWD)?,
        };

        if let Err(reason) = setup.check() {
            error!("wifi setup rejected: {reason}");
            page.set_text(WIFI_MSG, &reason);
            return Err(Error::InvalidForm(reason));
        }

        debug!("setup wifi for ssid {}", setup.ssid);
        page.set_text(WIFI_MSG, UPLOADING_MSG);

        match client.setup_wifi(setup).await {
            Ok(message) => {
                info!("wifi setup answered: {message}");
                page.set_text(WIFI_MSG, &message);
                Ok(message)
            }
            Err(e) => {
                error!("wifi setup failed: {e}");
                page.set_text(WIFI_MSG, &failure_message("Wi-Fi setup", &e));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{device_client::MockDeviceClient, error::DeviceError, page::MemoryPage};

    #[tokio::test]
    async fn posts_fields_and_shows_answer() {
        let mut client = MockDeviceClient::new();
        client
            .expect_setup_wifi()
            .withf(|setup| {
                setup.password == "secret"
                    && setup.ssid == "home"
                    && setup.wifi_password == "hunter2"
            })
            .times(1)
            .returning(|_| Box::pin(async { Ok("wifi settings saved, rebooting".to_string()) }));
        let page = MemoryPage::wifi_page("secret", "home", "hunter2");

        let answer = WifiService::setup(&client, &page).await.expect("setup");

        assert_eq!(answer, "wifi settings saved, rebooting");
        assert_eq!(
            page.text(WIFI_MSG).as_deref(),
            Some("wifi settings saved, rebooting")
        );
        assert!(page.locations().is_empty());
    }

    #[tokio::test]
    async fn rejects_oversized_fields_without_request() {
        let mut client = MockDeviceClient::new();
        client.expect_setup_wifi().never();
        let long_password = "p".repeat(65);
        let page = MemoryPage::wifi_page("secret", "home", &long_password);

        let result = WifiService::setup(&client, &page).await;

        assert!(matches!(result, Err(Error::InvalidForm(_))));
        assert_eq!(page.text(WIFI_MSG).as_deref(), Some("wifi pwd too big"));
    }

    #[tokio::test]
    async fn shows_malformed_answer() {
        let mut client = MockDeviceClient::new();
        client
            .expect_setup_wifi()
            .times(1)
            .returning(|_| {
                Box::pin(async { Err(DeviceError::MalformedBody("invalid UTF-8".to_string())) })
            });
        let page = MemoryPage::wifi_page("secret", "home", "hunter2");

        let result = WifiService::setup(&client, &page).await;

        assert!(result.is_err());
        assert_eq!(
            page.text(WIFI_MSG).as_deref(),
            Some("Wi-Fi setup failed: malformed response (invalid UTF-8)")
        );
    }

    #[tokio::test]
    async fn requires_form_fields() {
        let mut client = MockDeviceClient::new();
        client.expect_setup_wifi().never();
        let page = MemoryPage::default().with_field(ESP_PWD, "secret");

        let result = WifiService::setup(&client, &page).await;

        assert!(matches!(result, Err(Error::MissingElement(WIFI_SSID))));
    }
}
