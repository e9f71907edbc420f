use crate::{
    config::DeviceConfig,
    error::DeviceError,
    http_client::{device_http_client, discard_http_response, handle_http_response},
    menu::SettingChange,
    page::SelectedFile,
    settings::SettingsDocument,
};
use anyhow::Result;
use log::info;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use reqwest::{
    Client, Url,
    multipart::{Form, Part},
};
use std::time::Duration;
use trait_variant::make;

/// Longest value the device accepts for each Wi-Fi form field.
pub const MAX_FIELD_BYTES: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub struct FirmwareUpload {
    pub password: String,
    pub firmware: SelectedFile,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WifiSetup {
    pub password: String,
    pub ssid: String,
    pub wifi_password: String,
}

impl WifiSetup {
    /// Checks the limits the device enforces, in bytes and in the order the
    /// device checks them.
    pub fn check(&self) -> std::result::Result<(), String> {
        for (field, value) in [
            ("wifi ssid", &self.ssid),
            ("wifi pwd", &self.wifi_password),
            ("esp pwd", &self.password),
        ] {
            if value.len() > MAX_FIELD_BYTES {
                return Err(format!("{field} too big"));
            }
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct Esp32CamClient {
    client: Client,
    base_url: Url,
    upload_timeout: Duration,
}

#[make(Send)]
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait DeviceClient {
    async fn settings(&self) -> std::result::Result<SettingsDocument, DeviceError>;
    async fn set(&self, change: SettingChange) -> std::result::Result<(), DeviceError>;
    async fn command(&self, name: String) -> std::result::Result<(), DeviceError>;
    async fn upload_firmware(
        &self,
        upload: FirmwareUpload,
    ) -> std::result::Result<String, DeviceError>;
    async fn setup_wifi(&self, setup: WifiSetup) -> std::result::Result<String, DeviceError>;
}

impl Esp32CamClient {
    // API endpoint constants
    const SETTINGS_ENDPOINT: &str = "/settings.json";
    const SET_ENDPOINT: &str = "/set";
    const CMD_ENDPOINT: &str = "/cmd";
    const OTA_ENDPOINT: &str = "/ota";
    const WIFI_ENDPOINT: &str = "/wifi";

    pub fn new(config: &DeviceConfig) -> Result<Self> {
        let client = device_http_client(config.request_timeout)?;

        Ok(Esp32CamClient {
            client,
            base_url: config.url.clone(),
            upload_timeout: config.upload_timeout,
        })
    }

    fn build_url(&self, path: &str) -> Url {
        // Normalize path to always start with a single "/" below the base path
        let normalized_path = path.trim_start_matches('/');
        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base_path}/{normalized_path}"));
        url.set_query(None);
        url
    }

    /// GET request to the device, returns the body
    async fn get(&self, url: Url) -> std::result::Result<String, DeviceError> {
        info!("GET {url}");

        let res = self.client.get(url.clone()).send().await?;

        handle_http_response(res, &format!("GET {url}")).await
    }

    /// GET request whose answer body is of no interest, only the status counts
    async fn get_status(&self, url: Url) -> std::result::Result<(), DeviceError> {
        info!("GET {url}");

        let res = self.client.get(url).send().await?;

        discard_http_response(res).await
    }

    /// POST request with a multipart form body, returns the body
    async fn post_form(
        &self,
        path: &str,
        form: Form,
        timeout: Option<Duration>,
    ) -> std::result::Result<String, DeviceError> {
        let url = self.build_url(path);
        info!("POST {url}");

        let mut request = self.client.post(url.clone()).multipart(form);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let res = request.send().await?;

        handle_http_response(res, &format!("POST {url}")).await
    }
}

impl DeviceClient for Esp32CamClient {
    async fn settings(&self) -> std::result::Result<SettingsDocument, DeviceError> {
        let body = self.get(self.build_url(Self::SETTINGS_ENDPOINT)).await?;
        SettingsDocument::from_json(&body)
            .map_err(|e| DeviceError::MalformedBody(format!("failed to parse settings: {e}")))
    }

    async fn set(&self, change: SettingChange) -> std::result::Result<(), DeviceError> {
        let mut url = self.build_url(Self::SET_ENDPOINT);
        url.query_pairs_mut()
            .append_pair(&change.key, &change.value);

        self.get_status(url).await
    }

    async fn command(&self, name: String) -> std::result::Result<(), DeviceError> {
        let mut url = self.build_url(Self::CMD_ENDPOINT);
        url.query_pairs_mut().append_pair("cmd", &name);

        self.get_status(url).await
    }

    async fn upload_firmware(
        &self,
        upload: FirmwareUpload,
    ) -> std::result::Result<String, DeviceError> {
        let firmware = Part::bytes(upload.firmware.bytes).file_name(upload.firmware.name);
        let form = Form::new()
            .text("esp-pwd", upload.password)
            .part("firmware", firmware);

        self.post_form(Self::OTA_ENDPOINT, form, Some(self.upload_timeout))
            .await
    }

    async fn setup_wifi(&self, setup: WifiSetup) -> std::result::Result<String, DeviceError> {
        let form = Form::new()
            .text("esp-pwd", setup.password)
            .text("wifi-ssid", setup.ssid)
            .text("wifi-pwd", setup.wifi_password);

        self.post_form(Self::WIFI_ENDPOINT, form, None).await
    }
}
