use anyhow::{Context, Result};
use reqwest::Url;
use std::{env, time::Duration};

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Camera device configuration
    pub device: DeviceConfig,
}

#[derive(Clone, Debug)]
pub struct DeviceConfig {
    pub url: Url,
    /// Timeout of settings, set, command and Wi-Fi requests
    pub request_timeout: Duration,
    /// Timeout of the firmware upload
    pub upload_timeout: Duration,
}

impl AppConfig {
    /// Load all configuration from environment variables
    pub fn load() -> Result<Self> {
        let device = DeviceConfig::load()?;

        Ok(Self { device })
    }
}

impl DeviceConfig {
    pub const DEFAULT_URL: &str = "http://192.168.4.1";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 300;

    fn load() -> Result<Self> {
        let url = env::var("DEVICE_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_string());
        let url = Self::parse_url(&url)?;

        let request_timeout = Self::timeout_from_env(
            "REQUEST_TIMEOUT_SECS",
            Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let upload_timeout =
            Self::timeout_from_env("UPLOAD_TIMEOUT_SECS", Self::DEFAULT_UPLOAD_TIMEOUT_SECS)?;

        Ok(Self {
            url,
            request_timeout,
            upload_timeout,
        })
    }

    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: Self::parse_url(url)?,
            request_timeout: Duration::from_secs(Self::DEFAULT_REQUEST_TIMEOUT_SECS),
            upload_timeout: Duration::from_secs(Self::DEFAULT_UPLOAD_TIMEOUT_SECS),
        })
    }

    pub fn parse_url(url: &str) -> Result<Url> {
        let url = Url::parse(url).with_context(|| format!("failed to parse device url: {url}"))?;

        anyhow::ensure!(
            matches!(url.scheme(), "http" | "https"),
            "failed since device url is not http(s): {url}"
        );

        Ok(url)
    }

    fn timeout_from_env(var: &str, default_secs: u64) -> Result<Duration> {
        let secs = match env::var(var) {
            Ok(value) => value
                .parse::<u64>()
                .with_context(|| format!("failed to parse {var}: invalid format"))?,
            Err(_) => default_secs,
        };

        anyhow::ensure!(secs > 0, "failed to parse {var}: must be greater than 0");

        Ok(Duration::from_secs(secs))
    }
}
