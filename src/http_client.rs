use crate::error::DeviceError;
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use std::time::Duration;

/// Create the HTTP client used to talk to the camera
///
/// # Arguments
/// * `timeout` - Default timeout applied to every request, individual requests
///   may override it (e.g. the firmware upload)
///
/// # Examples
/// ```no_run
/// use esp32_cam_ui::http_client::device_http_client;
/// use std::time::Duration;
///
/// let client = device_http_client(Duration::from_secs(10))
///     .expect("failed to create client");
/// ```
pub fn device_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .context("failed to create device HTTP client")
}

/// Handle HTTP response by checking status and extracting body
///
/// The device answers plain text. A non-2xx status keeps the body so it can be
/// shown to the user, a body that is not UTF-8 counts as malformed.
///
/// # Arguments
/// * `res` - The HTTP response to handle
/// * `context_msg` - Context message describing the request (e.g., "GET /settings.json")
///
/// # Returns
/// * `Ok(String)` - The response body if the status is successful
/// * `Err(DeviceError)` - The classified failure
pub async fn handle_http_response(
    res: Response,
    context_msg: &str,
) -> std::result::Result<String, DeviceError> {
    let status = res.status();
    let bytes = res.bytes().await?;

    let body = String::from_utf8(bytes.to_vec()).map_err(|e| {
        DeviceError::MalformedBody(format!("{context_msg} returned invalid UTF-8: {e}"))
    })?;

    if !status.is_success() {
        return Err(DeviceError::Status { status, body });
    }

    Ok(body)
}

/// Handle an HTTP response whose body is ignored on success
///
/// Only a non-2xx status is a failure. Its body is kept for display, with
/// invalid UTF-8 replaced instead of rejected.
pub async fn discard_http_response(res: Response) -> std::result::Result<(), DeviceError> {
    let status = res.status();
    if status.is_success() {
        return Ok(());
    }

    let bytes = res.bytes().await?;
    Err(DeviceError::Status {
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
