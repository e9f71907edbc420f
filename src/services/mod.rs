pub mod dispatch;
pub mod firmware;
pub mod settings;
pub mod wifi;

use crate::error::DeviceError;

/// Status text shown while a form is being sent to the device.
pub const UPLOADING_MSG: &str = "Uploading, please wait...";

/// User-facing text for a failed device request, one wording per failure kind.
pub fn failure_message(action: &str, error: &DeviceError) -> String {
    match error {
        DeviceError::Unreachable(_) => format!("{action} failed: device unreachable"),
        DeviceError::Timeout(_) => format!("{action} failed: device did not answer in time"),
        DeviceError::Status { status, body } if body.trim().is_empty() => {
            format!("{action} failed: HTTP {status}")
        }
        DeviceError::Status { status, body } => {
            format!("{action} failed: HTTP {status}: {}", body.trim())
        }
        DeviceError::MalformedBody(reason) => {
            format!("{action} failed: malformed response ({reason})")
        }
    }
}
