use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the device, classified so each kind can be shown
/// to the user differently.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("device did not answer in time: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("device answered with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed response: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for DeviceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DeviceError::Timeout(e)
        } else if e.is_decode() && !interrupted_body(&e) {
            DeviceError::MalformedBody(e.to_string())
        } else {
            DeviceError::Unreachable(e)
        }
    }
}

/// Whether a decode failure was caused by the connection dropping while the
/// body was read, not by the body's content.
fn interrupted_body(e: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(e);
    while let Some(err) = source {
        if err
            .downcast_ref::<reqwest::Error>()
            .is_some_and(reqwest::Error::is_body)
        {
            return true;
        }
        source = std::error::Error::source(err);
    }
    false
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("page element \"{0}\" not found")]
    MissingElement(&'static str),

    #[error("no firmware file selected")]
    NoFileSelected,

    #[error("settings document has no \"{0}\" section")]
    MissingSection(&'static str),

    #[error("unknown setting \"{0}\"")]
    UnknownSetting(String),

    #[error("setting \"{0}\" is read-only")]
    ReadOnlySetting(String),

    #[error("invalid value \"{value}\" for \"{key}\": {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("invalid form: {0}")]
    InvalidForm(String),
}

pub type Result<T> = std::result::Result<T, Error>;
