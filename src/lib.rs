pub mod config;
pub mod device_client;
pub mod error;
pub mod http_client;
pub mod menu;
pub mod page;
pub mod services;
pub mod session;
pub mod settings;

pub use device_client::{DeviceClient, Esp32CamClient};
pub use error::{DeviceError, Error};
pub use page::{MemoryPage, Page};
pub use session::Session;
