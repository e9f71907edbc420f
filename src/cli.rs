use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "esp32-cam-ui",
    version,
    about = "Configure an ESP32 camera: settings menu, commands, firmware and Wi-Fi updates"
)]
pub struct Cli {
    /// Device base URL, overrides DEVICE_URL.
    #[arg(short, long, global = true)]
    pub device: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the settings and print the camera menu.
    Menu,
    /// Change one setting.
    Set(SetArgs),
    /// Run a device command (save, info, reset).
    Cmd {
        name: String,
    },
    /// Upload a firmware image.
    Ota(OtaArgs),
    /// Store new Wi-Fi credentials on the device.
    Wifi(WifiArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Setting key, e.g. `camera.gain` or just `gain` for a camera parameter.
    pub key: String,
    pub value: String,

    /// Send the key as is, without checking it against the menu.
    #[arg(long)]
    pub unchecked: bool,
}

#[derive(Debug, Args)]
pub struct OtaArgs {
    /// Device password.
    #[arg(short, long, env = "ESP_PWD", hide_env_values = true)]
    pub password: String,

    /// Firmware image to upload.
    pub firmware: PathBuf,
}

#[derive(Debug, Args)]
pub struct WifiArgs {
    /// Device password.
    #[arg(short, long, env = "ESP_PWD", hide_env_values = true)]
    pub password: String,

    #[arg(short, long)]
    pub ssid: String,

    #[arg(short, long, env = "WIFI_PWD", hide_env_values = true)]
    pub wifi_password: String,
}
