//! Settings loading and menu rendering
//!
//! Fetches the settings document, puts the device name into the page and
//! renders the camera menu.

use crate::{
    device_client::DeviceClient,
    error::{DeviceError, Error, Result},
    menu::Menu,
    page::{MENU_SETTINGS, NAME_CLASS, Page},
    services::failure_message,
    settings::{DEVICE_NAME_PLACEHOLDER, SettingsDocument},
};
use log::{debug, error, info};

/// Service for the settings document and the menu built from it
pub struct SettingsService;

impl SettingsService {
    /// Fetch the settings document from the device
    ///
    /// On failure the error is logged and, if a menu was requested, shown in
    /// the menu area so the page never keeps a stale menu silently.
    pub async fn fetch<C: DeviceClient, P: Page>(
        client: &C,
        page: &P,
        build_menu: bool,
    ) -> std::result::Result<SettingsDocument, DeviceError> {
        debug!("fetch settings (build_menu: {build_menu})");

        client.settings().await.inspect_err(|e| {
            error!("load settings failed: {e}");
            if build_menu {
                page.set_text(MENU_SETTINGS, &failure_message("Loading settings", e));
            }
        })
    }

    /// Replace the placeholder device name in all elements marked with the
    /// name class
    pub fn apply_device_name<P: Page>(page: &P, settings: &SettingsDocument) {
        if let Some(name) = settings.device_name() {
            info!("device name: {name}");
            page.replace_in_class(NAME_CLASS, DEVICE_NAME_PLACEHOLDER, name);
        }
    }

    /// Build the menu from the camera section and render it, replacing any
    /// previously rendered menu
    pub fn render_menu<P: Page>(page: &P, settings: Option<&SettingsDocument>) -> Result<Menu> {
        let Some(camera) = settings.and_then(|s| s.camera.as_ref()) else {
            let e = Error::MissingSection("camera");
            error!("build menu failed: {e}");
            page.set_text(MENU_SETTINGS, &e.to_string());
            return Err(e);
        };

        let menu = Menu::build(camera);
        debug!("menu built with {} rows", menu.rows().len());
        page.show_menu(MENU_SETTINGS, &menu);

        Ok(menu)
    }
}
