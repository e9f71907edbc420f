//! One page session against one device.
//!
//! The session owns the settings document of the last successful load and the
//! menu built from it. Every operation is a single request and reports its
//! outcome on the page.

use crate::{
    device_client::DeviceClient,
    error::{Error, Result},
    menu::{Menu, SettingChange},
    page::{MENU_CONTENT, Page},
    services::{
        dispatch::DispatchService,
        firmware::{FirmwareService, UploadOutcome},
        settings::SettingsService,
        wifi::WifiService,
    },
    settings::SettingsDocument,
};
use log::debug;
use std::sync::Arc;

pub struct Session<C: DeviceClient, P: Page + 'static> {
    client: C,
    page: Arc<P>,
    settings: Option<SettingsDocument>,
    menu: Option<Menu>,
}

impl<C: DeviceClient, P: Page + 'static> Session<C, P> {
    pub fn new(client: C, page: Arc<P>) -> Self {
        Session {
            client,
            page,
            settings: None,
            menu: None,
        }
    }

    /// Fetch `/settings.json`, put the device name into the page and, if
    /// requested, rebuild the menu.
    ///
    /// A failed fetch keeps the previously loaded document. When a menu was
    /// requested, any failure also drops the previous menu.
    pub async fn load_settings(&mut self, build_menu: bool) -> Result<()> {
        let settings = match SettingsService::fetch(&self.client, &*self.page, build_menu).await {
            Ok(settings) => settings,
            Err(e) => {
                if build_menu {
                    self.menu = None;
                }
                return Err(e.into());
            }
        };
        SettingsService::apply_device_name(&*self.page, &settings);
        self.settings = Some(settings);

        if build_menu {
            self.build_menu()?;
        }

        Ok(())
    }

    /// Render the menu of the loaded document, replacing the previous one.
    pub fn build_menu(&mut self) -> Result<&Menu> {
        self.menu = None;
        let menu = SettingsService::render_menu(&*self.page, self.settings.as_ref())?;
        Ok(self.menu.insert(menu))
    }

    pub fn toggle_menu(&self) {
        debug!("toggle menu");
        self.page.toggle_visibility(MENU_CONTENT);
    }

    /// Change the setting bound to a menu control, e.g. `camera.gain`.
    ///
    /// The value is checked against the control first; an invalid value
    /// sends nothing.
    pub async fn change_setting(&self, setting: &str, value: &str) -> Result<()> {
        let change = self
            .menu
            .as_ref()
            .ok_or_else(|| Error::UnknownSetting(setting.to_string()))?
            .change(setting, value)?;

        DispatchService::set_setting(&self.client, change).await
    }

    /// Send `key=value` as is, without a menu check.
    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let change = SettingChange {
            key: key.to_string(),
            value: value.to_string(),
        };

        DispatchService::set_setting(&self.client, change).await
    }

    pub async fn run_command(&self, name: &str) -> Result<()> {
        DispatchService::run_command(&self.client, name).await
    }

    pub async fn upload_firmware(&self) -> Result<UploadOutcome> {
        FirmwareService::upload(&self.client, &self.page).await
    }

    pub async fn setup_wifi(&self) -> Result<String> {
        WifiService::setup(&self.client, &*self.page).await
    }

    pub fn settings(&self) -> Option<&SettingsDocument> {
        self.settings.as_ref()
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn page(&self) -> &Arc<P> {
        &self.page
    }
}
