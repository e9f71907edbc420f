//! The page surface the flows read from and write to.
//!
//! A browser shell maps these calls onto the DOM; [`MemoryPage`] keeps the
//! elements in memory for the command line shell and for tests.

use crate::menu::Menu;
use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

pub const MENU_CONTENT: &str = "menu-content";
pub const MENU_SETTINGS: &str = "menu-settings";
pub const OTA_MSG: &str = "ota-msg";
pub const FIRMWARE: &str = "firmware";
pub const ESP_PWD: &str = "esp-pwd";
pub const WIFI_MSG: &str = "wifi-msg";
pub const WIFI_SSID: &str = "wifi-ssid";
pub const WIFI_PWD: &str = "wifi-pwd";

/// Marker class of elements whose text carries the device name.
pub const NAME_CLASS: &str = "name";

/// Main settings page, target of the redirect after a firmware update.
pub const MAIN_PAGE: &str = "/esp32-cam.html";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub async fn read(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "firmware.bin".to_string());

        Ok(SelectedFile { name, bytes })
    }
}

pub trait Page: Send + Sync {
    fn text(&self, id: &str) -> Option<String>;
    fn set_text(&self, id: &str, text: &str);
    fn field_value(&self, id: &str) -> Option<String>;
    fn selected_file(&self, id: &str) -> Option<SelectedFile>;
    /// Replaces the first occurrence of `from` in the text of every element
    /// tagged with `class`.
    fn replace_in_class(&self, class: &str, from: &str, to: &str);
    /// Replaces whatever `id` rendered before with `menu`.
    fn show_menu(&self, id: &str, menu: &Menu);
    fn toggle_visibility(&self, id: &str);
    fn navigate(&self, location: &str);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub classes: Vec<String>,
    pub text: String,
    pub value: Option<String>,
    pub file: Option<SelectedFile>,
    pub menu: Option<Menu>,
    pub hidden: bool,
}

#[derive(Debug, Default)]
struct PageState {
    elements: BTreeMap<String, Element>,
    locations: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<PageState>,
}

impl MemoryPage {
    /// Main page: title, hidden menu and the settings table.
    pub fn main_page() -> Self {
        MemoryPage::default()
            .with_class("title", NAME_CLASS, "ESP32-CAM live view")
            .with_element(
                MENU_CONTENT,
                Element {
                    hidden: true,
                    ..Default::default()
                },
            )
            .with_text(MENU_SETTINGS, "")
    }

    pub fn ota_page(password: &str, firmware: Option<SelectedFile>) -> Self {
        MemoryPage::default()
            .with_class("title", NAME_CLASS, "ESP32-CAM firmware update")
            .with_field(ESP_PWD, password)
            .with_element(
                FIRMWARE,
                Element {
                    file: firmware,
                    ..Default::default()
                },
            )
            .with_text(OTA_MSG, "")
    }

    pub fn wifi_page(password: &str, ssid: &str, wifi_password: &str) -> Self {
        MemoryPage::default()
            .with_class("title", NAME_CLASS, "ESP32-CAM Wi-Fi setup")
            .with_field(ESP_PWD, password)
            .with_field(WIFI_SSID, ssid)
            .with_field(WIFI_PWD, wifi_password)
            .with_text(WIFI_MSG, "")
    }

    pub fn with_element(self, id: &str, element: Element) -> Self {
        self.lock().elements.insert(id.to_string(), element);
        self
    }

    pub fn with_text(self, id: &str, text: &str) -> Self {
        self.with_element(
            id,
            Element {
                text: text.to_string(),
                ..Default::default()
            },
        )
    }

    pub fn with_class(self, id: &str, class: &str, text: &str) -> Self {
        self.with_element(
            id,
            Element {
                classes: vec![class.to_string()],
                text: text.to_string(),
                ..Default::default()
            },
        )
    }

    pub fn with_field(self, id: &str, value: &str) -> Self {
        self.with_element(
            id,
            Element {
                value: Some(value.to_string()),
                ..Default::default()
            },
        )
    }

    pub fn element(&self, id: &str) -> Option<Element> {
        self.lock().elements.get(id).cloned()
    }

    pub fn menu(&self, id: &str) -> Option<Menu> {
        self.lock().elements.get(id).and_then(|e| e.menu.clone())
    }

    pub fn texts_with_class(&self, class: &str) -> Vec<String> {
        self.lock()
            .elements
            .values()
            .filter(|e| e.classes.iter().any(|c| c == class))
            .map(|e| e.text.clone())
            .collect()
    }

    /// Every location the page was sent to, oldest first.
    pub fn locations(&self) -> Vec<String> {
        self.lock().locations.clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Page for MemoryPage {
    fn text(&self, id: &str) -> Option<String> {
        self.lock().elements.get(id).map(|e| e.text.clone())
    }

    fn set_text(&self, id: &str, text: &str) {
        let mut state = self.lock();
        let element = state.elements.entry(id.to_string()).or_default();
        element.text = text.to_string();
        element.menu = None;
    }

    fn field_value(&self, id: &str) -> Option<String> {
        self.lock().elements.get(id).and_then(|e| e.value.clone())
    }

    fn selected_file(&self, id: &str) -> Option<SelectedFile> {
        self.lock().elements.get(id).and_then(|e| e.file.clone())
    }

    fn replace_in_class(&self, class: &str, from: &str, to: &str) {
        self.lock()
            .elements
            .values_mut()
            .filter(|e| e.classes.iter().any(|c| c == class))
            .for_each(|e| e.text = e.text.replacen(from, to, 1));
    }

    fn show_menu(&self, id: &str, menu: &Menu) {
        let mut state = self.lock();
        let element = state.elements.entry(id.to_string()).or_default();
        element.text.clear();
        element.menu = Some(menu.clone());
    }

    fn toggle_visibility(&self, id: &str) {
        if let Some(element) = self.lock().elements.get_mut(id) {
            element.hidden = !element.hidden;
        }
    }

    fn navigate(&self, location: &str) {
        self.lock().locations.push(location.to_string());
    }
}
