//! Settings document served by the device at `/settings.json`.

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};
use std::fmt;

/// Placeholder device name in page texts, replaced by `global.name`.
pub const DEVICE_NAME_PLACEHOLDER: &str = "ESP32-CAM";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SettingsDocument {
    #[serde(default)]
    pub global: GlobalSettings,
    #[serde(default)]
    pub camera: Option<CameraParameters>,
}

impl SettingsDocument {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Device display name, if the document carries a non-empty one.
    pub fn device_name(&self) -> Option<&str> {
        self.global
            .name
            .as_ref()
            .map(DisplayName::value)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GlobalSettings {
    #[serde(default)]
    pub name: Option<DisplayName>,
}

/// The device publishes its name as a `str` descriptor; older documents use a
/// plain string.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DisplayName {
    Plain(String),
    Descriptor { value: String },
}

impl DisplayName {
    pub fn value(&self) -> &str {
        match self {
            DisplayName::Plain(value) | DisplayName::Descriptor { value } => value,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CameraParameter {
    Str {
        value: String,
    },
    Int {
        value: i64,
        min: i64,
        max: i64,
    },
    Enum {
        value: String,
        #[serde(rename = "enum")]
        options: Vec<String>,
    },
}

/// Camera parameters in the order the device listed them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraParameters(Vec<(String, CameraParameter)>);

impl CameraParameters {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CameraParameter)> {
        self.0.iter().map(|(key, param)| (key.as_str(), param))
    }

    pub fn get(&self, key: &str) -> Option<&CameraParameter> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, param)| param)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, CameraParameter)> for CameraParameters {
    fn from_iter<I: IntoIterator<Item = (String, CameraParameter)>>(iter: I) -> Self {
        CameraParameters(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for CameraParameters {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = CameraParameters;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of camera parameter descriptors")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut params: Vec<(String, CameraParameter)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, param)) = map.next_entry::<String, CameraParameter>()? {
                    if params.iter().any(|(k, _)| *k == key) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate camera parameter \"{key}\""
                        )));
                    }
                    params.push((key, param));
                }
                Ok(CameraParameters(params))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
