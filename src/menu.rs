//! Settings menu built from the camera section of the settings document.

use crate::{
    error::{Error, Result},
    settings::{CameraParameter, CameraParameters},
};
use std::fmt;

/// Prefix of every setting key sent to the device for a camera parameter.
pub const CAMERA_PREFIX: &str = "camera.";

/// Column span of the value cell of read-only rows.
pub const WIDE_COLSPAN: u8 = 99;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Menu {
    rows: Vec<MenuRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuRow {
    pub key: String,
    pub control: Control,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Control {
    Text(String),
    Range(RangeControl),
    Select(SelectControl),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RangeControl {
    pub setting: String,
    pub min: i64,
    pub max: i64,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectControl {
    pub setting: String,
    pub options: Vec<String>,
    pub value: String,
}

/// One table cell of a rendered row.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell<'a> {
    Label(String),
    Text { text: &'a str, colspan: u8 },
    Bound(i64),
    Range(&'a RangeControl),
    Select(&'a SelectControl),
}

/// A validated change of one setting, ready for the setting dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingChange {
    pub key: String,
    pub value: String,
}

impl Menu {
    pub fn build(camera: &CameraParameters) -> Self {
        let rows = camera
            .iter()
            .map(|(key, param)| MenuRow {
                key: key.to_string(),
                control: Control::from_parameter(key, param),
            })
            .collect();

        Menu { rows }
    }

    pub fn rows(&self) -> &[MenuRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up the control bound to `setting` (e.g. `camera.gain`) and checks
    /// `value` against it.
    pub fn change(&self, setting: &str, value: &str) -> Result<SettingChange> {
        let row = self
            .rows
            .iter()
            .find(|row| row.setting() == setting)
            .ok_or_else(|| Error::UnknownSetting(setting.to_string()))?;

        let invalid = |reason: String| Error::InvalidValue {
            key: setting.to_string(),
            value: value.to_string(),
            reason,
        };

        let value = match &row.control {
            Control::Text(_) => return Err(Error::ReadOnlySetting(setting.to_string())),
            Control::Range(range) => {
                let parsed: i64 = value
                    .trim()
                    .parse()
                    .map_err(|e| invalid(format!("not an integer ({e})")))?;
                if !(range.min..=range.max).contains(&parsed) {
                    return Err(invalid(format!(
                        "outside of [{}, {}]",
                        range.min, range.max
                    )));
                }
                parsed.to_string()
            }
            Control::Select(select) => {
                if !select.options.iter().any(|option| option == value) {
                    return Err(invalid(format!(
                        "expected one of {}",
                        select.options.join(", ")
                    )));
                }
                value.to_string()
            }
        };

        Ok(SettingChange {
            key: row.setting(),
            value,
        })
    }
}

impl MenuRow {
    /// Setting key the row's control is bound to.
    pub fn setting(&self) -> String {
        format!("{CAMERA_PREFIX}{}", self.key)
    }

    pub fn label(&self) -> String {
        format!("{} ", self.key)
    }

    pub fn cells(&self) -> Vec<Cell<'_>> {
        let mut cells = vec![Cell::Label(self.label())];
        match &self.control {
            Control::Text(text) => cells.push(Cell::Text {
                text,
                colspan: WIDE_COLSPAN,
            }),
            Control::Range(range) => {
                cells.push(Cell::Bound(range.min));
                cells.push(Cell::Range(range));
                cells.push(Cell::Bound(range.max));
            }
            Control::Select(select) => cells.push(Cell::Select(select)),
        }
        cells
    }
}

impl Control {
    fn from_parameter(key: &str, param: &CameraParameter) -> Self {
        let setting = format!("{CAMERA_PREFIX}{key}");
        match param {
            CameraParameter::Str { value } => Control::Text(value.clone()),
            CameraParameter::Int { value, min, max } => Control::Range(RangeControl {
                setting,
                min: *min,
                max: *max,
                value: *value,
            }),
            CameraParameter::Enum { value, options } => Control::Select(SelectControl {
                setting,
                options: options.clone(),
                value: value.clone(),
            }),
        }
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|row| row.label().len())
            .max()
            .unwrap_or(0);

        for row in &self.rows {
            write!(f, "{:width$}", row.label())?;
            match &row.control {
                Control::Text(text) => writeln!(f, "{text}")?,
                Control::Range(range) => writeln!(
                    f,
                    "{} [{}] {}  ({})",
                    range.min, range.value, range.max, range.setting
                )?,
                Control::Select(select) => writeln!(
                    f,
                    "<{}> {}  ({})",
                    select.value,
                    select.options.join(" | "),
                    select.setting
                )?,
            }
        }
        Ok(())
    }
}
