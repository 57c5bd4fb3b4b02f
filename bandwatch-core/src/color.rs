//! RGB colors and the meter palette.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque 24-bit color. Serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) string.
    pub fn from_hex(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor {
            field: "color".to_string(),
            value: value.to_string(),
        };
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// Colors used by the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Palette {
    /// Bar fill while the sample is below the cut-off.
    pub normal: Rgb,
    /// Bar fill once the sample reaches the cut-off.
    pub alert: Rgb,
    /// Cut-off line and label.
    pub reference: Rgb,
    /// Alert marker text.
    pub marker: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            normal: Rgb::new(0x69, 0xb3, 0xa2),
            alert: Rgb::new(0xff, 0x4d, 0x4d),
            reference: Rgb::new(0xff, 0x00, 0x00),
            marker: Rgb::new(0xff, 0x00, 0x00),
        }
    }
}
