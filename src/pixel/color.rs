use std::fmt;
use std::str::FromStr;

use egui::Color32;

use crate::error::Error;

/// One grid cell color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Self = Self([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub const fn from_array(channels: [u8; 3]) -> Self {
        Self(channels)
    }

    pub const fn to_color32(self) -> Color32 {
        let [r, g, b] = self.0;
        Color32::from_rgb(r, g, b)
    }

    /// Drops the alpha channel of an egui color.
    pub const fn from_color32(color: Color32) -> Self {
        Self([color.r(), color.g(), color.b()])
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// Parse exactly `#` followed by six hex digits.
    pub fn from_hex(value: &str) -> Result<Self, Error> {
        let digits = value
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| Error::format(value))?;
        let channel = |idx: usize| {
            u8::from_str_radix(&digits[idx..idx + 2], 16).map_err(|_| Error::format(value))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(px: image::Rgb<u8>) -> Self {
        Self(px.0)
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(color: Rgb) -> Self {
        Self(color.0)
    }
}
