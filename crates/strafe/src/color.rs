//! RGBA colours.
//!
//! Entity definitions name their colour (`"blue"`), map obstacles give 0–255
//! channels (`{"r": 139, "g": 69, "b": 19}`). Both deserialize into the same
//! [`Color`]. Unknown names fall back to white.

use serde::Deserialize;

/// An RGBA color with floating-point components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "ColorDef")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 128.0 / 255.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const BROWN: Self = Self::rgb(139.0 / 255.0, 69.0 / 255.0, 19.0 / 255.0);

    /// Create a color from RGB (alpha = 1).
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 0–255 channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Look up a named colour (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "white" => Some(Self::WHITE),
            "black" => Some(Self::BLACK),
            "red" => Some(Self::RED),
            "green" => Some(Self::GREEN),
            "blue" => Some(Self::BLUE),
            "yellow" => Some(Self::YELLOW),
            "brown" => Some(Self::BROWN),
            _ => None,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Wire form: either a name or 0–255 channels.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorDef {
    Name(String),
    Channels { r: u8, g: u8, b: u8 },
}

impl From<ColorDef> for Color {
    fn from(def: ColorDef) -> Self {
        match def {
            ColorDef::Name(name) => Color::from_name(&name).unwrap_or_else(|| {
                log::warn!("Unknown colour \"{}\", using white", name);
                Color::WHITE
            }),
            ColorDef::Channels { r, g, b } => Color::rgb8(r, g, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colours() {
        assert_eq!(Color::from_name("Yellow"), Some(Color::YELLOW));
        assert_eq!(Color::from_name("mauve"), None);
    }

    #[test]
    fn deserialize_name_and_channels() {
        let named: Color = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(named, Color::RED);

        let channels: Color = serde_json::from_str(r#"{"r": 255, "g": 0, "b": 255}"#).unwrap();
        assert_eq!(channels, Color::rgb(1.0, 0.0, 1.0));

        let unknown: Color = serde_json::from_str("\"mauve\"").unwrap();
        assert_eq!(unknown, Color::WHITE);
    }

    #[test]
    fn channel_out_of_range_is_rejected() {
        assert!(serde_json::from_str::<Color>(r#"{"r": 300, "g": 0, "b": 0}"#).is_err());
    }
}
