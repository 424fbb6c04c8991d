use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Mix `self` on top of `below` with the given opacity.
    ///
    /// `alpha` is clamped to `[0, 1]`; 1 yields `self`, 0 yields `below`.
    pub fn over(self, below: Color, alpha: f32) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| -> u8 {
            let value = top as f32 * alpha + bottom as f32 * (1.0 - alpha);
            value.round().clamp(0.0, 255.0) as u8
        };
        Color::new(mix(self.r, below.r), mix(self.g, below.g), mix(self.b, below.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode([self.r, self.g, self.b]))
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        let bytes = hex::decode(digits).map_err(|_| ColorError::InvalidHex(input.to_string()))?;
        match bytes.as_slice() {
            [r, g, b] => Ok(Color::new(*r, *g, *b)),
            _ => Err(ColorError::InvalidLength(input.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        crossterm::style::Color::Rgb { r: color.r, g: color.g, b: color.b }
    }
}

/// Errors that can occur when parsing colors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("'{0}' is not a hex color")]
    InvalidHex(String),

    #[error("'{0}' must have exactly 6 hex digits")]
    InvalidLength(String),
}

/// A translucent color expressed in HSL space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
    /// Hue in degrees, `[0, 360)`
    pub hue: f32,
    /// Saturation, `[0, 100]`
    pub saturation: f32,
    /// Lightness, `[0, 100]`
    pub lightness: f32,
    /// Opacity, `[0, 1]`
    pub alpha: f32,
}

impl Hsla {
    pub fn new(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self { hue, saturation, lightness, alpha }
    }

    /// Resolve to an opaque color by compositing over `surface`.
    pub fn over(&self, surface: Color) -> Color {
        hsl_to_rgb(self.hue, self.saturation, self.lightness).over(surface, self.alpha)
    }
}

/// Convert HSL to RGB color
/// H: hue (0-360), S: saturation (0-100), L: lightness (0-100)
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    let h = h.rem_euclid(360.0);
    let s = s / 100.0;
    let l = l / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::new(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::red(0.0, Color::new(255, 0, 0))]
    #[case::yellow(60.0, Color::new(255, 255, 0))]
    #[case::green(120.0, Color::new(0, 255, 0))]
    #[case::cyan(180.0, Color::new(0, 255, 255))]
    #[case::blue(240.0, Color::new(0, 0, 255))]
    #[case::magenta(300.0, Color::new(255, 0, 255))]
    #[case::wrapped(420.0, Color::new(255, 255, 0))]
    fn primary_hues(#[case] hue: f32, #[case] expected: Color) {
        assert_eq!(hsl_to_rgb(hue, 100.0, 50.0), expected);
    }

    #[test]
    fn grayscale_without_saturation() {
        assert_eq!(hsl_to_rgb(123.0, 0.0, 50.0), Color::new(128, 128, 128));
    }

    #[rstest]
    #[case::opaque(1.0, Color::new(0, 255, 255))]
    #[case::transparent(0.0, Color::new(255, 255, 255))]
    #[case::half(0.5, Color::new(128, 255, 255))]
    fn hsla_composites_over_surface(#[case] alpha: f32, #[case] expected: Color) {
        let color = Hsla::new(180.0, 100.0, 50.0, alpha);
        assert_eq!(color.over(Color::new(255, 255, 255)), expected);
    }

    #[rstest]
    #[case("#f0f0f0", Color::new(240, 240, 240))]
    #[case("111827", Color::new(0x11, 0x18, 0x27))]
    #[case("#FFFFFF", Color::new(255, 255, 255))]
    fn parse_hex(#[case] input: &str, #[case] expected: Color) {
        assert_eq!(input.parse::<Color>(), Ok(expected));
    }

    #[rstest]
    #[case("#zzzzzz")]
    #[case("#fff")]
    #[case("#f0f0f0f0")]
    #[case("")]
    fn reject_bad_hex(#[case] input: &str) {
        assert!(input.parse::<Color>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let color = Color::new(0xf0, 0x0a, 0x01);
        assert_eq!(color.to_string(), "#f00a01");
    }
}
