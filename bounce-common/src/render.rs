//! Boundary between the physics state and whatever draws it.
//!
//! The simulation never owns a drawable shape. A renderer receives each
//! particle's position, radius and colour once per frame through [`Renderer`].

use anyhow::{anyhow, Result};
use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::vecmath::Vec2;

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Parses a CSS colour keyword (`"blue"`, `"magenta"`) or a hex string
    /// (`"#ff8800"`, `"#f80"`).
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.starts_with('#') {
            let rgb = Srgb::<u8>::from_str(trimmed)
                .map_err(|e| anyhow!("Invalid hex colour '{}': {}", trimmed, e))?;
            return Ok(Color::rgb(rgb.red, rgb.green, rgb.blue));
        }
        let lower = trimmed.to_ascii_lowercase();
        palette::named::from_str(&lower)
            .map(|rgb| Color::rgb(rgb.red, rgb.green, rgb.blue))
            .ok_or_else(|| anyhow!("Unknown colour name '{}'", trimmed))
    }

    /// Picks an evenly spaced hue for particle `index` out of `count`.
    pub fn from_palette(index: usize, count: usize) -> Self {
        let hue = (index as f32) / (count.max(1) as f32);
        let hsv: Hsv = Hsv::new(hue * 360.0, 0.7, 0.85);
        let rgb: Srgb = Srgb::from_color(hsv);
        Color::rgb(
            (rgb.red * 255.0).round() as u8,
            (rgb.green * 255.0).round() as u8,
            (rgb.blue * 255.0).round() as u8,
        )
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Something that can draw a filled circle.
///
/// `position` is the top-left corner of the particle's bounding square, in
/// region coordinates with y growing downward.
pub trait Renderer {
    fn render(&mut self, position: Vec2, radius: f64, color: Color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_colours_case_insensitively() {
        assert_eq!(Color::parse("blue").unwrap(), Color::rgb(0, 0, 255));
        assert_eq!(Color::parse("Magenta").unwrap(), Color::rgb(255, 0, 255));
    }

    #[test]
    fn parses_hex_colours() {
        assert_eq!(Color::parse("#ff8800").unwrap(), Color::rgb(255, 136, 0));
    }

    #[test]
    fn rejects_unknown_colour() {
        assert!(Color::parse("not-a-colour").is_err());
        assert!(Color::parse("#zzzzzz").is_err());
    }

    #[test]
    fn palette_colours_are_opaque_and_distinct() {
        let a = Color::from_palette(0, 4);
        let b = Color::from_palette(2, 4);
        assert_eq!(a.a, 255);
        assert_ne!(a, b);
    }
}
