// SPDX-License-Identifier: MPL-2.0
//! Straight-alpha RGBA colours parsed from `#rrggbb` / `#rrggbbaa` / `#rgb` strings.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// An 8-bit straight (non-premultiplied) RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Converts to the float colour used by the rasterizer.
    #[must_use]
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// Returns `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Deterministic pseudo-random opaque colour for `(seed, index)`.
    ///
    /// Used to populate mesh grids without pulling in an RNG.
    #[must_use]
    pub fn from_seed(seed: u32, index: u32) -> Self {
        let h = hash_u32(seed ^ hash_u32(index.wrapping_add(0x632B_E5AB)));
        let [r, g, b, _] = h.to_le_bytes();
        Self::rgb(r, g, b)
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for RgbaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RgbaColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || Error::InvalidParameter(format!("invalid colour '{s}'"));
        if !hex.is_ascii() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let digits = |range: std::ops::Range<usize>| -> Result<u8> {
            let text = hex.get(range).ok_or_else(invalid)?;
            u8::from_str_radix(text, 16).map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Self::rgb(
                digits(0..1)? * 17,
                digits(1..2)? * 17,
                digits(2..3)? * 17,
            )),
            6 => Ok(Self::rgb(digits(0..2)?, digits(2..4)?, digits(4..6)?)),
            8 => Ok(Self::rgba(
                digits(0..2)?,
                digits(2..4)?,
                digits(4..6)?,
                digits(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }
}

fn hash_u32(mut x: u32) -> u32 {
    x = x.wrapping_mul(0x9E37_79B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2_AE35);
    x ^= x >> 16;
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let c: RgbaColor = "#3B82F6".parse().unwrap();
        assert_eq!(c, RgbaColor::rgb(0x3B, 0x82, 0xF6));
    }

    #[test]
    fn parses_short_and_alpha_forms() {
        assert_eq!("#fff".parse::<RgbaColor>().unwrap(), RgbaColor::WHITE);
        assert_eq!(
            "00000080".parse::<RgbaColor>().unwrap(),
            RgbaColor::rgba(0, 0, 0, 0x80)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("#12345".parse::<RgbaColor>().is_err());
        assert!("#gggggg".parse::<RgbaColor>().is_err());
        assert!("".parse::<RgbaColor>().is_err());
    }

    #[test]
    fn hex_output_matches_input() {
        let c = RgbaColor::rgb(0xec, 0x48, 0x99);
        assert_eq!(c.to_hex(), "#ec4899");
        assert_eq!(c.to_string().parse::<RgbaColor>().unwrap(), c);
    }

    #[test]
    fn seeded_colours_are_stable_and_opaque() {
        let a = RgbaColor::from_seed(7, 3);
        assert_eq!(a, RgbaColor::from_seed(7, 3));
        assert_eq!(a.a, 255);
        assert_ne!(RgbaColor::from_seed(7, 3), RgbaColor::from_seed(7, 4));
    }
}
