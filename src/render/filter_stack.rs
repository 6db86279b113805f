// SPDX-License-Identifier: MPL-2.0
//! Global colour filter stack.
//!
//! Filters are typed operations applied in list order to straight-alpha sRGB
//! values in `[0, 1]`, clamping after every step. The effects tool always builds
//! its stack in the fixed order brightness, contrast, saturate, grayscale, invert.

use crate::domain::editing::{FilterPercent, GrayscalePercent};
use image_rs::RgbaImage;

/// One colour operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Brightness(FilterPercent),
    Contrast(FilterPercent),
    Saturate(FilterPercent),
    Grayscale(GrayscalePercent),
    Invert(bool),
}

impl FilterOp {
    #[must_use]
    pub fn is_identity(self) -> bool {
        match self {
            Self::Brightness(p) | Self::Contrast(p) | Self::Saturate(p) => p.is_neutral(),
            Self::Grayscale(p) => p.value() == 0,
            Self::Invert(on) => !on,
        }
    }

    fn apply(self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        let out = match self {
            Self::Brightness(p) => {
                let a = p.as_factor();
                [r * a, g * a, b * a]
            }
            Self::Contrast(p) => {
                let a = p.as_factor();
                let f = |c: f32| (c - 0.5) * a + 0.5;
                [f(r), f(g), f(b)]
            }
            Self::Saturate(p) => {
                let s = p.as_factor();
                [
                    (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
                    (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
                    (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
                ]
            }
            Self::Grayscale(p) => {
                let k = 1.0 - p.as_factor();
                [
                    (0.2126 + 0.7874 * k) * r + (0.7152 - 0.7152 * k) * g + (0.0722 - 0.0722 * k) * b,
                    (0.2126 - 0.2126 * k) * r + (0.7152 + 0.2848 * k) * g + (0.0722 - 0.0722 * k) * b,
                    (0.2126 - 0.2126 * k) * r + (0.7152 - 0.7152 * k) * g + (0.0722 + 0.9278 * k) * b,
                ]
            }
            Self::Invert(false) => [r, g, b],
            Self::Invert(true) => [1.0 - r, 1.0 - g, 1.0 - b],
        };
        out.map(|c| c.clamp(0.0, 1.0))
    }
}

/// Slider state of the effects tool.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobalFilters {
    pub brightness: FilterPercent,
    pub contrast: FilterPercent,
    pub saturate: FilterPercent,
    pub grayscale: GrayscalePercent,
    pub invert: bool,
}

impl GlobalFilters {
    /// The stack in its fixed application order.
    #[must_use]
    pub fn stack(&self) -> FilterStack {
        FilterStack::new(vec![
            FilterOp::Brightness(self.brightness),
            FilterOp::Contrast(self.contrast),
            FilterOp::Saturate(self.saturate),
            FilterOp::Grayscale(self.grayscale),
            FilterOp::Invert(self.invert),
        ])
    }
}

/// An ordered list of filter operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterStack {
    ops: Vec<FilterOp>,
}

impl FilterStack {
    #[must_use]
    pub fn new(ops: Vec<FilterOp>) -> Self {
        Self { ops }
    }

    #[must_use]
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| op.is_identity())
    }

    /// Applies every operation to one straight-alpha pixel.
    #[must_use]
    pub fn apply_pixel(&self, [r, g, b, a]: [u8; 4]) -> [u8; 4] {
        let mut rgb = [r, g, b].map(|c| f32::from(c) / 255.0);
        for op in self.ops.iter().filter(|op| !op.is_identity()) {
            rgb = op.apply(rgb);
        }
        // Values are clamped to [0, 1] by every op.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let [r, g, b] = rgb.map(|c| (c * 255.0).round() as u8);
        [r, g, b, a]
    }

    /// Returns a filtered copy of `image`; alpha is left untouched.
    #[must_use]
    pub fn apply(&self, image: &RgbaImage) -> RgbaImage {
        let mut out = image.clone();
        if self.is_identity() {
            return out;
        }
        for pixel in out.pixels_mut() {
            pixel.0 = self.apply_pixel(pixel.0);
        }
        out
    }
}
