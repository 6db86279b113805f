// SPDX-License-Identifier: MPL-2.0
//! Editing newtypes.
//!
//! This module provides type-safe wrappers for tool parameters,
//! ensuring they are always within valid ranges.

use crate::config::defaults::{
    DEFAULT_BRUSH_RADIUS, DEFAULT_EFFECT_STRENGTH, DEFAULT_FONT_SIZE, DEFAULT_GRADIENT_ANGLE,
    DEFAULT_MESH_CELLS, DEFAULT_ROTATION_DEGREES, DEFAULT_SHADOW_BLUR, DEFAULT_STROKE_WIDTH,
    DEFAULT_TILE_SPACING, DEFAULT_WATERMARK_OPACITY, MAX_BRUSH_RADIUS, MAX_EFFECT_STRENGTH,
    MAX_FILTER_PERCENT, MAX_FONT_SIZE, MAX_GRAYSCALE_PERCENT, MAX_MESH_CELLS, MAX_QUALITY_PERCENT,
    MAX_ROTATION_DEGREES, MAX_SHADOW_BLUR, MAX_STROKE_WIDTH, MAX_TILE_SPACING, MIN_BRUSH_RADIUS,
    MIN_EFFECT_STRENGTH, MIN_FONT_SIZE, MIN_MESH_CELLS, MIN_MOSAIC_BLOCK, MIN_QUALITY_PERCENT,
    MIN_ROTATION_DEGREES, MIN_STROKE_WIDTH, MIN_TILE_SPACING, NEUTRAL_FILTER_PERCENT,
};

/// Declares a clamped `f32` value object. NaN inputs fall back to the default.
macro_rules! bounded_f32 {
    ($(#[$meta:meta])* $name:ident, $min:expr, $max:expr, $default:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name(f32);

        impl $name {
            /// Lowest accepted value.
            pub const MIN: f32 = $min;
            /// Highest accepted value.
            pub const MAX: f32 = $max;

            /// Creates a new value, clamping to the valid range.
            #[must_use]
            pub fn new(value: f32) -> Self {
                if value.is_nan() {
                    return Self::default();
                }
                Self(value.clamp(Self::MIN, Self::MAX))
            }

            /// Returns the raw value.
            #[must_use]
            pub fn value(self) -> f32 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }
    };
}

// =============================================================================
// Quality
// =============================================================================

/// Encoder quality percentage (1–100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    /// Creates a new quality, clamping to the valid range.
    #[must_use]
    pub fn new(percent: u8) -> Self {
        Self(percent.clamp(MIN_QUALITY_PERCENT, MAX_QUALITY_PERCENT))
    }

    /// Full quality, used for lossless-intent exports.
    #[must_use]
    pub fn max() -> Self {
        Self(MAX_QUALITY_PERCENT)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(crate::config::defaults::DEFAULT_COMPRESSION_QUALITY)
    }
}

// =============================================================================
// Filter percentages
// =============================================================================

/// Brightness/contrast/saturation percentage (0–200, 100 = unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPercent(u16);

impl FilterPercent {
    #[must_use]
    pub fn new(percent: u16) -> Self {
        Self(percent.min(MAX_FILTER_PERCENT))
    }

    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    /// Returns the multiplier (100% → 1.0).
    #[must_use]
    pub fn as_factor(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        self.0 == NEUTRAL_FILTER_PERCENT
    }
}

impl Default for FilterPercent {
    fn default() -> Self {
        Self(NEUTRAL_FILTER_PERCENT)
    }
}

/// Grayscale amount (0–100, 0 = unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrayscalePercent(u16);

impl GrayscalePercent {
    #[must_use]
    pub fn new(percent: u16) -> Self {
        Self(percent.min(MAX_GRAYSCALE_PERCENT))
    }

    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn as_factor(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

// =============================================================================
// Brush
// =============================================================================

/// Brush radius in surface pixels (5–100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushRadius(u32);

impl BrushRadius {
    #[must_use]
    pub fn new(radius: u32) -> Self {
        Self(radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for BrushRadius {
    fn default() -> Self {
        Self(DEFAULT_BRUSH_RADIUS)
    }
}

/// Brush effect strength (1–30): blur radius in px, or mosaic block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectStrength(u32);

impl EffectStrength {
    #[must_use]
    pub fn new(strength: u32) -> Self {
        Self(strength.clamp(MIN_EFFECT_STRENGTH, MAX_EFFECT_STRENGTH))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Mosaic block edge: never below five pixels.
    #[must_use]
    pub fn mosaic_block(self) -> u32 {
        self.0.max(MIN_MOSAIC_BLOCK)
    }
}

impl Default for EffectStrength {
    fn default() -> Self {
        Self(DEFAULT_EFFECT_STRENGTH)
    }
}

// =============================================================================
// Geometry
// =============================================================================

bounded_f32!(
    /// Linear gradient angle in degrees (0–360).
    GradientAngle,
    0.0,
    360.0,
    DEFAULT_GRADIENT_ANGLE
);

impl GradientAngle {
    #[must_use]
    pub fn radians(self) -> f32 {
        self.0.to_radians()
    }
}

bounded_f32!(
    /// Watermark rotation in degrees (−180–180).
    RotationDegrees,
    MIN_ROTATION_DEGREES,
    MAX_ROTATION_DEGREES,
    DEFAULT_ROTATION_DEGREES
);

bounded_f32!(
    /// Colour stop position along a gradient (0–100).
    StopPosition,
    0.0,
    100.0,
    0.0
);

impl StopPosition {
    /// Maps 0–100 onto the 0.0–1.0 offset used by gradient shaders.
    #[must_use]
    pub fn as_offset(self) -> f32 {
        self.0 / 100.0
    }
}

/// Mesh grid dimension (rows or columns, 2–10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshCells(u32);

impl MeshCells {
    #[must_use]
    pub fn new(cells: u32) -> Self {
        Self(cells.clamp(MIN_MESH_CELLS, MAX_MESH_CELLS))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for MeshCells {
    fn default() -> Self {
        Self(DEFAULT_MESH_CELLS)
    }
}

// =============================================================================
// Watermark
// =============================================================================

bounded_f32!(
    /// Global opacity (0.0–1.0).
    Opacity,
    0.0,
    1.0,
    DEFAULT_WATERMARK_OPACITY
);

bounded_f32!(
    /// Font size in pixels (10–200).
    FontSize,
    MIN_FONT_SIZE,
    MAX_FONT_SIZE,
    DEFAULT_FONT_SIZE
);

bounded_f32!(
    /// Gap between watermark tiles in pixels.
    TileSpacing,
    MIN_TILE_SPACING,
    MAX_TILE_SPACING,
    DEFAULT_TILE_SPACING
);

bounded_f32!(
    /// Outline width for stroke-only text (1–10).
    StrokeWidth,
    MIN_STROKE_WIDTH,
    MAX_STROKE_WIDTH,
    DEFAULT_STROKE_WIDTH
);

bounded_f32!(
    /// Shadow blur radius in pixels (0–25).
    ShadowBlur,
    0.0,
    MAX_SHADOW_BLUR,
    DEFAULT_SHADOW_BLUR
);

// =============================================================================
// Resize Scale
// =============================================================================

/// Resize scale bounds (10% to 400%).
pub mod resize_bounds {
    /// Minimum resize scale percentage.
    pub const MIN: f32 = 10.0;
    /// Maximum resize scale percentage.
    pub const MAX: f32 = 400.0;
    /// Default resize scale percentage.
    pub const DEFAULT: f32 = 100.0;
}

/// Resize scale percentage, guaranteed to be within valid range (10%–400%).
///
/// # Example
///
/// ```
/// use raster_tools::domain::editing::ResizeScale;
///
/// let scale = ResizeScale::new(200.0);
/// assert_eq!(scale.apply_to_dimensions(800, 600), (1600, 1200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeScale(f32);

impl ResizeScale {
    /// Creates a new resize scale, clamping the value to the valid range.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        Self(percent.clamp(resize_bounds::MIN, resize_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the scale as a multiplier (e.g., 100% → 1.0, 200% → 2.0).
    #[must_use]
    pub fn as_factor(self) -> f32 {
        self.0 / 100.0
    }

    /// Applies the scale to the given dimensions, returning the new dimensions.
    ///
    /// Both dimensions are guaranteed to be at least 1 pixel.
    #[must_use]
    pub fn apply_to_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        let factor = f64::from(self.as_factor());
        let new_width = (f64::from(width) * factor).round().max(1.0);
        let new_height = (f64::from(height) * factor).round().max(1.0);
        // Bounded by 400% of a u32, saturate rather than wrap.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let clamp = |v: f64| {
            if v > f64::from(u32::MAX) {
                u32::MAX
            } else {
                v as u32
            }
        };
        (clamp(new_width), clamp(new_height))
    }
}

impl Default for ResizeScale {
    fn default() -> Self {
        Self(resize_bounds::DEFAULT)
    }
}
