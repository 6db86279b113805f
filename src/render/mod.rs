// SPDX-License-Identifier: MPL-2.0
//! Compositor: renders one [`EffectParameters`] variant onto a [`DrawSurface`].
//!
//! # Modules
//!
//! - [`surface`]: the pixmap every renderer draws into
//! - [`color`], [`gradient`]: colours and sorted colour-stop lists
//! - [`filter_stack`]: ordered global colour filters
//! - [`background`]: solid, gradient and mesh backgrounds
//! - [`profile_crop`]: circular crop with optional border
//! - [`text`], [`watermark`]: glyph outlines and watermark placement

pub mod background;
pub mod color;
pub mod filter_stack;
pub mod gradient;
pub mod profile_crop;
pub mod surface;
pub mod text;
pub mod watermark;

pub use background::{BackgroundSpec, CanvasSize, MeshGrid};
pub use color::RgbaColor;
pub use filter_stack::{FilterOp, FilterStack, GlobalFilters};
pub use gradient::{ColorStop, ColorStops};
pub use profile_crop::{BorderPaint, CropRect, ProfileCrop};
pub use surface::DrawSurface;
pub use text::{FontFace, GlyphOutliner};
pub use watermark::{Placement, Shadow, TextFill, WatermarkSpec};

use crate::brush::BrushSettings;
use crate::domain::editing::GradientAngle;

/// Parameters of the tool mode currently driving a session.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectParameters {
    Solid {
        color: RgbaColor,
    },
    LinearGradient {
        angle: GradientAngle,
        stops: ColorStops,
    },
    RadialGradient {
        stops: ColorStops,
    },
    Mesh(MeshGrid),
    Watermark(WatermarkSpec),
    /// Global filters plus the brush used for local strokes.
    Effects {
        filters: GlobalFilters,
        brush: BrushSettings,
    },
    ProfileCrop(ProfileCrop),
}

impl EffectParameters {
    /// Background spec for the generator variants, `None` otherwise.
    #[must_use]
    pub fn background(&self) -> Option<BackgroundSpec> {
        match self {
            Self::Solid { color } => Some(BackgroundSpec::Solid(*color)),
            Self::LinearGradient { angle, stops } => Some(BackgroundSpec::Linear {
                angle: *angle,
                stops: stops.clone(),
            }),
            Self::RadialGradient { stops } => Some(BackgroundSpec::Radial {
                stops: stops.clone(),
            }),
            Self::Mesh(grid) => Some(BackgroundSpec::Mesh(grid.clone())),
            Self::Watermark(_) | Self::Effects { .. } | Self::ProfileCrop(_) => None,
        }
    }

    /// Whether rendering needs a loaded source image.
    #[must_use]
    pub fn needs_source(&self) -> bool {
        self.background().is_none()
    }
}

impl From<BackgroundSpec> for EffectParameters {
    fn from(spec: BackgroundSpec) -> Self {
        match spec {
            BackgroundSpec::Solid(color) => Self::Solid { color },
            BackgroundSpec::Linear { angle, stops } => Self::LinearGradient { angle, stops },
            BackgroundSpec::Radial { stops } => Self::RadialGradient { stops },
            BackgroundSpec::Mesh(grid) => Self::Mesh(grid),
        }
    }
}

impl Default for EffectParameters {
    fn default() -> Self {
        BackgroundSpec::default().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_variants_round_trip() {
        let spec = BackgroundSpec::Radial {
            stops: ColorStops::default(),
        };
        let params = EffectParameters::from(spec.clone());
        assert_eq!(params.background(), Some(spec));
        assert!(!params.needs_source());
    }

    #[test]
    fn image_variants_need_a_source() {
        let params = EffectParameters::Watermark(WatermarkSpec::default());
        assert!(params.needs_source());
        assert!(params.background().is_none());
    }
}
