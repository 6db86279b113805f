// SPDX-License-Identifier: MPL-2.0
//! Editing domain types.
//!
//! Clamped value objects for every numeric tool parameter:
//! encoder [`Quality`], global filter percentages, brush radius and strength,
//! gradient geometry and watermark styling.

pub mod newtypes;

pub use newtypes::{
    BrushRadius, EffectStrength, FilterPercent, FontSize, GradientAngle, GrayscalePercent,
    MeshCells, Opacity, Quality, ResizeScale, RotationDegrees, ShadowBlur, StopPosition,
    StrokeWidth, TileSpacing,
};
