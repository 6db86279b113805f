// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for bounds and defaults
//! used by the parameter newtypes and the config file.
//!
//! # Categories
//!
//! - **Encoding**: quality percentages
//! - **Filters**: global filter stack percentages
//! - **Brush**: localized paint engine radius and strength
//! - **Background**: generator dimensions, angle and mesh grid
//! - **Watermark**: text size, opacity, rotation, spacing, stroke and shadow
//! - **Enhancement**: sharpening gateway

// ==========================================================================
// Encoding Defaults
// ==========================================================================

/// Minimum encoder quality percentage.
pub const MIN_QUALITY_PERCENT: u8 = 1;

/// Maximum encoder quality percentage.
pub const MAX_QUALITY_PERCENT: u8 = 100;

/// Default quality used by the compressor.
pub const DEFAULT_COMPRESSION_QUALITY: u8 = 80;

/// Quality used when re-encoding a resized image.
pub const RESIZE_ENCODE_QUALITY: u8 = 95;

// ==========================================================================
// Filter Defaults
// ==========================================================================

/// Upper bound for brightness, contrast and saturation (200% = double).
pub const MAX_FILTER_PERCENT: u16 = 200;

/// Neutral value for brightness, contrast and saturation.
pub const NEUTRAL_FILTER_PERCENT: u16 = 100;

/// Upper bound for grayscale amount.
pub const MAX_GRAYSCALE_PERCENT: u16 = 100;

// ==========================================================================
// Brush Defaults
// ==========================================================================

/// Minimum brush radius in surface pixels.
pub const MIN_BRUSH_RADIUS: u32 = 5;

/// Maximum brush radius in surface pixels.
pub const MAX_BRUSH_RADIUS: u32 = 100;

/// Default brush radius.
pub const DEFAULT_BRUSH_RADIUS: u32 = 20;

/// Minimum effect strength (blur px or mosaic block size).
pub const MIN_EFFECT_STRENGTH: u32 = 1;

/// Maximum effect strength.
pub const MAX_EFFECT_STRENGTH: u32 = 30;

/// Default effect strength.
pub const DEFAULT_EFFECT_STRENGTH: u32 = 10;

/// Mosaic blocks are never smaller than this, whatever the strength.
pub const MIN_MOSAIC_BLOCK: u32 = 5;

// ==========================================================================
// Background Defaults
// ==========================================================================

/// Default generated background width.
pub const DEFAULT_BACKGROUND_WIDTH: u32 = 1920;

/// Default generated background height.
pub const DEFAULT_BACKGROUND_HEIGHT: u32 = 1080;

/// Largest surface edge the compositor will allocate.
pub const MAX_SURFACE_EDGE: u32 = 16_384;

/// Default linear gradient angle in degrees.
pub const DEFAULT_GRADIENT_ANGLE: f32 = 90.0;

/// Mesh grid bounds (rows and columns).
pub const MIN_MESH_CELLS: u32 = 2;
pub const MAX_MESH_CELLS: u32 = 10;
pub const DEFAULT_MESH_CELLS: u32 = 2;

/// Border thickness of a circular profile crop as a fraction of its size.
pub const PROFILE_BORDER_RATIO: f32 = 0.05;

// ==========================================================================
// Watermark Defaults
// ==========================================================================

pub const MIN_FONT_SIZE: f32 = 10.0;
pub const MAX_FONT_SIZE: f32 = 200.0;
pub const DEFAULT_FONT_SIZE: f32 = 50.0;

pub const DEFAULT_WATERMARK_OPACITY: f32 = 0.5;

pub const MIN_ROTATION_DEGREES: f32 = -180.0;
pub const MAX_ROTATION_DEGREES: f32 = 180.0;
pub const DEFAULT_ROTATION_DEGREES: f32 = -30.0;

pub const MIN_TILE_SPACING: f32 = 0.0;
pub const MAX_TILE_SPACING: f32 = 500.0;
pub const DEFAULT_TILE_SPACING: f32 = 150.0;

pub const MIN_STROKE_WIDTH: f32 = 1.0;
pub const MAX_STROKE_WIDTH: f32 = 10.0;
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

pub const MAX_SHADOW_BLUR: f32 = 25.0;
pub const DEFAULT_SHADOW_BLUR: f32 = 5.0;

/// Margin between a corner-anchored watermark and the surface edge.
pub const WATERMARK_CORNER_MARGIN: f32 = 20.0;

/// Default watermark font family.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

// ==========================================================================
// Enhancement Defaults
// ==========================================================================

/// Default sharpening endpoint.
pub const DEFAULT_SHARPEN_URL: &str = "https://oyyi.xyz/api/image/sharpen";

/// Default strength sent to the sharpening service.
pub const DEFAULT_SHARPEN_STRENGTH: f32 = 1.0;

/// Default gateway request timeout.
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 60;
