// SPDX-License-Identifier: MPL-2.0
//! Brush-driven local effects: gaussian blur and mosaic strokes.
//!
//! Strokes accumulate on one working surface; a blur stroke samples the
//! already-edited pixels, so repeated strokes over the same area compound.
//! A separate pristine surface (source through the global filters only)
//! backs [`PaintEngine::reset_strokes`].

use crate::domain::editing::{BrushRadius, EffectStrength};
use crate::error::{Error, Result};
use crate::render::color::RgbaColor;
use crate::render::filter_stack::GlobalFilters;
use crate::render::surface::{clip_rect, DrawSurface};
use image_rs::RgbaImage;
use std::fmt;
use std::str::FromStr;
use tiny_skia::{ColorU8, FillRule, Mask, PathBuilder, Transform};

// =============================================================================
// Brush Settings
// =============================================================================

/// Effect applied under the brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushKind {
    #[default]
    Gaussian,
    Mosaic,
}

impl fmt::Display for BrushKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gaussian => "gaussian",
            Self::Mosaic => "mosaic",
        })
    }
}

impl FromStr for BrushKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaussian" | "blur" | "standard" => Ok(Self::Gaussian),
            "mosaic" | "pixelate" => Ok(Self::Mosaic),
            other => Err(Error::InvalidParameter(format!("unknown brush '{other}'"))),
        }
    }
}

/// Brush radius, strength and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrushSettings {
    pub radius: BrushRadius,
    pub strength: EffectStrength,
    pub kind: BrushKind,
}

/// Maps an on-screen pointer position to surface pixels.
///
/// The surface may be displayed smaller or larger than its backing size, so
/// each axis is scaled by `surface / displayed`.
pub fn map_pointer(pointer: (f32, f32), surface: (u32, u32), displayed: (f32, f32)) -> Result<(f32, f32)> {
    let (dw, dh) = displayed;
    if !(dw > 0.0 && dh > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "displayed size {dw}x{dh} must be positive"
        )));
    }
    Ok((
        pointer.0 * surface.0 as f32 / dw,
        pointer.1 * surface.1 as f32 / dh,
    ))
}

// =============================================================================
// Paint Engine
// =============================================================================

/// Working surface plus the pristine copy strokes are reset to.
#[derive(Debug, Clone)]
pub struct PaintEngine {
    surface: DrawSurface,
    pristine: DrawSurface,
    strokes: usize,
}

impl PaintEngine {
    /// Draws `source` through `filters`; the result is both pristine and working copy.
    pub fn new(source: &RgbaImage, filters: &GlobalFilters) -> Result<Self> {
        let pristine = DrawSurface::from_rgba(&filters.stack().apply(source))?;
        Ok(Self {
            surface: pristine.clone(),
            pristine,
            strokes: 0,
        })
    }

    /// Applies one stroke centred on `at` (surface pixels).
    pub fn stroke(&mut self, at: (f32, f32), brush: &BrushSettings) -> Result<()> {
        let radius = brush.radius.value() as f32;
        match brush.kind {
            BrushKind::Gaussian => {
                gaussian_stroke(&mut self.surface, at, radius, brush.strength.value() as f32)?;
            }
            BrushKind::Mosaic => {
                mosaic_stroke(&mut self.surface, at, radius, brush.strength.mosaic_block());
            }
        }
        self.strokes += 1;
        Ok(())
    }

    /// Discards every stroke.
    pub fn reset_strokes(&mut self) {
        self.surface = self.pristine.clone();
        self.strokes = 0;
    }

    #[must_use]
    pub fn surface(&self) -> &DrawSurface {
        &self.surface
    }

    #[must_use]
    pub fn pristine(&self) -> &DrawSurface {
        &self.pristine
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.strokes
    }
}

// =============================================================================
// Stroke Algorithms
// =============================================================================

/// Blurs the current pixels inside a circle of `radius` around `center`.
///
/// Only the circle's bounding box (plus three standard deviations) is blurred.
pub fn gaussian_stroke(surface: &mut DrawSurface, center: (f32, f32), radius: f32, sigma: f32) -> Result<()> {
    let margin = (3.0 * sigma).ceil();
    let x0 = (center.0 - radius - margin).floor();
    let y0 = (center.1 - radius - margin).floor();
    let extent = 2.0 * (radius + margin) + 2.0;

    // Coordinates are pointer positions on a surface of at most MAX_SURFACE_EDGE.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (rx, ry, side) = (x0 as i32, y0 as i32, extent as u32);
    let Some((rect, mut region)) = surface.region(rx, ry, side, side) else {
        return Ok(());
    };
    region.blur(sigma);

    let circle = PathBuilder::from_circle(center.0, center.1, radius)
        .ok_or_else(|| Error::InvalidParameter(format!("invalid brush radius {radius}")))?;
    let mut mask = Mask::new(surface.width(), surface.height())
        .ok_or_else(|| Error::ContextUnavailable("cannot allocate brush mask".to_string()))?;
    mask.fill_path(&circle, FillRule::Winding, true, Transform::identity());

    surface.draw_layer(&region, rect.x(), rect.y(), 1.0, Some(&mask));
    Ok(())
}

/// Pixelates square blocks whose centres lie within `radius` of `center`.
///
/// The block grid starts at `floor(center - radius)`; blocks overlapping the
/// surface edge are averaged and filled over their visible part only.
pub fn mosaic_stroke(surface: &mut DrawSurface, center: (f32, f32), radius: f32, block: u32) {
    let block = block.max(1);
    let half = block as f32 / 2.0;
    // Pointer coordinates fit comfortably in i64.
    #[allow(clippy::cast_possible_truncation)]
    let (start_x, start_y, end_x, end_y) = (
        (center.0 - radius).floor() as i64,
        (center.1 - radius).floor() as i64,
        (center.0 + radius).ceil() as i64,
        (center.1 + radius).ceil() as i64,
    );

    for i in (start_x..end_x).step_by(block as usize) {
        for j in (start_y..end_y).step_by(block as usize) {
            let dx = i as f32 + half - center.0;
            let dy = j as f32 + half - center.1;
            if (dx * dx + dy * dy).sqrt() > radius {
                continue;
            }
            let (Ok(x), Ok(y)) = (i32::try_from(i), i32::try_from(j)) else {
                continue;
            };
            if let Some(avg) = average_block(surface, x, y, block) {
                fill_block(surface, x, y, block, avg);
            }
        }
    }
}

/// Mean R, G, B (rounded down) of the block's visible pixels, as an opaque colour.
///
/// `None` when the block lies entirely outside the surface.
#[must_use]
pub fn average_block(surface: &DrawSurface, x: i32, y: i32, size: u32) -> Option<RgbaColor> {
    let rect = clip_rect(x, y, size, size, surface.width(), surface.height())?;
    let stride = surface.width() as usize;
    let pixels = surface.pixmap().pixels();
    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);

    for row in rect.top()..rect.bottom() {
        let start = row as usize * stride + rect.left() as usize;
        for p in &pixels[start..start + rect.width() as usize] {
            let c = p.demultiply();
            r += u64::from(c.red());
            g += u64::from(c.green());
            b += u64::from(c.blue());
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    // Each mean is at most 255.
    #[allow(clippy::cast_possible_truncation)]
    let mean = |sum: u64| (sum / count) as u8;
    Some(RgbaColor::rgb(mean(r), mean(g), mean(b)))
}

fn fill_block(surface: &mut DrawSurface, x: i32, y: i32, size: u32, color: RgbaColor) {
    let Some(rect) = clip_rect(x, y, size, size, surface.width(), surface.height()) else {
        return;
    };
    let stride = surface.width() as usize;
    let value = ColorU8::from_rgba(color.r, color.g, color.b, 255).premultiply();
    let pixels = surface.pixmap_mut().pixels_mut();
    for row in rect.top()..rect.bottom() {
        let start = row as usize * stride + rect.left() as usize;
        pixels[start..start + rect.width() as usize].fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::Rgba;

    fn checker(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn pointer_mapping_scales_both_axes() {
        let mapped = map_pointer((50.0, 20.0), (1000, 400), (500.0, 200.0)).unwrap();
        assert_eq!(mapped, (100.0, 40.0));
        assert!(map_pointer((1.0, 1.0), (10, 10), (0.0, 10.0)).is_err());
    }

    #[test]
    fn uniform_block_average_is_unchanged() {
        let c = RgbaColor::rgb(17, 99, 230);
        let surface = DrawSurface::filled(20, 20, c).unwrap();
        assert_eq!(average_block(&surface, 5, 5, 7), Some(c));
    }

    #[test]
    fn average_rounds_down() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([255, 1, 3, 255]));
        let surface = DrawSurface::from_rgba(&img).unwrap();
        assert_eq!(average_block(&surface, 0, 0, 2), Some(RgbaColor::rgb(127, 0, 1)));
    }

    #[test]
    fn edge_blocks_are_truncated_not_rejected() {
        let surface = DrawSurface::filled(10, 10, RgbaColor::rgb(9, 9, 9)).unwrap();
        assert_eq!(average_block(&surface, -3, 8, 5), Some(RgbaColor::rgb(9, 9, 9)));
        assert_eq!(average_block(&surface, 10, 10, 5), None);
    }

    #[test]
    fn mosaic_flattens_blocks_near_pointer() {
        let mut surface = DrawSurface::from_rgba(&checker(40)).unwrap();
        mosaic_stroke(&mut surface, (20.0, 20.0), 10.0, 5);
        // Block starting at (20, 20) has its centre 2.5px from the pointer.
        let a = surface.pixel(20, 20).unwrap();
        let b = surface.pixel(21, 20).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.a, 255);
        // Far corner untouched.
        assert_eq!(surface.pixel(0, 0), Some(RgbaColor::WHITE));
    }

    #[test]
    fn mosaic_at_surface_corner_does_not_panic() {
        let mut surface = DrawSurface::from_rgba(&checker(12)).unwrap();
        mosaic_stroke(&mut surface, (0.0, 0.0), 20.0, 7);
        mosaic_stroke(&mut surface, (12.0, 12.0), 20.0, 7);
    }

    #[test]
    fn gaussian_stroke_only_changes_inside_circle() {
        let mut surface = DrawSurface::from_rgba(&checker(60)).unwrap();
        gaussian_stroke(&mut surface, (30.0, 30.0), 10.0, 4.0).unwrap();
        let inside = surface.pixel(30, 30).unwrap();
        assert!(inside.r > 40 && inside.r < 215, "blurred pixel {inside}");
        assert_eq!(surface.pixel(2, 2), Some(RgbaColor::WHITE));
        assert_eq!(surface.pixel(30, 45), Some(RgbaColor::BLACK));
    }

    #[test]
    fn reset_restores_pristine_surface() {
        let filters = GlobalFilters::default();
        let mut engine = PaintEngine::new(&checker(30), &filters).unwrap();
        let brush = BrushSettings {
            kind: BrushKind::Mosaic,
            ..BrushSettings::default()
        };
        engine.stroke((15.0, 15.0), &brush).unwrap();
        assert_eq!(engine.stroke_count(), 1);
        assert_ne!(engine.surface().to_rgba(), checker(30));

        engine.reset_strokes();
        assert_eq!(engine.stroke_count(), 0);
        assert_eq!(engine.surface().to_rgba(), checker(30));
    }

    #[test]
    fn repeated_blur_strokes_compound() {
        let halves = RgbaImage::from_fn(80, 80, |x, _| {
            if x < 40 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        let brush = BrushSettings::default();
        let mut engine = PaintEngine::new(&halves, &GlobalFilters::default()).unwrap();
        engine.stroke((40.0, 40.0), &brush).unwrap();
        let once = engine.surface().to_rgba();
        engine.stroke((40.0, 40.0), &brush).unwrap();
        assert_ne!(engine.surface().to_rgba(), once);
    }

    #[test]
    fn brush_names_parse() {
        assert_eq!("standard".parse::<BrushKind>().unwrap(), BrushKind::Gaussian);
        assert_eq!("Mosaic".parse::<BrushKind>().unwrap(), BrushKind::Mosaic);
        assert!("smudge".parse::<BrushKind>().is_err());
    }
}
