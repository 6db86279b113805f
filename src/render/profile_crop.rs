// SPDX-License-Identifier: MPL-2.0
//! Circular "profile picture" crop with an optional ring border.
//!
//! The crop rectangle is cut from the source, then stretched into a
//! `size x size` square (`size = min(crop width, crop height)`) clipped to a
//! circle. With a border, a full circle of radius `size / 2` is painted first
//! and the image circle shrinks by 5% of `size`.

use crate::config::defaults::PROFILE_BORDER_RATIO;
use crate::error::{Error, Result};
use crate::media::image_transform;
use crate::render::color::RgbaColor;
use crate::render::gradient::ColorStops;
use crate::render::surface::DrawSurface;
use image_rs::DynamicImage;
use tiny_skia::{FillRule, Mask, Paint, PathBuilder, Point, Transform};

/// A crop rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Cuts this rectangle out of `image`, clamped to its bounds.
    pub fn apply(&self, image: &DynamicImage) -> Result<DynamicImage> {
        image_transform::crop(image, self.x, self.y, self.width, self.height)
            .ok_or_else(|| Error::InvalidParameter(format!("empty crop area {self:?}")))
    }
}

/// Paint used for the ring around a profile crop.
#[derive(Debug, Clone, PartialEq)]
pub enum BorderPaint {
    Solid(RgbaColor),
    /// Diagonal two-colour gradient from the top-left to the bottom-right corner.
    Gradient { start: RgbaColor, end: RgbaColor },
}

/// Parameters of a circular crop.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCrop {
    pub rect: CropRect,
    pub border: Option<BorderPaint>,
}

impl ProfileCrop {
    /// Border thickness for an output of `size` pixels.
    #[must_use]
    pub fn border_thickness(&self, size: f32) -> f32 {
        if self.border.is_some() {
            size * PROFILE_BORDER_RATIO
        } else {
            0.0
        }
    }
}

/// Renders a circular crop of `source`.
pub fn render_profile(source: &DynamicImage, spec: &ProfileCrop) -> Result<DrawSurface> {
    let cropped = spec.rect.apply(source)?;
    let inner = DrawSurface::from_rgba(&cropped.to_rgba8())?;
    let size = inner.width().min(inner.height());
    let mut surface = DrawSurface::new(size, size)?;

    let half = size as f32 / 2.0;
    if let Some(border) = &spec.border {
        let ring = PathBuilder::from_circle(half, half, half)
            .ok_or_else(|| Error::ContextUnavailable("cannot build border circle".to_string()))?;
        let paint = border_paint(border, size as f32)?;
        surface
            .pixmap_mut()
            .fill_path(&ring, &paint, FillRule::Winding, Transform::identity(), None);
    }

    let radius = half - spec.border_thickness(size as f32);
    let clip = PathBuilder::from_circle(half, half, radius)
        .ok_or_else(|| Error::ContextUnavailable("cannot build clip circle".to_string()))?;
    let mut mask = Mask::new(size, size)
        .ok_or_else(|| Error::ContextUnavailable("cannot allocate clip mask".to_string()))?;
    mask.fill_path(&clip, FillRule::Winding, true, Transform::identity());

    surface.draw_stretched(&inner, Some(&mask));
    log::debug!("profile crop {:?} -> {size}x{size}", spec.rect);
    Ok(surface)
}

fn border_paint(border: &BorderPaint, size: f32) -> Result<Paint<'static>> {
    let mut paint = Paint::default();
    match border {
        BorderPaint::Solid(color) => paint.set_color(color.to_skia()),
        BorderPaint::Gradient { start, end } => {
            paint.shader = ColorStops::two(*start, *end)
                .linear_shader(
                    Point::from_xy(0.0, 0.0),
                    Point::from_xy(size, size),
                    Transform::identity(),
                )
                .ok_or_else(|| Error::ContextUnavailable("invalid border gradient".to_string()))?;
        }
    }
    Ok(paint)
}
