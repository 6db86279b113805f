// SPDX-License-Identifier: MPL-2.0
//! `DrawSurface`: an owned premultiplied RGBA pixmap that every renderer draws into.

use crate::config::defaults::MAX_SURFACE_EDGE;
use crate::error::{Error, Result};
use crate::render::color::RgbaColor;
use image_rs::{Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FilterQuality, IntRect, Mask, Pixmap, PixmapPaint, PremultipliedColorU8, Transform,
};

/// Addressable raster buffer, sized to the current operation's output.
#[derive(Debug, Clone)]
pub struct DrawSurface {
    pixmap: Pixmap,
}

impl DrawSurface {
    /// Allocates a transparent surface.
    ///
    /// # Errors
    ///
    /// [`Error::ContextUnavailable`] when either edge is zero or exceeds
    /// [`MAX_SURFACE_EDGE`].
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE {
            return Err(Error::ContextUnavailable(format!(
                "{width}x{height} exceeds the {MAX_SURFACE_EDGE}px surface limit"
            )));
        }
        Pixmap::new(width, height)
            .map(|pixmap| Self { pixmap })
            .ok_or_else(|| {
                Error::ContextUnavailable(format!("cannot allocate a {width}x{height} surface"))
            })
    }

    /// Allocates a surface filled with `color`.
    pub fn filled(width: u32, height: u32, color: RgbaColor) -> Result<Self> {
        let mut surface = Self::new(width, height)?;
        surface.fill(color);
        Ok(surface)
    }

    /// Copies straight-alpha pixels into a new surface.
    pub fn from_rgba(image: &RgbaImage) -> Result<Self> {
        let mut surface = Self::new(image.width(), image.height())?;
        for (dst, src) in surface.pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(surface)
    }

    /// Copies the surface out as straight-alpha pixels.
    #[must_use]
    pub fn to_rgba(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width(), self.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Straight-alpha colour at `(x, y)`, `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<RgbaColor> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            RgbaColor::rgba(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    /// Replaces every pixel with `color`.
    pub fn fill(&mut self, color: RgbaColor) {
        self.pixmap.fill(color.to_skia());
    }

    /// Draws `src` over this surface, stretched to cover it entirely.
    pub fn draw_stretched(&mut self, src: &DrawSurface, mask: Option<&Mask>) {
        let sx = self.width() as f32 / src.width() as f32;
        let sy = self.height() as f32 / src.height() as f32;
        let paint = PixmapPaint {
            quality: if (sx - 1.0).abs() < f32::EPSILON && (sy - 1.0).abs() < f32::EPSILON {
                FilterQuality::Nearest
            } else {
                FilterQuality::Bicubic
            },
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            src.pixmap.as_ref(),
            &paint,
            Transform::from_scale(sx, sy),
            mask,
        );
    }

    /// Draws `src` unscaled at `(x, y)` with a global opacity.
    pub fn draw_layer(&mut self, src: &DrawSurface, x: i32, y: i32, opacity: f32, mask: Option<&Mask>) {
        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            quality: FilterQuality::Nearest,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(x, y, src.pixmap.as_ref(), &paint, Transform::identity(), mask);
    }

    /// Copies the region `(x, y, width, height)` into a new surface.
    ///
    /// The region is clipped to the surface; `None` if nothing remains.
    #[must_use]
    pub fn region(&self, x: i32, y: i32, width: u32, height: u32) -> Option<(IntRect, DrawSurface)> {
        let rect = clip_rect(x, y, width, height, self.width(), self.height())?;
        let pixmap = self.pixmap.clone_rect(rect)?;
        Some((rect, DrawSurface { pixmap }))
    }

    /// Gaussian blur of the whole surface with standard deviation `sigma`.
    ///
    /// Blurs the premultiplied channels so transparent pixels do not bleed colour.
    pub fn blur(&mut self, sigma: f32) {
        if sigma <= 0.0 || !sigma.is_finite() {
            return;
        }
        let (w, h) = (self.width(), self.height());
        let raw = RgbaImage::from_fn(w, h, |x, y| {
            let p = self.pixmap.pixels()[(y * w + x) as usize];
            Rgba([p.red(), p.green(), p.blue(), p.alpha()])
        });
        let blurred = image_rs::imageops::blur(&raw, sigma);
        for (dst, src) in self.pixmap.pixels_mut().iter_mut().zip(blurred.pixels()) {
            let [r, g, b, a] = src.0;
            if let Some(c) = PremultipliedColorU8::from_rgba(r.min(a), g.min(a), b.min(a), a) {
                *dst = c;
            }
        }
    }
}

/// Intersects a rectangle with `[0, bound_w) x [0, bound_h)`.
// All four values lie within [0, u32::MAX] after clipping.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn clip_rect(x: i32, y: i32, width: u32, height: u32, bound_w: u32, bound_h: u32) -> Option<IntRect> {
    let x0 = i64::from(x).max(0);
    let y0 = i64::from(y).max(0);
    let x1 = (i64::from(x) + i64::from(width)).min(i64::from(bound_w));
    let y1 = (i64::from(y) + i64::from(height)).min(i64::from(bound_h));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    IntRect::from_xywh(x0 as i32, y0 as i32, (x1 - x0) as u32, (y1 - y0) as u32)
}
