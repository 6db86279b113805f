// SPDX-License-Identifier: MPL-2.0
//! Text watermarks: tiled or single placement, rotated, with optional drop shadow.
//!
//! Each draw translates to an anchor, rotates by the configured angle and draws
//! the text centred horizontally on its baseline. All draws are collected on a
//! transparent layer that is composited over the image at the configured opacity.

use crate::config::defaults::WATERMARK_CORNER_MARGIN;
use crate::domain::editing::{FontSize, Opacity, RotationDegrees, ShadowBlur, StrokeWidth, TileSpacing};
use crate::error::{Error, Result};
use crate::render::color::RgbaColor;
use crate::render::gradient::ColorStops;
use crate::render::surface::DrawSurface;
use crate::render::text::GlyphOutliner;
use image_rs::RgbaImage;
use std::fmt;
use std::str::FromStr;
use tiny_skia::{FillRule, Paint, Path, Point, Stroke, Transform};

// =============================================================================
// Parameters
// =============================================================================

/// How the glyphs are painted.
#[derive(Debug, Clone, PartialEq)]
pub enum TextFill {
    Solid(RgbaColor),
    /// Two-colour gradient across the surface diagonal.
    Gradient { start: RgbaColor, end: RgbaColor },
    /// Outline only.
    Stroke { color: RgbaColor, width: StrokeWidth },
}

impl Default for TextFill {
    fn default() -> Self {
        Self::Solid(RgbaColor::WHITE)
    }
}

/// Drop shadow behind each draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: RgbaColor,
    pub blur: ShadowBlur,
}

impl Shadow {
    /// Shadows are offset by half the blur radius on both axes.
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.blur.value() / 2.0
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: RgbaColor::BLACK,
            blur: ShadowBlur::default(),
        }
    }
}

/// Where the watermark is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Tile { spacing: TileSpacing },
    Center,
    TopLeft,
    BottomRight,
}

impl Default for Placement {
    fn default() -> Self {
        Self::Tile {
            spacing: TileSpacing::default(),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tile { .. } => "tile",
            Self::Center => "center",
            Self::TopLeft => "top-left",
            Self::BottomRight => "bottom-right",
        })
    }
}

impl FromStr for Placement {
    type Err = Error;

    /// Parses a placement name; `tile` gets the default spacing.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tile" => Ok(Self::default()),
            "center" | "centre" => Ok(Self::Center),
            "top-left" => Ok(Self::TopLeft),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(Error::InvalidParameter(format!("unknown placement '{other}'"))),
        }
    }
}

/// Complete watermark configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkSpec {
    pub text: String,
    pub font_family: String,
    pub size: FontSize,
    pub rotation: RotationDegrees,
    pub opacity: Opacity,
    pub fill: TextFill,
    pub shadow: Option<Shadow>,
    pub placement: Placement,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            text: "Watermark".to_string(),
            font_family: crate::config::defaults::DEFAULT_FONT_FAMILY.to_string(),
            size: FontSize::default(),
            rotation: RotationDegrees::default(),
            opacity: Opacity::default(),
            fill: TextFill::default(),
            shadow: Some(Shadow::default()),
            placement: Placement::default(),
        }
    }
}

// =============================================================================
// Placement
// =============================================================================

/// Anchor points for every draw, in surface coordinates.
///
/// Tiling covers `[-step, dimension + step)` on both axes so rotated text
/// still reaches the edges; a row has `ceil(width / step_x) + 2` anchors.
#[must_use]
pub fn anchor_points(
    placement: Placement,
    text_width: f32,
    size: FontSize,
    surface_width: f32,
    surface_height: f32,
) -> Vec<(f32, f32)> {
    let size = size.value();
    match placement {
        Placement::Tile { spacing } => {
            let step_x = (text_width + spacing.value()).max(1.0);
            let step_y = (size + spacing.value()).max(1.0);
            let xs = axis_steps(step_x, surface_width);
            let ys = axis_steps(step_y, surface_height);
            xs.iter()
                .flat_map(|&x| ys.iter().map(move |&y| (x, y)))
                .collect()
        }
        Placement::Center => vec![(surface_width / 2.0, surface_height / 2.0)],
        Placement::TopLeft => vec![(
            text_width / 2.0 + WATERMARK_CORNER_MARGIN,
            size + WATERMARK_CORNER_MARGIN,
        )],
        Placement::BottomRight => vec![(
            surface_width - text_width / 2.0 - WATERMARK_CORNER_MARGIN,
            surface_height - size - WATERMARK_CORNER_MARGIN,
        )],
    }
}

/// `-step, 0, step, ...` while below `extent + step`.
fn axis_steps(step: f32, extent: f32) -> Vec<f32> {
    let limit = extent + step;
    (0u32..)
        .map(|k| -step + k as f32 * step)
        .take_while(|&v| v < limit)
        .collect()
}

// =============================================================================
// Rendering
// =============================================================================

/// Draws `spec` over a copy of `base`.
pub fn render_watermark(
    base: &RgbaImage,
    spec: &WatermarkSpec,
    glyphs: &dyn GlyphOutliner,
) -> Result<DrawSurface> {
    let mut surface = DrawSurface::from_rgba(base)?;
    let Some(text_path) = glyphs.outline(&spec.text, spec.size.value()) else {
        log::debug!("watermark text has no visible glyphs; image left unchanged");
        return Ok(surface);
    };

    let (w, h) = (surface.width(), surface.height());
    let text_width = glyphs.measure(&spec.text, spec.size.value());
    let centred = text_path
        .transform(Transform::from_translate(-text_width / 2.0, 0.0))
        .ok_or_else(|| Error::ContextUnavailable("cannot position watermark text".to_string()))?;

    let anchors = anchor_points(spec.placement, text_width, spec.size, w as f32, h as f32);
    let mut layer = DrawSurface::new(w, h)?;

    if let Some(shadow) = spec.shadow {
        let mut shadow_layer = DrawSurface::new(w, h)?;
        let mut paint = Paint::default();
        paint.set_color(shadow.color.to_skia());
        let offset = shadow.offset();
        for &(x, y) in &anchors {
            let ts = Transform::from_translate(offset, offset)
                .pre_concat(draw_transform(x, y, spec.rotation));
            draw_text(&mut shadow_layer, &centred, &spec.fill, &paint, ts);
        }
        // The blur radius is twice the standard deviation.
        shadow_layer.blur(shadow.blur.value() / 2.0);
        layer.draw_layer(&shadow_layer, 0, 0, 1.0, None);
    }

    let paint = fill_paint(&spec.fill, w as f32, h as f32)?;
    for &(x, y) in &anchors {
        draw_text(&mut layer, &centred, &spec.fill, &paint, draw_transform(x, y, spec.rotation));
    }

    surface.draw_layer(&layer, 0, 0, spec.opacity.value(), None);
    log::debug!(
        "watermark '{}' drawn {} time(s) at {}",
        spec.text,
        anchors.len(),
        spec.placement
    );
    Ok(surface)
}

fn draw_transform(x: f32, y: f32, rotation: RotationDegrees) -> Transform {
    Transform::from_translate(x, y).pre_concat(Transform::from_rotate(rotation.value()))
}

/// Paint for the glyphs. The gradient spans `(0, 0)-(width, height)` in the
/// rotated text space; the draw transform applied by the fill moves it there.
fn fill_paint(fill: &TextFill, width: f32, height: f32) -> Result<Paint<'static>> {
    let mut paint = Paint::default();
    match fill {
        TextFill::Solid(color) | TextFill::Stroke { color, .. } => paint.set_color(color.to_skia()),
        TextFill::Gradient { start, end } => {
            paint.shader = ColorStops::two(*start, *end)
                .linear_shader(
                    Point::from_xy(0.0, 0.0),
                    Point::from_xy(width, height),
                    Transform::identity(),
                )
                .ok_or_else(|| Error::ContextUnavailable("invalid text gradient".to_string()))?;
        }
    }
    Ok(paint)
}

fn draw_text(surface: &mut DrawSurface, path: &Path, fill: &TextFill, paint: &Paint, ts: Transform) {
    match fill {
        TextFill::Stroke { width, .. } => {
            let stroke = Stroke {
                width: width.value(),
                ..Stroke::default()
            };
            surface.pixmap_mut().stroke_path(path, paint, &stroke, ts, None);
        }
        TextFill::Solid(_) | TextFill::Gradient { .. } => {
            surface
                .pixmap_mut()
                .fill_path(path, paint, FillRule::Winding, ts, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::Rgba;
    use tiny_skia::{PathBuilder, Rect};

    /// Every character is a `0.6 * size` wide box rising `0.7 * size` above the baseline.
    struct BlockGlyphs;

    impl GlyphOutliner for BlockGlyphs {
        fn measure(&self, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size * 0.6
        }

        fn outline(&self, text: &str, size: f32) -> Option<Path> {
            let mut pb = PathBuilder::new();
            for (i, ch) in text.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let rect = Rect::from_xywh(i as f32 * size * 0.6, -size * 0.7, size * 0.5, size * 0.7)?;
                pb.push_rect(rect);
            }
            pb.finish()
        }
    }

    /// Zero-width text whose outline covers a large square around the origin.
    struct CoverGlyphs;

    impl GlyphOutliner for CoverGlyphs {
        fn measure(&self, _text: &str, _size: f32) -> f32 {
            0.0
        }

        fn outline(&self, _text: &str, _size: f32) -> Option<Path> {
            let mut pb = PathBuilder::new();
            pb.push_rect(Rect::from_xywh(-1000.0, -1000.0, 2000.0, 2000.0)?);
            pb.finish()
        }
    }

    fn grey(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([128, 128, 128, 255]))
    }

    #[test]
    fn tile_row_count_matches_step_formula() {
        let (w, s, surface_w) = (120.0, 30.0, 1000.0);
        let anchors = anchor_points(
            Placement::Tile {
                spacing: TileSpacing::new(s),
            },
            w,
            FontSize::new(20.0),
            surface_w,
            400.0,
        );
        let first_row_y = anchors[0].1;
        let row = anchors.iter().filter(|(_, y)| *y == first_row_y).count();
        let expected = (surface_w / (w + s)).ceil() as usize + 2;
        assert_eq!(row, expected);
    }

    #[test]
    fn tiles_start_one_step_before_the_edge() {
        let anchors = anchor_points(
            Placement::Tile {
                spacing: TileSpacing::new(50.0),
            },
            50.0,
            FontSize::new(50.0),
            200.0,
            200.0,
        );
        assert_eq!(anchors[0], (-100.0, -100.0));
        assert!(anchors.iter().all(|(x, y)| *x < 300.0 && *y < 300.0));
    }

    #[test]
    fn corner_anchors_use_fixed_margin() {
        let size = FontSize::new(40.0);
        assert_eq!(
            anchor_points(Placement::TopLeft, 100.0, size, 500.0, 300.0),
            vec![(70.0, 60.0)]
        );
        assert_eq!(
            anchor_points(Placement::BottomRight, 100.0, size, 500.0, 300.0),
            vec![(430.0, 240.0)]
        );
        assert_eq!(
            anchor_points(Placement::Center, 100.0, size, 500.0, 300.0),
            vec![(250.0, 150.0)]
        );
    }

    #[test]
    fn centred_solid_text_paints_at_anchor() {
        let spec = WatermarkSpec {
            text: "II".to_string(),
            size: FontSize::new(40.0),
            rotation: RotationDegrees::new(0.0),
            opacity: Opacity::new(1.0),
            fill: TextFill::Solid(RgbaColor::rgb(255, 0, 0)),
            shadow: None,
            placement: Placement::Center,
            ..WatermarkSpec::default()
        };
        let out = render_watermark(&grey(200, 100), &spec, &BlockGlyphs).unwrap();
        // Boxes span x in [76, 96) and [100, 120), y in [22, 50).
        assert_eq!(out.pixel(80, 40), Some(RgbaColor::rgb(255, 0, 0)));
        assert_eq!(out.pixel(10, 10), Some(RgbaColor::rgb(128, 128, 128)));
    }

    #[test]
    fn zero_opacity_leaves_image_untouched() {
        let spec = WatermarkSpec {
            opacity: Opacity::new(0.0),
            ..WatermarkSpec::default()
        };
        let base = grey(64, 64);
        let out = render_watermark(&base, &spec, &BlockGlyphs).unwrap();
        assert_eq!(out.to_rgba(), base);
    }

    #[test]
    fn stroke_fill_leaves_glyph_interior_unpainted() {
        let spec = WatermarkSpec {
            text: "M".to_string(),
            size: FontSize::new(100.0),
            rotation: RotationDegrees::new(0.0),
            opacity: Opacity::new(1.0),
            fill: TextFill::Stroke {
                color: RgbaColor::BLACK,
                width: StrokeWidth::new(2.0),
            },
            shadow: None,
            placement: Placement::Center,
            ..WatermarkSpec::default()
        };
        let out = render_watermark(&grey(200, 200), &spec, &BlockGlyphs).unwrap();
        // Box spans x in [70, 120), y in [30, 100); its centre stays grey.
        assert_eq!(out.pixel(95, 65), Some(RgbaColor::rgb(128, 128, 128)));
        let edge = out.pixel(70, 65).unwrap();
        assert!(edge.r < 40, "outline should be dark, got {edge}");
    }

    #[test]
    fn gradient_fill_starts_at_the_anchor() {
        let spec = WatermarkSpec {
            rotation: RotationDegrees::new(0.0),
            opacity: Opacity::new(1.0),
            fill: TextFill::Gradient {
                start: RgbaColor::rgb(255, 0, 0),
                end: RgbaColor::rgb(0, 0, 255),
            },
            shadow: None,
            placement: Placement::Center,
            ..WatermarkSpec::default()
        };
        let out = render_watermark(&grey(400, 400), &spec, &CoverGlyphs).unwrap();

        // Gradient runs (200, 200) -> (600, 600) on the surface.
        let before = out.pixel(100, 100).unwrap();
        assert_eq!((before.r, before.b), (255, 0));
        // (390.5, 390.5) sits at t = 381 / 800.
        let mid = out.pixel(390, 390).unwrap();
        assert!((100..=145).contains(&mid.b), "expected a red/blue mix, got {mid}");
        assert!((110..=155).contains(&mid.r), "expected a red/blue mix, got {mid}");
    }

    #[test]
    fn shadow_is_offset_by_half_the_blur_and_sits_under_the_fill() {
        let spec = WatermarkSpec {
            text: "M".to_string(),
            size: FontSize::new(100.0),
            rotation: RotationDegrees::new(0.0),
            opacity: Opacity::new(1.0),
            fill: TextFill::Solid(RgbaColor::WHITE),
            shadow: Some(Shadow {
                color: RgbaColor::BLACK,
                blur: ShadowBlur::new(10.0),
            }),
            placement: Placement::Center,
            ..WatermarkSpec::default()
        };
        let out = render_watermark(&grey(200, 200), &spec, &BlockGlyphs).unwrap();

        // Glyph box spans x in [70, 120), y in [30, 100); shadow box is moved by (5, 5).
        assert_eq!(out.pixel(95, 65), Some(RgbaColor::WHITE));
        let right = out.pixel(122, 65).unwrap();
        let left = out.pixel(67, 65).unwrap();
        assert!(right.r < 90 && left.r > 100, "right {right}, left {left}");
        let below = out.pixel(95, 102).unwrap();
        let above = out.pixel(95, 27).unwrap();
        assert!(below.r < 90 && above.r > 100, "below {below}, above {above}");
    }

    #[test]
    fn whitespace_text_is_a_no_op() {
        let spec = WatermarkSpec {
            text: "   ".to_string(),
            ..WatermarkSpec::default()
        };
        let base = grey(16, 16);
        assert_eq!(render_watermark(&base, &spec, &BlockGlyphs).unwrap().to_rgba(), base);
    }

    #[test]
    fn placement_names_parse() {
        assert_eq!("bottom-right".parse::<Placement>().unwrap(), Placement::BottomRight);
        assert!(matches!("tile".parse::<Placement>().unwrap(), Placement::Tile { .. }));
        assert!("middle".parse::<Placement>().is_err());
    }
}
