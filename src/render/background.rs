// SPDX-License-Identifier: MPL-2.0
//! Background generator: solid fills, linear and radial gradients, flat mesh grids.

use crate::config::defaults::{DEFAULT_BACKGROUND_HEIGHT, DEFAULT_BACKGROUND_WIDTH};
use crate::domain::editing::{GradientAngle, MeshCells};
use crate::error::{Error, Result};
use crate::render::color::RgbaColor;
use crate::render::gradient::ColorStops;
use crate::render::surface::DrawSurface;
use std::fmt;
use std::str::FromStr;
use tiny_skia::{Paint, Point, Rect, Transform};

// =============================================================================
// Size Templates
// =============================================================================

/// Named output sizes offered by the generator.
pub const SIZE_TEMPLATES: [(&str, u32, u32); 5] = [
    ("16:9", 1920, 1080),
    ("4:3", 1024, 768),
    ("1:1", 1080, 1080),
    ("3:2", 1080, 720),
    ("9:16", 1080, 1920),
];

/// Output dimensions of a generated background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Looks up a template by its ratio label (`16:9`) or `WIDTHxHEIGHT`.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if let Some((_, w, h)) = SIZE_TEMPLATES.iter().find(|(name, _, _)| *name == spec) {
            return Ok(Self::new(*w, *h));
        }
        let invalid = || Error::InvalidParameter(format!("invalid size '{spec}'"));
        let (w, h) = spec
            .split_once(['x', 'X', '/'])
            .ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(width, height))
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND_WIDTH, DEFAULT_BACKGROUND_HEIGHT)
    }
}

// =============================================================================
// Mesh Grid
// =============================================================================

/// A rows x cols grid of flat colours.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGrid {
    rows: MeshCells,
    cols: MeshCells,
    colors: Vec<RgbaColor>,
}

impl MeshGrid {
    /// Creates a grid with seeded pseudo-random colours.
    #[must_use]
    pub fn seeded(rows: MeshCells, cols: MeshCells, seed: u32) -> Self {
        let mut grid = Self {
            rows,
            cols,
            colors: Vec::new(),
        };
        grid.regenerate(seed);
        grid
    }

    /// Creates a grid from explicit colours in row-major order.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if the colour count is not `rows * cols`.
    pub fn with_colors(rows: MeshCells, cols: MeshCells, colors: Vec<RgbaColor>) -> Result<Self> {
        let expected = (rows.value() * cols.value()) as usize;
        if colors.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "mesh of {}x{} needs {expected} colours, got {}",
                rows.value(),
                cols.value(),
                colors.len()
            )));
        }
        Ok(Self { rows, cols, colors })
    }

    /// Replaces every colour from `seed`.
    pub fn regenerate(&mut self, seed: u32) {
        let count = self.rows.value() * self.cols.value();
        self.colors = (0..count).map(|i| RgbaColor::from_seed(seed, i)).collect();
    }

    /// Changes the grid shape; colours are regenerated from `seed`.
    pub fn resize(&mut self, rows: MeshCells, cols: MeshCells, seed: u32) {
        self.rows = rows;
        self.cols = cols;
        self.regenerate(seed);
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows.value()
    }

    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols.value()
    }

    #[must_use]
    pub fn color_at(&self, row: u32, col: u32) -> Option<RgbaColor> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.colors.get((row * self.cols() + col) as usize).copied()
    }

    pub fn set_color(&mut self, row: u32, col: u32, color: RgbaColor) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::InvalidParameter(format!(
                "no mesh cell at row {row}, column {col}"
            )));
        }
        let idx = (row * self.cols() + col) as usize;
        self.colors[idx] = color;
        Ok(())
    }

    #[must_use]
    pub fn colors(&self) -> &[RgbaColor] {
        &self.colors
    }
}

impl Default for MeshGrid {
    fn default() -> Self {
        Self {
            rows: MeshCells::default(),
            cols: MeshCells::default(),
            colors: vec![
                RgbaColor::rgb(0x3B, 0x82, 0xF6),
                RgbaColor::rgb(0xEC, 0x48, 0x99),
                RgbaColor::rgb(0xF9, 0x73, 0x16),
                RgbaColor::rgb(0x10, 0xB9, 0x81),
            ],
        }
    }
}

// =============================================================================
// Background Spec
// =============================================================================

/// Generator mode and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundSpec {
    Solid(RgbaColor),
    Linear {
        angle: GradientAngle,
        stops: ColorStops,
    },
    Radial {
        stops: ColorStops,
    },
    Mesh(MeshGrid),
}

impl BackgroundSpec {
    /// Lower-case mode name, used in the exported filename.
    #[must_use]
    pub fn mode(&self) -> BackgroundMode {
        match self {
            Self::Solid(_) => BackgroundMode::Solid,
            Self::Linear { .. } => BackgroundMode::Linear,
            Self::Radial { .. } => BackgroundMode::Radial,
            Self::Mesh(_) => BackgroundMode::Mesh,
        }
    }

    /// CSS `background` declaration equivalent to this spec.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] for mesh grids, which have no CSS form.
    pub fn css(&self) -> Result<String> {
        match self {
            Self::Solid(color) => Ok(format!("background: {color};")),
            Self::Linear { angle, stops } => Ok(format!(
                "background: linear-gradient({}deg, {});",
                angle.value(),
                stops.css_stops()
            )),
            Self::Radial { stops } => Ok(format!(
                "background: radial-gradient(circle, {});",
                stops.css_stops()
            )),
            Self::Mesh(_) => Err(Error::InvalidParameter(
                "mesh backgrounds cannot be expressed as CSS".to_string(),
            )),
        }
    }
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        Self::Linear {
            angle: GradientAngle::default(),
            stops: ColorStops::default(),
        }
    }
}

/// Generator mode without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundMode {
    Solid,
    Linear,
    Radial,
    Mesh,
}

impl BackgroundMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Linear => "linear",
            Self::Radial => "radial",
            Self::Mesh => "mesh",
        }
    }
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackgroundMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(Self::Solid),
            "linear" => Ok(Self::Linear),
            "radial" => Ok(Self::Radial),
            "mesh" => Ok(Self::Mesh),
            other => Err(Error::InvalidParameter(format!(
                "unknown background mode '{other}'"
            ))),
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Endpoints of a linear gradient whose line passes through the centre at `angle`.
///
/// 0° runs left to right, 90° top to bottom.
#[must_use]
pub fn linear_endpoints(angle: GradientAngle, width: f32, height: f32) -> (Point, Point) {
    let (sin, cos) = angle.radians().sin_cos();
    let (cx, cy) = (width / 2.0, height / 2.0);
    let (dx, dy) = (cos * width / 2.0, sin * height / 2.0);
    (
        Point::from_xy(cx - dx, cy - dy),
        Point::from_xy(cx + dx, cy + dy),
    )
}

/// Renders `spec` onto a new `size` surface.
pub fn render_background(spec: &BackgroundSpec, size: CanvasSize) -> Result<DrawSurface> {
    let mut surface = DrawSurface::new(size.width, size.height)?;
    paint_background(&mut surface, spec)?;
    log::debug!(
        "rendered {} background at {}x{}",
        spec.mode(),
        size.width,
        size.height
    );
    Ok(surface)
}

/// Paints `spec` over the whole of `surface`.
pub fn paint_background(surface: &mut DrawSurface, spec: &BackgroundSpec) -> Result<()> {
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    let full = Rect::from_xywh(0.0, 0.0, w, h)
        .ok_or_else(|| Error::ContextUnavailable("empty surface".to_string()))?;

    match spec {
        BackgroundSpec::Solid(color) => surface.fill(*color),
        BackgroundSpec::Linear { angle, stops } => {
            let (start, end) = linear_endpoints(*angle, w, h);
            let shader = stops
                .linear_shader(start, end, Transform::identity())
                .ok_or_else(|| Error::ContextUnavailable("invalid linear gradient".to_string()))?;
            let paint = Paint {
                shader,
                ..Paint::default()
            };
            surface
                .pixmap_mut()
                .fill_rect(full, &paint, Transform::identity(), None);
        }
        BackgroundSpec::Radial { stops } => {
            let center = Point::from_xy(w / 2.0, h / 2.0);
            let shader = stops
                .radial_shader(center, w.max(h) / 2.0, Transform::identity())
                .ok_or_else(|| Error::ContextUnavailable("invalid radial gradient".to_string()))?;
            let paint = Paint {
                shader,
                ..Paint::default()
            };
            surface
                .pixmap_mut()
                .fill_rect(full, &paint, Transform::identity(), None);
        }
        BackgroundSpec::Mesh(grid) => {
            let cell_w = w / grid.cols() as f32;
            let cell_h = h / grid.rows() as f32;
            for row in 0..grid.rows() {
                for col in 0..grid.cols() {
                    let Some(color) = grid.color_at(row, col) else {
                        continue;
                    };
                    let Some(rect) =
                        Rect::from_xywh(col as f32 * cell_w, row as f32 * cell_h, cell_w, cell_h)
                    else {
                        continue;
                    };
                    let mut paint = Paint::default();
                    paint.set_color(color.to_skia());
                    surface
                        .pixmap_mut()
                        .fill_rect(rect, &paint, Transform::identity(), None);
                }
            }
        }
    }
    Ok(())
}
