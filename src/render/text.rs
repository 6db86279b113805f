// SPDX-License-Identifier: MPL-2.0
//! Text shaping into vector paths.
//!
//! [`GlyphOutliner`] is the seam between the watermark renderer and fonts:
//! [`FontFace`] implements it with `ab_glyph` outlines, tests use simpler shapes.

use crate::error::{Error, Result};
use ab_glyph::{Font, FontArc, GlyphId, OutlineCurve, ScaleFont};
use std::fs;
use std::path::{Path, PathBuf};
use tiny_skia::{Path as SkPath, PathBuilder};

/// Measures and outlines a single line of text.
pub trait GlyphOutliner: Send + Sync {
    /// Advance width of `text` at `size` pixels.
    fn measure(&self, text: &str, size: f32) -> f32;

    /// Outline of `text` starting at x = 0 with its alphabetic baseline at y = 0.
    ///
    /// `None` when the text has no visible contours (empty or whitespace).
    fn outline(&self, text: &str, size: f32) -> Option<SkPath>;
}

/// A loaded font.
#[derive(Clone)]
pub struct FontFace {
    font: FontArc,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontFace {
    /// Parses a TrueType/OpenType font.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        FontArc::try_from_vec(data)
            .map(|font| Self { font })
            .map_err(|err| Error::InvalidParameter(format!("invalid font data: {err}")))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Finds `family` in `dirs` and loads it.
    pub fn resolve(family: &str, dirs: &[PathBuf]) -> Result<Self> {
        let path = find_font_file(family, dirs).ok_or_else(|| {
            Error::InvalidParameter(format!("font family '{family}' not found"))
        })?;
        log::debug!("using font {} for '{family}'", path.display());
        Self::from_path(&path)
    }

    /// Glyphs of `text` with their pen x positions, kerning applied.
    fn layout(&self, text: &str, size: f32) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(size);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut cursor_x = 0.0f32;
        let mut last_glyph: Option<GlyphId> = None;

        for ch in text.chars() {
            let glyph_id = self.font.glyph_id(ch);
            if let Some(prev) = last_glyph {
                cursor_x += scaled.kern(prev, glyph_id);
            }
            glyphs.push((glyph_id, cursor_x));
            cursor_x += scaled.h_advance(glyph_id);
            last_glyph = Some(glyph_id);
        }
        (glyphs, cursor_x)
    }
}

impl GlyphOutliner for FontFace {
    fn measure(&self, text: &str, size: f32) -> f32 {
        self.layout(text, size).1
    }

    fn outline(&self, text: &str, size: f32) -> Option<SkPath> {
        let factor = self.font.as_scaled(size).scale_factor();
        let (glyphs, _) = self.layout(text, size);
        let mut builder = PathBuilder::new();

        for (glyph_id, pen_x) in glyphs {
            let Some(outline) = self.font.outline(glyph_id) else {
                continue;
            };
            // Font units are y-up; the surface is y-down.
            let map = |p: ab_glyph::Point| (pen_x + p.x * factor.horizontal, -p.y * factor.vertical);
            let mut last: Option<(f32, f32)> = None;

            for curve in &outline.curves {
                let (start, end) = match *curve {
                    OutlineCurve::Line(a, b) => (map(a), map(b)),
                    OutlineCurve::Quad(a, _, c) => (map(a), map(c)),
                    OutlineCurve::Cubic(a, _, _, d) => (map(a), map(d)),
                };
                if last != Some(start) {
                    if last.is_some() {
                        builder.close();
                    }
                    builder.move_to(start.0, start.1);
                }
                match *curve {
                    OutlineCurve::Line(..) => builder.line_to(end.0, end.1),
                    OutlineCurve::Quad(_, b, _) => {
                        let b = map(b);
                        builder.quad_to(b.0, b.1, end.0, end.1);
                    }
                    OutlineCurve::Cubic(_, b, c, _) => {
                        let (b, c) = (map(b), map(c));
                        builder.cubic_to(b.0, b.1, c.0, c.1, end.0, end.1);
                    }
                }
                last = Some(end);
            }
            if last.is_some() {
                builder.close();
            }
        }
        builder.finish()
    }
}

/// Searches `dirs` (non-recursively) for `<family>.ttf` or `<family>.otf`.
///
/// Matching ignores ASCII case, spaces, hyphens and underscores, so
/// "Open Sans" finds `OpenSans.ttf` and `open-sans.otf`.
#[must_use]
pub fn find_font_file(family: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let wanted = normalize_family(family);
    if wanted.is_empty() {
        return None;
    }
    for dir in dirs {
        let Ok(entries) = fs::read_dir(dir) else {
            log::debug!("font directory {} is not readable", dir.display());
            continue;
        };
        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                let ext_ok = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
                let stem_ok = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|s| normalize_family(s) == wanted);
                ext_ok && stem_ok
            })
            .collect();
        candidates.sort();
        if let Some(found) = candidates.into_iter().next() {
            return Some(found);
        }
    }
    None
}

fn normalize_family(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
