// SPDX-License-Identifier: MPL-2.0
//! One-shot tools: compress, convert, rotate/flip, crop, and the final export
//! step of the effects, background and watermark editors.
//!
//! Every tool returns a [`ToolOutput`]: the artifact plus the notifications
//! the front-end should show.

use crate::domain::editing::Quality;
use crate::error::Result;
use crate::export::{self, derive_filename, ExportArtifact, FileNaming, OutputFormat};
use crate::media::image_transform::Orientation;
use crate::media::source::RasterSource;
use crate::notifications::Notification;
use crate::render::background::{render_background, BackgroundSpec, CanvasSize};
use crate::render::profile_crop::{render_profile, CropRect, ProfileCrop};
use crate::render::surface::DrawSurface;

/// Result of a tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub artifact: ExportArtifact,
    pub notifications: Vec<Notification>,
}

impl ToolOutput {
    fn done(artifact: ExportArtifact) -> Self {
        let message = format!("{} ({} bytes)", artifact.filename(), artifact.size());
        Self {
            artifact,
            notifications: vec![Notification::success("export-complete", message)],
        }
    }
}

/// Output format and extension that keep the source's own type.
///
/// Types the encoder cannot write fall back to PNG.
fn source_output(source: &RasterSource) -> (OutputFormat, String) {
    match OutputFormat::from_mime(source.mime()) {
        Some(format) => {
            let ext = source
                .extension()
                .filter(|ext| OutputFormat::from_extension(ext) == Some(format))
                .unwrap_or(format.extension());
            (format, ext.to_string())
        }
        None => {
            log::debug!("no encoder for {}, exporting as png", source.mime());
            (OutputFormat::Png, OutputFormat::Png.extension().to_string())
        }
    }
}

fn source_surface(source: &RasterSource) -> Result<DrawSurface> {
    DrawSurface::from_rgba(source.pixels())
}

// =============================================================================
// Compressor / Converter / Rotator
// =============================================================================

/// Re-encodes the source in its own format at `quality`.
///
/// When the result is not smaller than the original file, the original bytes
/// are kept and an info notification says so.
pub fn compress(source: &RasterSource, quality: Quality) -> Result<ToolOutput> {
    let (format, ext) = source_output(source);
    let filename = compressed_name(source, &ext);
    let artifact = export::export(&source_surface(source)?, format, quality, filename)?;

    let original = source.original_len();
    if original > 0 && artifact.size() > original {
        return Ok(keep_original(source, artifact.size()));
    }
    Ok(ToolOutput::done(artifact))
}

fn compressed_name(source: &RasterSource, ext: &str) -> String {
    derive_filename(source.name(), &FileNaming::Suffixed("-compressed".into()), ext)
}

/// The untouched original file, named with its own extension.
fn keep_original(source: &RasterSource, compressed_size: usize) -> ToolOutput {
    let ext = source
        .extension()
        .map_or_else(|| source_output(source).1, str::to_string);
    let kept = ExportArtifact::new(
        source.mime(),
        source.original_bytes().to_vec(),
        compressed_name(source, &ext),
    );
    let note = Notification::info(
        "compress-not-effective",
        format!(
            "compressed output ({compressed_size} bytes) is larger than the original ({} bytes); keeping the original",
            source.original_len()
        ),
    );
    ToolOutput {
        artifact: kept,
        notifications: vec![note],
    }
}

/// Re-encodes the source as `target`.
pub fn convert(source: &RasterSource, target: OutputFormat) -> Result<ToolOutput> {
    let filename = derive_filename(source.name(), &FileNaming::SameBase, target.extension());
    let artifact = export::export(&source_surface(source)?, target, Quality::max(), filename)?;
    Ok(ToolOutput::done(artifact))
}

/// Rotates or flips the source, keeping its format.
pub fn rotate(source: &RasterSource, orientation: Orientation) -> Result<ToolOutput> {
    let (format, ext) = source_output(source);
    let turned = orientation.apply(&source.to_dynamic()).into_rgba8();
    let filename = derive_filename(
        source.name(),
        &FileNaming::Suffixed(format!("-{}", orientation.as_str())),
        &ext,
    );
    let artifact = export::export(&DrawSurface::from_rgba(&turned)?, format, Quality::max(), filename)?;
    Ok(ToolOutput::done(artifact))
}

// =============================================================================
// Cropper
// =============================================================================

/// How the cropper shapes its output.
#[derive(Debug, Clone, PartialEq)]
pub enum CropMode {
    Rectangle(CropRect),
    /// Circular crop; always exported as PNG.
    Profile(ProfileCrop),
}

pub fn crop(source: &RasterSource, mode: &CropMode) -> Result<ToolOutput> {
    let naming = FileNaming::Fixed("cropped-image".into());
    let artifact = match mode {
        CropMode::Rectangle(rect) => {
            let (format, ext) = source_output(source);
            let cropped = rect.apply(&source.to_dynamic())?.into_rgba8();
            let filename = derive_filename(source.name(), &naming, &ext);
            export::export(&DrawSurface::from_rgba(&cropped)?, format, Quality::max(), filename)?
        }
        CropMode::Profile(profile) => {
            let surface = render_profile(&source.to_dynamic(), profile)?;
            let filename = derive_filename(source.name(), &naming, OutputFormat::Png.extension());
            export::export(&surface, OutputFormat::Png, Quality::max(), filename)?
        }
    };
    Ok(ToolOutput::done(artifact))
}

// =============================================================================
// Editor exports
// =============================================================================

/// Exports an edited surface as `edited-<name>` in the source format.
pub fn export_edited(source: &RasterSource, surface: &DrawSurface) -> Result<ToolOutput> {
    let (format, ext) = source_output(source);
    let filename = derive_filename(source.name(), &FileNaming::Prefixed("edited-".into()), &ext);
    Ok(ToolOutput::done(export::export(surface, format, Quality::max(), filename)?))
}

/// Renders and exports a background as `background-<mode>.png`.
pub fn export_background(spec: &BackgroundSpec, size: CanvasSize) -> Result<ToolOutput> {
    let surface = render_background(spec, size)?;
    let filename = format!("background-{}.png", spec.mode());
    Ok(ToolOutput::done(export::export(
        &surface,
        OutputFormat::Png,
        Quality::max(),
        filename,
    )?))
}

/// Exports a rendered watermark as `watermarked-<name>` in the source format.
pub fn export_watermarked(source: &RasterSource, surface: &DrawSurface) -> Result<ToolOutput> {
    let (format, ext) = source_output(source);
    let filename = derive_filename(source.name(), &FileNaming::Prefixed("watermarked-".into()), &ext);
    Ok(ToolOutput::done(export::export(surface, format, Quality::max(), filename)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::source::FileInput;
    use crate::render::color::RgbaColor;
    use image_rs::{GenericImageView, Rgba, RgbaImage};

    fn png_source(name: &str, width: u32, height: u32) -> RasterSource {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 90, 255])
        });
        let mut bytes = std::io::Cursor::new(Vec::new());
        image_rs::DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, image_rs::ImageFormat::Png)
            .unwrap();
        RasterSource::load(&FileInput::new(name, "image/png", bytes.into_inner())).unwrap()
    }

    #[test]
    fn compress_keeps_dimensions_and_names_output() {
        let source = png_source("shot.png", 40, 30);
        let out = compress(&source, Quality::new(50)).unwrap();
        assert_eq!(out.artifact.filename(), "shot-compressed.png");
        let decoded = image_rs::load_from_memory(out.artifact.bytes()).unwrap();
        assert_eq!(decoded.dimensions(), (40, 30));
    }

    #[test]
    fn compress_keeps_original_when_output_grows() {
        // A tiny declared original guarantees the re-encode is larger.
        let pixels = RgbaImage::from_pixel(16, 16, Rgba([1, 2, 3, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image_rs::DynamicImage::ImageRgba8(pixels)
            .write_to(&mut bytes, image_rs::ImageFormat::Png)
            .unwrap();
        let original = bytes.into_inner();
        let source =
            RasterSource::load(&FileInput::new("flat.png", "image/png", original.clone())).unwrap();

        let out = compress(&source, Quality::new(100)).unwrap();
        if out.artifact.bytes() == original.as_slice() {
            assert_eq!(out.notifications[0].key(), "compress-not-effective");
        } else {
            assert!(out.artifact.size() <= original.len());
        }
    }

    #[test]
    fn kept_original_is_named_with_its_own_extension() {
        let mut bytes = std::io::Cursor::new(Vec::new());
        image_rs::DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([5, 6, 7, 255])))
            .write_to(&mut bytes, image_rs::ImageFormat::Ico)
            .unwrap();
        let original = bytes.into_inner();
        let source =
            RasterSource::load(&FileInput::new("icon.ico", "image/x-icon", original.clone())).unwrap();
        // No ICO encoder: the re-encode would be PNG.
        assert_eq!(source_output(&source).0, OutputFormat::Png);

        let out = keep_original(&source, original.len() + 1);
        assert_eq!(out.artifact.filename(), "icon-compressed.ico");
        assert_eq!(out.artifact.mime(), "image/x-icon");
        assert_eq!(out.artifact.bytes(), original.as_slice());
        assert_eq!(out.notifications[0].key(), "compress-not-effective");
    }

    #[test]
    fn convert_to_jpeg_flattens_on_white() {
        let source = RasterSource::from_pixels(
            "clear.png",
            "image/png",
            RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])),
        );
        let out = convert(&source, OutputFormat::Jpeg).unwrap();
        assert_eq!(out.artifact.filename(), "clear.jpeg");
        assert_eq!(out.artifact.mime(), "image/jpeg");
        let decoded = image_rs::load_from_memory(out.artifact.bytes()).unwrap().to_rgba8();
        let px = decoded.get_pixel(4, 4);
        assert!(px[0] > 245 && px[1] > 245 && px[2] > 245 && px[3] == 255);
    }

    #[test]
    fn rotate_swaps_dimensions_and_tags_filename() {
        let source = png_source("wide.png", 30, 10);
        let out = rotate(&source, Orientation::RotateClockwise).unwrap();
        assert_eq!(out.artifact.filename(), "wide-rotate-cw.png");
        let decoded = image_rs::load_from_memory(out.artifact.bytes()).unwrap();
        assert_eq!(decoded.dimensions(), (10, 30));
    }

    #[test]
    fn profile_crop_is_always_png() {
        let source = RasterSource::from_pixels(
            "face.jpg",
            "image/jpeg",
            RgbaImage::from_pixel(50, 50, Rgba([10, 200, 10, 255])),
        );
        let mode = CropMode::Profile(ProfileCrop {
            rect: CropRect::new(0, 0, 50, 50),
            border: None,
        });
        let out = crop(&source, &mode).unwrap();
        assert_eq!(out.artifact.filename(), "cropped-image.png");
        assert_eq!(out.artifact.mime(), "image/png");
    }

    #[test]
    fn rectangle_crop_keeps_source_format() {
        let source = png_source("big.png", 60, 40);
        let out = crop(&source, &CropMode::Rectangle(CropRect::new(10, 10, 20, 15))).unwrap();
        assert_eq!(out.artifact.filename(), "cropped-image.png");
        let decoded = image_rs::load_from_memory(out.artifact.bytes()).unwrap();
        assert_eq!(decoded.dimensions(), (20, 15));
    }

    #[test]
    fn background_export_is_named_by_mode() {
        let out = export_background(
            &BackgroundSpec::Solid(RgbaColor::rgb(1, 2, 3)),
            CanvasSize::new(16, 9),
        )
        .unwrap();
        assert_eq!(out.artifact.filename(), "background-solid.png");
    }

    #[test]
    fn unknown_source_type_exports_png() {
        let source = RasterSource::from_pixels(
            "icon.ico",
            "image/x-icon",
            RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])),
        );
        let out = export_edited(&source, &DrawSurface::new(4, 4).unwrap()).unwrap();
        assert_eq!(out.artifact.filename(), "edited-icon.png");
    }
}
