// SPDX-License-Identifier: MPL-2.0
//! Exporter: encodes a finished surface and writes it under a derived filename.
//!
//! Formats without an alpha channel get an opaque white pre-fill before the
//! content is drawn, so transparent regions do not decode as black.

use crate::domain::editing::Quality;
use crate::error::{Error, Result};
use crate::media::source::split_name;
use crate::render::color::RgbaColor;
use crate::render::surface::DrawSurface;
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::{DynamicImage, ImageFormat};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// =============================================================================
// Output Format
// =============================================================================

/// Encodable output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
    Bmp,
    Gif,
    Tiff,
}

impl OutputFormat {
    pub const ALL: [Self; 6] = [
        Self::Png,
        Self::Jpeg,
        Self::Webp,
        Self::Bmp,
        Self::Gif,
        Self::Tiff,
    ];

    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
            Self::Tiff => "image/tiff",
        }
    }

    /// Canonical file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Tiff => "tiff",
        }
    }

    /// Whether the encoded file keeps transparency.
    #[must_use]
    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg | Self::Bmp)
    }

    /// Whether the quality setting changes the encoder output.
    #[must_use]
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }

    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        match mime.as_str() {
            "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/tif" => Some(Self::Tiff),
            "image/x-ms-bmp" => Some(Self::Bmp),
            _ => Self::ALL.into_iter().find(|f| f.mime() == mime),
        }
    }

    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
            Self::Gif => ImageFormat::Gif,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s)
            .or_else(|| Self::from_mime(s))
            .ok_or_else(|| Error::InvalidParameter(format!("unsupported output format '{s}'")))
    }
}

// =============================================================================
// Artifact
// =============================================================================

/// Encoded output. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    mime: String,
    bytes: Vec<u8>,
    filename: String,
}

impl ExportArtifact {
    #[must_use]
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
            filename: filename.into(),
        }
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Byte size of the encoded data.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Writes the artifact into `dir`, creating it if needed.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes)?;
        log::info!("saved {} ({} bytes)", path.display(), self.size());
        Ok(path)
    }
}

// =============================================================================
// Filenames
// =============================================================================

/// How an output filename is derived from the input name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNaming {
    /// `<base>.<ext>`
    SameBase,
    /// `<base><suffix>.<ext>`
    Suffixed(String),
    /// `<prefix><base>.<ext>`
    Prefixed(String),
    /// `<stem>.<ext>`, ignoring the input name.
    Fixed(String),
}

/// Builds the output filename for `original` with extension `ext`.
#[must_use]
pub fn derive_filename(original: &str, naming: &FileNaming, ext: &str) -> String {
    let base = match split_name(original).0 {
        "" => "image",
        base => base,
    };
    match naming {
        FileNaming::SameBase => format!("{base}.{ext}"),
        FileNaming::Suffixed(suffix) => format!("{base}{suffix}.{ext}"),
        FileNaming::Prefixed(prefix) => format!("{prefix}{base}.{ext}"),
        FileNaming::Fixed(stem) => format!("{stem}.{ext}"),
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Draws `content` onto a fresh surface prepared for `format`.
///
/// Alpha-less formats get an opaque white background first.
pub fn prepare_for_format(content: &DrawSurface, format: OutputFormat) -> Result<DrawSurface> {
    if format.supports_alpha() {
        return Ok(content.clone());
    }
    let mut surface = DrawSurface::filled(content.width(), content.height(), RgbaColor::WHITE)?;
    surface.draw_layer(content, 0, 0, 1.0, None);
    Ok(surface)
}

/// Encodes `surface` as `format`; `quality` applies to lossy formats only.
pub fn encode(surface: &DrawSurface, format: OutputFormat, quality: Quality) -> Result<Vec<u8>> {
    let prepared = prepare_for_format(surface, format)?;
    let rgba = DynamicImage::ImageRgba8(prepared.to_rgba());
    let image = if format.supports_alpha() {
        rgba
    } else {
        DynamicImage::ImageRgb8(rgba.to_rgb8())
    };

    let mut buf = Cursor::new(Vec::new());
    let result = match format {
        OutputFormat::Jpeg => {
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality.value()))
        }
        other => image.write_to(&mut buf, other.image_format()),
    };
    result.map_err(|err| Error::EncodeFailure(format!("{format}: {err}")))?;
    let bytes = buf.into_inner();
    log::debug!(
        "encoded {}x{} as {format} at quality {} -> {} bytes",
        surface.width(),
        surface.height(),
        quality.value(),
        bytes.len()
    );
    Ok(bytes)
}

/// Encodes `surface` and wraps it with its MIME type and filename.
pub fn export(
    surface: &DrawSurface,
    format: OutputFormat,
    quality: Quality,
    filename: String,
) -> Result<ExportArtifact> {
    let bytes = encode(surface, format, quality)?;
    Ok(ExportArtifact::new(format.mime(), bytes, filename))
}
