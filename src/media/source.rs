// SPDX-License-Identifier: MPL-2.0
//! Raster source loading.
//!
//! A [`FileInput`] is the raw user-supplied file (name, declared MIME type, bytes).
//! [`RasterSource::load`] checks the declared type, decodes the bytes and keeps
//! the decoded RGBA pixels alongside the original file metadata.
//!
//! The type check is a policy on the *declared* MIME type only: a non-image
//! file carrying an `image/*` type passes the check and fails at decode.

use crate::error::{Error, Result};
use image_rs::{DynamicImage, GenericImageView, RgbaImage};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// A user-provided file with its declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Reads a file from disk, declaring its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or("application/octet-stream", mime_for_extension);
        Ok(Self::new(name, mime, bytes))
    }

    /// Byte length of the file.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Maps a file extension to the MIME type a browser would declare for it.
#[must_use]
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Unique identity of a loaded source, used to tell sources apart after replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A decoded image together with the metadata of the file it came from.
///
/// Pixels are shared behind an `Arc`; dropping the last clone releases them.
#[derive(Debug, Clone)]
pub struct RasterSource {
    id: SourceId,
    name: String,
    mime: String,
    original_bytes: Arc<Vec<u8>>,
    pixels: Arc<RgbaImage>,
}

impl RasterSource {
    /// Rejects inputs whose declared MIME type is not an image category.
    pub fn check_type(mime: &str) -> Result<()> {
        if mime.trim().to_ascii_lowercase().starts_with("image/") {
            Ok(())
        } else {
            Err(Error::UnsupportedType {
                mime: mime.to_string(),
            })
        }
    }

    /// Validates and decodes `input`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedType`] if the declared type is not `image/*`
    /// - [`Error::DecodeFailure`] if the bytes cannot be decoded
    pub fn load(input: &FileInput) -> Result<Self> {
        Self::check_type(&input.mime)?;
        let decoded = image_rs::load_from_memory(&input.bytes)
            .map_err(|err| Error::DecodeFailure(format!("{}: {err}", input.name)))?;
        let (width, height) = decoded.dimensions();
        log::debug!(
            "decoded {} ({}, {} bytes) as {width}x{height}",
            input.name,
            input.mime,
            input.len()
        );
        Ok(Self {
            id: SourceId::next(),
            name: input.name.clone(),
            mime: input.mime.clone(),
            original_bytes: Arc::new(input.bytes.clone()),
            pixels: Arc::new(decoded.into_rgba8()),
        })
    }

    /// Decodes `input` on the blocking thread pool.
    ///
    /// The type check runs before the task is spawned so that an unsupported
    /// file is rejected without waiting on the pool.
    pub async fn load_async(input: FileInput) -> Result<Self> {
        Self::check_type(&input.mime)?;
        tokio::task::spawn_blocking(move || Self::load(&input))
            .await
            .map_err(|err| Error::DecodeFailure(format!("decode task failed: {err}")))?
    }

    /// Wraps already-decoded pixels, e.g. a generated image.
    #[must_use]
    pub fn from_pixels(name: impl Into<String>, mime: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            id: SourceId::next(),
            name: name.into(),
            mime: mime.into(),
            original_bytes: Arc::new(Vec::new()),
            pixels: Arc::new(pixels),
        }
    }

    #[must_use]
    pub fn id(&self) -> SourceId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Size of the file this source was decoded from.
    #[must_use]
    pub fn original_len(&self) -> usize {
        self.original_bytes.len()
    }

    #[must_use]
    pub fn original_bytes(&self) -> &[u8] {
        &self.original_bytes
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Straight-alpha RGBA pixels.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    #[must_use]
    pub fn to_dynamic(&self) -> DynamicImage {
        DynamicImage::ImageRgba8(self.pixels.as_ref().clone())
    }

    /// File name without its last extension.
    #[must_use]
    pub fn base_name(&self) -> &str {
        split_name(&self.name).0
    }

    /// Last extension of the file name, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        split_name(&self.name).1
    }
}

/// Splits `photo.final.jpg` into (`photo.final`, `Some("jpg")`).
#[must_use]
pub fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .expect("encode png");
        buf.into_inner()
    }

    #[test]
    fn load_exposes_natural_dimensions() {
        let input = FileInput::new("red.png", "image/png", png_bytes(12, 7));
        let source = RasterSource::load(&input).expect("load");
        assert_eq!(source.dimensions(), (12, 7));
        assert_eq!(source.pixels().get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(source.original_len(), input.len());
    }

    #[test]
    fn non_image_mime_is_rejected_before_decode() {
        let input = FileInput::new("notes.txt", "text/plain", png_bytes(2, 2));
        let err = RasterSource::load(&input).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedType {
                mime: "text/plain".into()
            }
        );
    }

    #[test]
    fn spoofed_image_mime_fails_at_decode() {
        let input = FileInput::new("fake.png", "image/png", b"definitely not a png".to_vec());
        let err = RasterSource::load(&input).unwrap_err();
        assert!(matches!(err, Error::DecodeFailure(_)));
    }

    #[test]
    fn every_load_gets_a_fresh_identity() {
        let input = FileInput::new("a.png", "image/png", png_bytes(1, 1));
        let a = RasterSource::load(&input).unwrap();
        let b = RasterSource::load(&input).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn split_name_handles_dots() {
        assert_eq!(split_name("photo.final.jpg"), ("photo.final", Some("jpg")));
        assert_eq!(split_name("README"), ("README", None));
        assert_eq!(split_name(".hidden"), (".hidden", None));
    }

    #[test]
    fn extension_mime_mapping() {
        assert_eq!(mime_for_extension("JPG"), "image/jpeg");
        assert_eq!(mime_for_extension("tif"), "image/tiff");
        assert_eq!(mime_for_extension("exe"), "application/octet-stream");
    }

    #[tokio::test]
    async fn load_async_decodes_off_thread() {
        let input = FileInput::new("red.png", "image/png", png_bytes(3, 4));
        let source = RasterSource::load_async(input).await.expect("load");
        assert_eq!(source.dimensions(), (3, 4));
    }
}
