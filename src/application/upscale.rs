// SPDX-License-Identifier: MPL-2.0
//! Resize with optional remote sharpening.
//!
//! The image is resampled locally first. Only when the target is larger than
//! the source in either axis is the result sent to the [`EnhancementGateway`],
//! exactly once. A gateway failure is not fatal: the plain resize is exported
//! and a warning notification is attached.

use super::port::EnhancementGateway;
use super::tools::ToolOutput;
use crate::domain::editing::{Quality, ResizeScale};
use crate::error::{Error, Result};
use crate::export::{self, ExportArtifact, OutputFormat};
use crate::media::image_transform;
use crate::media::source::RasterSource;
use crate::notifications::Notification;
use crate::render::surface::DrawSurface;

/// Parameters of one resize request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeRequest {
    pub width: u32,
    pub height: u32,
    /// Encoder quality for lossy source formats.
    pub quality: Quality,
    /// Strength field sent to the gateway.
    pub strength: f32,
}

impl ResizeRequest {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            quality: Quality::new(crate::config::RESIZE_ENCODE_QUALITY),
            strength: crate::config::DEFAULT_SHARPEN_STRENGTH,
        }
    }

    /// Target that scales `source` by a percentage.
    #[must_use]
    pub fn scaled(source: (u32, u32), scale: ResizeScale) -> Self {
        let (width, height) = scale.apply_to_dimensions(source.0, source.1);
        Self::new(width, height)
    }
}

/// Whether a resize from `source` to `target` enlarges either axis.
#[must_use]
pub fn needs_enhancement(source: (u32, u32), target: (u32, u32)) -> bool {
    target.0 > source.0 || target.1 > source.1
}

/// Resizes `source` and, for enlargements, sharpens through `gateway`.
///
/// Pass `None` to skip the gateway entirely (enhancement disabled).
/// The output is named `upscaled-<original name>` and keeps the source format
/// when it can be encoded.
pub async fn resize_and_enhance<G: EnhancementGateway>(
    source: &RasterSource,
    request: ResizeRequest,
    gateway: Option<&G>,
) -> Result<ToolOutput> {
    let format = OutputFormat::from_mime(source.mime()).unwrap_or(OutputFormat::Png);
    let filename = format!("upscaled-{}", source.name());

    let resized =
        image_transform::resize(&source.to_dynamic(), request.width, request.height).into_rgba8();
    let surface = DrawSurface::from_rgba(&resized)?;
    let plain = export::export(&surface, format, request.quality, filename)?;
    log::debug!(
        "resized {} from {}x{} to {}x{}",
        source.name(),
        source.width(),
        source.height(),
        request.width,
        request.height
    );

    let mut notifications = Vec::new();
    let artifact = match gateway {
        Some(gateway) if needs_enhancement(source.dimensions(), (request.width, request.height)) => {
            match enhance(gateway, &plain, request.strength).await {
                Ok(sharpened) => sharpened,
                Err(err) => {
                    notifications.push(Notification::warning(
                        "upscale-sharpen-fallback",
                        format!("sharpening via {} failed, using plain resize: {err}", gateway.name()),
                    ));
                    plain
                }
            }
        }
        _ => plain,
    };

    notifications.push(Notification::success(
        "export-complete",
        format!("{} ({} bytes)", artifact.filename(), artifact.size()),
    ));
    Ok(ToolOutput {
        artifact,
        notifications,
    })
}

/// One gateway call; the response must decode as an image.
async fn enhance<G: EnhancementGateway>(
    gateway: &G,
    plain: &ExportArtifact,
    strength: f32,
) -> Result<ExportArtifact> {
    let bytes = gateway
        .sharpen(plain.bytes().to_vec(), plain.mime(), strength)
        .await?;
    image_rs::load_from_memory(&bytes)
        .map_err(|err| Error::NetworkFailure(format!("gateway returned undecodable data: {err}")))?;
    Ok(ExportArtifact::new(plain.mime(), bytes, plain.filename()))
}
