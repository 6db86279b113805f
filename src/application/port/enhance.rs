// SPDX-License-Identifier: MPL-2.0
//! Enhancement port definition.
//!
//! This module defines the [`EnhancementGateway`] trait for the remote
//! sharpening service used after upscaling.
//!
//! # Design Notes
//!
//! - Exactly one call per upscale; no retry
//! - Failures are reported as [`Error::NetworkFailure`](crate::error::Error::NetworkFailure)
//!   and the caller falls back to the unsharpened image

use crate::error::Result;
use std::future::Future;

/// Remote image sharpening.
pub trait EnhancementGateway: Send + Sync {
    /// Sends `image` (encoded as `mime`) and returns the sharpened encoded bytes.
    fn sharpen(
        &self,
        image: Vec<u8>,
        mime: &str,
        strength: f32,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Short label for log messages.
    fn name(&self) -> &str {
        "gateway"
    }
}
