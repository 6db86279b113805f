// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only crate types, so the application layer stays
//! independent of HTTP clients and other concrete implementations.
//!
//! # Available Ports
//!
//! - [`enhance`]: remote sharpening after an upscale
//!
//! # Example
//!
//! ```ignore
//! use raster_tools::application::port::EnhancementGateway;
//!
//! async fn sharpen_png(gateway: &impl EnhancementGateway, png: Vec<u8>) -> Vec<u8> {
//!     gateway.sharpen(png.clone(), "image/png", 1.0).await.unwrap_or(png)
//! }
//! ```

pub mod enhance;

pub use enhance::EnhancementGateway;
