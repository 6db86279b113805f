// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`tools`]: one-shot tools (compress, convert, rotate, crop, exports)
//! - [`upscale`]: resize followed by optional remote sharpening
//!
//! # Dependency Rule
//!
//! - Application layer depends on the domain and render layers
//! - Infrastructure layer implements application layer ports
//! - The CLI front-end uses application layer services

pub mod port;
pub mod tools;
pub mod upscale;

pub use tools::{CropMode, ToolOutput};
pub use upscale::{needs_enhancement, resize_and_enhance, ResizeRequest};
