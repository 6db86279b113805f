// SPDX-License-Identifier: MPL-2.0
//! Source images: loading user files and geometric transforms on decoded pixels.

pub mod image_transform;
pub mod source;

pub use image_transform::Orientation;
pub use source::{FileInput, RasterSource, SourceId};
