// SPDX-License-Identifier: MPL-2.0
//! `raster_tools` is a headless raster image toolkit.
//!
//! It loads images, renders them through tool-specific effects (global
//! filters, brush strokes, watermarks, circular crops) or generates
//! backgrounds from scratch, and encodes the result for download. Format
//! conversion, compression, rotation and resizing with optional remote
//! sharpening are provided as one-shot tools.

#![doc(html_root_url = "https://docs.rs/raster_tools/0.1.0")]

pub mod application;
pub mod brush;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod infrastructure;
pub mod logging;
pub mod media;
pub mod notepad;
pub mod notifications;
pub mod paths;
pub mod render;
pub mod session;
