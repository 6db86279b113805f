// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in `application::port`.
//!
//! # Available Adapters
//!
//! - [`sharpen`]: remote sharpening over HTTP (implements [`EnhancementGateway`])
//!
//! [`EnhancementGateway`]: crate::application::port::EnhancementGateway

pub mod sharpen;

pub use sharpen::HttpSharpenGateway;
