// SPDX-License-Identifier: MPL-2.0
//! Domain layer - value objects with no I/O.
//!
//! # Modules
//!
//! - [`editing`]: Tool parameter types ([`Quality`](editing::Quality),
//!   [`BrushRadius`](editing::BrushRadius), [`StopPosition`](editing::StopPosition),
//!   [`ResizeScale`](editing::ResizeScale), ...)

pub mod editing;
