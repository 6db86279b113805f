// SPDX-License-Identifier: MPL-2.0
//! Geometric image transforms: rotate, flip, crop and resize.

use crate::error::{Error, Result};
use image_rs::{imageops::FilterType, DynamicImage};
use std::fmt;
use std::str::FromStr;

// ==========================================================================
// Orientation Transforms
// ==========================================================================

/// Quarter-turn rotations and mirror flips offered by the rotator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    RotateClockwise,
    RotateCounterClockwise,
    FlipHorizontal,
    FlipVertical,
}

impl Orientation {
    pub const ALL: [Self; 4] = [
        Self::RotateClockwise,
        Self::RotateCounterClockwise,
        Self::FlipHorizontal,
        Self::FlipVertical,
    ];

    /// Applies the transform, returning a new image.
    #[must_use]
    pub fn apply(self, image: &DynamicImage) -> DynamicImage {
        match self {
            Self::RotateClockwise => rotate_right(image),
            Self::RotateCounterClockwise => rotate_left(image),
            Self::FlipHorizontal => flip_horizontal(image),
            Self::FlipVertical => flip_vertical(image),
        }
    }

    /// Name used on the command line and in exported filenames.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RotateClockwise => "rotate-cw",
            Self::RotateCounterClockwise => "rotate-ccw",
            Self::FlipHorizontal => "flip-horizontal",
            Self::FlipVertical => "flip-vertical",
        }
    }

    /// Whether the output swaps width and height.
    #[must_use]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Self::RotateClockwise | Self::RotateCounterClockwise)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidParameter(format!("unknown transform '{s}'")))
    }
}

/// Rotate an image 90 degrees counter-clockwise (left).
pub fn rotate_left(image: &DynamicImage) -> DynamicImage {
    image.rotate270()
}

/// Rotate an image 90 degrees clockwise (right).
pub fn rotate_right(image: &DynamicImage) -> DynamicImage {
    image.rotate90()
}

/// Flip an image horizontally (mirror left-to-right).
pub fn flip_horizontal(image: &DynamicImage) -> DynamicImage {
    image.fliph()
}

/// Flip an image vertically (mirror top-to-bottom).
pub fn flip_vertical(image: &DynamicImage) -> DynamicImage {
    image.flipv()
}

// ==========================================================================
// Resize
// ==========================================================================

/// Resize the image to the provided dimensions using a high-quality filter.
pub fn resize(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let width = width.max(1);
    let height = height.max(1);
    image.resize_exact(width, height, FilterType::Lanczos3)
}

/// Derives the missing side of a resize target while the aspect ratio is locked.
///
/// `width` drives when given; otherwise `height` drives. Returns the source
/// size when neither is given.
#[must_use]
pub fn locked_dimensions(
    source: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    let (src_w, src_h) = (f64::from(source.0.max(1)), f64::from(source.1.max(1)));
    // Results are bounded by the u32 inputs times a finite ratio; saturate anyway.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let to_u32 = |v: f64| v.round().clamp(1.0, f64::from(u32::MAX)) as u32;
    match (width, height) {
        (Some(w), _) => (w.max(1), to_u32(f64::from(w) * src_h / src_w)),
        (None, Some(h)) => (to_u32(f64::from(h) * src_w / src_h), h.max(1)),
        (None, None) => source,
    }
}

// ==========================================================================
// Crop
// ==========================================================================

/// Crop the image to the specified rectangle.
///
/// The rectangle coordinates are clamped to the image boundaries.
/// If the resulting crop area is invalid (zero width or height), returns None.
pub fn crop(image: &DynamicImage, x: u32, y: u32, width: u32, height: u32) -> Option<DynamicImage> {
    let img_width = image.width();
    let img_height = image.height();
    if img_width == 0 || img_height == 0 {
        return None;
    }

    let x = x.min(img_width.saturating_sub(1));
    let y = y.min(img_height.saturating_sub(1));

    let max_width = img_width.saturating_sub(x);
    let max_height = img_height.saturating_sub(y);

    let width = width.min(max_width).max(1);
    let height = height.min(max_height).max(1);

    Some(image.crop_imm(x, y, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{GenericImageView, ImageBuffer};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let buffer = ImageBuffer::from_pixel(width, height, image_rs::Rgba([0, 0, 0, 0]));
        DynamicImage::ImageRgba8(buffer)
    }

    #[test]
    fn rotations_swap_dimensions() {
        let img = create_test_image(4, 3);
        for op in [Orientation::RotateClockwise, Orientation::RotateCounterClockwise] {
            let rotated = op.apply(&img);
            assert_eq!(rotated.dimensions(), (3, 4), "{op}");
            assert!(op.swaps_dimensions());
        }
    }

    #[test]
    fn flips_preserve_dimensions() {
        let img = create_test_image(8, 6);
        for op in [Orientation::FlipHorizontal, Orientation::FlipVertical] {
            assert_eq!(op.apply(&img).dimensions(), (8, 6), "{op}");
            assert!(!op.swaps_dimensions());
        }
    }

    #[test]
    fn rotate_clockwise_moves_top_left_to_top_right() {
        let mut buffer = ImageBuffer::from_pixel(3, 2, image_rs::Rgba([0, 0, 0, 255]));
        buffer.put_pixel(0, 0, image_rs::Rgba([255, 0, 0, 255]));
        let rotated = rotate_right(&DynamicImage::ImageRgba8(buffer)).to_rgba8();
        // 3x2 becomes 2x3; the old top-left lands at the new top-right.
        assert_eq!(rotated.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn orientation_names_round_trip() {
        for op in Orientation::ALL {
            assert_eq!(op.as_str().parse::<Orientation>().unwrap(), op);
        }
        assert!("spin".parse::<Orientation>().is_err());
    }

    #[test]
    fn resize_changes_dimensions() {
        let img = create_test_image(8, 4);
        let resized = resize(&img, 4, 2);
        assert_eq!(resized.dimensions(), (4, 2));
    }

    #[test]
    fn resize_never_produces_zero_sized_image() {
        let img = create_test_image(8, 4);
        assert_eq!(resize(&img, 0, 0).dimensions(), (1, 1));
    }

    #[test]
    fn locked_dimensions_follow_driving_side() {
        assert_eq!(locked_dimensions((800, 600), Some(400), None), (400, 300));
        assert_eq!(locked_dimensions((800, 600), None, Some(1200)), (1600, 1200));
        assert_eq!(locked_dimensions((800, 600), None, None), (800, 600));
    }

    #[test]
    fn crop_within_bounds() {
        let img = create_test_image(10, 8);
        let result = crop(&img, 2, 2, 4, 3).expect("crop");
        assert_eq!(result.dimensions(), (4, 3));
    }

    #[test]
    fn crop_clamps_to_boundaries() {
        let img = create_test_image(10, 8);
        let result = crop(&img, 8, 6, 10, 10).expect("crop");
        assert_eq!(result.dimensions(), (2, 2));
    }

    #[test]
    fn crop_entire_image() {
        let img = create_test_image(10, 8);
        let result = crop(&img, 0, 0, 10, 8).expect("crop");
        assert_eq!(result.dimensions(), (10, 8));
    }

    #[test]
    fn flip_horizontal_mirrors_pixels_left_to_right() {
        let mut buffer = ImageBuffer::from_pixel(4, 2, image_rs::Rgba([0, 0, 0, 255]));
        for x in 2..4 {
            for y in 0..2 {
                buffer.put_pixel(x, y, image_rs::Rgba([255, 255, 255, 255]));
            }
        }
        let flipped = flip_horizontal(&DynamicImage::ImageRgba8(buffer)).to_rgba8();

        assert_eq!(flipped.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(flipped.get_pixel(3, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn flip_vertical_mirrors_pixels_top_to_bottom() {
        let mut buffer = ImageBuffer::from_pixel(2, 4, image_rs::Rgba([0, 0, 0, 255]));
        for x in 0..2 {
            for y in 2..4 {
                buffer.put_pixel(x, y, image_rs::Rgba([255, 255, 255, 255]));
            }
        }
        let flipped = flip_vertical(&DynamicImage::ImageRgba8(buffer)).to_rgba8();

        assert_eq!(flipped.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(flipped.get_pixel(0, 3).0, [0, 0, 0, 255]);
    }
}
