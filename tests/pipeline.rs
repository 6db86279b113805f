// SPDX-License-Identifier: MPL-2.0
use image_rs::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use raster_tools::application::tools;
use raster_tools::brush::{average_block, mosaic_stroke};
use raster_tools::domain::editing::{FontSize, GradientAngle, Quality, TileSpacing};
use raster_tools::export::OutputFormat;
use raster_tools::media::source::{FileInput, RasterSource};
use raster_tools::render::background::render_background;
use raster_tools::render::profile_crop::render_profile;
use raster_tools::render::watermark::anchor_points;
use raster_tools::render::{
    BackgroundSpec, BorderPaint, CanvasSize, ColorStop, ColorStops, CropRect, DrawSurface,
    Placement, ProfileCrop, RgbaColor,
};
use std::io::Cursor;

fn encode(image: RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image).to_rgb8()),
        _ => DynamicImage::ImageRgba8(image),
    };
    image.write_to(&mut buf, format).expect("encode fixture");
    buf.into_inner()
}

fn noisy(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let v = (x.wrapping_mul(31) ^ y.wrapping_mul(17)) % 256;
        Rgba([v as u8, (255 - v) as u8, (v / 2) as u8, 255])
    })
}

#[test]
fn compressed_output_keeps_source_dimensions() {
    let cases = [
        ("a.png", "image/png", ImageFormat::Png, 37, 19),
        ("b.jpg", "image/jpeg", ImageFormat::Jpeg, 64, 48),
        ("c.webp", "image/webp", ImageFormat::WebP, 13, 50),
        ("d.bmp", "image/bmp", ImageFormat::Bmp, 20, 20),
    ];
    for (name, mime, format, w, h) in cases {
        let input = FileInput::new(name, mime, encode(noisy(w, h), format));
        let source = RasterSource::load(&input).expect("load fixture");
        for quality in [1, 50, 100] {
            let out = tools::compress(&source, Quality::new(quality)).expect("compress");
            let decoded = image_rs::load_from_memory(out.artifact.bytes()).expect("decode");
            assert_eq!(decoded.dimensions(), (w, h), "{name} at q{quality}");
        }
    }
}

#[test]
fn inserted_stops_stay_sorted() {
    let mut stops = ColorStops::default();
    for (i, position) in [55.0, 3.0, 97.0, 42.0, 42.0, 0.0, 100.0].into_iter().enumerate() {
        stops.insert(ColorStop::new(RgbaColor::from_seed(7, i as u32), position));
        let positions: Vec<f32> = stops.iter().map(|s| s.position.value()).collect();
        assert!(
            positions.windows(2).all(|pair| pair[0] <= pair[1]),
            "{positions:?}"
        );
    }
    let index = stops.push_end(RgbaColor::WHITE);
    assert_eq!(index, stops.len() - 1);
}

#[test]
fn removing_one_of_two_stops_is_rejected() {
    let mut stops = ColorStops::two(RgbaColor::BLACK, RgbaColor::WHITE);
    assert!(stops.remove(0).is_err());
    assert_eq!(stops.len(), 2);
}

#[test]
fn tiled_watermark_row_has_boundary_tiles() {
    let (text_width, spacing, surface_width) = (100.0, 50.0, 500.0);
    let anchors = anchor_points(
        Placement::Tile {
            spacing: TileSpacing::new(spacing),
        },
        text_width,
        FontSize::new(40.0),
        surface_width,
        300.0,
    );
    let first_row_y = anchors[0].1;
    let per_row = anchors.iter().filter(|(_, y)| *y == first_row_y).count();
    let expected = (surface_width / (text_width + spacing)).ceil() as usize + 2;
    assert_eq!(per_row, expected);
}

#[test]
fn mosaic_over_uniform_colour_is_unchanged() {
    let color = RgbaColor::rgb(12, 140, 220);
    let mut surface = DrawSurface::filled(64, 64, color).unwrap();
    assert_eq!(average_block(&surface, 10, 10, 8), Some(color));

    mosaic_stroke(&mut surface, (32.0, 32.0), 20.0, 6);
    let image = surface.to_rgba();
    assert!(image.pixels().all(|p| p.0 == [12, 140, 220, 255]));
}

#[test]
fn mosaic_near_edges_does_not_panic() {
    let mut surface = DrawSurface::filled(30, 30, RgbaColor::WHITE).unwrap();
    mosaic_stroke(&mut surface, (0.0, 0.0), 25.0, 7);
    mosaic_stroke(&mut surface, (29.0, 29.0), 25.0, 7);
    assert_eq!(average_block(&surface, 28, 28, 10), Some(RgbaColor::WHITE));
}

#[test]
fn profile_crop_is_transparent_outside_circle() {
    let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(80, 60, Rgba([200, 10, 10, 255])));
    let spec = ProfileCrop {
        rect: CropRect::new(0, 0, 80, 60),
        border: Some(BorderPaint::Solid(RgbaColor::WHITE)),
    };
    let surface = render_profile(&source, &spec).unwrap();
    let size = surface.width();
    assert_eq!(size, surface.height());
    assert_eq!(size, 60);

    let half = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let (dx, dy) = (x as f32 + 0.5 - half, y as f32 + 0.5 - half);
            // One pixel of slack for anti-aliasing on the rim.
            if (dx * dx + dy * dy).sqrt() > half + 1.0 {
                assert_eq!(surface.pixel(x, y).unwrap().a, 0, "({x}, {y})");
            }
        }
    }
    assert_eq!(surface.pixel(30, 30).unwrap().a, 255);
}

#[test]
fn red_png_converted_to_jpeg_is_opaque_red() {
    let png = encode(RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255])), ImageFormat::Png);
    let source = RasterSource::load(&FileInput::new("red.png", "image/png", png)).unwrap();

    let out = tools::convert(&source, OutputFormat::Jpeg).unwrap();
    assert_eq!(out.artifact.mime(), "image/jpeg");

    let decoded = image_rs::load_from_memory(out.artifact.bytes()).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (100, 100));
    for p in decoded.pixels() {
        let [r, g, b, a] = p.0;
        assert_eq!(a, 255);
        assert!(r > 235 && g < 20 && b < 20, "{:?}", p.0);
    }
}

#[test]
fn horizontal_gradient_runs_red_to_blue() {
    let spec = BackgroundSpec::Linear {
        angle: GradientAngle::new(0.0),
        stops: ColorStops::two(RgbaColor::rgb(255, 0, 0), RgbaColor::rgb(0, 0, 255)),
    };
    let surface = render_background(&spec, CanvasSize::new(200, 40)).unwrap();
    for y in [0, 20, 39] {
        let left = surface.pixel(0, y).unwrap();
        let right = surface.pixel(199, y).unwrap();
        assert!(left.r > 240 && left.b < 15, "left {left:?}");
        assert!(right.b > 240 && right.r < 15, "right {right:?}");
    }
}
