// SPDX-License-Identifier: MPL-2.0
use raster_tools::application::tools::{self, CropMode, ToolOutput};
use raster_tools::application::upscale::{resize_and_enhance, ResizeRequest};
use raster_tools::brush::{BrushKind, BrushSettings};
use raster_tools::config::{self, Config};
use raster_tools::domain::editing::{
    BrushRadius, EffectStrength, FilterPercent, FontSize, GradientAngle, GrayscalePercent,
    MeshCells, Opacity, Quality, ResizeScale, RotationDegrees, ShadowBlur, StrokeWidth,
    TileSpacing,
};
use raster_tools::error::{Error, Result};
use raster_tools::export::OutputFormat;
use raster_tools::infrastructure::HttpSharpenGateway;
use raster_tools::logging::{init_logging, LoggingConfig};
use raster_tools::media::image_transform::{locked_dimensions, Orientation};
use raster_tools::media::source::{FileInput, RasterSource};
use raster_tools::notepad::{KeyValueStore, Note};
use raster_tools::notifications::Notification;
use raster_tools::paths;
use raster_tools::render::{
    BackgroundSpec, BorderPaint, CanvasSize, ColorStop, ColorStops, CropRect, EffectParameters,
    FontFace, GlobalFilters, MeshGrid, Placement, ProfileCrop, RgbaColor, Shadow, TextFill,
    WatermarkSpec,
};
use raster_tools::session::ToolSession;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const HELP: &str = "\
raster-tools: headless raster image toolkit

USAGE:
  raster-tools [GLOBAL OPTIONS] <COMMAND> [OPTIONS] [FILE]

GLOBAL OPTIONS:
  --config-dir DIR     Directory holding settings.toml
  --data-dir DIR       Directory holding the notepad store
  --output-dir DIR     Where exported files are written
  --log FILTER         Log filter (e.g. debug, raster_tools=trace)
  -h, --help           Print this help

COMMANDS:
  compress FILE [--quality N]
  convert FILE --to png|jpeg|webp|bmp|gif|tiff
  rotate FILE --op rotate-cw|rotate-ccw|flip-horizontal|flip-vertical
  crop FILE --rect X,Y,W,H [--profile] [--border COLOR | --border-gradient A,B]
  resize FILE [--width N] [--height N] [--scale PERCENT] [--free] [--no-enhance]
  effects FILE [--brightness N] [--contrast N] [--saturate N] [--grayscale N] [--invert]
               [--brush gaussian|mosaic] [--radius N] [--strength N]
               [--stroke X,Y ...] [--displayed WxH]
  background [--mode solid|linear|radial|mesh] [--size WxH|RATIO] [--color C]
             [--angle DEG] [--stop COLOR@POS ...] [--rows N] [--cols N] [--seed N] [--css]
  watermark FILE [--text T] [--font FAMILY] [--font-file PATH] [--size N] [--opacity F]
                 [--rotation DEG] [--placement tile|center|top-left|bottom-right]
                 [--spacing N] [--fill solid:C|gradient:A,B|stroke:C,W]
                 [--shadow-blur N] [--no-shadow]
  note show|copy
  note save [--title T] [--content C]
";

fn main() -> ExitCode {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }

    let globals = match Globals::parse(&mut args) {
        Ok(globals) => globals,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    paths::init_cli_overrides(globals.data_dir.clone(), globals.config_dir.clone());
    let (config, warning) = config::load();
    init_logging(LoggingConfig {
        env_filter: globals.log.clone().or_else(|| config.general.log_filter.clone()),
        ..LoggingConfig::default()
    });
    if let Some(warning) = warning {
        log::warn!("using default settings: {warning}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("failed to start async runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args, &globals, &config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let notification = Notification::from_error(&err);
            eprintln!("{notification}");
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Argument Parsing
// =============================================================================

struct Globals {
    config_dir: Option<String>,
    data_dir: Option<String>,
    output_dir: Option<PathBuf>,
    log: Option<String>,
}

impl Globals {
    fn parse(args: &mut pico_args::Arguments) -> Result<Self> {
        Ok(Self {
            config_dir: cli(args.opt_value_from_str("--config-dir"))?,
            data_dir: cli(args.opt_value_from_str("--data-dir"))?,
            output_dir: cli(args.opt_value_from_str("--output-dir"))?,
            log: cli(args.opt_value_from_str("--log"))?,
        })
    }

    fn output_dir(&self, config: &Config) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(|| config.general.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn cli<T>(result: std::result::Result<T, pico_args::Error>) -> Result<T> {
    result.map_err(|err| Error::InvalidParameter(err.to_string()))
}

fn parse_numbers(value: &str, expected: usize) -> Result<Vec<f32>> {
    let numbers = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|err| Error::InvalidParameter(format!("'{value}': {err}")))?;
    if numbers.len() == expected {
        Ok(numbers)
    } else {
        Err(Error::InvalidParameter(format!(
            "'{value}' needs {expected} comma-separated numbers"
        )))
    }
}

fn parse_point(value: &str) -> Result<(f32, f32)> {
    let n = parse_numbers(value, 2)?;
    Ok((n[0], n[1]))
}

// Negative and fractional inputs are floored into the image.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_rect(value: &str) -> Result<CropRect> {
    let n = parse_numbers(value, 4)?;
    let px = |v: f32| v.max(0.0) as u32;
    Ok(CropRect::new(px(n[0]), px(n[1]), px(n[2]), px(n[3])))
}

fn parse_stop(value: &str) -> Result<ColorStop> {
    let (color, position) = value.split_once('@').ok_or_else(|| {
        Error::InvalidParameter(format!("stop '{value}' must look like COLOR@POSITION"))
    })?;
    let position = position
        .trim()
        .trim_end_matches('%')
        .parse::<f32>()
        .map_err(|err| Error::InvalidParameter(format!("stop '{value}': {err}")))?;
    Ok(ColorStop::new(color.parse()?, position))
}

fn parse_color_pair(value: &str) -> Result<(RgbaColor, RgbaColor)> {
    let (a, b) = value
        .split_once(',')
        .ok_or_else(|| Error::InvalidParameter(format!("'{value}' must be two colours A,B")))?;
    Ok((a.parse()?, b.parse()?))
}

fn parse_fill(value: &str) -> Result<TextFill> {
    let (kind, rest) = value.split_once(':').unwrap_or((value, ""));
    match kind.trim() {
        "solid" => Ok(TextFill::Solid(rest.parse()?)),
        "gradient" => {
            let (start, end) = parse_color_pair(rest)?;
            Ok(TextFill::Gradient { start, end })
        }
        "stroke" => {
            let (color, width) = rest.split_once(',').unwrap_or((rest, "2"));
            let width = width
                .trim()
                .parse::<f32>()
                .map_err(|err| Error::InvalidParameter(format!("stroke width: {err}")))?;
            Ok(TextFill::Stroke {
                color: color.parse()?,
                width: StrokeWidth::new(width),
            })
        }
        other => Err(Error::InvalidParameter(format!("unknown fill '{other}'"))),
    }
}

fn free_input(args: &mut pico_args::Arguments) -> Result<FileInput> {
    let path: PathBuf = cli(args.free_from_str())?;
    FileInput::from_path(&path)
}

fn reject_leftovers(args: pico_args::Arguments) -> Result<()> {
    let rest = args.finish();
    if rest.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "unexpected arguments: {rest:?}"
        )))
    }
}

fn time_seed() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0)
}

// =============================================================================
// Commands
// =============================================================================

async fn run(mut args: pico_args::Arguments, globals: &Globals, config: &Config) -> Result<()> {
    let command = cli(args.subcommand())?
        .ok_or_else(|| Error::InvalidParameter("missing command (see --help)".into()))?;
    let out_dir = globals.output_dir(config);

    if command == "note" {
        return note_command(args);
    }

    let output = match command.as_str() {
        "compress" => {
            let quality = cli(args.opt_value_from_str::<_, u8>("--quality"))?
                .or(config.export.compression_quality)
                .map_or_else(Quality::default, Quality::new);
            let source = RasterSource::load_async(free_input(&mut args)?).await?;
            tools::compress(&source, quality)?
        }
        "convert" => {
            let target: OutputFormat = cli(args.value_from_str("--to"))?;
            let source = RasterSource::load_async(free_input(&mut args)?).await?;
            tools::convert(&source, target)?
        }
        "rotate" => {
            let op: Orientation = cli(args.value_from_str("--op"))?;
            let source = RasterSource::load_async(free_input(&mut args)?).await?;
            tools::rotate(&source, op)?
        }
        "crop" => crop_command(&mut args).await?,
        "resize" => resize_command(&mut args, config).await?,
        "effects" => effects_command(&mut args).await?,
        "background" => background_command(&mut args)?,
        "watermark" => watermark_command(&mut args, config).await?,
        other => {
            return Err(Error::InvalidParameter(format!(
                "unknown command '{other}' (see --help)"
            )))
        }
    };
    reject_leftovers(args)?;

    let path = output.artifact.save_to(&out_dir)?;
    for notification in &output.notifications {
        println!("{notification}");
    }
    println!("{}", path.display());
    Ok(())
}

async fn crop_command(args: &mut pico_args::Arguments) -> Result<ToolOutput> {
    let rect = cli(args.value_from_fn("--rect", parse_rect))?;
    let profile = args.contains("--profile");
    let solid: Option<RgbaColor> = cli(args.opt_value_from_str("--border"))?;
    let gradient = cli(args.opt_value_from_fn("--border-gradient", parse_color_pair))?;
    let source = RasterSource::load_async(free_input(args)?).await?;

    let mode = if profile {
        let border = match (solid, gradient) {
            (_, Some((start, end))) => Some(BorderPaint::Gradient { start, end }),
            (Some(color), None) => Some(BorderPaint::Solid(color)),
            (None, None) => None,
        };
        CropMode::Profile(ProfileCrop { rect, border })
    } else {
        CropMode::Rectangle(rect)
    };
    tools::crop(&source, &mode)
}

async fn resize_command(args: &mut pico_args::Arguments, config: &Config) -> Result<ToolOutput> {
    let width: Option<u32> = cli(args.opt_value_from_str("--width"))?;
    let height: Option<u32> = cli(args.opt_value_from_str("--height"))?;
    let scale: Option<f32> = cli(args.opt_value_from_str("--scale"))?;
    let free = args.contains("--free");
    let no_enhance = args.contains("--no-enhance");
    let source = RasterSource::load_async(free_input(args)?).await?;

    let mut request = if let Some(percent) = scale {
        ResizeRequest::scaled(source.dimensions(), ResizeScale::new(percent))
    } else if free {
        ResizeRequest::new(
            width.unwrap_or(source.width()),
            height.unwrap_or(source.height()),
        )
    } else {
        let (width, height) = locked_dimensions(source.dimensions(), width, height);
        ResizeRequest::new(width, height)
    };
    if let Some(quality) = config.export.resize_quality {
        request.quality = Quality::new(quality);
    }
    if let Some(strength) = config.enhance.strength {
        request.strength = strength;
    }

    if no_enhance || !config.enhance.enabled {
        resize_and_enhance::<HttpSharpenGateway>(&source, request, None).await
    } else {
        let gateway = HttpSharpenGateway::from_config(&config.enhance)?;
        resize_and_enhance(&source, request, Some(&gateway)).await
    }
}

async fn effects_command(args: &mut pico_args::Arguments) -> Result<ToolOutput> {
    let mut filters = GlobalFilters::default();
    if let Some(v) = cli(args.opt_value_from_str("--brightness"))? {
        filters.brightness = FilterPercent::new(v);
    }
    if let Some(v) = cli(args.opt_value_from_str("--contrast"))? {
        filters.contrast = FilterPercent::new(v);
    }
    if let Some(v) = cli(args.opt_value_from_str("--saturate"))? {
        filters.saturate = FilterPercent::new(v);
    }
    if let Some(v) = cli(args.opt_value_from_str("--grayscale"))? {
        filters.grayscale = GrayscalePercent::new(v);
    }
    filters.invert = args.contains("--invert");

    let mut brush = BrushSettings::default();
    if let Some(kind) = cli(args.opt_value_from_str::<_, BrushKind>("--brush"))? {
        brush.kind = kind;
    }
    if let Some(v) = cli(args.opt_value_from_str("--radius"))? {
        brush.radius = BrushRadius::new(v);
    }
    if let Some(v) = cli(args.opt_value_from_str("--strength"))? {
        brush.strength = EffectStrength::new(v);
    }
    let strokes = cli(args.values_from_fn("--stroke", parse_point))?;
    let displayed = cli(args.opt_value_from_fn("--displayed", CanvasSize::parse))?;
    let input = free_input(args)?;

    let mut session = ToolSession::new(EffectParameters::Effects { filters, brush });
    session.load(input).await?;
    let (dw, dh) = match (displayed, session.surface()) {
        (Some(size), _) => (size.width as f32, size.height as f32),
        (None, Some(surface)) => (surface.width() as f32, surface.height() as f32),
        (None, None) => (1.0, 1.0),
    };
    for point in strokes {
        session.stroke(point, (dw, dh))?;
    }
    session.export()
}

fn background_command(args: &mut pico_args::Arguments) -> Result<ToolOutput> {
    let mode: Option<String> = cli(args.opt_value_from_str("--mode"))?;
    let size = cli(args.opt_value_from_fn("--size", CanvasSize::parse))?.unwrap_or_default();
    let color: Option<RgbaColor> = cli(args.opt_value_from_str("--color"))?;
    let angle: Option<f32> = cli(args.opt_value_from_str("--angle"))?;
    let stops = cli(args.values_from_fn("--stop", parse_stop))?;
    let rows: Option<u32> = cli(args.opt_value_from_str("--rows"))?;
    let cols: Option<u32> = cli(args.opt_value_from_str("--cols"))?;
    let seed: Option<u32> = cli(args.opt_value_from_str("--seed"))?;
    let css = args.contains("--css");

    let stops = if stops.is_empty() {
        ColorStops::default()
    } else {
        ColorStops::new(stops)?
    };
    let spec = match mode.as_deref().unwrap_or("linear") {
        "solid" => BackgroundSpec::Solid(color.unwrap_or(RgbaColor::rgb(0x3b, 0x82, 0xf6))),
        "linear" => BackgroundSpec::Linear {
            angle: angle.map_or_else(GradientAngle::default, GradientAngle::new),
            stops,
        },
        "radial" => BackgroundSpec::Radial { stops },
        "mesh" => BackgroundSpec::Mesh(MeshGrid::seeded(
            rows.map_or_else(MeshCells::default, MeshCells::new),
            cols.map_or_else(MeshCells::default, MeshCells::new),
            seed.unwrap_or_else(time_seed),
        )),
        other => {
            return Err(Error::InvalidParameter(format!(
                "unknown background mode '{other}'"
            )))
        }
    };

    if css {
        println!("{}", spec.css()?);
    }
    tools::export_background(&spec, size)
}

async fn watermark_command(args: &mut pico_args::Arguments, config: &Config) -> Result<ToolOutput> {
    let mut spec = WatermarkSpec::default();
    if let Some(text) = cli(args.opt_value_from_str("--text"))? {
        spec.text = text;
    }
    if let Some(family) = cli(args.opt_value_from_str("--font"))? {
        spec.font_family = family;
    }
    let font_file: Option<PathBuf> = cli(args.opt_value_from_str("--font-file"))?;
    if let Some(v) = cli(args.opt_value_from_str("--size"))? {
        spec.size = FontSize::new(v);
    }
    if let Some(v) = cli(args.opt_value_from_str("--opacity"))? {
        spec.opacity = Opacity::new(v);
    }
    if let Some(v) = cli(args.opt_value_from_str("--rotation"))? {
        spec.rotation = RotationDegrees::new(v);
    }
    if let Some(placement) = cli(args.opt_value_from_str::<_, Placement>("--placement"))? {
        spec.placement = placement;
    }
    if let Some(spacing) = cli(args.opt_value_from_str::<_, f32>("--spacing"))? {
        if let Placement::Tile { .. } = spec.placement {
            spec.placement = Placement::Tile {
                spacing: TileSpacing::new(spacing),
            };
        }
    }
    if let Some(fill) = cli(args.opt_value_from_fn("--fill", parse_fill))? {
        spec.fill = fill;
    }
    if let Some(blur) = cli(args.opt_value_from_str::<_, f32>("--shadow-blur"))? {
        spec.shadow = Some(Shadow {
            blur: ShadowBlur::new(blur),
            ..Shadow::default()
        });
    }
    if args.contains("--no-shadow") {
        spec.shadow = None;
    }
    let input = free_input(args)?;

    let font = match font_file {
        Some(path) => FontFace::from_path(&path)?,
        None => FontFace::resolve(&spec.font_family, &config.watermark.font_dirs)?,
    };

    let mut session = ToolSession::new(EffectParameters::Watermark(spec));
    session.set_glyphs(Arc::new(font))?;
    session.load(input).await?;
    session.export()
}

fn note_command(mut args: pico_args::Arguments) -> Result<()> {
    let title: Option<String> = cli(args.opt_value_from_str("--title"))?;
    let content: Option<String> = cli(args.opt_value_from_str("--content"))?;
    let action: String = cli(args.free_from_str())?;
    reject_leftovers(args)?;

    let mut store = KeyValueStore::open()?;
    let mut note = Note::load(&store);
    match action.as_str() {
        "show" => {
            println!("{}", note.title);
            println!("{}", note.content);
        }
        "copy" => print!("{}", note.clipboard_text()),
        "save" => {
            if let Some(title) = title {
                note.title = title;
            }
            if let Some(content) = content {
                note.content = content;
            }
            note.save(&mut store)?;
            println!("{}", Notification::success("note-saved", "note saved"));
        }
        other => {
            return Err(Error::InvalidParameter(format!(
                "unknown note action '{other}'"
            )))
        }
    }
    Ok(())
}
