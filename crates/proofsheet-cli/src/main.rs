#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::RgbImage;
use proofsheet::raster::{GlyphSurface, ScaledFont};
use proofsheet::{
    DeterministicTextSurface, Padding, TextSurface, TypesetOptions, make_captioned_grid,
    make_typesetting, raster,
};
use serde::Deserialize;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Image(image::ImageError),
    Layout(proofsheet::Error),
    Raster(raster::RasterError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "manifest JSON error: {err}"),
            CliError::Image(err) => write!(f, "image error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<image::ImageError> for CliError {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

impl From<proofsheet::Error> for CliError {
    fn from(value: proofsheet::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<raster::RasterError> for CliError {
    fn from(value: raster::RasterError) -> Self {
        Self::Raster(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    font: Option<String>,
    font_size: f32,
    title_font_size: Option<f32>,
    fixed_cell: bool,
    format: OutputFormat,
    quality: u8,
    out: Option<String>,
    input: Option<String>,
}

/// Manifest describing one grid: layout parameters plus the samples.
#[derive(Debug, Deserialize)]
struct Manifest {
    cols: usize,
    cell_width: u32,
    cell_height: u32,
    #[serde(default)]
    title: Option<String>,
    /// Pixel width captions wrap to; defaults to the cell width.
    #[serde(default)]
    wrap: Option<u32>,
    #[serde(default)]
    padding: Padding,
    #[serde(default)]
    title_padding: Padding,
    samples: Vec<Sample>,
}

#[derive(Debug, Deserialize)]
struct Sample {
    image: String,
    caption: String,
}

fn usage() -> &'static str {
    "proofsheet-cli\n\
\n\
USAGE:\n\
  proofsheet-cli [render] [--font <path.ttf>] [--font-size <px>] [--title-font-size <px>]\n\
                 [--fixed-cell] [--format png|jpg] [--quality <1-100>]\n\
                 [--out <path>] [<manifest.json>|-]\n\
\n\
MANIFEST:\n\
  {\n\
    \"cols\": 3,\n\
    \"cell_width\": 256, \"cell_height\": 256,\n\
    \"title\": \"optional banner text\",\n\
    \"wrap\": 256,\n\
    \"padding\": {\"top\": 2, \"left\": 2, \"bottom\": 2, \"right\": 2},\n\
    \"title_padding\": {\"top\": 4, \"left\": 4, \"bottom\": 4, \"right\": 4},\n\
    \"samples\": [{\"image\": \"a.png\", \"caption\": \"first sample\"}]\n\
  }\n\
\n\
NOTES:\n\
  - If <manifest.json> is omitted or '-', the manifest is read from stdin.\n\
  - Image paths resolve relative to the manifest file (or the working\n\
    directory for stdin); every image must match cell_width x cell_height.\n\
  - --fixed-cell lays out with a fixed character cell instead of a real\n\
    font; no --font is needed then.\n\
  - Output defaults to writing next to the manifest (or ./out.png for\n\
    stdin).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        font_size: 16.0,
        quality: 90,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => {}
            "--font" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.font = Some(path.clone());
            }
            "--font-size" => {
                let Some(px) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.font_size = px.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.font_size.is_finite() && args.font_size > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--title-font-size" => {
                let Some(px) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let px = px.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(px.is_finite() && px > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.title_font_size = Some(px);
            }
            "--fixed-cell" => args.fixed_cell = true,
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = fmt
                    .parse::<OutputFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--quality" => {
                let Some(q) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.quality = q.parse::<u8>().map_err(|_| CliError::Usage(usage()))?;
                if args.quality == 0 || args.quality > 100 {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    use std::io::Read;

    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn default_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

fn compose_grid<S: TextSurface>(
    surface: &S,
    manifest: &Manifest,
    imgs: &[RgbImage],
    captions: &[String],
    cell_font: S::Font,
    title_font: S::Font,
) -> Result<RgbImage, CliError> {
    let cell_wrap = manifest.wrap.unwrap_or(manifest.cell_width);
    let cell_type = make_typesetting(
        surface,
        cell_font,
        cell_wrap,
        TypesetOptions {
            padding: manifest.padding,
            ..Default::default()
        },
    )?;
    let title_type = match &manifest.title {
        Some(_) => {
            // The banner wraps across the whole grid, not a single cell.
            let grid_width = manifest.cell_width.saturating_mul(manifest.cols.max(1) as u32);
            Some(make_typesetting(
                surface,
                title_font,
                grid_width,
                TypesetOptions {
                    padding: manifest.title_padding,
                    ..Default::default()
                },
            )?)
        }
        None => None,
    };
    Ok(make_captioned_grid(
        surface,
        &cell_type,
        manifest.cols,
        manifest.cell_width,
        manifest.cell_height,
        imgs,
        captions,
        title_type.as_ref(),
        manifest.title.as_deref(),
    )?)
}

fn run(args: Args) -> Result<(), CliError> {
    let manifest_text = read_input(args.input.as_deref())?;
    let manifest: Manifest = serde_json::from_str(&manifest_text)?;

    let base_dir = match args.input.as_deref() {
        Some(path) if path != "-" => Path::new(path)
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut imgs = Vec::with_capacity(manifest.samples.len());
    let mut captions = Vec::with_capacity(manifest.samples.len());
    for sample in &manifest.samples {
        let path = base_dir.join(&sample.image);
        imgs.push(image::open(&path)?.to_rgb8());
        captions.push(sample.caption.clone());
    }

    let canvas = if args.fixed_cell {
        let surface = DeterministicTextSurface::default();
        compose_grid(&surface, &manifest, &imgs, &captions, (), ())?
    } else {
        let Some(font_path) = args.font.as_deref() else {
            return Err(CliError::Usage(usage()));
        };
        let cell_font = ScaledFont::from_file(Path::new(font_path), args.font_size)?;
        let title_font = cell_font.with_size(args.title_font_size.unwrap_or(args.font_size));
        compose_grid(&GlyphSurface, &manifest, &imgs, &captions, cell_font, title_font)?
    };

    let (bytes, ext) = match args.format {
        OutputFormat::Png => (raster::encode_png(&canvas)?, "png"),
        OutputFormat::Jpeg => (raster::encode_jpeg(&canvas, args.quality)?, "jpg"),
    };
    let out_path = match args.out.as_deref() {
        Some(path) => PathBuf::from(path),
        None => default_out_path(args.input.as_deref(), ext),
    };
    std::fs::write(&out_path, bytes)?;
    eprintln!("wrote {}", out_path.display());
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
