use crate::catalog::load_catalog;
use crate::config::load_config;
use crate::layout::Point;
use crate::lexicon::load_related_words;
use crate::layout_dump::write_layout_dump;
use crate::render::{render_session_svg, write_output_png, write_output_svg};
use crate::session::SessionBuilder;
use crate::text_metrics::{FontMeasurer, TextMeasure, default_measurer};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "starword", version, about = "Star-name word cloud renderer")]
pub struct Args {
    /// Star catalog (CSV)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Related words JSON for the background layer
    #[arg(short = 'r', long = "relatedWords")]
    pub related_words: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Font file used to measure and draw labels
    #[arg(long = "font")]
    pub font: Option<PathBuf>,

    /// Seed for the placement random source
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Faintest apparent magnitude drawn
    #[arg(long = "faintest", allow_hyphen_values = true)]
    pub faintest: Option<f32>,

    /// Brightest apparent magnitude drawn
    #[arg(long = "brightest", allow_hyphen_values = true)]
    pub brightest: Option<f32>,

    /// Multiplier applied to label significance
    #[arg(long = "scale-factor")]
    pub scale_factor: Option<f32>,

    /// Cursor position to hit-test before drawing, as `x,y`
    #[arg(long = "hover", value_parser = parse_point, allow_hyphen_values = true)]
    pub hover: Option<Point>,

    /// Click position; prints the linked page for the label under it
    #[arg(long = "click", value_parser = parse_point, allow_hyphen_values = true)]
    pub click: Option<Point>,

    /// File holding a Wordnik api key; fetches related words online
    #[cfg(feature = "fetch")]
    #[arg(long = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// Word whose related words fill the background
    #[cfg(feature = "fetch")]
    #[arg(long = "seed-word", default_value = crate::lexicon::DEFAULT_SEED_WORD)]
    pub seed_word: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    env_logger::init();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(seed) = args.seed {
        config.layout.seed = Some(seed);
    }
    if let Some(faintest) = args.faintest {
        config.catalog.window.faintest = faintest;
    }
    if let Some(brightest) = args.brightest {
        config.catalog.window.brightest = brightest;
    }
    if let Some(scale_factor) = args.scale_factor {
        config.catalog.scale_factor = scale_factor;
    }

    let catalog = load_catalog(&args.input, &config.catalog, config.render.height)?;
    info!(
        "loaded {} stars from {} ({} rows dropped)",
        catalog.records.len(),
        args.input.display(),
        catalog.dropped
    );

    let words = related_words(&args);
    let measurer = measurer(args.font.as_deref(), &config.theme.font_family)?;

    let mut session = SessionBuilder::new(config)
        .catalog(catalog.records)
        .related_words(words)
        .measurer(measurer)
        .build()?;

    if let Some(cursor) = args.hover.or(args.click) {
        let selection = session.update(cursor);
        info!("selection at ({}, {}): {selection}", cursor.x, cursor.y);
    }
    if let Some(cursor) = args.click {
        match session.click(cursor) {
            Some(link) => eprintln!("link: {link}"),
            None => info!("click at ({}, {}) selected nothing", cursor.x, cursor.y),
        }
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_session_svg(&session);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_session_svg(&session);
            let config = session.config();
            write_output_png(&svg, &output, &config.render, &config.theme, args.font.as_deref())?;
        }
        OutputFormat::Json => {
            write_layout_dump(args.output.as_deref(), session.layout(), session.selection())?;
        }
    }
    Ok(())
}

/// Background words are optional: a failure to load them is logged and the
/// scene is drawn without them.
fn related_words(args: &Args) -> Vec<String> {
    if let Some(words) = fetched_words(args) {
        return words;
    }

    let Some(path) = args.related_words.as_deref() else {
        return Vec::new();
    };
    match load_related_words(path) {
        Ok(words) => words,
        Err(err) => {
            warn!("related words unavailable from {}: {err}", path.display());
            Vec::new()
        }
    }
}

#[cfg(feature = "fetch")]
fn fetched_words(args: &Args) -> Option<Vec<String>> {
    use crate::lexicon::{WordnikRequest, fetch_related_words};

    let key_file = args.api_key_file.as_deref()?;
    match WordnikRequest::from_key_file(args.seed_word.as_str(), key_file)
        .and_then(|request| fetch_related_words(&request))
    {
        Ok(words) => Some(words),
        Err(err) => {
            warn!("related words unavailable: {err}");
            None
        }
    }
}

#[cfg(not(feature = "fetch"))]
fn fetched_words(_args: &Args) -> Option<Vec<String>> {
    None
}

fn measurer(font: Option<&Path>, font_family: &str) -> Result<Box<dyn TextMeasure>> {
    match font {
        Some(path) => Ok(Box::new(FontMeasurer::from_file(path)?)),
        None => Ok(default_measurer(font_family)),
    }
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {value:?}"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("invalid x {x:?}: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("invalid y {y:?}: {e}"))?;
    Ok(Point::new(x, y))
}
