use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use label_core::FontResolver;
use labels::{generate_labels_bundle, CanvasSpec, LabelConfig, LabelOptions, SourceFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labelgen", about = "Product label generator", version)]
struct Cli {
    /// Order file: CSV/XLSX/XLS/ODS for round21, PDF for hunter_harms
    input: PathBuf,

    /// Layout of the input file
    #[arg(short, long, value_enum)]
    format: FormatArg,

    /// Render round21 records with the hot-market layout
    #[arg(long)]
    hot_market: bool,

    /// Print the price row on standard labels
    #[arg(long)]
    include_price: bool,

    /// Output directory [default: labels-<timestamp>]
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// JSON configuration file (canvas, margins, font)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TrueType font file, tried before the configured candidates
    #[arg(long, env = "LABELGEN_FONT_PATH")]
    font: Option<PathBuf>,

    /// Multiplier applied to every font size
    #[arg(long, env = "LABELGEN_FONT_SCALE")]
    font_scale: Option<f32>,

    /// Canvas size as WIDTHxHEIGHT, e.g. 1400x900
    #[arg(long)]
    canvas: Option<String>,

    /// Print the bundle summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Round21,
    #[value(name = "hunter_harms")]
    HunterHarms,
}

impl From<FormatArg> for SourceFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Round21 => SourceFormat::Round21,
            FormatArg::HunterHarms => SourceFormat::HunterHarms,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config(&cli)?;
    let fonts = FontResolver::from_config(&config.font);
    match fonts.source() {
        Some(path) => log::info!("font: {}", path.display()),
        None => log::info!("font: built-in block face"),
    }

    let out_dir = cli.out.clone().unwrap_or_else(default_out_dir);
    let options = LabelOptions {
        include_price: cli.include_price,
        hot_market: cli.hot_market,
    };

    let output = generate_labels_bundle(
        &cli.input,
        cli.format.into(),
        &options,
        &out_dir,
        &config,
        &fonts,
    )
    .with_context(|| format!("failed to generate labels from {}", cli.input.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Records:  {}", output.record_count);
        println!("Labels:   {}", output.png_paths.len());
        println!("PDF:      {}", output.pdf_path.display());
        println!("ZIP:      {}", output.zip_path.display());
    }

    Ok(())
}

/// Configuration file first, then command line overrides
fn load_config(cli: &Cli) -> Result<LabelConfig> {
    let mut config = match &cli.config {
        Some(path) => LabelConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LabelConfig::default(),
    };

    if let Some(font) = &cli.font {
        config.font.path = Some(font.clone());
    }
    if let Some(scale) = cli.font_scale {
        anyhow::ensure!(scale > 0.0, "font scale must be positive, got {scale}");
        config.font.scale = scale;
    }
    if let Some(canvas) = &cli.canvas {
        config.canvas = canvas.parse::<CanvasSpec>()?;
    }

    Ok(config)
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(format!(
        "labels-{}",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ))
}
