mod logging;
mod profile;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ascii_svg::{derived_cell_height, AsciiSvgRenderer, RenderOutput};
use clap::{ArgAction, Args, Parser, Subcommand};
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use walkdir::WalkDir;

use profile::{Profile, RampPreset};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert images to positioned ASCII glyph SVGs")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the glyph grid as plain text for a quick preview
    Preview(PreviewArgs),
    /// Convert an image to an SVG (or plain text for a .txt output)
    Convert(ConvertArgs),
    /// Write scrambled animation frames and a looping animated SVG
    Animate(AnimateArgs),
    /// Convert every image below a directory
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input image path
    input: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input image path
    input: PathBuf,
    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Input image path
    input: PathBuf,
    /// Output directory for frame files
    #[arg(short, long)]
    out_dir: PathBuf,
    /// Number of frames including the unmodified first frame
    #[arg(long)]
    frames: Option<usize>,
    /// Frame interval of the animated SVG in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Seed for reproducible scrambling
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Directory searched recursively for images
    input: PathBuf,
    /// Output directory, one SVG per input image
    #[arg(short, long)]
    out_dir: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Args, Debug, Clone, Default)]
struct RenderSettings {
    /// TOML render profile (defaults to the per-user profile when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Cell width in pixels
    #[arg(long)]
    cell_width: Option<u32>,
    /// Cell height in pixels (defaults to 1.5x the cell width when only that is given)
    #[arg(long)]
    cell_height: Option<u32>,
    /// Maximum number of grid columns
    #[arg(long)]
    max_columns: Option<u32>,
    /// Glyph font size in pixels
    #[arg(long)]
    font_size: Option<f32>,
    /// Minimum covered fraction (0.0 - 1.0) for a cell to emit a glyph
    #[arg(long)]
    coverage: Option<f32>,
    /// Glyph fill color
    #[arg(long)]
    color: Option<String>,
    /// Make pixels matching the border color transparent before sampling
    #[arg(long, default_value_t = false)]
    remove_background: bool,
    /// Keep the background even when the profile asks for removal
    #[arg(long, default_value_t = false, conflicts_with = "remove_background")]
    keep_background: bool,
    /// Ramp preset used to map luminance to glyphs
    #[arg(long, value_enum)]
    ramp: Option<RampPreset>,
    /// Custom ramp, densest character first and blank last
    #[arg(long)]
    ramp_chars: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.verbose, cli.quiet).context("failed to install logger")?;

    match cli.command {
        Commands::Preview(args) => preview(args),
        Commands::Convert(args) => convert(args),
        Commands::Animate(args) => animate(args),
        Commands::Batch(args) => batch(args),
    }
}

fn preview(args: PreviewArgs) -> Result<()> {
    let profile = args.settings.profile()?;
    let renderer = build_renderer(&profile)?;
    let output = render_file(&renderer, &args.input)?;

    println!("{}", output.grid.to_text());
    Ok(())
}

fn convert(args: ConvertArgs) -> Result<()> {
    let profile = args.settings.profile()?;
    let renderer = build_renderer(&profile)?;
    let output = render_file(&renderer, &args.input)?;

    let contents = if is_text_output(&args.output) {
        output.grid.to_text() + "\n"
    } else {
        output.to_svg(renderer.style())
    };
    fs::write(&args.output, contents)
        .with_context(|| format!("failed to write {:?}", args.output))?;

    println!(
        "{} glyphs on a {}x{} grid written to {}",
        output.grid.glyphs.len(),
        output.grid.columns,
        output.grid.rows,
        args.output.display()
    );
    Ok(())
}

fn animate(args: AnimateArgs) -> Result<()> {
    let mut profile = args.settings.profile()?;
    if let Some(frames) = args.frames {
        profile.animation.frame_count = frames;
    }
    if let Some(interval) = args.interval_ms {
        profile.animation.frame_interval_ms = interval;
    }

    let renderer = build_renderer(&profile)?;
    let output = render_file(&renderer, &args.input)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let animation = renderer.animate(&output, &profile.animation, &mut rng)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let documents = animation.frame_documents();
    let progress = progress_bar(documents.len() as u64, "frames")?;
    for (index, document) in documents.iter().enumerate() {
        let frame_path = args.out_dir.join(format!("frame_{:04}.svg", index));
        fs::write(&frame_path, document)
            .with_context(|| format!("failed to write {:?}", frame_path))?;
        progress.inc(1);
    }

    let animated_path = args.out_dir.join("animated.svg");
    fs::write(&animated_path, animation.to_animated_svg())
        .with_context(|| format!("failed to write {:?}", animated_path))?;

    progress.finish_with_message(format!(
        "{} frames of {} glyphs written to {:?}",
        documents.len(),
        output.grid.glyphs.len(),
        args.out_dir
    ));
    Ok(())
}

fn batch(args: BatchArgs) -> Result<()> {
    let profile = args.settings.profile()?;
    let renderer = build_renderer(&profile)?;

    let inputs = collect_images(&args.input)?;
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let progress = progress_bar(inputs.len() as u64, "images")?;
    let mut converted = 0usize;
    for input in &inputs {
        match render_file(&renderer, input) {
            Ok(output) => {
                let stem = input.file_stem().and_then(|stem| stem.to_str()).unwrap_or("image");
                let out_path = args.out_dir.join(format!("{stem}.svg"));
                fs::write(&out_path, output.to_svg(renderer.style()))
                    .with_context(|| format!("failed to write {:?}", out_path))?;
                info!("{:?}: {} glyphs", input, output.grid.glyphs.len());
                converted += 1;
            },
            Err(err) => warn!("skipping {:?}: {err:#}", input),
        }
        progress.inc(1);
    }

    progress.finish_with_message(format!(
        "converted {converted} of {} images into {:?}",
        inputs.len(),
        args.out_dir
    ));
    Ok(())
}

fn build_renderer(profile: &Profile) -> Result<AsciiSvgRenderer> {
    let renderer =
        AsciiSvgRenderer::new(profile.grid.clone(), profile.style.clone(), profile.ramp()?)
            .context("invalid render settings")?;
    Ok(renderer)
}

fn render_file(renderer: &AsciiSvgRenderer, input: &Path) -> Result<RenderOutput> {
    let output =
        renderer.render_path(input).with_context(|| format!("failed to render {:?}", input))?;
    if output.geometry.is_downscaled() {
        info!(
            "downscaled {}x{} to {}x{}",
            output.geometry.source_width,
            output.geometry.source_height,
            output.geometry.width,
            output.geometry.height
        );
    }
    Ok(output)
}

fn progress_bar(len: u64, unit: &str) -> Result<ProgressBar> {
    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::with_template(&format!(
            "{{spinner}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit}"
        ))?
        .progress_chars("=> "),
    );
    Ok(progress)
}

fn is_text_output(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}

fn collect_images(path: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| ImageFormat::from_path(path).is_ok())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no image files found in {:?}", path);
    }
    Ok(entries)
}

impl RenderSettings {
    fn profile(&self) -> Result<Profile> {
        let mut profile = Profile::load(self.config.as_deref())?;
        self.apply(&mut profile);
        Ok(profile)
    }

    fn apply(&self, profile: &mut Profile) {
        let grid = &mut profile.grid;
        if let Some(cell_width) = self.cell_width {
            grid.cell_width = cell_width;
            grid.cell_height = derived_cell_height(cell_width);
        }
        if let Some(cell_height) = self.cell_height {
            grid.cell_height = cell_height;
        }
        if let Some(max_columns) = self.max_columns {
            grid.max_columns = max_columns;
        }
        if let Some(coverage) = self.coverage {
            grid.coverage_threshold = coverage;
        }
        if self.remove_background {
            grid.remove_background = true;
        } else if self.keep_background {
            grid.remove_background = false;
        }

        if let Some(font_size) = self.font_size {
            profile.style.font_size = font_size;
        }
        if let Some(color) = &self.color {
            profile.style.color = color.clone();
        }

        if let Some(ramp) = self.ramp {
            profile.ramp = ramp;
            profile.ramp_chars = None;
        }
        if let Some(chars) = &self.ramp_chars {
            profile.ramp_chars = Some(chars.clone());
        }
    }
}
