use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use halftone::models::ProjectConfig;
use halftone::rendering::{default_file_name, load_png, write_png};
use halftone::services::{FileWatcher, Pipeline};
use halftone_core::{BlendMode, Channel, DotShape, PackKind};

#[derive(Parser)]
#[command(name = "halftone")]
#[command(about = "Halftone - multi-layer halftone screen renderer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where the source image comes from and how the result is encoded.
#[derive(Args)]
struct SourceArgs {
    /// Source PNG file
    #[arg(short, long, required_unless_present = "gradient")]
    input: Option<PathBuf>,

    /// Render the white-to-black test ramp instead of an image
    #[arg(long, conflicts_with = "input")]
    gradient: bool,

    /// Project file (JSON, or YAML by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Nearest-neighbour upscale factor for the exported PNG
    #[arg(short, long, default_value_t = 1)]
    scale: u32,

    /// Seed for the noise stages (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one image to a PNG file
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Output PNG file path (default: halftone.<timestamp>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Animate every enabled screen and write one PNG per frame
    Animate {
        #[command(flatten)]
        source: SourceArgs,

        /// Number of frames to write
        #[arg(short, long, default_value_t = 100)]
        frames: u32,

        /// Directory for frame-NNNN.png files
        #[arg(long)]
        output_dir: PathBuf,
    },
    /// Write a default project file
    Init {
        /// Project file to create
        #[arg(short, long, default_value = "halftone.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,

        /// Number of default screens
        #[arg(long, default_value_t = 1)]
        screens: u32,
    },
    /// Re-render whenever the project file changes
    Watch {
        /// Source PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Project file to watch
        #[arg(short, long)]
        config: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Nearest-neighbour upscale factor for the exported PNG
        #[arg(short, long, default_value_t = 1)]
        scale: u32,

        /// Seed for the noise stages (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render { source, output }) => {
            init_logging();
            run_render_command(&source, output)
        }
        Some(Commands::Animate {
            source,
            frames,
            output_dir,
        }) => {
            init_logging();
            run_animate_command(&source, frames, &output_dir)
        }
        Some(Commands::Init {
            output,
            force,
            screens,
        }) => {
            init_logging();
            run_init_command(&output, force, screens)
        }
        Some(Commands::Watch {
            input,
            config,
            output,
            scale,
            seed,
        }) => {
            init_logging();
            run_watch_command(&input, &config, &output, scale, seed)
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for CLI
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "halftone=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Load the project and source image into a ready pipeline.
///
/// Without a project file a single default screen is used.
fn build_pipeline(args: &SourceArgs) -> anyhow::Result<Pipeline> {
    let mut config = match &args.config {
        Some(path) => ProjectConfig::load(path)
            .with_context(|| format!("Failed to load project {}", path.display()))?,
        None => ProjectConfig::with_screens(1),
    };
    if args.gradient {
        config.source.gradient = true;
    }

    let mut pipeline = Pipeline::new(&config).context("Invalid project")?;
    if let Some(input) = &args.input {
        let raster = load_png(input, pipeline.size())
            .with_context(|| format!("Failed to load {}", input.display()))?;
        pipeline.set_source(raster)?;
    }
    Ok(pipeline)
}

/// Render one image to a PNG file
fn run_render_command(args: &SourceArgs, output: Option<PathBuf>) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(args)?;
    let frame = pipeline.update(&mut make_rng(args.seed))?;

    let output = output.unwrap_or_else(|| PathBuf::from(default_file_name()));
    write_png(&frame.output, args.scale, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Rendered {} ({}x{}, {} screens)",
        output.display(),
        frame.output.width() * args.scale,
        frame.output.height() * args.scale,
        frame.layers.len()
    );
    Ok(())
}

/// Step the animation and write every frame
fn run_animate_command(args: &SourceArgs, frames: u32, output_dir: &Path) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(args)?;
    let animated = pipeline.animate_enabled();
    if animated == 0 {
        tracing::warn!("No enabled screens to animate");
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let mut rng = make_rng(args.seed);
    for n in 0..frames {
        let frame = pipeline.tick(&mut rng)?;
        let path = output_dir.join(format!("frame-{n:04}.png"));
        write_png(&frame.output, args.scale, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!(
        "Wrote {frames} frames to {} ({animated} animated screens)",
        output_dir.display()
    );
    Ok(())
}

/// Write a default project file
fn run_init_command(output: &Path, force: bool, screens: u32) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }
    ProjectConfig::with_screens(screens).save(output)?;
    println!("Created {} with {screens} screens", output.display());
    Ok(())
}

/// Render, then render again after every debounced config change
fn run_watch_command(
    input: &Path,
    config_path: &Path,
    output: &Path,
    scale: u32,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let args = SourceArgs {
        input: Some(input.to_path_buf()),
        gradient: false,
        config: Some(config_path.to_path_buf()),
        scale,
        seed,
    };
    let mut pipeline = build_pipeline(&args)?;
    let mut rng = make_rng(seed);

    let frame = pipeline.update(&mut rng)?;
    write_png(&frame.output, scale, output)?;

    let watcher = FileWatcher::new(config_path)?;
    println!("Watching {} (Ctrl-C to stop)", watcher.path().display());

    while let Some(event) = watcher.recv() {
        tracing::debug!(paths = ?event.paths, "Project changed");
        let config = match ProjectConfig::load(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(%e, "Failed to reload project, keeping previous state");
                continue;
            }
        };
        if let Err(e) = pipeline.load_config(&config) {
            tracing::warn!(%e, "Invalid project, keeping previous state");
            continue;
        }
        match pipeline
            .update(&mut rng)
            .map_err(anyhow::Error::from)
            .and_then(|frame| Ok(write_png(&frame.output, scale, output)?))
        {
            Ok(path) => tracing::info!(path = %path.display(), "Re-rendered"),
            Err(e) => tracing::warn!(%e, "Render failed"),
        }
    }
    Ok(())
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Halftone v{VERSION}");
    println!("Multi-layer halftone screen renderer\n");

    println!("Texture packs:");
    for kind in PackKind::ALL {
        let pack = kind.pack();
        let side = pack.get(0).map_or(0, |mask| mask.size());
        println!(
            "  {:<10} {:>3} masks, {side}x{side} cells",
            kind.name(),
            pack.len()
        );
    }

    println!("\nDot styles:");
    println!("  {}", DotShape::ALL.map(DotShape::name).join(", "));
    println!("\nChannels:");
    println!("  {}", Channel::ALL.map(Channel::name).join(", "));
    println!("\nComposition modes:");
    println!("  {}", BlendMode::ALL.map(BlendMode::name).join(", "));

    println!("\nRun 'halftone --help' for usage information.");
}
