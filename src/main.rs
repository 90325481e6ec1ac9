use clap::{Args, Parser, Subcommand};
use photo_deck::config::{self, Overrides};
use photo_deck::imaging::RustBackend;
use photo_deck::types::Color;
use photo_deck::{deck, output, scan};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("PHOTO_DECK_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("PHOTO_DECK_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "photo-deck")]
#[command(about = "Turn a folder of photos into an auto-advancing slideshow deck")]
#[command(long_about = "\
Turn a folder of photos into an auto-advancing slideshow deck

Every photo becomes one slide: scaled to fit, centered on a solid
background, fading to the next after a fixed time. The deck is saved as
<base_name>_<YYYYMMDD_HHMM>.pptx next to the photos.

Source structure:

  photos/
  ├── slideshow.toml           # Config (optional)
  ├── 001-dawn.jpg             # Slides are ordered by file name
  ├── 002-noon.png
  ├── 003-dusk.webp            # Reported and skipped (not embeddable)
  └── extras/                  # Only with --recursive
      └── 001-night.jpg

Supported: JPEG, PNG, GIF, BMP, TIFF.

Run 'photo-deck gen-config' to generate a documented slideshow.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Folder holding the photos
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Folder to write the deck into (default: the source folder)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Per-build overrides of `slideshow.toml`.
#[derive(Args, Clone, Default)]
struct BuildArgs {
    /// Seconds each slide is shown
    #[arg(long)]
    duration: Option<u32>,

    /// Background color as #RRGGBB
    #[arg(long)]
    background: Option<Color>,

    /// Random slide order
    #[arg(long)]
    shuffle: bool,

    /// Include photos in subfolders
    #[arg(long)]
    recursive: bool,

    /// File name stem for the deck
    #[arg(long)]
    name: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the source folder and write the deck
    Build(BuildArgs),
    /// Inspect every photo without writing anything
    Check {
        /// Include photos in subfolders
        #[arg(long)]
        recursive: bool,
    },
    /// Print a stock slideshow.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => {
            let overrides = Overrides {
                duration_seconds: args.duration,
                background: args.background,
                base_name: args.name,
                output_folder: cli.output.as_deref().map(absolute).transpose()?,
                recursive: args.recursive.then_some(true),
                shuffle: args.shuffle.then_some(true),
            };
            let config = config::load_config_with(&cli.source, &overrides)?;
            init_thread_pool(&config.processing);

            println!("==> Scanning {}", cli.source.display());
            let images = scan::scan_images(&cli.source, &config.scan)?;
            output::print_scan_output(&images, &cli.source);

            let options = config.to_options(&cli.source);
            std::fs::create_dir_all(&options.output_folder)?;

            println!("==> Building deck");
            let report = deck::create_slideshow(&images, &options)?;
            output::print_build_report(&report);
        }
        Command::Check { recursive } => {
            let overrides = Overrides {
                recursive: recursive.then_some(true),
                ..Overrides::default()
            };
            let config = config::load_config_with(&cli.source, &overrides)?;
            init_thread_pool(&config.processing);

            println!("==> Checking {}", cli.source.display());
            let images = scan::scan_images(&cli.source, &config.scan)?;
            let results = deck::check_images(&RustBackend::new(), &images);
            output::print_check_output(&results, &cli.source);

            let skipped = results.iter().filter(|r| r.is_err()).count();
            if skipped > 0 {
                return Err(format!("{skipped} of {} photos would be skipped", results.len()).into());
            }
            println!("==> All photos are usable");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Make a command-line path absolute so it is not re-rooted at the source
/// folder when merged into the config.
fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(path)
}
