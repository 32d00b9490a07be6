use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use colormate::core::color::{ColorNamer, Language, Pixel};
use colormate::logging::setup_logging;
use colormate::{load_image, ColorDetector, DetectorConfig, LearnedColorModel, Result};

#[derive(Debug, Parser)]
#[command(name = "colormate", version, about = "Identify the dominant colors of an image")]
struct Cli {
    /// Also write logs to a timestamped file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Detect the dominant colors of an image or of a region in it
    Detect {
        /// Path to the input image
        image: PathBuf,
        /// Center of the region to inspect instead of the whole image
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        region: Option<Vec<i64>>,
        /// Side of the square region, in pixels
        #[arg(long)]
        region_size: Option<u32>,
        /// Detector configuration file; the platform config is used otherwise
        #[arg(long)]
        config: Option<PathBuf>,
        /// Seed for reproducible clustering
        #[arg(long)]
        seed: Option<u64>,
        /// Output language (id, en)
        #[arg(long)]
        lang: Option<Language>,
        /// Print the result as JSON
        #[arg(long, action)]
        json: bool,
        /// Directory holding a learned color model
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },
    /// Print the default configuration, or write it to a file
    Config {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Name a single RGB color with the rule namer
    Name {
        r: u8,
        g: u8,
        b: u8,
        #[arg(long, default_value = "id")]
        lang: Language,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.log_dir.as_deref()) {
        eprintln!("Failed to set up logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Detect {
            image,
            region,
            region_size,
            config,
            seed,
            lang,
            json,
            model_dir,
        } => {
            let mut config = match config {
                Some(path) => DetectorConfig::load(&path)?,
                None => DetectorConfig::load_or_default(),
            };
            if seed.is_some() {
                config.seed = seed;
            }
            if let Some(lang) = lang {
                config.language = lang;
            }

            let mut detector = ColorDetector::new(config)?;
            if let Some(dir) = model_dir {
                detector = detector.with_model(LearnedColorModel::load_dir(&dir)?);
            }

            info!("Analyzing {:?}", image);
            let picture = load_image(&image)?;
            let result = match region.as_deref() {
                Some([x, y]) => detector.detect_in_region(&picture, *x, *y, region_size),
                _ => detector.detect(&picture),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", detector.describe(&result));
            }
        }
        Command::Config { output } => {
            let config = DetectorConfig::default();
            match output {
                Some(path) => config.save(&path)?,
                None => println!("{}", config.to_json()?),
            }
        }
        Command::Name { r, g, b, lang } => {
            let pixel = Pixel::from_u8(r, g, b);
            let name = ColorNamer::default().name_pixel(pixel);
            let hsv = pixel.to_hsv();
            println!(
                "{} {} (h {:.0}, s {:.0}, v {:.0})",
                pixel.to_hex(),
                name.label(lang),
                hsv.h,
                hsv.s,
                hsv.v
            );
            if let Some(hint) = name.hint(lang) {
                println!("{}", hint);
            }
        }
    }
    Ok(())
}
