use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use watermark_overlay::{default_output_path, JobRequest};

#[derive(Parser)]
#[command(
    name = "watermark-overlay",
    about = "Overlay a watermark image onto a base image, once or tiled",
    version,
    after_help = "Examples:\n  \
                  watermark-overlay photo.jpg logo.png -w 40 -p \"16 16\" -o out.jpg\n  \
                  watermark-overlay photo.jpg logo.png -w 25 -m grid --alpha -o out.png\n  \
                  watermark-overlay photo.jpg logo.bmp -w 60 -p \"0 0\" -c \"255 255 255\"\n\n\
                  Exit status identifies the failure: 1 missing file, 2 unsupported format,\n\
                  3 watermark too large, 4 bad color, 5 bad percentage, 6 bad position,\n\
                  7 bad position method, 8 bad output extension."
)]
struct Cli {
    /// Base image file
    image: PathBuf,

    /// Watermark image file (must not be larger than the base image)
    watermark: PathBuf,

    /// Watermark transparency percentage (integer 0-100)
    #[arg(short, long)]
    weight: String,

    /// Position method: single or grid
    #[arg(short, long, default_value = "single")]
    mode: String,

    /// Watermark top-left corner as "X Y" (single mode)
    #[arg(short, long)]
    position: Option<String>,

    /// Honor the watermark's alpha channel (watermarks with alpha only)
    #[arg(short, long)]
    alpha: bool,

    /// Transparency color as "R G B" (watermarks without alpha only)
    #[arg(short, long)]
    chroma_key: Option<String>,

    /// Output file, jpg or png (default: {name}_watermarked.{ext})
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.image));

    let request = JobRequest {
        image: cli.image,
        watermark: cli.watermark,
        use_alpha: cli.alpha,
        chroma_key: cli.chroma_key,
        weight: cli.weight,
        mode: cli.mode,
        position: cli.position,
        output,
    };

    match request.validate().and_then(|job| job.run().map(PathBuf::from)) {
        Ok(path) => {
            if !cli.quiet {
                println!("The watermarked image {} has been created.", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// `RUST_LOG` wins; otherwise the level follows `--verbose`/`--quiet`.
fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
