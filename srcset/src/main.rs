//! srcset — responsive WebP source-set generator.
//!
//! Converts every image in a folder into WebP renditions at each requested
//! width, plus an original-size copy, and writes a manifest of the run.

mod progress;
mod summary;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use srcsetmaker::convert::DEFAULT_WIDTHS;
use srcsetmaker::{ConvertConfig, Quality};
use tracing_subscriber::EnvFilter;

use crate::progress::Progress;

/// Convert images to WebP and create resized versions for responsive web design.
#[derive(Parser, Debug)]
#[command(name = "srcset", version)]
#[command(after_help = "\
Supported input formats: .bmp, .gif, .jpeg, .jpg, .png, .tif, .tiff, .webp

The output folder gets one directory per width plus originalsize/:
  <savepath>/320/  <savepath>/640/  <savepath>/960/
  <savepath>/originalsize/
  <savepath>/sourceset_info.txt

EXAMPLE:
    srcset --folder ./photos --savepath ./public/img --widths 320 640 960 1200")]
pub struct Args {
    /// Folder containing the source images.
    #[arg(long)]
    pub folder: PathBuf,

    /// Folder the WebP source set is written to (created if missing).
    #[arg(long)]
    pub savepath: PathBuf,

    /// Target widths in pixels.
    #[arg(
        long,
        num_args = 1..,
        value_delimiter = ',',
        default_values_t = DEFAULT_WIDTHS,
        value_parser = clap::value_parser!(u32).range(1..),
        env = "SRCSET_WIDTHS"
    )]
    pub widths: Vec<u32>,

    /// WebP quality (1-100).
    #[arg(
        long,
        default_value_t = 80,
        value_parser = clap::value_parser!(u8).range(1..=100),
        env = "SRCSET_QUALITY"
    )]
    pub quality: u8,

    /// Show what would be written without touching the output folder.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON instead of the text summary.
    #[arg(long)]
    pub json: bool,

    /// Log every written file.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    fn to_config(&self) -> anyhow::Result<ConvertConfig> {
        let quality = Quality::new(self.quality)?;
        Ok(ConvertConfig::new(&self.folder, &self.savepath)
            .with_widths(self.widths.iter().copied())
            .with_quality(quality)
            .with_dry_run(self.dry_run))
    }
}

/// Log directives used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "srcsetmaker=debug,srcset=debug"
    } else {
        "srcsetmaker=info,srcset=info"
    }
}

/// Startup errors already read as user-facing messages; anything else
/// happened mid-run and says so.
fn explain(err: srcsetmaker::Error) -> anyhow::Error {
    if err.is_fatal() {
        anyhow::Error::new(err)
    } else {
        anyhow::Error::new(err).context("run stopped while writing output")
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(args.verbose))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = args.to_config()?;
    tracing::debug!(?config, "starting run");
    let mut progress = Progress::new(!args.json);
    let report = srcsetmaker::run(&config, &mut progress);
    progress.finish();
    let report = report.map_err(explain)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serializing run report")?;
        println!("{json}");
    } else {
        summary::print(&report);
    }

    Ok(())
}
