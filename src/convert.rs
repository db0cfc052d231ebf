//! Batch conversion: enumerate, resize, encode, report.
//!
//! A run moves through three phases. *Collecting* enumerates the source
//! folder and fails fast on startup errors, before anything is written.
//! *Processing* creates the bucket tree and converts images one at a time in
//! enumeration order. *Reporting* writes the manifest.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use serde::Serialize;

use crate::color::{self, ColorMode, Normalization};
use crate::encode::{self, EncodedEntry, Quality};
use crate::enumerate::enumerate;
use crate::error::{Error, Result};
use crate::format::SourceFormat;
use crate::layout::{Bucket, OutputLayout};
use crate::manifest::Manifest;
use crate::resize;

/// Widths used when none are configured.
pub const DEFAULT_WIDTHS: [u32; 3] = [320, 640, 960];

/// Settings for one run.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    pub source: PathBuf,
    pub output: PathBuf,
    pub widths: Vec<u32>,
    pub quality: Quality,
    /// Plan outputs from image headers without writing anything.
    pub dry_run: bool,
}

impl ConvertConfig {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            widths: DEFAULT_WIDTHS.to_vec(),
            quality: Quality::default(),
            dry_run: false,
        }
    }

    pub fn with_widths(mut self, widths: impl IntoIterator<Item = u32>) -> Self {
        self.widths = widths.into_iter().collect();
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reject configurations no run could honour.
    pub fn validate(&self) -> Result<()> {
        if self.widths.is_empty() {
            return Err(Error::InvalidWidths("at least one width is required".into()));
        }
        if self.widths.contains(&0) {
            return Err(Error::InvalidWidths("widths must be positive".into()));
        }
        Ok(())
    }
}

/// Hooks for following a run as it happens.
///
/// All methods default to doing nothing. `()` is the silent observer.
pub trait RunObserver {
    /// Enumeration finished with `count` images.
    fn on_found(&mut self, _count: usize) {}

    /// About to process `path`.
    fn on_image(&mut self, _path: &Path) {}

    /// Finished with one image.
    fn on_outcome(&mut self, _outcome: &ImageOutcome) {}
}

impl RunObserver for () {}

/// One output entry, written or (in a dry run) planned.
#[derive(Clone, Debug, Serialize)]
pub struct EntryOutcome {
    pub bucket: Bucket,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Encoded size; `None` when nothing was written.
    pub bytes: Option<u64>,
}

impl EntryOutcome {
    fn written(bucket: Bucket, entry: EncodedEntry) -> Self {
        Self {
            bucket,
            path: entry.path,
            width: entry.width,
            height: entry.height,
            bytes: Some(entry.bytes),
        }
    }
}

/// What happened to one source image.
#[derive(Clone, Debug, Serialize)]
pub struct ImageOutcome {
    pub source: PathBuf,
    pub stem: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub color: Option<ColorMode>,
    pub entries: Vec<EntryOutcome>,
    /// Buckets whose entry failed to encode or write.
    pub failed: Vec<Bucket>,
    /// The original-size entry was written.
    pub succeeded: bool,
    /// Set when the image could not be opened or decoded.
    pub error: Option<String>,
}

impl ImageOutcome {
    fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            stem: stem_of(source),
            width: None,
            height: None,
            color: None,
            entries: Vec::new(),
            failed: Vec::new(),
            succeeded: false,
            error: None,
        }
    }

    /// Entry written into `bucket`, if any.
    pub fn entry(&self, bucket: Bucket) -> Option<&EntryOutcome> {
        self.entries.iter().find(|e| e.bucket == bucket)
    }
}

/// Result of a run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    /// Images enumerated.
    pub found: usize,
    /// Images whose original-size entry was written.
    pub succeeded: usize,
    pub output_root: PathBuf,
    /// `None` in a dry run.
    pub manifest_path: Option<PathBuf>,
    pub dry_run: bool,
    pub images: Vec<ImageOutcome>,
}

/// Convert every supported image in `config.source` into a source set.
///
/// Startup problems (bad config, missing or empty source folder) return an
/// error before any output exists. Failures on individual images are logged,
/// recorded in the report, and skipped.
pub fn run<O>(config: &ConvertConfig, observer: &mut O) -> Result<RunReport>
where
    O: RunObserver + ?Sized,
{
    config.validate()?;

    // collecting
    let files = enumerate(&config.source)?;
    tracing::info!(
        source = %config.source.display(),
        found = files.len(),
        "collected source images"
    );
    observer.on_found(files.len());

    // processing
    let layout = OutputLayout::plan(&config.output, &config.widths);
    if !config.dry_run {
        layout.create()?;
    }

    let mut images = Vec::with_capacity(files.len());
    for path in &files {
        observer.on_image(path);
        let outcome = if config.dry_run {
            plan_one(path, &layout)
        } else {
            process_one(path, &layout, config.quality)
        };
        observer.on_outcome(&outcome);
        images.push(outcome);
    }
    let succeeded = images.iter().filter(|o| o.succeeded).count();

    // reporting
    let manifest_path = if config.dry_run {
        None
    } else {
        let manifest = Manifest {
            source: &config.source,
            output: &config.output,
            widths: &config.widths,
            quality: config.quality,
            found: files.len(),
            succeeded,
        };
        Some(manifest.write()?)
    };

    tracing::info!(found = files.len(), succeeded, "run complete");

    Ok(RunReport {
        found: files.len(),
        succeeded,
        output_root: config.output.clone(),
        manifest_path,
        dry_run: config.dry_run,
        images,
    })
}

/// Convert one source image into every bucket of `layout`.
///
/// The decoded image is released when this returns, on success or failure.
pub fn process_one(path: &Path, layout: &OutputLayout, quality: Quality) -> ImageOutcome {
    let mut outcome = ImageOutcome::new(path);

    let image = match open_image(path) {
        Ok(image) => image,
        Err(e) => {
            tracing::error!("Error processing {}: {e}", path.display());
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };

    let mode = ColorMode::classify(&image, SourceFormat::from_path(path));
    outcome.width = Some(image.width());
    outcome.height = Some(image.height());
    outcome.color = Some(mode);

    // Flatten before resampling so transparent pixels cannot bleed into edges.
    let image = flatten_once(image, mode);

    for width in layout.width_buckets() {
        let bucket = Bucket::Width(width);
        let target = layout.entry_path(bucket, &outcome.stem);
        // Narrower sources go into the bucket at native size.
        let written = if image.width() > width {
            let resized = resize::resize_to_width(&image, width);
            encode::encode_webp(&resized, ColorMode::Rgb, &target, quality)
        } else {
            encode::encode_webp(&image, ColorMode::Rgb, &target, quality)
        };
        record(&mut outcome, bucket, written);
    }

    let target = layout.entry_path(Bucket::Original, &outcome.stem);
    let written = encode::encode_webp(&image, ColorMode::Rgb, &target, quality);
    outcome.succeeded = written.is_some();
    record(&mut outcome, Bucket::Original, written);

    outcome
}

/// Dry-run counterpart of [`process_one`]: reads only the image header.
fn plan_one(path: &Path, layout: &OutputLayout) -> ImageOutcome {
    let mut outcome = ImageOutcome::new(path);

    let (width, height) = match image::image_dimensions(path) {
        Ok(dims) => dims,
        Err(source) => {
            let e = Error::Decode {
                path: path.to_path_buf(),
                source,
            };
            tracing::error!("Error processing {}: {e}", path.display());
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };
    outcome.width = Some(width);
    outcome.height = Some(height);

    for &bucket in layout.buckets() {
        let (w, h) = match bucket {
            Bucket::Width(target) if width > target => {
                (target, resize::target_height(width, height, target))
            }
            _ => (width, height),
        };
        outcome.entries.push(EntryOutcome {
            bucket,
            path: layout.entry_path(bucket, &outcome.stem),
            width: w,
            height: h,
            bytes: None,
        });
    }
    outcome.succeeded = true;
    outcome
}

fn open_image(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| Error::io(path, e))?;
    reader.decode().map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Opaque 8-bit RGB copy of `image`, shared by every bucket.
fn flatten_once(image: DynamicImage, mode: ColorMode) -> DynamicImage {
    if mode.normalization() == Normalization::PassThrough && image.as_rgb8().is_some() {
        return image;
    }
    DynamicImage::ImageRgb8(color::to_opaque_rgb(&image, mode).into_owned())
}

fn record(outcome: &mut ImageOutcome, bucket: Bucket, written: Option<EncodedEntry>) {
    match written {
        Some(entry) => outcome.entries.push(EntryOutcome::written(bucket, entry)),
        None => outcome.failed.push(bucket),
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConvertConfig::new("in", "out");
        assert_eq!(config.widths, DEFAULT_WIDTHS);
        assert_eq!(config.quality.get(), 80);
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_widths() {
        let empty = ConvertConfig::new("in", "out").with_widths(Vec::new());
        assert!(matches!(empty.validate(), Err(Error::InvalidWidths(_))));

        let zero = ConvertConfig::new("in", "out").with_widths([320, 0]);
        assert!(matches!(zero.validate(), Err(Error::InvalidWidths(_))));
    }

    #[test]
    fn stem_keeps_inner_dots() {
        assert_eq!(stem_of(Path::new("a/hero.v2.jpg")), "hero.v2");
    }

    #[test]
    fn transparent_edge_resizes_without_fringe() {
        use image::{GenericImageView, Rgba, RgbaImage};

        let rgba = RgbaImage::from_fn(400, 100, |x, _| {
            if x < 200 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([255, 0, 0, 0])
            }
        });
        let flat = flatten_once(DynamicImage::ImageRgba8(rgba), ColorMode::Alpha);
        let small = resize::resize_to_width(&flat, 100);

        assert_eq!(small.dimensions(), (100, 25));
        let rgb = small.to_rgb8();
        for x in 45..55 {
            assert_eq!(rgb.get_pixel(x, 12).0, [255, 255, 255], "x={x}");
        }
    }

    #[test]
    fn rgb_source_is_not_copied() {
        let rgb = DynamicImage::ImageRgb8(image::RgbImage::new(3, 2));
        let flat = flatten_once(rgb, ColorMode::Rgb);
        assert!(matches!(flat, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn corrupt_file_is_recorded_not_raised() {
        let tmp = tempfile::tempdir().unwrap();
        let bad = tmp.path().join("broken.png");
        std::fs::write(&bad, b"not a png").unwrap();
        let layout = OutputLayout::plan(tmp.path().join("out"), &[100]);
        layout.create().unwrap();

        let outcome = process_one(&bad, &layout, Quality::default());
        assert!(!outcome.succeeded);
        assert!(outcome.error.is_some());
        assert!(outcome.entries.is_empty());
    }
}
