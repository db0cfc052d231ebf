//! # srcsetmaker
//!
//! Batch conversion of a folder of raster images into WebP "source sets":
//! one rendition per target width plus an original-size copy, laid out in
//! per-width bucket directories for responsive `srcset` delivery.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use srcsetmaker::{ConvertConfig, Quality};
//!
//! let config = ConvertConfig::new("photos", "public/img")
//!     .with_widths([480, 960, 1440])
//!     .with_quality(Quality::new(82)?);
//! let report = srcsetmaker::run(&config, &mut ())?;
//! println!("{} of {} converted", report.succeeded, report.found);
//! # Ok::<(), srcsetmaker::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod color;
pub mod convert;
pub mod encode;
pub mod enumerate;
pub mod error;
pub mod format;
pub mod layout;
pub mod manifest;
pub mod resize;

pub use color::ColorMode;
pub use convert::{ConvertConfig, ImageOutcome, RunObserver, RunReport, run};
pub use encode::{EncodedEntry, Quality};
pub use error::{Error, Result};
pub use format::{SUPPORTED_EXTENSIONS, SourceFormat};
pub use layout::{Bucket, OutputLayout};
pub use manifest::MANIFEST_FILE_NAME;
