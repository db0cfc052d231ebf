//! Error types for source-set generation.

use std::path::PathBuf;

/// Errors raised while building a source set.
///
/// The first group aborts a run before any output is written. The rest are
/// per-image failures: [`crate::run`] logs them and moves on.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Source folder does not exist.
    #[error("Source folder '{}' does not exist.", .0.display())]
    SourceMissing(PathBuf),

    /// Source path exists but is not a directory.
    #[error("'{}' is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    /// Source folder holds no file with a supported extension.
    #[error(
        "No supported image files found in '{}'. Supported formats: {}",
        .0.display(),
        crate::format::supported_list()
    )]
    NoImages(PathBuf),

    /// Quality outside 1..=100.
    #[error("quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    /// Empty width list, or a zero width.
    #[error("invalid target widths: {0}")]
    InvalidWidths(String),

    /// Filesystem failure with the path it happened on.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file could not be opened or decoded.
    #[error("decoding {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// libwebp rejected the image or configuration.
    #[error("encoding {}: {detail}", .path.display())]
    Encode { path: PathBuf, detail: String },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error stops the run rather than a single image.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::SourceMissing(_)
                | Error::NotADirectory(_)
                | Error::NoImages(_)
                | Error::InvalidQuality(_)
                | Error::InvalidWidths(_)
        )
    }
}
