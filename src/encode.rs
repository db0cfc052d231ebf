//! Lossy WebP encoding through libwebp.

use std::fmt;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use libwebp_sys::WebPConfig;
use serde::Serialize;

use crate::color::{self, ColorMode};
use crate::error::{Error, Result};

/// libwebp's slowest, best-compressing method.
const WEBP_METHOD_MAX_EFFORT: i32 = 6;

/// WebP quality, 1 to 100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Validate a quality value.
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidQuality(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A WebP file written to disk.
#[derive(Clone, Debug, Serialize)]
pub struct EncodedEntry {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
}

/// Encode `image` as lossy WebP into `output`.
///
/// The image is first normalised to opaque RGB per `mode`, then encoded at
/// `quality` with maximum compression effort.
pub fn try_encode_webp(
    image: &DynamicImage,
    mode: ColorMode,
    output: &Path,
    quality: Quality,
) -> Result<EncodedEntry> {
    let rgb = color::to_opaque_rgb(image, mode);
    let (width, height) = rgb.dimensions();

    let encode_err = |detail: String| Error::Encode {
        path: output.to_path_buf(),
        detail,
    };

    let mut config =
        WebPConfig::new().map_err(|()| encode_err("libwebp config init failed".into()))?;
    config.quality = f32::from(quality.get());
    config.method = WEBP_METHOD_MAX_EFFORT;

    let encoded = webp::Encoder::from_rgb(rgb.as_raw(), width, height)
        .encode_advanced(&config)
        .map_err(|e| encode_err(format!("{e:?}")))?;

    std::fs::write(output, &*encoded).map_err(|e| Error::io(output, e))?;

    Ok(EncodedEntry {
        path: output.to_path_buf(),
        width,
        height,
        bytes: encoded.len() as u64,
    })
}

/// Like [`try_encode_webp`], but logs failures and reports them as `None`.
///
/// A failed entry never aborts the caller's run.
pub fn encode_webp(
    image: &DynamicImage,
    mode: ColorMode,
    output: &Path,
    quality: Quality,
) -> Option<EncodedEntry> {
    match try_encode_webp(image, mode, output, quality) {
        Ok(entry) => {
            tracing::debug!(
                path = %entry.path.display(),
                width = entry.width,
                height = entry.height,
                bytes = entry.bytes,
                "wrote webp"
            );
            Some(entry)
        }
        Err(e) => {
            tracing::warn!("Error converting {}: {e}", output.display());
            None
        }
    }
}
