//! `sourceset_info.txt` run summary.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::encode::Quality;
use crate::error::{Error, Result};
use crate::layout::ORIGINAL_BUCKET;

/// File name of the manifest, placed in the output root.
pub const MANIFEST_FILE_NAME: &str = "sourceset_info.txt";

/// Everything the manifest reports.
#[derive(Clone, Debug)]
pub struct Manifest<'a> {
    pub source: &'a Path,
    pub output: &'a Path,
    /// Widths as configured; sorted for display.
    pub widths: &'a [u32],
    pub quality: Quality,
    pub found: usize,
    pub succeeded: usize,
}

impl Manifest<'_> {
    /// Render the manifest text.
    pub fn render(&self) -> String {
        let mut widths = self.widths.to_vec();
        widths.sort_unstable();
        let width_list = widths
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = String::new();
        out.push_str("Source Set WebP Maker - Generated Files\n");
        out.push_str("=======================================\n\n");
        // Writing to a String cannot fail.
        let _ = writeln!(out, "Source folder: {}", self.source.display());
        let _ = writeln!(out, "Output folder: {}", self.output.display());
        let _ = writeln!(out, "Target widths: {width_list}");
        let _ = writeln!(out, "WebP quality: {}", self.quality);
        let _ = writeln!(out, "Images processed: {}", self.found);
        let _ = writeln!(out, "Successful conversions: {}\n", self.succeeded);
        out.push_str("Directory structure:\n");
        for w in &widths {
            let _ = writeln!(out, "  {w}/ - Images resized to {w}px wide");
        }
        let _ = writeln!(out, "  {ORIGINAL_BUCKET}/ - Original size WebP conversions");
        out
    }

    /// Write the manifest into the output root, replacing any previous one.
    pub fn write(&self) -> Result<PathBuf> {
        let path = self.output.join(MANIFEST_FILE_NAME);
        std::fs::write(&path, self.render()).map_err(|e| Error::io(&path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sorted_widths() {
        let manifest = Manifest {
            source: Path::new("in"),
            output: Path::new("out"),
            widths: &[960, 320, 640],
            quality: Quality::default(),
            found: 3,
            succeeded: 2,
        };
        let expected = "\
Source Set WebP Maker - Generated Files
=======================================

Source folder: in
Output folder: out
Target widths: 320, 640, 960
WebP quality: 80
Images processed: 3
Successful conversions: 2

Directory structure:
  320/ - Images resized to 320px wide
  640/ - Images resized to 640px wide
  960/ - Images resized to 960px wide
  originalsize/ - Original size WebP conversions
";
        assert_eq!(manifest.render(), expected);
    }

    #[test]
    fn write_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(MANIFEST_FILE_NAME);
        std::fs::write(&path, "stale").unwrap();

        let manifest = Manifest {
            source: Path::new("in"),
            output: tmp.path(),
            widths: &[100],
            quality: Quality::new(50).unwrap(),
            found: 1,
            succeeded: 1,
        };
        assert_eq!(manifest.write().unwrap(), path);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("WebP quality: 50"));
        assert!(!text.contains("stale"));
    }
}
