//! Output bucket directories and entry paths.

use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Name of the bucket holding unresized conversions.
pub const ORIGINAL_BUCKET: &str = "originalsize";

/// One output subdirectory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Renditions at most this many pixels wide.
    Width(u32),
    /// Full-resolution conversions.
    Original,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Width(w) => write!(f, "{w}"),
            Bucket::Original => f.write_str(ORIGINAL_BUCKET),
        }
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Planned directory tree for a run.
///
/// Fixed by the root and the configured widths before any image is read.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
    buckets: Vec<Bucket>,
}

impl OutputLayout {
    /// Plan buckets for `widths`, in the order given.
    ///
    /// A width listed twice maps to the same directory, so only its first
    /// occurrence becomes a bucket. [`Bucket::Original`] always comes last.
    pub fn plan(root: impl Into<PathBuf>, widths: &[u32]) -> Self {
        let mut buckets: Vec<Bucket> = Vec::with_capacity(widths.len() + 1);
        for &w in widths {
            let bucket = Bucket::Width(w);
            if !buckets.contains(&bucket) {
                buckets.push(bucket);
            }
        }
        buckets.push(Bucket::Original);
        Self {
            root: root.into(),
            buckets,
        }
    }

    /// All buckets, width buckets first.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Width buckets only.
    pub fn width_buckets(&self) -> impl Iterator<Item = u32> + '_ {
        self.buckets.iter().filter_map(|b| match b {
            Bucket::Width(w) => Some(*w),
            Bucket::Original => None,
        })
    }

    pub fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.root.join(bucket.to_string())
    }

    /// `<root>/<bucket>/<stem>.webp`
    pub fn entry_path(&self, bucket: Bucket, stem: &str) -> PathBuf {
        self.bucket_dir(bucket).join(format!("{stem}.webp"))
    }

    /// Create the root and every bucket directory. Existing ones are kept.
    pub fn create(&self) -> Result<()> {
        for bucket in &self.buckets {
            let dir = self.bucket_dir(*bucket);
            std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        }
        Ok(())
    }
}
