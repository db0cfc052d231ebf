//! Supported input formats.

use std::path::Path;

/// File extensions accepted as source images, lowercase and sorted.
///
/// Matching is case-insensitive; `photo.JPG` and `photo.jpg` both qualify.
pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["bmp", "gif", "jpeg", "jpg", "png", "tif", "tiff", "webp"];

/// Decoder family of a source image, derived from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Jpeg,
    Png,
    WebP,
    Bmp,
    Tiff,
    Gif,
}

impl SourceFormat {
    /// Map a file extension (case-insensitive) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(SourceFormat::Jpeg),
            "png" => Some(SourceFormat::Png),
            "webp" => Some(SourceFormat::WebP),
            "bmp" => Some(SourceFormat::Bmp),
            "tif" | "tiff" => Some(SourceFormat::Tiff),
            "gif" => Some(SourceFormat::Gif),
            _ => None,
        }
    }

    /// Format of a path, judged by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether every image of this format is palette-indexed.
    ///
    /// GIF frames always carry a colour table; the decoder hands them back
    /// already expanded to RGBA.
    pub fn is_palette_only(self) -> bool {
        matches!(self, SourceFormat::Gif)
    }
}

/// Whether a path carries a supported image extension.
pub fn is_supported(path: &Path) -> bool {
    SourceFormat::from_path(path).is_some()
}

/// Dotted, comma-separated extension list for user-facing messages.
pub fn supported_list() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_extension_maps_to_a_format() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(SourceFormat::from_extension(ext).is_some(), "{ext}");
        }
    }

    #[test]
    fn extensions_are_sorted() {
        let mut sorted = SUPPORTED_EXTENSIONS;
        sorted.sort_unstable();
        assert_eq!(sorted, SUPPORTED_EXTENSIONS);
    }

    #[test]
    fn from_extension_case_insensitive() {
        assert_eq!(SourceFormat::from_extension("JPG"), Some(SourceFormat::Jpeg));
        assert_eq!(SourceFormat::from_extension("TiF"), Some(SourceFormat::Tiff));
        assert_eq!(SourceFormat::from_extension("WebP"), Some(SourceFormat::WebP));
        assert_eq!(SourceFormat::from_extension("avif"), None);
    }

    #[test]
    fn is_supported_by_path() {
        assert!(is_supported(Path::new("a/b/photo.PNG")));
        assert!(is_supported(Path::new("scan.tiff")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("README")));
    }

    #[test]
    fn only_gif_is_palette_only() {
        assert!(SourceFormat::Gif.is_palette_only());
        assert!(!SourceFormat::Png.is_palette_only());
    }

    #[test]
    fn supported_list_is_dotted() {
        assert_eq!(
            supported_list(),
            ".bmp, .gif, .jpeg, .jpg, .png, .tif, .tiff, .webp"
        );
    }
}
