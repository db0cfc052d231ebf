//! Colour normalisation ahead of WebP encoding.
//!
//! Every rendition is written as opaque 8-bit RGB. How a decoded image gets
//! there depends only on its [`ColorMode`]:
//!
//! | Mode      | Steps                                   |
//! |-----------|-----------------------------------------|
//! | `Palette` | expand to RGBA, flatten onto white      |
//! | `Alpha`   | flatten onto white                      |
//! | `Other`   | convert to RGB                          |
//! | `Rgb`     | pass through                            |

use std::borrow::Cow;

use image::{DynamicImage, Rgb, RgbImage, RgbaImage};
use serde::Serialize;

use crate::format::SourceFormat;

/// Colour representation of a decoded source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// 8-bit RGB, no alpha.
    Rgb,
    /// Any layout with an alpha channel.
    Alpha,
    /// Indexed colour from a palette-only format.
    Palette,
    /// Grayscale, 16-bit or float RGB without alpha.
    Other,
}

/// Steps taken to reach opaque RGB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalization {
    ExpandThenFlatten,
    Flatten,
    Convert,
    PassThrough,
}

impl ColorMode {
    /// Classify a decoded image.
    ///
    /// `format` is the source file's format, when known. Palette-only formats
    /// are reported as [`ColorMode::Palette`] even though the decoder has
    /// already expanded their colour table.
    pub fn classify(image: &DynamicImage, format: Option<SourceFormat>) -> Self {
        if format.is_some_and(SourceFormat::is_palette_only) {
            ColorMode::Palette
        } else if image.color().has_alpha() {
            ColorMode::Alpha
        } else if matches!(image, DynamicImage::ImageRgb8(_)) {
            ColorMode::Rgb
        } else {
            ColorMode::Other
        }
    }

    /// Row of the normalisation table for this mode.
    pub const fn normalization(self) -> Normalization {
        match self {
            ColorMode::Palette => Normalization::ExpandThenFlatten,
            ColorMode::Alpha => Normalization::Flatten,
            ColorMode::Other => Normalization::Convert,
            ColorMode::Rgb => Normalization::PassThrough,
        }
    }
}

/// Bring `image` to opaque 8-bit RGB according to `mode`.
pub fn to_opaque_rgb(image: &DynamicImage, mode: ColorMode) -> Cow<'_, RgbImage> {
    match mode.normalization() {
        Normalization::ExpandThenFlatten => {
            let expanded = image.to_rgba8();
            Cow::Owned(flatten_on_white(&expanded))
        }
        Normalization::Flatten => match image {
            DynamicImage::ImageRgba8(rgba) => Cow::Owned(flatten_on_white(rgba)),
            other => Cow::Owned(flatten_on_white(&other.to_rgba8())),
        },
        Normalization::Convert => Cow::Owned(image.to_rgb8()),
        Normalization::PassThrough => match image.as_rgb8() {
            Some(rgb) => Cow::Borrowed(rgb),
            None => Cow::Owned(image.to_rgb8()),
        },
    }
}

/// Composite RGBA over a solid white background of the same size.
pub fn flatten_on_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

#[inline]
fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u32::from(channel), u32::from(alpha));
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba};

    #[test]
    fn classify_modes() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        let gray = DynamicImage::ImageLuma8(GrayImage::new(2, 2));

        assert_eq!(ColorMode::classify(&rgb, Some(SourceFormat::Jpeg)), ColorMode::Rgb);
        assert_eq!(ColorMode::classify(&rgba, Some(SourceFormat::Png)), ColorMode::Alpha);
        assert_eq!(ColorMode::classify(&gray, None), ColorMode::Other);
        assert_eq!(ColorMode::classify(&rgba, Some(SourceFormat::Gif)), ColorMode::Palette);
    }

    #[test]
    fn table_rows() {
        assert_eq!(ColorMode::Palette.normalization(), Normalization::ExpandThenFlatten);
        assert_eq!(ColorMode::Alpha.normalization(), Normalization::Flatten);
        assert_eq!(ColorMode::Other.normalization(), Normalization::Convert);
        assert_eq!(ColorMode::Rgb.normalization(), Normalization::PassThrough);
    }

    #[test]
    fn transparent_becomes_white() {
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([12, 34, 56, 0]));
        rgba.put_pixel(1, 0, Rgba([12, 34, 56, 255]));
        let flat = flatten_on_white(&rgba);
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(flat.get_pixel(1, 0), &Rgb([12, 34, 56]));
    }

    #[test]
    fn half_alpha_blends() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let flat = flatten_on_white(&rgba);
        assert_eq!(flat.get_pixel(0, 0), &Rgb([127, 127, 127]));
    }

    #[test]
    fn rgb_passes_through_borrowed() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([1, 2, 3])));
        let out = to_opaque_rgb(&img, ColorMode::Rgb);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.get_pixel(2, 2), &Rgb([1, 2, 3]));
    }

    #[test]
    fn grayscale_converts() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([90])));
        let out = to_opaque_rgb(&img, ColorMode::Other);
        assert_eq!(out.get_pixel(0, 0), &Rgb([90, 90, 90]));
    }

    #[test]
    fn palette_expands_and_flattens() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([200, 0, 0, 0])));
        let out = to_opaque_rgb(&img, ColorMode::Palette);
        assert_eq!(out.get_pixel(1, 1), &Rgb([255, 255, 255]));
    }
}
