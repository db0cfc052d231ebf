//! Width-bucket resizing.
//!
//! Only ever downscales. The source image is borrowed, never modified, so a
//! single decoded original can feed every bucket of a run.

use std::borrow::Cow;

use image::DynamicImage;
use image::imageops::FilterType;

/// Height that keeps the aspect ratio when `width` shrinks to `target_width`.
///
/// `floor(height * target_width / width)`, at least 1 pixel.
pub fn target_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return height.max(1);
    }
    let scaled = u64::from(height) * u64::from(target_width) / u64::from(width);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Scale `image` down to `target_width`, preserving aspect ratio.
///
/// Images already `target_width` wide or narrower come back borrowed and
/// untouched. Larger ones are resampled with Lanczos3 into a new buffer.
pub fn resize_to_width(image: &DynamicImage, target_width: u32) -> Cow<'_, DynamicImage> {
    if image.width() <= target_width {
        return Cow::Borrowed(image);
    }
    let height = target_height(image.width(), image.height(), target_width);
    Cow::Owned(image.resize_exact(target_width, height, FilterType::Lanczos3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30])))
    }

    #[test]
    fn height_is_floored() {
        assert_eq!(target_height(2000, 1000, 320), 160);
        assert_eq!(target_height(1000, 333, 500), 166);
        assert_eq!(target_height(3, 2, 2), 1);
    }

    #[test]
    fn height_never_zero() {
        assert_eq!(target_height(10_000, 1, 10), 1);
    }

    #[test]
    fn downscale_matches_ratio() {
        let src = solid(2000, 1000);
        let out = resize_to_width(&src, 640);
        assert!(matches!(out, Cow::Owned(_)));
        assert_eq!(out.dimensions(), (640, 320));
    }

    #[test]
    fn never_upscales() {
        let src = solid(200, 100);
        let out = resize_to_width(&src, 320);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.dimensions(), (200, 100));
    }

    #[test]
    fn equal_width_is_untouched() {
        let src = solid(320, 240);
        assert!(matches!(resize_to_width(&src, 320), Cow::Borrowed(_)));
    }

    #[test]
    fn source_survives_repeated_resizes() {
        let src = solid(1200, 800);
        for width in [960, 640, 320] {
            let _ = resize_to_width(&src, width);
        }
        assert_eq!(src.dimensions(), (1200, 800));
        assert_eq!(src.as_rgb8().unwrap().get_pixel(0, 0), &image::Rgb([10, 20, 30]));
    }
}
