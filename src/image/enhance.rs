//! Brightness, color and contrast enhancement.
//!
//! Each enhancement blends a "degenerate" version of the image toward the
//! original: `out = degenerate + factor * (image - degenerate)`. A factor of 0
//! yields the degenerate image, 1 the original, and larger values push past it.

use image::{Rgba, RgbaImage};

use super::transform::{from_pixels, map_pixels};

pub const MIN_FACTOR: f32 = 0.0;
pub const MAX_FACTOR: f32 = 3.0;

/// Degenerate image is black.
pub fn brightness(image: &RgbaImage, factor: f32) -> RgbaImage {
    blend_each(image, factor, |_| [0.0; 3])
}

/// Degenerate image is the grayscale version of each pixel.
pub fn color(image: &RgbaImage, factor: f32) -> RgbaImage {
    blend_each(image, factor, |px| {
        let l = f32::from(luma(px));
        [l, l, l]
    })
}

/// Degenerate image is a flat gray at the mean luma.
pub fn contrast(image: &RgbaImage, factor: f32) -> RgbaImage {
    let mean = f32::from(mean_luma(image));
    blend_each(image, factor, |_| [mean; 3])
}

/// ITU-R 601-2 luma with the fixed-point rounding used for 8-bit grayscale.
pub fn luma(px: Rgba<u8>) -> u8 {
    let [r, g, b, _] = px.0;
    let l = (u32::from(r) * 19_595 + u32::from(g) * 38_470 + u32::from(b) * 7_471 + 0x8000) >> 16;
    u8::try_from(l).unwrap_or(u8::MAX)
}

fn mean_luma(image: &RgbaImage) -> u8 {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return 0;
    }
    let sum: u64 = image.pixels().map(|px| u64::from(luma(*px))).sum();
    u8::try_from((sum * 2 + count) / (count * 2)).unwrap_or(u8::MAX)
}

fn blend_each(
    image: &RgbaImage,
    factor: f32,
    degenerate: impl Fn(Rgba<u8>) -> [f32; 3] + Sync + Send,
) -> RgbaImage {
    if (factor - 1.0).abs() <= f32::EPSILON {
        return image.clone();
    }
    let (w, h) = image.dimensions();
    let width = w as usize;
    let pixels = map_pixels(width * h as usize, |idx| {
        #[allow(clippy::cast_possible_truncation)]
        let px = *image.get_pixel((idx % width) as u32, (idx / width) as u32);
        let base = degenerate(px);
        let mix = |channel: usize| blend(base[channel], f32::from(px[channel]), factor);
        Rgba([mix(0), mix(1), mix(2), px[3]])
    });
    from_pixels(w, h, &pixels)
}

/// Truncating blend clamped to the 8-bit range.
fn blend(from: f32, to: f32, factor: f32) -> u8 {
    let value = factor.mul_add(to - from, from);
    if value <= 0.0 {
        0
    } else if value >= 255.0 {
        255
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            value as u8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(4, 3, |x, y| {
            let v = u8::try_from(x * 50 + y * 20).unwrap_or(u8::MAX);
            Rgba([v, 255 - v, v / 2, 180])
        })
    }

    #[test]
    fn factor_one_is_identity() {
        let img = sample();
        assert_eq!(brightness(&img, 1.0), img);
        assert_eq!(color(&img, 1.0), img);
        assert_eq!(contrast(&img, 1.0), img);
    }

    #[test]
    fn brightness_scales_and_clamps() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([100, 200, 10, 255]));
        assert_eq!(brightness(&img, 0.5).get_pixel(0, 0).0, [50, 100, 5, 255]);
        assert_eq!(brightness(&img, 2.0).get_pixel(1, 1).0, [200, 255, 20, 255]);
        assert_eq!(brightness(&img, 0.0).get_pixel(1, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn zero_color_is_grayscale() {
        let img = sample();
        let gray = color(&img, 0.0);
        for (src, out) in img.pixels().zip(gray.pixels()) {
            let l = luma(*src);
            assert_eq!(out.0, [l, l, l, src[3]]);
        }
    }

    #[test]
    fn zero_contrast_is_flat_mean() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        let flat = contrast(&img, 0.0);
        // mean of 0 and 255 rounds half up
        assert!(flat.pixels().all(|p| p.0 == [128, 128, 128, 255]));
    }

    #[test]
    fn contrast_pushes_away_from_mean() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([100, 100, 100, 255]));
        img.put_pixel(1, 0, Rgba([150, 150, 150, 255]));
        let out = contrast(&img, 2.0);
        // mean 125: 125 + 2 * (100 - 125) = 75, 125 + 2 * (150 - 125) = 175
        assert_eq!(out.get_pixel(0, 0).0, [75, 75, 75, 255]);
        assert_eq!(out.get_pixel(1, 0).0, [175, 175, 175, 255]);
    }

    #[test]
    fn luma_of_primaries() {
        assert_eq!(luma(Rgba([255, 255, 255, 255])), 255);
        assert_eq!(luma(Rgba([0, 0, 0, 255])), 0);
        assert_eq!(luma(Rgba([255, 0, 0, 255])), 76);
        assert_eq!(luma(Rgba([0, 255, 0, 255])), 150);
        assert_eq!(luma(Rgba([0, 0, 255, 255])), 29);
    }
}
