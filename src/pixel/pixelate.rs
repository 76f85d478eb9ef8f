use image::DynamicImage;
use image::imageops::{self, FilterType};

use super::{GridSize, PixelGrid};
use crate::config::ImageLimits;
use crate::error::Result;
use crate::image::ImageSource;

/// Nearest-neighbour downsample to `size`x`size`; alpha is discarded.
pub fn pixelate(img: &DynamicImage, size: GridSize) -> PixelGrid {
    let rgb = img.to_rgb8();
    let n = size.get();
    let small = imageops::resize(&rgb, n, n, FilterType::Nearest);
    PixelGrid::from_rgb_image(size, &small)
}

/// Decode an upload and pixelate it.
pub fn pixelate_source(
    source: &ImageSource,
    limits: &ImageLimits,
    size: GridSize,
) -> Result<PixelGrid> {
    let img = source.decode(limits)?;
    log::debug!(
        "Pixelating {} ({}x{}) to {n}x{n}",
        source.display_name(),
        img.width(),
        img.height(),
        n = size.get()
    );
    Ok(pixelate(&img, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Rgb;
    use image::{Rgb as ImgRgb, RgbImage, Rgba, RgbaImage};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, ImgRgb(color)))
    }

    #[test]
    fn solid_image_gives_solid_grid() {
        let color = [12, 200, 77];
        for (w, h) in [(1, 1), (7, 3), (64, 64), (300, 129)] {
            let img = solid(w, h, color);
            for size in GridSize::all() {
                let grid = pixelate(&img, size);
                assert_eq!(grid.size(), size);
                assert!(grid.is_uniform(Rgb::from_array(color)), "{w}x{h} -> {}", size.get());
            }
        }
    }

    #[test]
    fn exact_multiple_keeps_blocks() {
        // 16x16 image of 2x2 blocks, left half red, right half blue.
        let img = RgbImage::from_fn(16, 16, |x, _| {
            if x < 8 { ImgRgb([255, 0, 0]) } else { ImgRgb([0, 0, 255]) }
        });
        let grid = pixelate(&DynamicImage::ImageRgb8(img), GridSize::new(8).unwrap());
        for ((_, col), color) in grid.iter() {
            let expected = if col < 4 { Rgb::new(255, 0, 0) } else { Rgb::new(0, 0, 255) };
            assert_eq!(color, expected);
        }
    }

    #[test]
    fn alpha_is_dropped_not_blended() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([10, 20, 30, 0]));
        let grid = pixelate(&DynamicImage::ImageRgba8(img), GridSize::new(8).unwrap());
        assert!(grid.is_uniform(Rgb::new(10, 20, 30)));
    }

    #[test]
    fn undecodable_source_is_decode_error() {
        let source = ImageSource::from_bytes(Some("junk.png"), b"not an image".to_vec());
        let err = pixelate_source(&source, &ImageLimits::default(), GridSize::default())
            .expect_err("decode should fail");
        assert!(matches!(err, crate::error::Error::ImageDecode { .. }));
    }

    #[test]
    fn deterministic_for_same_input() {
        let img = RgbImage::from_fn(37, 23, |x, y| {
            ImgRgb([(x * 7) as u8, (y * 11) as u8, ((x + y) * 3) as u8])
        });
        let img = DynamicImage::ImageRgb8(img);
        let size = GridSize::new(12).unwrap();
        assert_eq!(pixelate(&img, size), pixelate(&img, size));
    }
}
