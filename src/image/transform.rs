use image::{Rgba, RgbaImage};
use rayon::prelude::*;

/// Minimum pixel count before parallelizing per-pixel transforms.
const PARALLEL_PIXEL_THRESHOLD: usize = 262_144; // 512x512

pub(super) fn map_pixels(
    total_pixels: usize,
    f: impl Fn(usize) -> Rgba<u8> + Sync + Send,
) -> Vec<Rgba<u8>> {
    if total_pixels >= PARALLEL_PIXEL_THRESHOLD {
        (0..total_pixels).into_par_iter().map(f).collect()
    } else {
        let mut out = Vec::with_capacity(total_pixels);
        for idx in 0..total_pixels {
            out.push(f(idx));
        }
        out
    }
}

pub(super) fn from_pixels(width: u32, height: u32, pixels: &[Rgba<u8>]) -> RgbaImage {
    debug_assert_eq!(pixels.len(), width as usize * height as usize);
    RgbaImage::from_fn(width, height, |x, y| {
        pixels[y as usize * width as usize + x as usize]
    })
}

/// Counter-clockwise rotation in quarter turns. The canvas always grows to
/// fit, so 90 and 270 swap width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Ccw90,
    Ccw180,
    Ccw270,
}

impl Rotation {
    #[cfg(test)]
    pub const ALL: [Self; 4] = [Self::None, Self::Ccw90, Self::Ccw180, Self::Ccw270];

    /// Map a slider angle to a rotation. Only multiples of 90 are accepted;
    /// 360 and above wrap around.
    pub const fn from_degrees(degrees: u32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(match (degrees / 90) % 4 {
            0 => Self::None,
            1 => Self::Ccw90,
            2 => Self::Ccw180,
            _ => Self::Ccw270,
        })
    }

    pub const fn degrees(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Ccw90 => 90,
            Self::Ccw180 => 180,
            Self::Ccw270 => 270,
        }
    }
}

pub fn rotate(image: &RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::None => image.clone(),
        Rotation::Ccw90 => rotate_ccw(image),
        Rotation::Ccw180 => rotate_half(image),
        Rotation::Ccw270 => rotate_cw(image),
    }
}

/// Rotate 90 degrees clockwise.
pub fn rotate_cw(image: &RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    let (width, height) = (w as usize, h as usize);
    if width == 0 || height == 0 {
        return image.clone();
    }
    let new_width = height;
    let pixels = image.as_raw();
    let rotated = map_pixels(width * height, |idx| {
        let dx = idx % new_width;
        let dy = idx / new_width;
        let src_x = dy;
        let src_y = new_width - 1 - dx;
        pixel_at(pixels, src_y * width + src_x)
    });
    from_pixels(h, w, &rotated)
}

/// Rotate 90 degrees counter-clockwise.
pub fn rotate_ccw(image: &RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    let (width, height) = (w as usize, h as usize);
    if width == 0 || height == 0 {
        return image.clone();
    }
    let new_width = height;
    let pixels = image.as_raw();
    let rotated = map_pixels(width * height, |idx| {
        let dx = idx % new_width;
        let dy = idx / new_width;
        let src_y = dx;
        let src_x = width - 1 - dy;
        pixel_at(pixels, src_y * width + src_x)
    });
    from_pixels(h, w, &rotated)
}

fn rotate_half(image: &RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    let total = w as usize * h as usize;
    let pixels = image.as_raw();
    let rotated = map_pixels(total, |idx| pixel_at(pixels, total - 1 - idx));
    from_pixels(w, h, &rotated)
}

/// Mirror left-right.
pub fn flip_horizontal(image: &RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    let width = w as usize;
    if width == 0 || h == 0 {
        return image.clone();
    }
    let pixels = image.as_raw();
    let flipped = map_pixels(width * h as usize, |idx| {
        let x = idx % width;
        let y = idx / width;
        pixel_at(pixels, y * width + (width - 1 - x))
    });
    from_pixels(w, h, &flipped)
}

/// Mirror top-bottom.
pub fn flip_vertical(image: &RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    let (width, height) = (w as usize, h as usize);
    if width == 0 || height == 0 {
        return image.clone();
    }
    let pixels = image.as_raw();
    let flipped = map_pixels(width * height, |idx| {
        let x = idx % width;
        let y = idx / width;
        pixel_at(pixels, (height - 1 - y) * width + x)
    });
    from_pixels(w, h, &flipped)
}

fn pixel_at(raw: &[u8], idx: usize) -> Rgba<u8> {
    let base = idx * 4;
    Rgba([raw[base], raw[base + 1], raw[base + 2], raw[base + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_id(id: u8) -> Rgba<u8> {
        Rgba([id, 0, 0, 255])
    }

    fn ids_from_image(image: &RgbaImage) -> Vec<u8> {
        image.pixels().map(|c| c[0]).collect()
    }

    fn test_image() -> RgbaImage {
        let pixels: Vec<Rgba<u8>> = (1..=6).map(color_id).collect();
        from_pixels(3, 2, &pixels)
    }

    #[test]
    fn rotate_cw_maps_pixels() {
        let image = rotate_cw(&test_image());
        assert_eq!(image.dimensions(), (2, 3));
        assert_eq!(ids_from_image(&image), vec![4, 1, 5, 2, 6, 3]);
    }

    #[test]
    fn rotate_ccw_maps_pixels() {
        let image = rotate_ccw(&test_image());
        assert_eq!(image.dimensions(), (2, 3));
        assert_eq!(ids_from_image(&image), vec![3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn rotate_half_maps_pixels() {
        let image = rotate(&test_image(), Rotation::Ccw180);
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(ids_from_image(&image), vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn rotation_selects_direction() {
        assert_eq!(rotate(&test_image(), Rotation::Ccw90), rotate_ccw(&test_image()));
        assert_eq!(rotate(&test_image(), Rotation::Ccw270), rotate_cw(&test_image()));
        assert_eq!(rotate(&test_image(), Rotation::None), test_image());
    }

    #[test]
    fn flip_horizontal_maps_pixels() {
        let image = flip_horizontal(&test_image());
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(ids_from_image(&image), vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn flip_vertical_maps_pixels() {
        let image = flip_vertical(&test_image());
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(ids_from_image(&image), vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn degrees_map_to_quarter_turns() {
        assert_eq!(Rotation::from_degrees(0), Some(Rotation::None));
        assert_eq!(Rotation::from_degrees(90), Some(Rotation::Ccw90));
        assert_eq!(Rotation::from_degrees(270), Some(Rotation::Ccw270));
        assert_eq!(Rotation::from_degrees(360), Some(Rotation::None));
        assert_eq!(Rotation::from_degrees(45), None);
        for rotation in Rotation::ALL {
            assert_eq!(Rotation::from_degrees(rotation.degrees()), Some(rotation));
        }
    }
}
