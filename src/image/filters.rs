use image::{Rgba, RgbaImage};

use super::transform::{from_pixels, map_pixels};

/// Fixed convolution filters offered on the mixer page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    None,
    Sharpen,
    Blur,
    Contour,
    Detail,
    EdgeEnhance,
    Smooth,
    Emboss,
    FindEdges,
}

impl FilterKind {
    pub const ALL: [Self; 9] = [
        Self::None,
        Self::Sharpen,
        Self::Blur,
        Self::Contour,
        Self::Detail,
        Self::EdgeEnhance,
        Self::Smooth,
        Self::Emboss,
        Self::FindEdges,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Original",
            Self::Sharpen => "Sharpen",
            Self::Blur => "Blur",
            Self::Contour => "Contour",
            Self::Detail => "Detail",
            Self::EdgeEnhance => "Edge Enhance",
            Self::Smooth => "Smooth",
            Self::Emboss => "Emboss",
            Self::FindEdges => "Find Edges",
        }
    }

    const fn kernel(self) -> Option<Kernel> {
        match self {
            Self::None => None,
            Self::Blur => Some(Kernel {
                size: 5,
                scale: 16.0,
                offset: 0.0,
                weights: &[
                    1.0, 1.0, 1.0, 1.0, 1.0, //
                    1.0, 0.0, 0.0, 0.0, 1.0, //
                    1.0, 0.0, 0.0, 0.0, 1.0, //
                    1.0, 0.0, 0.0, 0.0, 1.0, //
                    1.0, 1.0, 1.0, 1.0, 1.0,
                ],
            }),
            Self::Contour => Some(Kernel::k3(
                1.0,
                255.0,
                &[-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
            )),
            Self::Detail => Some(Kernel::k3(
                6.0,
                0.0,
                &[0.0, -1.0, 0.0, -1.0, 10.0, -1.0, 0.0, -1.0, 0.0],
            )),
            Self::EdgeEnhance => Some(Kernel::k3(
                2.0,
                0.0,
                &[-1.0, -1.0, -1.0, -1.0, 10.0, -1.0, -1.0, -1.0, -1.0],
            )),
            Self::Emboss => Some(Kernel::k3(
                1.0,
                128.0,
                &[-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            )),
            Self::FindEdges => Some(Kernel::k3(
                1.0,
                0.0,
                &[-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
            )),
            Self::Sharpen => Some(Kernel::k3(
                16.0,
                0.0,
                &[-2.0, -2.0, -2.0, -2.0, 32.0, -2.0, -2.0, -2.0, -2.0],
            )),
            Self::Smooth => Some(Kernel::k3(
                13.0,
                0.0,
                &[1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0],
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Kernel {
    size: usize,
    scale: f32,
    offset: f32,
    weights: &'static [f32],
}

impl Kernel {
    const fn k3(scale: f32, offset: f32, weights: &'static [f32]) -> Self {
        Self {
            size: 3,
            scale,
            offset,
            weights,
        }
    }

    const fn radius(&self) -> usize {
        self.size / 2
    }
}

/// Apply `filter` to the color channels. Pixels closer to the edge than the
/// kernel radius are copied unchanged, as is an image smaller than the kernel.
/// Alpha is never filtered.
pub fn apply_filter(image: &RgbaImage, filter: FilterKind) -> RgbaImage {
    let Some(kernel) = filter.kernel() else {
        return image.clone();
    };
    let (w, h) = image.dimensions();
    let (width, height) = (w as usize, h as usize);
    if width < kernel.size || height < kernel.size {
        return image.clone();
    }
    let r = kernel.radius();
    let at = |x: usize, y: usize| -> Rgba<u8> {
        *image.get_pixel(x as u32, y as u32)
    };
    let pixels = map_pixels(width * height, |idx| {
        let x = idx % width;
        let y = idx / width;
        let px = at(x, y);
        if x < r || y < r || x + r >= width || y + r >= height {
            return px;
        }
        let mut acc = [0.0_f32; 3];
        for ky in 0..kernel.size {
            // Kernel rows are laid out bottom-up relative to the image.
            let sy = y + r - ky;
            for kx in 0..kernel.size {
                let weight = kernel.weights[ky * kernel.size + kx];
                if weight == 0.0 {
                    continue;
                }
                let s = at(x + kx - r, sy);
                acc[0] += f32::from(s[0]) * weight;
                acc[1] += f32::from(s[1]) * weight;
                acc[2] += f32::from(s[2]) * weight;
            }
        }
        let channel = |sum: f32| round_clip(sum / kernel.scale + kernel.offset);
        Rgba([channel(acc[0]), channel(acc[1]), channel(acc[2]), px[3]])
    });
    from_pixels(w, h, &pixels)
}

fn round_clip(value: f32) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 255.0 {
        255
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (value + 0.5) as u8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    #[test]
    fn none_is_identity() {
        let img = RgbaImage::from_fn(6, 4, |x, y| {
            Rgba([(x * 40) as u8, (y * 60) as u8, 7, 200])
        });
        assert_eq!(apply_filter(&img, FilterKind::None), img);
    }

    #[test]
    fn smoothing_filters_keep_flat_regions() {
        let img = gray(9, 9, 120);
        for filter in [
            FilterKind::Blur,
            FilterKind::Smooth,
            FilterKind::Sharpen,
            FilterKind::Detail,
            FilterKind::EdgeEnhance,
        ] {
            assert_eq!(apply_filter(&img, filter), img, "{}", filter.label());
        }
    }

    #[test]
    fn edge_filters_on_flat_regions() {
        let img = gray(5, 5, 90);
        let edges = apply_filter(&img, FilterKind::FindEdges);
        assert_eq!(edges.get_pixel(2, 2).0, [0, 0, 0, 255]);
        let contour = apply_filter(&img, FilterKind::Contour);
        assert_eq!(contour.get_pixel(2, 2).0, [255, 255, 255, 255]);
        let emboss = apply_filter(&img, FilterKind::Emboss);
        assert_eq!(emboss.get_pixel(2, 2).0, [128, 128, 128, 255]);
        // Border is copied through untouched.
        assert_eq!(edges.get_pixel(0, 0).0, [90, 90, 90, 255]);
        assert_eq!(emboss.get_pixel(4, 3).0, [90, 90, 90, 255]);
    }

    #[test]
    fn emboss_reads_lower_left_neighbour() {
        let mut img = gray(3, 3, 100);
        img.put_pixel(0, 2, Rgba([40, 40, 40, 255]));
        let out = apply_filter(&img, FilterKind::Emboss);
        // 128 - 40 + 100
        assert_eq!(out.get_pixel(1, 1).0, [188, 188, 188, 255]);
    }

    #[test]
    fn find_edges_lights_up_a_dot() {
        let mut img = gray(5, 5, 0);
        img.put_pixel(2, 2, Rgba([10, 10, 10, 255]));
        let out = apply_filter(&img, FilterKind::FindEdges);
        assert_eq!(out.get_pixel(2, 2).0, [80, 80, 80, 255]);
        assert_eq!(out.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn small_images_pass_through() {
        let img = gray(4, 4, 33);
        assert_eq!(apply_filter(&img, FilterKind::Blur), img);
        let img = gray(2, 7, 33);
        assert_eq!(apply_filter(&img, FilterKind::Sharpen), img);
    }

    #[test]
    fn alpha_is_preserved() {
        let img = RgbaImage::from_pixel(5, 5, Rgba([50, 60, 70, 17]));
        let out = apply_filter(&img, FilterKind::Contour);
        assert!(out.pixels().all(|p| p[3] == 17));
    }
}
