use image::RgbImage;

use super::Rgb;

/// Canvas side length in cells: 8 to 64 in steps of 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridSize(u32);

impl GridSize {
    pub const MIN: u32 = 8;
    pub const MAX: u32 = 64;
    pub const STEP: u32 = 4;

    /// `None` unless `n` is one of the supported sizes.
    #[cfg(test)]
    pub const fn new(n: u32) -> Option<Self> {
        if n >= Self::MIN && n <= Self::MAX && n % Self::STEP == 0 {
            Some(Self(n))
        } else {
            None
        }
    }

    /// Clamp into range and snap to the nearest step (ties round up).
    pub const fn clamped(n: u32) -> Self {
        let n = if n < Self::MIN {
            Self::MIN
        } else if n > Self::MAX {
            Self::MAX
        } else {
            n
        };
        let snapped = (n - Self::MIN + Self::STEP / 2) / Self::STEP * Self::STEP + Self::MIN;
        if snapped > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(snapped)
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn cells(self) -> usize {
        self.0 as usize
    }

    #[cfg(test)]
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).step_by(Self::STEP as usize).map(Self)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(16)
    }
}

/// Square grid of RGB cells stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    size: GridSize,
    cells: Vec<Rgb>,
}

impl PixelGrid {
    pub fn blank(size: GridSize) -> Self {
        Self::filled(size, Rgb::WHITE)
    }

    pub fn filled(size: GridSize, color: Rgb) -> Self {
        let n = size.cells();
        Self {
            size,
            cells: vec![color; n * n],
        }
    }

    pub const fn size(&self) -> GridSize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Rgb> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Returns `false` when the cell is outside the grid.
    pub fn set(&mut self, row: usize, col: usize, color: Rgb) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = color;
                true
            }
            None => false,
        }
    }

    /// Cells with their `(row, col)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), Rgb)> + '_ {
        let n = self.size.cells();
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, color)| ((idx / n, idx % n), *color))
    }

    #[cfg(test)]
    pub fn is_uniform(&self, color: Rgb) -> bool {
        self.cells.iter().all(|c| *c == color)
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let n = self.size.get();
        RgbImage::from_fn(n, n, |x, y| {
            self.cells[y as usize * self.size.cells() + x as usize].into()
        })
    }

    pub(crate) fn from_rgb_image(size: GridSize, img: &RgbImage) -> Self {
        let n = size.get();
        debug_assert_eq!(img.dimensions(), (n, n));
        let mut grid = Self::blank(size);
        for (x, y, px) in img.enumerate_pixels() {
            grid.set(y as usize, x as usize, Rgb::from(*px));
        }
        grid
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        let n = self.size.cells();
        (row < n && col < n).then_some(row * n + col)
    }
}
