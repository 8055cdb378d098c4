use core::fmt;

use sc_core::Image;

/// Per-pixel occupancy test used by [`SilhouetteGrid::build`].
pub trait OpacitySource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn is_opaque(&self, x: usize, y: usize) -> bool;
}

/// Pixel formats that can be tested for "anything drawn here".
pub trait PixelOpacity {
    fn is_opaque(&self) -> bool;
}

impl PixelOpacity for u8 {
    fn is_opaque(&self) -> bool {
        *self != 0
    }
}

/// RGBA pixels count as occupied when any channel is non-zero.
impl PixelOpacity for [u8; 4] {
    fn is_opaque(&self) -> bool {
        self.iter().any(|&c| c != 0)
    }
}

impl<T: PixelOpacity> OpacitySource for Image<T> {
    fn width(&self) -> usize {
        Image::width(self)
    }

    fn height(&self) -> usize {
        Image::height(self)
    }

    fn is_opaque(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(PixelOpacity::is_opaque)
    }
}

/// Mirrors a source vertically so row `0` reads the bottom image row.
#[derive(Debug, Clone, Copy)]
pub struct FlipVertical<'a, S: ?Sized>(pub &'a S);

impl<S: OpacitySource + ?Sized> OpacitySource for FlipVertical<'_, S> {
    fn width(&self) -> usize {
        self.0.width()
    }

    fn height(&self) -> usize {
        self.0.height()
    }

    fn is_opaque(&self, x: usize, y: usize) -> bool {
        let h = self.0.height();
        if y >= h {
            return false;
        }
        self.0.is_opaque(x, h - 1 - y)
    }
}

/// Coarse occupancy map over `cell_size x cell_size` pixel blocks.
///
/// Dimensions are `floor(W / cell_size) x floor(H / cell_size)`; partial
/// blocks along the right and bottom borders are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilhouetteGrid {
    width: usize,
    height: usize,
    // Column-major: cell (x, y) lives at `x * height + y`.
    cells: Vec<bool>,
}

impl SilhouetteGrid {
    pub fn build<S: OpacitySource + ?Sized>(src: &S, cell_size: usize) -> Self {
        if cell_size == 0 {
            return Self::from_fn(0, 0, |_, _| false);
        }

        let width = src.width() / cell_size;
        let height = src.height() / cell_size;

        Self::from_fn(width, height, |gx, gy| {
            let x0 = gx * cell_size;
            let y0 = gy * cell_size;
            (x0..x0 + cell_size).any(|x| (y0..y0 + cell_size).any(|y| src.is_opaque(x, y)))
        })
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut cells = Vec::with_capacity(width.saturating_mul(height));
        for x in 0..width {
            for y in 0..height {
                cells.push(f(x, y));
            }
        }

        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells outside the grid read as unoccupied.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.cells[x * self.height + y]
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }
}

impl fmt::Display for SilhouetteGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.is_set(x, y) { "O " } else { ". " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
