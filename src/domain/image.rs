// ============================================================
// Layer 3: Image Domain Types
// ============================================================
// ImageShape describes the fixed tensor shape every layer of
// the autoencoder agrees on. GrayscaleImage is a flat buffer of
// [0, 1] pixel intensities that can be tiled into a grid and
// handed to the PNG writer in the infra layer.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Channel-first shape of a single image (C, H, W).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageShape {
    pub channels: usize,
    pub height:   usize,
    pub width:    usize,
}

impl ImageShape {
    /// MNIST digits: one channel, 28 x 28 pixels
    pub const MNIST: ImageShape = ImageShape { channels: 1, height: 28, width: 28 };

    /// Number of scalar values in one image
    pub const fn pixels(&self) -> usize {
        self.channels * self.height * self.width
    }

    /// Shape of a batch of `n` images: [n, C, H, W]
    pub const fn batch_dims(&self, n: usize) -> [usize; 4] {
        [n, self.channels, self.height, self.width]
    }
}

/// A single-channel image with intensities in [0, 1], row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayscaleImage {
    pub width:  usize,
    pub height: usize,
    pub pixels: Vec<f32>,
}

impl GrayscaleImage {
    pub fn blank(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0.0; width * height] }
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.pixels[y * self.width + x]
    }
}

/// Lay out equally-sized single-channel images row-major in a grid
/// with `columns` images per row.
///
/// The last row is padded with black cells when `images.len()` is
/// not a multiple of `columns`. An empty input gives a 0 x 0 image.
pub fn tile(images: &[Vec<f32>], shape: ImageShape, columns: usize) -> Result<GrayscaleImage> {
    if shape.channels != 1 {
        bail!("Can only tile single-channel images, got {} channels", shape.channels);
    }
    if images.is_empty() {
        return Ok(GrayscaleImage::blank(0, 0));
    }
    if columns == 0 {
        bail!("Grid needs at least one column");
    }

    let columns = columns.min(images.len());
    let rows    = images.len().div_ceil(columns);
    let mut grid = GrayscaleImage::blank(columns * shape.width, rows * shape.height);

    for (i, image) in images.iter().enumerate() {
        if image.len() != shape.pixels() {
            bail!(
                "Image {} has {} pixels, expected {} ({}x{})",
                i, image.len(), shape.pixels(), shape.height, shape.width
            );
        }
        let x0 = (i % columns) * shape.width;
        let y0 = (i / columns) * shape.height;
        for row in 0..shape.height {
            let src = &image[row * shape.width..(row + 1) * shape.width];
            let dst_start = (y0 + row) * grid.width + x0;
            grid.pixels[dst_start..dst_start + shape.width].copy_from_slice(src);
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: ImageShape = ImageShape { channels: 1, height: 2, width: 2 };

    #[test]
    fn test_mnist_shape() {
        assert_eq!(ImageShape::MNIST.pixels(), 784);
        assert_eq!(ImageShape::MNIST.batch_dims(8), [8, 1, 28, 28]);
    }

    #[test]
    fn test_tile_places_images_row_major() {
        let images = vec![vec![0.1; 4], vec![0.2; 4], vec![0.3; 4]];
        let grid   = tile(&images, TINY, 2).unwrap();

        assert_eq!((grid.width, grid.height), (4, 4));
        assert_eq!(grid.get(0, 0), 0.1);
        assert_eq!(grid.get(3, 1), 0.2);
        assert_eq!(grid.get(1, 3), 0.3);
        // Unused cell in the last row stays black
        assert_eq!(grid.get(3, 3), 0.0);
    }

    #[test]
    fn test_tile_clamps_columns_to_image_count() {
        let images = vec![vec![1.0; 4]];
        let grid   = tile(&images, TINY, 8).unwrap();
        assert_eq!((grid.width, grid.height), (2, 2));
    }

    #[test]
    fn test_tile_empty() {
        let grid = tile(&[], TINY, 4).unwrap();
        assert_eq!((grid.width, grid.height), (0, 0));
        assert!(grid.pixels.is_empty());
    }

    #[test]
    fn test_tile_rejects_wrong_size() {
        let images = vec![vec![0.0; 4], vec![0.0; 3]];
        assert!(tile(&images, TINY, 2).is_err());
    }
}
