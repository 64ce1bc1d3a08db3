//! Luminance integral map (summed-area table).
//!
//! Built once per loaded image from a downsampled grid of WCAG relative
//! luminance values. Any rectangle's average luminance is then four table
//! lookups:
//!
//! ```text
//! sum(x0..x1, y0..y1) = S[y1][x1] − S[y0][x1] − S[y1][x0] + S[y0][x0]
//! ```
//!
//! where `S` has one extra zero row and column.

use crate::color::{FALLBACK_LUMINANCE, srgb_to_linear};
use crate::error::ImageError;
use crate::geometry::{Rect, Size};
use crate::image_source::{DecodedImage, check_rgba};
use std::sync::OnceLock;

/// Longest side of the sample grid.
pub const MAX_SAMPLE_DIM: u32 = 256;

static SRGB_TO_LINEAR_LUT: OnceLock<[f64; 256]> = OnceLock::new();

fn linear_lut() -> &'static [f64; 256] {
    SRGB_TO_LINEAR_LUT.get_or_init(|| std::array::from_fn(|i| srgb_to_linear(i as f64 / 255.0)))
}

fn pixel_luminance(px: &[u8]) -> f64 {
    let lut = linear_lut();
    0.2126 * lut[px[0] as usize] + 0.7152 * lut[px[1] as usize] + 0.0722 * lut[px[2] as usize]
}

#[derive(Debug, Clone)]
pub struct LuminanceMap {
    /// Source image size in pixels.
    image: Size,
    cols: usize,
    rows: usize,
    /// `(rows + 1) × (cols + 1)` prefix sums, row-major.
    table: Vec<f64>,
}

impl LuminanceMap {
    pub fn from_image(image: &DecodedImage) -> Result<Self, ImageError> {
        Self::from_rgba(image.info.width, image.info.height, &image.rgba)
    }

    /// Build the map from an RGBA8 buffer.
    pub fn from_rgba(width: u32, height: u32, pixels: &[u8]) -> Result<Self, ImageError> {
        check_rgba(width, height, pixels)?;

        let longest = width.max(height);
        let factor = if longest > MAX_SAMPLE_DIM {
            MAX_SAMPLE_DIM as f64 / longest as f64
        } else {
            1.0
        };
        let cols = ((width as f64 * factor).round() as usize).max(1);
        let rows = ((height as f64 * factor).round() as usize).max(1);
        let stride = cols + 1;
        let mut table = vec![0.0; stride * (rows + 1)];

        for r in 0..rows {
            let py = (((r as f64 + 0.5) * height as f64 / rows as f64) as u32).min(height - 1);
            let mut row_sum = 0.0;
            for c in 0..cols {
                let px = (((c as f64 + 0.5) * width as f64 / cols as f64) as u32).min(width - 1);
                let offset = (py as usize * width as usize + px as usize) * 4;
                row_sum += pixel_luminance(&pixels[offset..offset + 4]);
                table[(r + 1) * stride + c + 1] = table[r * stride + c + 1] + row_sum;
            }
        }

        log::debug!("luminance map {cols}x{rows} for {width}x{height} image");
        Ok(Self {
            image: Size::new(width as f64, height as f64),
            cols,
            rows,
            table,
        })
    }

    /// Sample grid dimensions `(cols, rows)`.
    pub fn grid(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn at(&self, col: usize, row: usize) -> f64 {
        self.table[row * (self.cols + 1) + col]
    }

    /// Sum over sample cells `[c0, c1) × [r0, r1)`.
    fn cell_sum(&self, c0: usize, r0: usize, c1: usize, r1: usize) -> f64 {
        self.at(c1, r1) - self.at(c1, r0) - self.at(c0, r1) + self.at(c0, r0)
    }

    /// Average luminance (0..1) of an image-space rectangle, in O(1).
    ///
    /// The rect is clamped to the image and always covers at least one
    /// sample cell. Returns [`FALLBACK_LUMINANCE`] if the rect lies entirely
    /// outside the image.
    pub fn average(&self, rect: &Rect) -> f64 {
        let r = rect.normalized();
        if r.right() < 0.0
            || r.bottom() < 0.0
            || r.x > self.image.width
            || r.y > self.image.height
        {
            return FALLBACK_LUMINANCE;
        }
        let r = r.clamp_within(self.image);

        let (c0, c1) = cell_span(r.x, r.right(), self.image.width, self.cols);
        let (r0, r1) = cell_span(r.y, r.bottom(), self.image.height, self.rows);
        let count = ((c1 - c0) * (r1 - r0)) as f64;
        (self.cell_sum(c0, r0, c1, r1) / count).clamp(0.0, 1.0)
    }
}

/// Map a pixel interval onto a non-empty half-open range of sample cells.
fn cell_span(start: f64, end: f64, extent: f64, cells: usize) -> (usize, usize) {
    let scale = cells as f64 / extent;
    let mut lo = ((start * scale).floor().max(0.0) as usize).min(cells);
    let hi = ((end * scale).ceil().max(0.0) as usize).min(cells);
    let hi = if hi <= lo {
        if lo == cells {
            lo = cells - 1;
        }
        lo + 1
    } else {
        hi
    };
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half black, right half white.
    fn split_image(width: u32, height: u32) -> Vec<u8> {
        let mut px = Vec::with_capacity((width * height * 4) as usize);
        for _y in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 0 } else { 255 };
                px.extend_from_slice(&[v, v, v, 255]);
            }
        }
        px
    }

    #[test]
    fn averages_match_halves() {
        let map = LuminanceMap::from_rgba(100, 50, &split_image(100, 50)).unwrap();
        assert!(map.average(&Rect::new(0.0, 0.0, 50.0, 50.0)).abs() < 1e-9);
        assert!(
            (map.average(&Rect::new(50.0, 0.0, 50.0, 50.0)) - 1.0).abs() < 1e-9
        );
        assert!(
            (map.average(&Rect::new(0.0, 0.0, 100.0, 50.0)) - 0.5).abs() < 1e-9
        );
    }

    #[test]
    fn large_images_are_downsampled() {
        let map = LuminanceMap::from_rgba(1024, 512, &split_image(1024, 512)).unwrap();
        assert_eq!(map.grid(), (256, 128));
        assert!(
            (map.average(&Rect::new(0.0, 0.0, 1024.0, 512.0)) - 0.5).abs() < 1e-9
        );
        assert!(
            (map.average(&Rect::new(600.0, 100.0, 200.0, 200.0)) - 1.0).abs() < 1e-9
        );
    }

    #[test]
    fn degenerate_and_outside_rects() {
        let map = LuminanceMap::from_rgba(100, 50, &split_image(100, 50)).unwrap();
        // Zero-area rect still samples one cell.
        assert!(
            (map.average(&Rect::new(75.0, 10.0, 0.0, 0.0)) - 1.0).abs() < 1e-9
        );
        // Right edge of the image.
        assert!(
            (map.average(&Rect::new(100.0, 50.0, 0.0, 0.0)) - 1.0).abs() < 1e-9
        );
        assert_eq!(
            map.average(&Rect::new(500.0, 10.0, 5.0, 5.0)),
            FALLBACK_LUMINANCE
        );
    }

    #[test]
    fn repeated_queries_are_identical() {
        let map = LuminanceMap::from_rgba(64, 64, &split_image(64, 64)).unwrap();
        let rect = Rect::new(20.0, 5.0, 30.0, 40.0);
        let first = map.average(&rect);
        assert_eq!(map.average(&rect), first);
    }

    #[test]
    fn rejects_bad_buffers() {
        assert!(LuminanceMap::from_rgba(10, 10, &[0; 12]).is_err());
    }
}
