//! # 1-bit Bitmaps
//!
//! A [`Bitmap`] is the dithered, printer-ready form of an image or a
//! rasterized QR code: one `bool` per dot, row-major, `true` = black.
//!
//! It knows how to lay itself out for every graphics command family:
//!
//! - [`Bitmap::to_raster`] packs rows MSB-left for `GS v 0` and `GS ( L`
//! - [`Bitmap::column_stripes`] packs 8- or 24-dot stripes for `ESC *`
//! - [`Bitmap::fragments`] slices tall images so no single command grows
//!   past the printer's buffer

use super::dither::pack_row;

/// One-bit-per-dot image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    dots: Vec<bool>,
}

impl Bitmap {
    /// All-white bitmap
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![false; width * height],
        }
    }

    /// Build from row-major dots. Missing dots are white, extra dots dropped.
    pub fn from_dots(width: usize, height: usize, mut dots: Vec<bool>) -> Self {
        dots.resize(width * height, false);
        Self { width, height, dots }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per packed raster row
    pub fn width_bytes(&self) -> usize {
        self.width.div_ceil(8)
    }

    pub fn pixels(&self) -> &[bool] {
        &self.dots
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.dots[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, dot: bool) {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x] = dot;
        }
    }

    pub fn row(&self, y: usize) -> &[bool] {
        &self.dots[y * self.width..(y + 1) * self.width]
    }

    /// Packed rows, `width_bytes() * height()` bytes.
    ///
    /// ```
    /// use recibo::render::bitmap::Bitmap;
    ///
    /// let bitmap = Bitmap::from_dots(4, 2, vec![true, true, false, false, false, false, true, true]);
    /// assert_eq!(bitmap.to_raster(), vec![0xC0, 0x30]);
    /// ```
    pub fn to_raster(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.width_bytes() * self.height);
        for y in 0..self.height {
            data.extend(pack_row(self.row(y)));
        }
        data
    }

    /// Place this bitmap horizontally centered on a `width`-dot canvas.
    ///
    /// Bitmaps already at least `width` wide are returned unchanged.
    pub fn centered(&self, width: usize) -> Bitmap {
        if self.width >= width {
            return self.clone();
        }
        let offset = (width - self.width) / 2;
        let mut out = Bitmap::blank(width, self.height);
        for y in 0..self.height {
            let start = y * width + offset;
            out.dots[start..start + self.width].copy_from_slice(self.row(y));
        }
        out
    }

    /// Slice into horizontal bands of at most `max_height` rows.
    ///
    /// A zero `max_height` yields the whole bitmap as one band.
    pub fn fragments(&self, max_height: usize) -> Vec<Bitmap> {
        if max_height == 0 || self.height <= max_height {
            return vec![self.clone()];
        }
        (0..self.height)
            .step_by(max_height)
            .map(|top| {
                let rows = max_height.min(self.height - top);
                let start = top * self.width;
                Bitmap {
                    width: self.width,
                    height: rows,
                    dots: self.dots[start..start + rows * self.width].to_vec(),
                }
            })
            .collect()
    }

    /// Column-major stripes for `ESC *`.
    ///
    /// Each stripe is `stripe_height` dots tall (24 when
    /// `high_density_vertical`, otherwise 8) and holds `width()` columns of
    /// 3 or 1 bytes, MSB at the top. The last stripe is padded with white.
    pub fn column_stripes(&self, high_density_vertical: bool) -> Vec<Vec<u8>> {
        let stripe_height = if high_density_vertical { 24 } else { 8 };
        let bytes_per_column = stripe_height / 8;

        (0..self.height)
            .step_by(stripe_height)
            .map(|top| {
                let mut stripe = Vec::with_capacity(self.width * bytes_per_column);
                for x in 0..self.width {
                    for b in 0..bytes_per_column {
                        let mut byte = 0u8;
                        for bit in 0..8 {
                            if self.get(x, top + b * 8 + bit) {
                                byte |= 0x80 >> bit;
                            }
                        }
                        stripe.push(byte);
                    }
                }
                stripe
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: usize, height: usize) -> Bitmap {
        let dots = (0..width * height)
            .map(|i| (i % width + i / width) % 2 == 0)
            .collect();
        Bitmap::from_dots(width, height, dots)
    }

    #[test]
    fn test_from_dots_pads_and_truncates() {
        let short = Bitmap::from_dots(4, 2, vec![true]);
        assert_eq!(short.pixels().len(), 8);
        assert!(short.get(0, 0));
        assert!(!short.get(1, 0));

        let long = Bitmap::from_dots(2, 1, vec![true; 10]);
        assert_eq!(long.pixels().len(), 2);
    }

    #[test]
    fn test_get_out_of_bounds_is_white() {
        let bitmap = Bitmap::from_dots(2, 2, vec![true; 4]);
        assert!(!bitmap.get(2, 0));
        assert!(!bitmap.get(0, 2));
    }

    #[test]
    fn test_to_raster_pads_rows() {
        let bitmap = Bitmap::from_dots(10, 1, vec![true; 10]);
        assert_eq!(bitmap.width_bytes(), 2);
        assert_eq!(bitmap.to_raster(), vec![0xFF, 0xC0]);
    }

    #[test]
    fn test_centered() {
        let bitmap = Bitmap::from_dots(2, 1, vec![true, true]);
        let wide = bitmap.centered(8);
        assert_eq!(wide.width(), 8);
        assert_eq!(wide.to_raster(), vec![0b0001_1000]);

        let same = bitmap.centered(1);
        assert_eq!(same, bitmap);
    }

    #[test]
    fn test_fragments() {
        let bitmap = checker(8, 10);
        let parts = bitmap.fragments(4);
        let heights: Vec<usize> = parts.iter().map(Bitmap::height).collect();
        assert_eq!(heights, vec![4, 4, 2]);

        let rejoined: Vec<bool> = parts.iter().flat_map(|p| p.pixels().to_vec()).collect();
        assert_eq!(rejoined, bitmap.pixels());

        assert_eq!(bitmap.fragments(100).len(), 1);
    }

    #[test]
    fn test_column_stripes_8_dot() {
        // Single black column, 8 rows
        let bitmap = Bitmap::from_dots(1, 8, vec![true; 8]);
        assert_eq!(bitmap.column_stripes(false), vec![vec![0xFF]]);

        // Top dot only
        let mut top = Bitmap::blank(2, 3);
        top.set(1, 0, true);
        assert_eq!(top.column_stripes(false), vec![vec![0x00, 0x80]]);
    }

    #[test]
    fn test_column_stripes_24_dot() {
        let bitmap = Bitmap::from_dots(2, 30, vec![true; 60]);
        let stripes = bitmap.column_stripes(true);
        assert_eq!(stripes.len(), 2);
        assert_eq!(stripes[0], vec![0xFF; 6]);
        // Rows 24..30 present, rest padded white
        assert_eq!(stripes[1], vec![0xFC, 0x00, 0x00, 0xFC, 0x00, 0x00]);
    }
}
