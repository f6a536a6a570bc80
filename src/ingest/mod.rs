//! # Sample Ingestion
//!
//! Turns the two supported heightmap sources into one canonical [`HeightField`]:
//!
//! - **Raster images** of any format the `image` crate decodes. Each pixel is
//!   reduced to its luminance in `[0, 1]`.
//! - **Raw `.bsq` grids**: consecutive little-endian `f32` samples whose count
//!   must be a perfect square.
//!
//! Reading and decoding files off the render thread is handled by the
//! [`Loader`](loader::Loader).

pub mod loader;

pub use loader::{LoadOutcome, LoadRequest, LoadedField, Loader};

use crate::error::{HeightviewError, Result};

/// File suffix that selects the raw float path (matched case-insensitively).
pub const RAW_FLOAT_SUFFIX: &str = ".bsq";

/// Rec. 709 luma weights applied to R, G and B.
const LUMINANCE_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Which ingestion path a file takes, decided from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Raw little-endian `f32` grid
    RawFloat,
    /// Raster image reduced to luminance
    Image,
}

impl SourceKind {
    pub fn from_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(RAW_FLOAT_SUFFIX) {
            SourceKind::RawFloat
        } else {
            SourceKind::Image
        }
    }
}

/// A row-major grid of scalar heights.
///
/// Immutable once constructed. `value_range` is `None` for sources that are
/// already normalized to `[0, 1]` (images).
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    samples: Vec<f32>,
    rows: usize,
    cols: usize,
    value_range: Option<[f32; 2]>,
}

impl HeightField {
    /// Wraps already-laid-out samples.
    ///
    /// # Panics
    /// Panics if `samples.len() != rows * cols`.
    pub fn new(samples: Vec<f32>, rows: usize, cols: usize, value_range: Option<[f32; 2]>) -> Self {
        assert_eq!(
            samples.len(),
            rows * cols,
            "height field of {rows}x{cols} needs {} samples",
            rows * cols
        );
        Self {
            samples,
            rows,
            cols,
            value_range,
        }
    }

    /// Builds a field from tightly packed RGBA8 pixels.
    ///
    /// Rows follow the image's vertical axis, columns its horizontal axis.
    ///
    /// # Panics
    /// Panics if `pixels` does not hold exactly `width * height` RGBA pixels.
    pub fn from_rgba(pixels: &[u8], width: u32, height: u32) -> Self {
        let (cols, rows) = (width as usize, height as usize);
        assert_eq!(pixels.len(), rows * cols * 4, "expected {cols}x{rows} RGBA pixels");

        let samples = pixels
            .chunks_exact(4)
            .map(|px| luminance(px[0], px[1], px[2]))
            .collect();

        Self::new(samples, rows, cols, None)
    }

    pub fn from_image(image: &image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(rgba.as_raw(), width, height)
    }

    /// Interprets `bytes` as a square grid of little-endian `f32` samples.
    ///
    /// The value range is measured in a single pass over the samples.
    pub fn from_raw_float_buffer(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(HeightviewError::MisalignedBuffer { bytes: bytes.len() });
        }

        let samples: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        let side = exact_square_root(samples.len()).ok_or(HeightviewError::InvalidDimensions {
            count: samples.len(),
        })?;
        let range = value_range(&samples);

        log::debug!(
            "raw field {side}x{side}, range [{}, {}]",
            range[0],
            range[1]
        );

        Ok(Self::new(samples, side, side, Some(range)))
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn value_range(&self) -> Option<[f32; 2]> {
        self.value_range
    }

    pub fn sample(&self, row: usize, col: usize) -> f32 {
        self.samples[row * self.cols + col]
    }
}

/// Decodes a named file's bytes along the path its name selects.
pub fn decode(name: &str, bytes: &[u8]) -> Result<HeightField> {
    match SourceKind::from_name(name) {
        SourceKind::RawFloat => HeightField::from_raw_float_buffer(bytes),
        SourceKind::Image => {
            let image = image::load_from_memory(bytes)?;
            Ok(HeightField::from_image(&image))
        }
    }
}

fn luminance(r: u8, g: u8, b: u8) -> f32 {
    let [wr, wg, wb] = LUMINANCE_WEIGHTS;
    (wr * r as f32 + wg * g as f32 + wb * b as f32) / 255.0
}

/// `[min, max]` over all samples. Min and max are tracked independently so a
/// new minimum never hides a new maximum. NaN and infinite samples are
/// skipped.
fn value_range(samples: &[f32]) -> [f32; 2] {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &s in samples.iter().filter(|s| s.is_finite()) {
        if s < min {
            min = s;
        }
        if s > max {
            max = s;
        }
    }
    [min, max]
}

/// Side length of a non-empty square grid of `count` cells.
fn exact_square_root(count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let side = (count as f64).sqrt().round() as usize;
    (side * side == count).then_some(side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raw_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_raw_rejects_non_square_count() {
        let bytes = raw_bytes(&[0.0; 15]);
        let err = HeightField::from_raw_float_buffer(&bytes).unwrap_err();
        assert!(matches!(err, HeightviewError::InvalidDimensions { count: 15 }));
        assert!(err.to_string().contains("Float32 size of 15"));
    }

    #[test]
    fn test_raw_accepts_square_count() {
        let bytes = raw_bytes(&[0.5; 16]);
        let field = HeightField::from_raw_float_buffer(&bytes).unwrap();
        assert_eq!(field.rows(), 4);
        assert_eq!(field.cols(), 4);
        assert_eq!(field.samples().len(), 16);
    }

    #[test]
    fn test_raw_range_ascending() {
        let values: Vec<f32> = (0..16).map(|v| v as f32).collect();
        let field = HeightField::from_raw_float_buffer(&raw_bytes(&values)).unwrap();
        assert_eq!(field.value_range(), Some([0.0, 15.0]));
    }

    #[test]
    fn test_raw_range_tracks_min_and_max_independently() {
        // The first sample is both the running min and max; a descending
        // sequence keeps producing new minimums.
        let values: Vec<f32> = (0..16).rev().map(|v| v as f32 - 4.0).collect();
        let field = HeightField::from_raw_float_buffer(&raw_bytes(&values)).unwrap();
        assert_eq!(field.value_range(), Some([-4.0, 11.0]));
    }

    #[test]
    fn test_raw_single_sample() {
        let field = HeightField::from_raw_float_buffer(&raw_bytes(&[3.0])).unwrap();
        assert_eq!((field.rows(), field.cols()), (1, 1));
        assert_eq!(field.value_range(), Some([3.0, 3.0]));
    }

    #[test]
    fn test_raw_range_skips_non_finite() {
        let values = [f32::NAN, 2.0, f32::INFINITY, -1.0];
        let field = HeightField::from_raw_float_buffer(&raw_bytes(&values)).unwrap();
        assert_eq!(field.value_range(), Some([-1.0, 2.0]));
    }

    #[test]
    fn test_raw_rejects_empty_and_misaligned() {
        assert!(matches!(
            HeightField::from_raw_float_buffer(&[]),
            Err(HeightviewError::InvalidDimensions { count: 0 })
        ));
        assert!(matches!(
            HeightField::from_raw_float_buffer(&[0u8; 10]),
            Err(HeightviewError::MisalignedBuffer { bytes: 10 })
        ));
    }

    #[test]
    fn test_raw_is_little_endian_row_major() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let field = HeightField::from_raw_float_buffer(&raw_bytes(&values)).unwrap();
        assert_eq!(field.sample(0, 1), 2.0);
        assert_eq!(field.sample(1, 0), 3.0);
    }

    #[test]
    fn test_rgba_luminance() {
        // 2 wide, 1 tall: white then pure green
        let pixels = [255, 255, 255, 255, 0, 255, 0, 255];
        let field = HeightField::from_rgba(&pixels, 2, 1);
        assert_eq!((field.rows(), field.cols()), (1, 2));
        assert_eq!(field.value_range(), None);
        assert_relative_eq!(field.sample(0, 0), 1.0, epsilon = 1e-5);
        assert_relative_eq!(field.sample(0, 1), 0.7152, epsilon = 1e-5);
    }

    #[test]
    fn test_rgba_rows_follow_image_height() {
        let pixels = vec![0u8; 3 * 2 * 4];
        let field = HeightField::from_rgba(&pixels, 3, 2);
        assert_eq!(field.rows(), 2);
        assert_eq!(field.cols(), 3);
    }

    #[test]
    fn test_source_kind_suffix_is_case_insensitive() {
        assert_eq!(SourceKind::from_name("dem.bsq"), SourceKind::RawFloat);
        assert_eq!(SourceKind::from_name("DEM.BSQ"), SourceKind::RawFloat);
        assert_eq!(SourceKind::from_name("crater.png"), SourceKind::Image);
        assert_eq!(SourceKind::from_name("bsq"), SourceKind::Image);
    }

    #[test]
    fn test_decode_reports_bad_image() {
        let err = decode("broken.png", b"not an image").unwrap_err();
        assert!(matches!(err, HeightviewError::Decode(_)));
    }

    #[test]
    fn test_decode_png() {
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        let mut png = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();

        let field = decode("tile.PNG", png.get_ref()).unwrap();
        assert_eq!((field.rows(), field.cols()), (2, 2));
        assert_relative_eq!(field.sample(1, 1), 1.0, epsilon = 1e-5);
        assert_eq!(field.sample(0, 0), 0.0);
    }
}
