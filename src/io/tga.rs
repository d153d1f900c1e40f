//! Grayscale bitmaps in Truevision TGA format.
//!
//! Only uncompressed 8-bit grayscale images are accepted. Pixel values are
//! mapped to `[0, 1]`, and row 0 is the bottom row of the image so that
//! pixel coordinates line up with texture coordinates.

use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::error::{Result, SpinError};

const HEADER_LEN: usize = 18;
const UNCOMPRESSED_GRAYSCALE: u8 = 3;

/// A grayscale image with values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<f64>,
}

impl Bitmap {
    /// Load a bitmap from a TGA file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spinxform::io::tga::Bitmap;
    ///
    /// let bitmap = Bitmap::load("bumpy.tga").unwrap();
    /// println!("{}x{}", bitmap.width(), bitmap.height());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| SpinError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_bytes(&bytes, path)
    }

    /// Decode a TGA image held in memory. `path` is only used in errors.
    pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self> {
        let unsupported = |message: String| SpinError::UnsupportedImage {
            path: path.to_path_buf(),
            message,
        };

        if bytes.len() < HEADER_LEN {
            return Err(unsupported(format!(
                "truncated header ({} bytes)",
                bytes.len()
            )));
        }
        let data_type = bytes[2];
        let bits_per_pixel = bytes[16];
        if data_type != UNCOMPRESSED_GRAYSCALE || bits_per_pixel != 8 {
            return Err(unsupported(format!(
                "expected uncompressed 8-bit grayscale, got type {} with {} bits per pixel",
                data_type, bits_per_pixel
            )));
        }
        let width = u16::from_le_bytes([bytes[12], bytes[13]]) as usize;
        let height = u16::from_le_bytes([bytes[14], bytes[15]]) as usize;
        if width == 0 || height == 0 {
            return Err(unsupported(format!("empty image ({}x{})", width, height)));
        }

        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Tga)
            .map_err(|e| unsupported(e.to_string()))?
            .into_luma8();

        // The decoder returns rows top to bottom.
        let raw = decoded.as_raw();
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = height - 1 - y;
            pixels.extend(
                raw[row * width..(row + 1) * width]
                    .iter()
                    .map(|&v| v as f64 / 255.0),
            );
        }

        log::debug!("loaded {}x{} bitmap from {}", width, height, path.display());
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a bitmap from values stored row by row, bottom row first.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<f64>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SpinError::UnsupportedImage {
                path: PathBuf::new(),
                message: format!("empty image ({}x{})", width, height),
            });
        }
        if pixels.len() != width * height {
            return Err(SpinError::dimension("pixels", width * height, pixels.len()));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Value of pixel `(x, y)`, with `y = 0` the bottom row.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.pixels[x + y * self.width]
    }

    /// Bilinearly interpolated value at `(x, y)` in pixel units.
    ///
    /// Lookups outside the image are clamped to the nearest edge pixel.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (fx, fy) = (x.floor(), y.floor());
        let (ax, ay) = (x - fx, y - fy);
        let (bx, by) = (1.0 - ax, 1.0 - ay);

        let x0 = clamp(fx as i64, self.width);
        let y0 = clamp(fy as i64, self.height);
        let x1 = clamp(fx as i64 + 1, self.width);
        let y1 = clamp(fy as i64 + 1, self.height);

        by * (bx * self.get(x0, y0) + ax * self.get(x1, y0))
            + ay * (bx * self.get(x0, y1) + ax * self.get(x1, y1))
    }
}

fn clamp(i: i64, len: usize) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tga(width: u16, height: u16, descriptor: u8, data: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[2] = UNCOMPRESSED_GRAYSCALE;
        bytes[12..14].copy_from_slice(&width.to_le_bytes());
        bytes[14..16].copy_from_slice(&height.to_le_bytes());
        bytes[16] = 8;
        bytes[17] = descriptor;
        bytes.extend_from_slice(data);
        bytes
    }

    #[test]
    fn test_bottom_row_first() {
        // Default TGA origin is the lower-left corner
        let bytes = tga(2, 2, 0x00, &[0, 255, 51, 102]);
        let bitmap = Bitmap::from_bytes(&bytes, Path::new("test.tga")).unwrap();

        assert_eq!(bitmap.width(), 2);
        assert_eq!(bitmap.height(), 2);
        assert_eq!(bitmap.get(0, 0), 0.0);
        assert_eq!(bitmap.get(1, 0), 1.0);
        assert!((bitmap.get(0, 1) - 0.2).abs() < 1e-12);
        assert!((bitmap.get(1, 1) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_top_left_origin_matches() {
        let bottom_up = tga(2, 2, 0x00, &[0, 255, 51, 102]);
        let top_down = tga(2, 2, 0x20, &[51, 102, 0, 255]);
        let a = Bitmap::from_bytes(&bottom_up, Path::new("a.tga")).unwrap();
        let b = Bitmap::from_bytes(&top_down, Path::new("b.tga")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_color_images() {
        let mut bytes = tga(1, 1, 0, &[0, 0, 0]);
        bytes[2] = 2;
        bytes[16] = 24;
        let result = Bitmap::from_bytes(&bytes, Path::new("rgb.tga"));
        assert!(matches!(result, Err(SpinError::UnsupportedImage { .. })));
    }

    #[test]
    fn test_rejects_wrong_depth_and_truncation() {
        let mut bytes = tga(1, 1, 0, &[0, 0]);
        bytes[16] = 16;
        assert!(matches!(
            Bitmap::from_bytes(&bytes, Path::new("gray16.tga")),
            Err(SpinError::UnsupportedImage { .. })
        ));
        assert!(matches!(
            Bitmap::from_bytes(&[0, 0, 3], Path::new("short.tga")),
            Err(SpinError::UnsupportedImage { .. })
        ));
    }

    #[test]
    fn test_sample_bilinear_and_clamped() {
        let bitmap = Bitmap::from_pixels(2, 2, vec![0.0, 1.0, 0.5, 0.5]).unwrap();

        assert_eq!(bitmap.sample(0.0, 0.0), 0.0);
        assert!((bitmap.sample(0.5, 0.0) - 0.5).abs() < 1e-12);
        assert!((bitmap.sample(0.5, 0.5) - 0.5).abs() < 1e-12);
        assert!((bitmap.sample(0.25, 0.0) - 0.25).abs() < 1e-12);

        // Outside the image
        assert_eq!(bitmap.sample(-3.0, -3.0), 0.0);
        assert_eq!(bitmap.sample(10.0, -1.0), 1.0);
        assert_eq!(bitmap.sample(10.0, 10.0), 0.5);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(matches!(
            Bitmap::from_pixels(2, 2, vec![0.0; 3]),
            Err(SpinError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.tga");
        std::fs::write(&path, tga(3, 1, 0, &[0, 51, 255])).unwrap();

        let bitmap = Bitmap::load(&path).unwrap();
        assert!((bitmap.get(1, 0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        match Bitmap::load(dir.path().join("bumpy.tga")) {
            Err(e @ SpinError::LoadError { .. }) => assert!(e.to_string().contains("bumpy.tga")),
            other => panic!("expected LoadError, got {:?}", other),
        }
    }
}
