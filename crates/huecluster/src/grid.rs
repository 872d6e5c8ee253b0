use rgb::RGB8;
use snafu::prelude::*;
#[cfg(feature = "image")]
use std::ops::Deref;

const U16_MAX: u16 = u16::MAX;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum InputImageError {
    #[snafu(display("grid width and height must be positive"))]
    ZeroImageSize,

    #[snafu(display("buffer length {len} is not a multiple of 3"))]
    InvalidBufferLength { len: usize },

    #[snafu(display("no pixels: the buffer is empty"))]
    EmptyBuffer,

    #[snafu(display("a {width}x{height} grid needs {expected} pixels, got {count}"))]
    PixelCountMismatch {
        width: u16,
        height: u16,
        expected: usize,
        count: usize,
    },

    #[snafu(display(
        "image dimensions are too large, max image size is {U16_MAX}x{U16_MAX}, \
        got {width}x{height}"
    ))]
    ImageDimensionsTooLarge { width: u32, height: u32 },
}

/// A fixed-size, row-major grid of sRGB pixels.
///
/// The grid is the read-only input of the clustering engine, and the
/// segmented output has the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u16,
    height: u16,
    pixels: Vec<RGB8>,
}

impl PixelGrid {
    /// Builds a grid from an `RGBRGBRGB…` byte buffer.
    pub fn from_bytes(width: u16, height: u16, buf: &[u8]) -> Result<Self, InputImageError> {
        ensure!(
            buf.len().is_multiple_of(3),
            InvalidBufferLengthSnafu { len: buf.len() }
        );

        let pixels = buf
            .chunks_exact(3)
            .map(|px| RGB8::new(px[0], px[1], px[2]))
            .collect();

        Self::from_pixels(width, height, pixels)
    }

    pub fn from_pixels(
        width: u16,
        height: u16,
        pixels: Vec<RGB8>,
    ) -> Result<Self, InputImageError> {
        ensure!(!pixels.is_empty(), EmptyBufferSnafu);
        ensure!(width > 0 && height > 0, ZeroImageSizeSnafu);
        let expected = width as usize * height as usize;
        ensure!(
            pixels.len() == expected,
            PixelCountMismatchSnafu {
                width,
                height,
                expected,
                count: pixels.len()
            }
        );

        Ok(PixelGrid {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of pixels. Never zero.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[RGB8] {
        &self.pixels
    }

    pub fn get(&self, x: u16, y: u16) -> Option<RGB8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[RGB8]> {
        self.pixels.chunks_exact(self.width as usize)
    }

    /// A grid of the same shape with every pixel replaced by `f(pixel)`.
    pub fn map_pixels(&self, f: impl FnMut(RGB8) -> RGB8) -> PixelGrid {
        PixelGrid {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().copied().map(f).collect(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| [px.r, px.g, px.b]).collect()
    }
}

#[cfg(feature = "image")]
impl<Container> TryFrom<&image::ImageBuffer<image::Rgb<u8>, Container>> for PixelGrid
where
    Container: Deref<Target = [<image::Rgb<u8> as image::Pixel>::Subpixel]>,
{
    type Error = InputImageError;

    fn try_from(img: &image::ImageBuffer<image::Rgb<u8>, Container>) -> Result<Self, Self::Error> {
        let too_large = || {
            ImageDimensionsTooLargeSnafu {
                width: img.width(),
                height: img.height(),
            }
            .build()
        };
        let width = u16::try_from(img.width()).map_err(|_| too_large())?;
        let height = u16::try_from(img.height()).map_err(|_| too_large())?;
        Self::from_bytes(width, height, img.as_raw().deref())
    }
}
