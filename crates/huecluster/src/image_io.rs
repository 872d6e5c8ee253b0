use crate::grid::{
    ImageDimensionsTooLargeSnafu, InputImageError, PixelGrid, ZeroImageSizeSnafu,
};
use image::DynamicImage;
use image::imageops::FilterType;
use log::debug;
use snafu::prelude::*;
use std::path::{Path, PathBuf};

/// Bicubic, like most image libraries use by default for resizing.
pub const DEFAULT_FILTER: FilterType = FilterType::CatmullRom;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum LoadError {
    #[snafu(display("unable to open or decode {}", path.display()))]
    UnsupportedImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[snafu(display("unable to resize {} to {size}x{size}", path.display()))]
    Resize {
        path: PathBuf,
        size: u32,
        source: InputImageError,
    },
}

/// Decodes the image at `path` and resizes it to a `size`×`size` grid.
///
/// The aspect ratio is not preserved.
pub fn load(path: &Path, size: u32) -> Result<PixelGrid, LoadError> {
    let img = image::open(path).context(UnsupportedImageSnafu { path })?;
    debug!(
        "decoded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );

    resize(&img, size).context(ResizeSnafu { path, size })
}

pub fn resize(img: &DynamicImage, size: u32) -> Result<PixelGrid, InputImageError> {
    ensure!(size > 0, ZeroImageSizeSnafu);
    // Checked up front so an oversized grid is never allocated
    ensure!(
        size <= u16::MAX as u32,
        ImageDimensionsTooLargeSnafu {
            width: size,
            height: size
        }
    );

    let resized = img.resize_exact(size, size, DEFAULT_FILTER).to_rgb8();
    PixelGrid::try_from(&resized)
}
