use crate::grid::PixelGrid;
use crate::types::Color;
use image::{Rgb, RgbImage};
use rgb::RGB8;

pub const SWATCH_SIZE: u32 = 200;

#[inline]
fn to_pixel(px: RGB8) -> Rgb<u8> {
    Rgb([px.r, px.g, px.b])
}

pub fn to_image(grid: &PixelGrid) -> RgbImage {
    let width = grid.width() as u32;
    let pixels = grid.pixels();
    RgbImage::from_fn(width, grid.height() as u32, |x, y| {
        to_pixel(pixels[(y * width + x) as usize])
    })
}

/// A solid `size`×`size` square of `color`, channels truncated.
pub fn swatch(color: Color, size: u32) -> RgbImage {
    RgbImage::from_pixel(size, size, to_pixel(color.truncate()))
}

/// Original on the left, a column of centroid swatches in the middle, and the
/// segmented grid on the right.
pub fn comparison(original: &PixelGrid, centroids: &[Color], segmented: &PixelGrid) -> RgbImage {
    let w = original.width() as u32;
    let out_h = original.height() as u32;
    let swatch_w = if centroids.is_empty() { 0 } else { (w * 2 / 10).max(1) };
    let out_w = w + swatch_w + segmented.width() as u32;
    let mut out = RgbImage::new(out_w, out_h.max(segmented.height() as u32));

    // left: original
    for (y, row) in original.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, to_pixel(px));
        }
    }

    // centre: centroid swatches
    if !centroids.is_empty() {
        let num_centroids = centroids.len() as u32;
        let swatch_h = out_h / num_centroids;

        for (i, &centroid) in centroids.iter().enumerate() {
            let pixel = to_pixel(centroid.truncate());
            let y_start = i as u32 * swatch_h;
            let y_end = if i as u32 == num_centroids - 1 {
                out_h
            } else {
                y_start + swatch_h
            };
            for y in y_start..y_end {
                for x in w..(w + swatch_w) {
                    out.put_pixel(x, y, pixel);
                }
            }
        }
    }

    // right: segmented
    let seg_x = w + swatch_w;
    for (y, row) in segmented.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            out.put_pixel(seg_x + x as u32, y as u32, to_pixel(px));
        }
    }

    out
}
