pub mod grid;
#[cfg(feature = "image")]
pub mod image_io;
pub mod kmeans;
#[cfg(feature = "image")]
pub mod render;
pub mod rng;
mod types;

pub use grid::{InputImageError, PixelGrid};
pub use kmeans::{Cluster, DEFAULT_ITERATIONS, KMeans, KMeansError};
pub use rgb::RGB8;
pub use types::Color;

/// Side of the square the input image is resized to.
pub const DEFAULT_SIZE: u32 = 200;
pub const DEFAULT_K: usize = 3;

/// Tuning knobs for a whole quantization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Side of the square the image is resized to before clustering.
    pub size: u32,
    pub k: usize,
    /// Number of assign/update rounds. There is no early stopping.
    pub iterations: usize,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            k: DEFAULT_K,
            iterations: DEFAULT_ITERATIONS,
            seed: rng::RANDOM_SEED,
        }
    }
}

/// Quantize a grid down to `k` representative colors.
///
/// ```
/// let grid = huecluster::PixelGrid::from_bytes(2, 2,
///   &[255, 0, 0, 255, 0, 0,
///     255, 0, 0, 255, 0, 0]
/// ).unwrap();
///
/// let output = huecluster::colors(&grid, 1).unwrap();
///
/// let red = rgb::Rgb { r: 255, g: 0, b: 0 };
/// assert_eq!(vec![red], output)
/// ```
///
/// Centroids are returned in cluster order and truncated to whole channel
/// values. Fails if `k` is zero or larger than the number of pixels, or if a
/// cluster loses all of its pixels during the run; in the latter case retrying
/// with another seed or a smaller `k` usually helps.
///
/// See also [`colors_extra`] for the same function with more tuning parameters
/// and [`colors_extra_debug`] for the exact centroids.
pub fn colors(grid: &PixelGrid, k: usize) -> Result<Vec<RGB8>, KMeansError> {
    colors_extra(grid, k, DEFAULT_ITERATIONS, rng::RANDOM_SEED)
}

pub fn colors_extra(
    grid: &PixelGrid,
    k: usize,
    iterations: usize,
    seed: u64,
) -> Result<Vec<RGB8>, KMeansError> {
    Ok(colors_extra_debug(grid, k, iterations, seed)?.0)
}

#[derive(Debug)]
pub struct DebugInfo {
    pub centroids: Vec<Color>,
    /// Pixels per cluster in the last round.
    pub populations: Vec<usize>,
}

pub fn colors_extra_debug(
    grid: &PixelGrid,
    k: usize,
    iterations: usize,
    seed: u64,
) -> Result<(Vec<RGB8>, DebugInfo), KMeansError> {
    let mut rng = rng::with_seed(seed);
    let mut kmeans = KMeans::new(grid).with_iterations(iterations);
    let centroids = kmeans.run(&mut rng, k)?;

    let result = centroids.iter().map(|c| c.truncate()).collect();
    let populations = kmeans.clusters().iter().map(Cluster::population).collect();

    Ok((
        result,
        DebugInfo {
            centroids,
            populations,
        },
    ))
}

#[derive(Debug)]
pub struct Segmentation {
    pub centroids: Vec<Color>,
    /// The input grid with every pixel replaced by its nearest centroid.
    pub segmented: PixelGrid,
}

/// Clusters `grid` with `config` and renders the colour map in one go.
/// `config.size` is ignored here; the grid is used as is.
pub fn segment(grid: &PixelGrid, config: &Config) -> Result<Segmentation, KMeansError> {
    let mut rng = rng::with_seed(config.seed);
    let mut kmeans = KMeans::new(grid).with_iterations(config.iterations);
    let centroids = kmeans.run(&mut rng, config.k)?;
    let segmented = kmeans.render_segmented_grid()?;

    Ok(Segmentation {
        centroids,
        segmented,
    })
}
