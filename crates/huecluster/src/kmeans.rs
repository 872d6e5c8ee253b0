use crate::grid::PixelGrid;
use crate::types::Color;
use log::info;
use rand::RngExt;
use snafu::prelude::*;

pub mod cluster;
pub mod init;
pub mod lloyds;

pub use cluster::Cluster;
pub use lloyds::{assign_points, nearest_cluster};

// Plain Lloyd's iteration with a fixed number of rounds. Seeds are drawn
// uniformly from the pixels, and nothing is done about clusters that end up
// empty: the run fails instead. See also:
// - https://en.wikipedia.org/wiki/K-means_clustering#Standard_algorithm_(naive_k-means)

pub const DEFAULT_ITERATIONS: usize = 4;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum KMeansError {
    #[snafu(display("k must be between 1 and the number of pixels ({available}), got {k}"))]
    InvalidK { k: usize, available: usize },

    #[snafu(display("cannot compute the centroid of a cluster with no pixels"))]
    EmptyCluster,

    #[snafu(display("no clusters have been fitted"))]
    NotFitted,
}

/// Clusters the pixels of a grid.
///
/// ```
/// use huecluster::{KMeans, PixelGrid, rng};
///
/// let grid = PixelGrid::from_bytes(2, 1, &[10, 20, 30, 30, 40, 50]).unwrap();
/// let mut kmeans = KMeans::new(&grid);
/// let centroids = kmeans.run(&mut rng::new(), 1).unwrap();
///
/// assert_eq!(centroids, vec![huecluster::Color::new(20.0, 30.0, 40.0)]);
/// ```
#[derive(Debug)]
pub struct KMeans<'a> {
    grid: &'a PixelGrid,
    iterations: usize,
    clusters: Vec<Cluster>,
}

impl<'a> KMeans<'a> {
    pub fn new(grid: &'a PixelGrid) -> Self {
        Self {
            grid,
            iterations: DEFAULT_ITERATIONS,
            clusters: Vec::new(),
        }
    }

    /// Sets the number of assign/update rounds per [`KMeans::fit`].
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn grid(&self) -> &'a PixelGrid {
        self.grid
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn centroids(&self) -> Vec<Color> {
        self.clusters.iter().map(Cluster::centroid).collect()
    }

    /// Replaces the cluster set with `k` clusters seeded from distinct,
    /// randomly chosen pixels. The previous set is dropped even if `k` is
    /// rejected.
    pub fn initialize(&mut self, rng: &mut impl RngExt, k: usize) -> Result<(), KMeansError> {
        self.clusters.clear();

        let pixels = self.grid.pixels();
        let seeds = init::find_initial(rng, pixels.len(), k)?;

        self.clusters = seeds
            .into_iter()
            .map(|i| Cluster::new(pixels[i].into()))
            .collect();

        Ok(())
    }

    /// Runs the configured number of rounds over the current cluster set and
    /// returns the centroids.
    ///
    /// On failure the cluster set is dropped, so a half-updated set can't be
    /// used for segmentation.
    pub fn fit(&mut self) -> Result<Vec<Color>, KMeansError> {
        ensure!(!self.clusters.is_empty(), NotFittedSnafu);

        if let Err(e) = lloyds::lloyds_loop(&mut self.clusters, self.grid.pixels(), self.iterations)
        {
            self.clusters.clear();
            return Err(e);
        }

        info!(
            "fitted {} clusters over {} pixels in {} rounds",
            self.clusters.len(),
            self.grid.len(),
            self.iterations
        );

        Ok(self.centroids())
    }

    pub fn run(&mut self, rng: &mut impl RngExt, k: usize) -> Result<Vec<Color>, KMeansError> {
        self.initialize(rng, k)?;
        self.fit()
    }

    /// Adds external points to the fitted clusters. See [`assign_points`].
    ///
    /// The points stay pending until the next [`KMeans::fit`], which discards
    /// them before its first round.
    pub fn assign_points(&mut self, points: &[rgb::RGB8]) -> Result<(), KMeansError> {
        ensure!(!self.clusters.is_empty(), NotFittedSnafu);

        assign_points(&mut self.clusters, points);
        Ok(())
    }

    pub fn nearest(&self, color: Color) -> Option<usize> {
        nearest_cluster(&self.clusters, color)
    }

    /// The grid with every pixel replaced by its nearest centroid, truncated
    /// to whole channel values. Doesn't touch the clusters.
    pub fn render_segmented_grid(&self) -> Result<PixelGrid, KMeansError> {
        ensure!(!self.clusters.is_empty(), NotFittedSnafu);

        let palette: Vec<_> = self.clusters.iter().map(|c| c.centroid().truncate()).collect();

        Ok(self.grid.map_pixels(|px| {
            // The cluster set is non-empty, so there is always a nearest one
            let i = nearest_cluster(&self.clusters, px.into()).unwrap_or_default();
            palette[i]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;
    use pretty_assertions::assert_eq;
    use rgb::RGB8;

    const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
    const WHITE: RGB8 = RGB8 {
        r: 255,
        g: 255,
        b: 255,
    };

    fn black_and_white() -> PixelGrid {
        let mut pixels = vec![BLACK; 8];
        pixels.extend([WHITE; 8]);
        PixelGrid::from_pixels(4, 4, pixels).unwrap()
    }

    fn gray_ramp() -> PixelGrid {
        let pixels = (0..100u8).map(|v| RGB8::new(v * 2, v * 2, v * 2)).collect();
        PixelGrid::from_pixels(10, 10, pixels).unwrap()
    }

    // Returns the engine fitted with the first seed that picks one black and one white pixel
    fn fitted_black_and_white(grid: &PixelGrid) -> KMeans<'_> {
        for seed in 0..64 {
            let mut kmeans = KMeans::new(grid);
            if kmeans.run(&mut rng::with_seed(seed), 2).is_ok() {
                return kmeans;
            }
        }
        panic!("no seed split the black and white pixels");
    }

    #[test]
    fn black_and_white_split() {
        let grid = black_and_white();
        let mut successes = 0;

        for seed in 0..32 {
            let mut kmeans = KMeans::new(&grid).with_iterations(1 + seed as usize % 4);
            match kmeans.run(&mut rng::with_seed(seed), 2) {
                Ok(mut centroids) => {
                    successes += 1;
                    centroids.sort_by(|a, b| a.r.total_cmp(&b.r));
                    assert_eq!(
                        centroids,
                        vec![Color::new(0.0, 0.0, 0.0), Color::new(255.0, 255.0, 255.0)]
                    );
                }
                // Both seeds had the same color, so one cluster never got a pixel
                Err(e) => assert!(matches!(e, KMeansError::EmptyCluster)),
            }
        }

        assert!(successes > 0);
    }

    #[test]
    fn single_cluster_is_the_mean() {
        let buf = [10, 0, 255, 20, 1, 0, 31, 2, 0, 40, 3, 1, 50, 4, 2, 60, 5, 3];
        let grid = PixelGrid::from_bytes(3, 2, &buf).unwrap();
        let expected = Color::new(211.0 / 6.0, 15.0 / 6.0, 261.0 / 6.0);

        for iterations in [1, 4, 9] {
            let mut kmeans = KMeans::new(&grid).with_iterations(iterations);
            let centroids = kmeans.run(&mut rng::new(), 1).unwrap();
            assert_eq!(centroids, vec![expected]);
        }
    }

    #[test]
    fn populations_cover_the_grid() {
        let grid = gray_ramp();

        for seed in 0..8 {
            let mut kmeans = KMeans::new(&grid);
            kmeans.run(&mut rng::with_seed(seed), 2).unwrap();
            let total: usize = kmeans.clusters().iter().map(Cluster::population).sum();
            assert_eq!(total, grid.len());
            assert!(kmeans.clusters().iter().all(|c| c.points().is_empty()));
        }
    }

    #[test]
    fn same_seed_same_result() {
        let grid = gray_ramp();
        let a = KMeans::new(&grid).run(&mut rng::with_seed(42), 2).unwrap();
        let b = KMeans::new(&grid).run(&mut rng::with_seed(42), 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn k_larger_than_grid() {
        let grid = black_and_white();
        let mut kmeans = KMeans::new(&grid);
        let result = kmeans.initialize(&mut rng::new(), 17);
        assert!(matches!(
            result,
            Err(KMeansError::InvalidK {
                k: 17,
                available: 16
            })
        ));
        assert!(kmeans.clusters().is_empty());
    }

    #[test]
    fn initialize_seeds_from_pixels() {
        let grid = gray_ramp();
        let mut kmeans = KMeans::new(&grid);
        kmeans.initialize(&mut rng::new(), 5).unwrap();

        assert_eq!(kmeans.clusters().len(), 5);
        for cluster in kmeans.clusters() {
            let seed = cluster.centroid().truncate();
            assert!(grid.pixels().contains(&seed));
            assert!(cluster.points().is_empty());
        }
    }

    #[test]
    fn run_replaces_previous_clusters() {
        let grid = gray_ramp();
        let mut kmeans = KMeans::new(&grid);
        kmeans.run(&mut rng::new(), 2).unwrap();
        assert_eq!(kmeans.clusters().len(), 2);

        kmeans.run(&mut rng::new(), 1).unwrap();
        assert_eq!(kmeans.clusters().len(), 1);
        assert_eq!(kmeans.clusters()[0].population(), grid.len());
    }

    #[test]
    fn failed_run_drops_clusters() {
        // Every pixel has the same color, so the second cluster is always empty
        let grid = PixelGrid::from_bytes(2, 1, &[5, 5, 5, 5, 5, 5]).unwrap();
        let mut kmeans = KMeans::new(&grid);

        let result = kmeans.run(&mut rng::new(), 2);
        assert!(matches!(result, Err(KMeansError::EmptyCluster)));
        assert!(kmeans.clusters().is_empty());
        assert!(matches!(
            kmeans.render_segmented_grid(),
            Err(KMeansError::NotFitted)
        ));
    }

    #[test]
    fn fit_needs_clusters() {
        let grid = gray_ramp();
        let mut kmeans = KMeans::new(&grid);
        assert!(matches!(kmeans.fit(), Err(KMeansError::NotFitted)));
    }

    #[test]
    fn assign_external_points() {
        let grid = black_and_white();
        let mut kmeans = fitted_black_and_white(&grid);
        let before = kmeans.centroids();

        let points = [
            RGB8::new(1, 1, 1),
            RGB8::new(250, 240, 255),
            RGB8::new(100, 100, 100),
            RGB8::new(200, 0, 0),
            RGB8::new(0, 200, 255),
            BLACK,
            WHITE,
        ];
        kmeans.assign_points(&points).unwrap();

        let assigned: usize = kmeans.clusters().iter().map(|c| c.points().len()).sum();
        assert_eq!(assigned, points.len());
        assert_eq!(kmeans.centroids(), before);
    }

    #[test]
    fn segmented_grid_matches_clusters() {
        let grid = black_and_white();
        let kmeans = fitted_black_and_white(&grid);

        let segmented = kmeans.render_segmented_grid().unwrap();
        assert_eq!(segmented, grid);
    }

    #[test]
    fn segmented_grid_truncates() {
        let grid = PixelGrid::from_bytes(2, 1, &[0, 10, 255, 1, 11, 254]).unwrap();
        let mut kmeans = KMeans::new(&grid);
        kmeans.run(&mut rng::new(), 1).unwrap();

        let segmented = kmeans.render_segmented_grid().unwrap();
        assert_eq!(segmented.pixels(), &[RGB8::new(0, 10, 254); 2]);
    }

    #[test]
    fn segmentation_is_idempotent_and_read_only() {
        let grid = gray_ramp();
        let mut kmeans = KMeans::new(&grid);
        kmeans.run(&mut rng::with_seed(3), 2).unwrap();
        let centroids = kmeans.centroids();

        let first = kmeans.render_segmented_grid().unwrap();
        let second = kmeans.render_segmented_grid().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.width(), grid.width());
        assert_eq!(first.height(), grid.height());
        assert_eq!(kmeans.centroids(), centroids);
        assert!(kmeans.clusters().iter().all(|c| c.points().is_empty()));
    }

    #[test]
    fn rejected_k_drops_previous_clusters() {
        let grid = gray_ramp();
        let mut kmeans = KMeans::new(&grid);
        kmeans.run(&mut rng::new(), 2).unwrap();

        let result = kmeans.run(&mut rng::new(), 500);
        assert!(matches!(
            result,
            Err(KMeansError::InvalidK {
                k: 500,
                available: 100
            })
        ));
        assert!(kmeans.clusters().is_empty());
        assert!(matches!(
            kmeans.render_segmented_grid(),
            Err(KMeansError::NotFitted)
        ));
    }

    #[test]
    fn assign_points_needs_clusters() {
        let grid = gray_ramp();
        let mut kmeans = KMeans::new(&grid);

        let result = kmeans.assign_points(&[BLACK, WHITE]);
        assert!(matches!(result, Err(KMeansError::NotFitted)));
    }

    #[test]
    fn fit_ignores_assigned_points() {
        let grid = gray_ramp();
        let mut kmeans = KMeans::new(&grid).with_iterations(1);
        let before = kmeans.run(&mut rng::new(), 1).unwrap();

        kmeans.assign_points(&[WHITE; 100]).unwrap();
        assert_eq!(kmeans.clusters()[0].points().len(), 100);

        let after = kmeans.fit().unwrap();
        assert_eq!(after, before);
        assert_eq!(after, vec![Color::new(99.0, 99.0, 99.0)]);
        assert_eq!(kmeans.clusters()[0].population(), grid.len());
    }

    #[test]
    fn render_before_fit() {
        let grid = gray_ramp();
        let kmeans = KMeans::new(&grid);
        assert!(matches!(
            kmeans.render_segmented_grid(),
            Err(KMeansError::NotFitted)
        ));
    }
}
