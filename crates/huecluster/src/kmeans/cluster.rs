use super::{EmptyClusterSnafu, KMeansError};
use crate::types::Color;
use rgb::RGB8;
use snafu::prelude::*;

/// A centroid plus the pixels assigned to it since the last update.
#[derive(Debug, Clone)]
pub struct Cluster {
    centroid: Color,
    points: Vec<RGB8>,
    population: usize,
}

impl Cluster {
    pub fn new(centroid: Color) -> Self {
        Self {
            centroid,
            points: Vec::new(),
            population: 0,
        }
    }

    pub fn centroid(&self) -> Color {
        self.centroid
    }

    /// Pixels assigned since the last [`Cluster::compute_centroid`].
    pub fn points(&self) -> &[RGB8] {
        &self.points
    }

    /// How many pixels the current centroid was computed from. Zero for a
    /// freshly seeded cluster.
    pub fn population(&self) -> usize {
        self.population
    }

    #[inline]
    pub fn add_point(&mut self, pixel: RGB8) {
        self.points.push(pixel);
    }

    /// Drops the pending points without touching the centroid.
    pub fn clear_points(&mut self) {
        self.points.clear();
    }

    /// Moves the centroid to the mean of the assigned pixels and clears them.
    pub fn compute_centroid(&mut self) -> Result<Color, KMeansError> {
        ensure!(!self.points.is_empty(), EmptyClusterSnafu);

        let mut sums = [0u64; 3];
        for px in &self.points {
            sums[0] += px.r as u64;
            sums[1] += px.g as u64;
            sums[2] += px.b as u64;
        }

        let n = self.points.len() as f64;
        self.centroid = Color::new(sums[0] as f64 / n, sums[1] as f64 / n, sums[2] as f64 / n);
        self.population = self.points.len();
        self.points.clear();

        Ok(self.centroid)
    }
}
