use super::{Cluster, KMeansError};
use crate::types::Color;
use log::{debug, warn};
use rgb::RGB8;

/// Index of the cluster whose centroid is closest to `color`.
///
/// Ties go to the earliest cluster. `None` only for an empty cluster set.
#[inline]
pub fn nearest_cluster(clusters: &[Cluster], color: Color) -> Option<usize> {
    let mut min = f64::INFINITY;
    let mut min_idx = None;
    for (i, cluster) in clusters.iter().enumerate() {
        let d = cluster.centroid().distance(color);
        if d < min {
            min = d;
            min_idx = Some(i);
        }
    }
    min_idx
}

/// Adds every point to its nearest cluster. Centroids don't move.
pub fn assign_points(clusters: &mut [Cluster], points: &[RGB8]) {
    for &point in points {
        if let Some(i) = nearest_cluster(clusters, point.into()) {
            clusters[i].add_point(point);
        }
    }
}

pub fn update_centroids(clusters: &mut [Cluster], round: usize) -> Result<(), KMeansError> {
    for (i, cluster) in clusters.iter_mut().enumerate() {
        let assigned = cluster.points().len();
        cluster
            .compute_centroid()
            .inspect_err(|_| warn!("cluster {i} received no pixels in round {round}"))?;
        debug!("round {round}: cluster {i} <- {assigned} pixels");
    }
    Ok(())
}

/// Runs exactly `iterations` assign/update rounds. There is no convergence
/// check. Points pending in the clusters beforehand are discarded.
pub fn lloyds_loop(
    clusters: &mut [Cluster],
    pixels: &[RGB8],
    iterations: usize,
) -> Result<(), KMeansError> {
    for cluster in clusters.iter_mut() {
        cluster.clear_points();
    }

    for round in 0..iterations {
        assign_points(clusters, pixels);
        update_centroids(clusters, round)?;
    }
    Ok(())
}
