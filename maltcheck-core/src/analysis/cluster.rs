use std::collections::VecDeque;

use glam::Vec2;

const UNVISITED: i32 = -2;
const NOISE: i32 = -1;

/// Density-based spatial clustering (DBSCAN) over 2D points.
///
/// Groups points whose neighborhoods (radius `eps`) chain together, which
/// recovers printed text blocks from token positions: words on the same line
/// or in the same paragraph sit within `eps` of a neighbor, while tokens in a
/// different corner of the label do not.
///
/// Pure function: no state is retained between calls. Returns one assignment
/// per input point — `Some(cluster_id)` with ids numbered from zero in
/// discovery order, or `None` for noise points that have fewer than
/// `min_points` neighbors and are not reachable from any core point.
///
/// # Example
/// ```
/// use glam::Vec2;
/// use maltcheck_core::analysis::cluster::dbscan;
///
/// let points = [
///     Vec2::new(0.0, 0.0),
///     Vec2::new(10.0, 0.0),
///     Vec2::new(500.0, 500.0),
/// ];
/// let assignments = dbscan(&points, 50.0, 1);
/// assert_eq!(assignments[0], assignments[1]);
/// assert_ne!(assignments[0], assignments[2]);
/// ```
pub fn dbscan(points: &[Vec2], eps: f32, min_points: usize) -> Vec<Option<usize>> {
    let mut labels = vec![UNVISITED; points.len()];
    let mut next_cluster: i32 = 0;

    for idx in 0..points.len() {
        if labels[idx] != UNVISITED {
            continue;
        }

        let neighbors = region_query(points, idx, eps);
        if neighbors.len() < min_points {
            labels[idx] = NOISE;
            continue;
        }

        let cluster = next_cluster;
        next_cluster += 1;
        labels[idx] = cluster;

        // Expand the cluster breadth-first from the seed's neighborhood.
        let mut queue: VecDeque<usize> = neighbors.into();
        while let Some(neighbor) = queue.pop_front() {
            if labels[neighbor] == NOISE {
                // Border point: reachable but not itself a core point.
                labels[neighbor] = cluster;
            }
            if labels[neighbor] != UNVISITED {
                continue;
            }
            labels[neighbor] = cluster;

            let expansion = region_query(points, neighbor, eps);
            if expansion.len() >= min_points {
                queue.extend(expansion);
            }
        }
    }

    labels
        .into_iter()
        .map(|label| (label >= 0).then_some(label as usize))
        .collect()
}

/// Convenience wrapper over [`dbscan`] that groups point indices per cluster,
/// dropping noise. Clusters are ordered by discovery (roughly input order).
pub fn clusters(points: &[Vec2], eps: f32, min_points: usize) -> Vec<Vec<usize>> {
    let assignments = dbscan(points, eps, min_points);
    let cluster_count = assignments
        .iter()
        .filter_map(|a| *a)
        .max()
        .map_or(0, |max| max + 1);

    let mut grouped = vec![Vec::new(); cluster_count];
    for (idx, assignment) in assignments.into_iter().enumerate() {
        if let Some(cluster) = assignment {
            grouped[cluster].push(idx);
        }
    }

    grouped
}

fn region_query(points: &[Vec2], idx: usize, eps: f32) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| points[idx].distance(**point) <= eps)
        .map(|(i, _)| i)
        .collect()
}
