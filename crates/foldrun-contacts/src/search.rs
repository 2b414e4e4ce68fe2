//! Uniform-grid neighbour search over a fixed point set.

use std::collections::HashMap;

type Cell = (i64, i64, i64);

/// Buckets points into cubic cells so a radius query only has to look at
/// the cells overlapping the query sphere.
pub struct NeighborGrid {
    cell_size: f64,
    points: Vec<[f64; 3]>,
    cells: HashMap<Cell, Vec<usize>>,
}

impl NeighborGrid {
    /// `cell_size` should be close to the typical query radius.
    pub fn new(points: Vec<[f64; 3]>, cell_size: f64) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
        let mut cells: HashMap<Cell, Vec<usize>> = HashMap::new();
        for (i, p) in points.iter().enumerate() {
            cells.entry(cell_of(p, cell_size)).or_default().push(i);
        }
        Self { cell_size, points, cells }
    }

    /// Indices and distances of all points within `radius` (inclusive) of `center`.
    pub fn within(&self, center: &[f64; 3], radius: f64) -> Vec<(usize, f64)> {
        let reach = (radius / self.cell_size).ceil() as i64;
        let (cx, cy, cz) = cell_of(center, self.cell_size);
        let mut hits = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    let Some(bucket) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &i in bucket {
                        let d = distance(center, &self.points[i]);
                        if d <= radius {
                            hits.push((i, d));
                        }
                    }
                }
            }
        }
        hits
    }
}

fn cell_of(p: &[f64; 3], size: f64) -> Cell {
    (
        (p[0] / size).floor() as i64,
        (p[1] / size).floor() as i64,
        (p[2] / size).floor() as i64,
    )
}

pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let (dx, dy, dz) = (a[0] - b[0], a[1] - b[1], a[2] - b[2]);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_brute_force() {
        let points: Vec<[f64; 3]> = (0..200)
            .map(|i| {
                let f = i as f64;
                [(f * 0.37).sin() * 10.0, (f * 0.11).cos() * 10.0, (f * 0.23).sin() * 10.0]
            })
            .collect();
        let grid = NeighborGrid::new(points.clone(), 4.5);
        let center = [1.0, -2.0, 0.5];

        let mut from_grid: Vec<usize> = grid.within(&center, 4.5).into_iter().map(|(i, _)| i).collect();
        from_grid.sort();
        let brute: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| distance(&center, p) <= 4.5)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(from_grid, brute);
    }

    #[test]
    fn test_radius_is_inclusive() {
        let grid = NeighborGrid::new(vec![[3.0, 0.0, 0.0]], 1.0);
        assert_eq!(grid.within(&[0.0, 0.0, 0.0], 3.0).len(), 1);
        assert!(grid.within(&[0.0, 0.0, 0.0], 2.999).is_empty());
    }

    #[test]
    fn test_negative_coordinates() {
        let grid = NeighborGrid::new(vec![[-0.5, -0.5, -0.5]], 4.5);
        let hits = grid.within(&[0.5, 0.5, 0.5], 2.0);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].1 - 3f64.sqrt()).abs() < 1e-9);
    }
}
