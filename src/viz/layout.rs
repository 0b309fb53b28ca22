//! Seeded force-directed layout
//!
//! Pairwise inverse-square repulsion, spring attraction along edges, a weak
//! pull toward the centre. Positions live in a 1000×1000 box and are returned
//! rescaled to the unit square.

use commgraph_algorithms::GraphView;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BOX: f64 = 1000.0;
const REPULSION: f64 = 5000.0;
const SPRING_LENGTH: f64 = 50.0;
const SPRING: f64 = 0.05;
const MAX_STEP: f64 = 10.0;
const GRAVITY: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Lay out every node of `view`; coordinates fall in [0, 1]
pub fn force_layout(view: &GraphView, iterations: usize, seed: u64) -> Vec<Point> {
    let n = view.node_count;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions: Vec<Point> = (0..n)
        .map(|_| Point {
            x: rng.gen_range(100.0..900.0),
            y: rng.gen_range(100.0..900.0),
        })
        .collect();

    let centre = BOX / 2.0;
    let mut forces = vec![Point::default(); n];
    for _ in 0..iterations {
        forces.iter_mut().for_each(|f| *f = Point::default());

        for i in 0..n {
            for j in (i + 1)..n {
                let dx = positions[i].x - positions[j].x;
                let dy = positions[i].y - positions[j].y;
                let dist_sq = dx * dx + dy * dy + 0.1;
                let force = REPULSION / dist_sq;
                forces[i].x += dx * force;
                forces[i].y += dy * force;
                forces[j].x -= dx * force;
                forces[j].y -= dy * force;
            }
        }

        for u in 0..n {
            for &v in view.neighbors(u) {
                // Each undirected edge appears twice
                if v <= u {
                    continue;
                }
                let dx = positions[v].x - positions[u].x;
                let dy = positions[v].y - positions[u].y;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
                let force = (dist - SPRING_LENGTH) * SPRING;
                let fx = dx / dist * force;
                let fy = dy / dist * force;
                forces[u].x += fx;
                forces[u].y += fy;
                forces[v].x -= fx;
                forces[v].y -= fy;
            }
        }

        for (p, f) in positions.iter_mut().zip(&forces) {
            p.x += f.x.clamp(-MAX_STEP, MAX_STEP);
            p.y += f.y.clamp(-MAX_STEP, MAX_STEP);
            p.x += (centre - p.x) * GRAVITY;
            p.y += (centre - p.y) * GRAVITY;
        }
    }

    normalize(&positions)
}

/// Rescale to the unit square, preserving aspect ratio
fn normalize(points: &[Point]) -> Vec<Point> {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    let span = (max_x - min_x).max(max_y - min_y);
    if !(span > 0.0) {
        return vec![Point { x: 0.5, y: 0.5 }; points.len()];
    }
    let off_x = (span - (max_x - min_x)) / 2.0;
    let off_y = (span - (max_y - min_y)) / 2.0;

    points
        .iter()
        .map(|p| Point {
            x: (p.x - min_x + off_x) / span,
            y: (p.y - min_y + off_y) / span,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> GraphView {
        GraphView::from_undirected_edges(&[(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4), (3, 4)])
    }

    #[test]
    fn test_layout_is_seeded() {
        let view = two_triangles();
        let a = force_layout(&view, 30, 7);
        let b = force_layout(&view, 30, 7);
        assert_eq!(a, b);
        assert_ne!(a, force_layout(&view, 30, 8));
    }

    #[test]
    fn test_layout_fits_unit_square() {
        let view = two_triangles();
        for p in force_layout(&view, 50, 1) {
            assert!(p.x >= -1e-9 && p.x <= 1.0 + 1e-9);
            assert!(p.y >= -1e-9 && p.y <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_single_node_is_centred() {
        let view = GraphView::from_undirected_edges(&[(1, 1)]);
        assert_eq!(force_layout(&view, 10, 0), vec![Point { x: 0.5, y: 0.5 }]);
    }
}
