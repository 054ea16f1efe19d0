// Torn-paper silhouettes: a ring of points at random distances around a center.

use crate::rng::RandomSource;
use crate::types::Point;
use std::f64::consts::TAU;

pub const DEFAULT_JAGGED_POINTS: usize = 8;

#[derive(Clone, Copy, Debug)]
pub struct JaggedEdgeGenerator {
    point_count: usize,
}

impl Default for JaggedEdgeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_JAGGED_POINTS)
    }
}

impl JaggedEdgeGenerator {
    pub fn new(point_count: usize) -> Self {
        Self { point_count }
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Closed polygon with evenly spaced angles and radii in
    /// [base_radius, 1.5 * base_radius).
    /// Visual: a ragged bite instead of a perfect circle.
    pub fn generate(
        &self,
        center: Point,
        base_radius: f64,
        rng: &mut impl RandomSource,
    ) -> Vec<Point> {
        (0..self.point_count)
            .map(|i| {
                let angle = TAU * i as f64 / self.point_count as f64;
                let radius = base_radius + rng.range(0.0, base_radius * 0.5);
                Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedSequence, XorShift32};

    #[test]
    fn radii_stay_within_bounds() {
        let generator = JaggedEdgeGenerator::default();
        let mut rng = XorShift32::from_seed(7);
        let center = Point::new(50.0, 50.0);
        for _ in 0..200 {
            let poly = generator.generate(center, 10.0, &mut rng);
            assert_eq!(poly.len(), 8);
            for pt in poly {
                let d = pt.distance(center);
                assert!((10.0 - 1e-9..15.0).contains(&d), "radius {d}");
            }
        }
    }

    #[test]
    fn zero_jitter_gives_a_regular_polygon() {
        let generator = JaggedEdgeGenerator::new(4);
        let mut rng = FixedSequence::constant(0.0);
        let poly = generator.generate(Point::new(0.0, 0.0), 2.0, &mut rng);
        assert!((poly[0].x - 2.0).abs() < 1e-9 && poly[0].y.abs() < 1e-9);
        assert!(poly[1].x.abs() < 1e-9 && (poly[1].y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn seeded_sources_repeat() {
        let generator = JaggedEdgeGenerator::new(12);
        let a = generator.generate(Point::new(5.0, 5.0), 3.0, &mut XorShift32::from_seed(9));
        let b = generator.generate(Point::new(5.0, 5.0), 3.0, &mut XorShift32::from_seed(9));
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }
}
