// The tearable paper: one alpha byte per pixel, 255 = fully covered, 0 = torn away.
// Visual: wherever alpha drops, the underlying layer shows through.

use crate::types::{ErasedPredicate, Point};
use image::{GrayImage, Luma};
use kurbo::Rect;

/// Alpha-only raster with destination-out erasing.
///
/// Alpha never increases between resets. The number of pixels matching the
/// erased predicate is tracked as pixels flip, so coverage sampling is O(1)
/// and each erase costs only the pixels under the brush.
#[derive(Clone, Debug)]
pub struct RasterSurface {
    width: usize,
    height: usize,
    alpha: Vec<u8>, // length = width * height
    predicate: ErasedPredicate,
    strength: u8, // brush opacity for destination-out; 255 clears to 0
    erased: usize,
}

impl RasterSurface {
    /// Fully opaque surface that clears pixels completely and counts alpha < 255 as erased.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_options(width, height, ErasedPredicate::default(), u8::MAX)
    }

    pub fn with_options(
        width: usize,
        height: usize,
        predicate: ErasedPredicate,
        strength: u8,
    ) -> Self {
        Self {
            width,
            height,
            alpha: vec![u8::MAX; width * height],
            predicate,
            strength,
            erased: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    pub fn alpha_at(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.alpha[y * self.width + x])
    }

    pub fn erased_pixels(&self) -> usize {
        self.erased
    }

    pub fn predicate(&self) -> ErasedPredicate {
        self.predicate
    }

    /// True when `p` lies in [0,width) x [0,height).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.width as f64 && p.y < self.height as f64
    }

    /// Pull `p` back onto the surface. In-bounds points are returned unchanged.
    pub fn clamp(&self, p: Point) -> Point {
        if self.contains(p) {
            return p;
        }
        let max_x = self.width.saturating_sub(1) as f64;
        let max_y = self.height.saturating_sub(1) as f64;
        let x = if p.x.is_finite() { p.x.clamp(0.0, max_x) } else { 0.0 };
        let y = if p.y.is_finite() { p.y.clamp(0.0, max_y) } else { 0.0 };
        Point::new(x, y)
    }

    /// Reallocate for new dimensions, fully opaque. Returns false (and keeps
    /// the current pixels) when the size did not change.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.alpha = vec![u8::MAX; width * height];
        self.erased = 0;
        true
    }

    /// Back to fully opaque everywhere.
    pub fn reset(&mut self) {
        self.alpha.fill(u8::MAX);
        self.erased = 0;
    }

    /// Fraction of pixels that count as erased, in [0,1]. Zero-area surfaces report 0.
    pub fn sample_coverage(&self) -> f64 {
        let total = self.pixel_count();
        if total == 0 {
            return 0.0;
        }
        self.erased as f64 / total as f64
    }

    /// Destination-out one pixel. Alpha only ever goes down to `floor`.
    #[inline]
    fn erase_pixel(&mut self, idx: usize, floor: u8) {
        let a = self.alpha[idx];
        if a <= floor {
            return; // already at least this transparent
        }
        let was_erased = self.predicate.is_erased(a);
        self.alpha[idx] = floor;
        if !was_erased && self.predicate.is_erased(floor) {
            self.erased += 1;
        }
    }

    /// Pixel index range whose centers (i + 0.5) may fall inside [lo, hi].
    fn span(lo: f64, hi: f64, len: usize) -> (usize, usize) {
        let start = (lo - 0.5).ceil().max(0.0);
        let end = ((hi - 0.5).floor() + 1.0).clamp(0.0, len as f64);
        (start as usize, (end as usize).max(start as usize))
    }

    /// Round-capped line segment of the given width.
    /// Visual: a soft-cornered band of paper disappears between the two points.
    pub fn erase_stroke(&mut self, from: Point, to: Point, width: f64) {
        if !(width > 0.0 && width.is_finite()) || self.pixel_count() == 0 {
            return;
        }
        let r = width / 2.0;
        let r2 = r * r;
        let bounds = Rect::from_points(from, to).inflate(r, r);
        let (x0, x1) = Self::span(bounds.x0, bounds.x1, self.width);
        let (y0, y1) = Self::span(bounds.y0, bounds.y1, self.height);

        let floor = u8::MAX - self.strength;
        let ab = to - from;
        let len2 = ab.hypot2();
        for y in y0..y1 {
            for x in x0..x1 {
                let c = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                // Distance from the pixel center to the closest point on the segment
                let t = if len2 > 0.0 { ((c - from).dot(ab) / len2).clamp(0.0, 1.0) } else { 0.0 };
                let nearest = from + ab * t;
                if (c - nearest).hypot2() <= r2 {
                    self.erase_pixel(y * self.width + x, floor);
                }
            }
        }
    }

    /// Fill a closed polygon (even-odd, pixel centers) with full erase,
    /// whatever the brush strength.
    /// Visual: the ragged torn-paper bite around a stroke sample.
    pub fn erase_polygon(&mut self, points: &[Point]) {
        if points.len() < 3 || self.pixel_count() == 0 {
            return;
        }
        let mut bounds = Rect::from_points(points[0], points[0]);
        for &p in &points[1..] {
            bounds = bounds.union_pt(p);
        }
        let (y0, y1) = Self::span(bounds.y0, bounds.y1, self.height);

        let mut crossings: Vec<f64> = Vec::with_capacity(points.len());
        for y in y0..y1 {
            let cy = y as f64 + 0.5;
            crossings.clear();
            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                // Half-open rule so shared vertices are not counted twice
                if (a.y <= cy && b.y > cy) || (b.y <= cy && a.y > cy) {
                    let t = (cy - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for pair in crossings.chunks_exact(2) {
                // Centers in [xa, xb)
                let start = (pair[0] - 0.5).ceil().clamp(0.0, self.width as f64) as usize;
                let end = (pair[1] - 0.5).ceil().clamp(0.0, self.width as f64) as usize;
                for x in start..end {
                    self.erase_pixel(y * self.width + x, 0);
                }
            }
        }
    }

    /// The alpha channel as a grayscale image (white = still covered).
    pub fn to_mask_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Luma([self.alpha[y as usize * self.width + x as usize]])
        })
    }

    #[cfg(test)]
    fn rescan_erased(&self) -> usize {
        self.alpha.iter().filter(|&&a| self.predicate.is_erased(a)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn fresh_surface_is_opaque() {
        let s = RasterSurface::new(10, 8);
        assert!(s.alpha().iter().all(|&a| a == 255));
        assert_eq!(s.sample_coverage(), 0.0);
    }

    #[test]
    fn horizontal_stroke_erases_a_band() {
        let mut s = RasterSurface::new(100, 100);
        s.erase_stroke(p(0.0, 50.0), p(99.0, 50.0), 20.0);
        let cov = s.sample_coverage();
        assert!(cov > 0.19 && cov < 0.23, "coverage {cov}");
        assert_eq!(s.alpha_at(50, 50), Some(0));
        assert_eq!(s.alpha_at(50, 10), Some(255));
        assert_eq!(s.erased_pixels(), s.rescan_erased());
    }

    #[test]
    fn zero_length_segment_is_a_round_dab() {
        let mut s = RasterSurface::new(40, 40);
        s.erase_stroke(p(20.0, 20.0), p(20.0, 20.0), 10.0);
        assert_eq!(s.alpha_at(20, 20), Some(0));
        assert_eq!(s.alpha_at(20, 30), Some(255));
        // about pi * 5^2
        assert!((70..=90).contains(&s.erased_pixels()));
    }

    #[test]
    fn erasing_twice_changes_nothing() {
        let mut s = RasterSurface::new(50, 50);
        s.erase_stroke(p(5.0, 5.0), p(40.0, 30.0), 6.0);
        let before = s.alpha().to_vec();
        let count = s.erased_pixels();
        s.erase_stroke(p(5.0, 5.0), p(40.0, 30.0), 6.0);
        assert_eq!(s.alpha(), &before[..]);
        assert_eq!(s.erased_pixels(), count);
    }

    #[test]
    fn stroke_outside_surface_is_clipped() {
        let mut s = RasterSurface::new(20, 20);
        s.erase_stroke(p(-50.0, -50.0), p(-40.0, -40.0), 4.0);
        assert_eq!(s.erased_pixels(), 0);
        s.erase_stroke(p(-10.0, 10.0), p(30.0, 10.0), 2.0);
        assert_eq!(s.erased_pixels(), s.rescan_erased());
        assert!(s.erased_pixels() >= 20);
    }

    #[test]
    fn non_positive_width_is_ignored() {
        let mut s = RasterSurface::new(20, 20);
        s.erase_stroke(p(0.0, 0.0), p(19.0, 19.0), 0.0);
        s.erase_stroke(p(0.0, 0.0), p(19.0, 19.0), f64::NAN);
        assert_eq!(s.sample_coverage(), 0.0);
    }

    #[test]
    fn polygon_fills_its_interior() {
        let mut s = RasterSurface::new(20, 20);
        s.erase_polygon(&[p(2.0, 2.0), p(12.0, 2.0), p(12.0, 12.0), p(2.0, 12.0)]);
        assert_eq!(s.erased_pixels(), 100);
        assert_eq!(s.alpha_at(2, 2), Some(0));
        assert_eq!(s.alpha_at(11, 11), Some(0));
        assert_eq!(s.alpha_at(12, 12), Some(255));
    }

    #[test]
    fn degenerate_polygon_is_ignored() {
        let mut s = RasterSurface::new(20, 20);
        s.erase_polygon(&[p(2.0, 2.0), p(12.0, 2.0)]);
        assert_eq!(s.erased_pixels(), 0);
    }

    #[test]
    fn full_erase_reports_full_coverage() {
        let mut s = RasterSurface::new(16, 9);
        s.erase_polygon(&[p(-1.0, -1.0), p(17.0, -1.0), p(17.0, 10.0), p(-1.0, 10.0)]);
        assert_eq!(s.sample_coverage(), 1.0);
        assert!(s.alpha().iter().all(|&a| a == 0));
    }

    #[test]
    fn partial_strength_depends_on_predicate() {
        let mut soft = RasterSurface::with_options(30, 30, ErasedPredicate::BelowOpaque, 128);
        let mut strict = RasterSurface::with_options(30, 30, ErasedPredicate::FullyCleared, 128);
        soft.erase_stroke(p(0.0, 15.0), p(29.0, 15.0), 6.0);
        strict.erase_stroke(p(0.0, 15.0), p(29.0, 15.0), 6.0);
        assert_eq!(soft.alpha_at(15, 15), Some(127));
        assert!(soft.sample_coverage() > 0.0);
        assert_eq!(strict.sample_coverage(), 0.0);
    }

    #[test]
    fn polygon_clears_fully_under_a_soft_brush() {
        let mut s = RasterSurface::with_options(20, 20, ErasedPredicate::FullyCleared, 200);
        s.erase_stroke(p(0.0, 5.0), p(19.0, 5.0), 4.0);
        assert_eq!(s.alpha_at(10, 5), Some(55));
        assert_eq!(s.erased_pixels(), 0);
        s.erase_polygon(&[p(2.0, 2.0), p(12.0, 2.0), p(12.0, 12.0), p(2.0, 12.0)]);
        assert_eq!(s.alpha_at(10, 5), Some(0));
        assert_eq!(s.alpha_at(3, 11), Some(0));
        assert_eq!(s.erased_pixels(), 100);
        assert_eq!(s.erased_pixels(), s.rescan_erased());
    }

    #[test]
    fn alpha_never_increases() {
        let mut s = RasterSurface::with_options(40, 40, ErasedPredicate::BelowOpaque, 100);
        let mut prev = s.alpha().to_vec();
        for i in 0..10 {
            let f = i as f64 * 4.0;
            s.erase_stroke(p(f, 0.0), p(39.0 - f, 39.0), 5.0);
            s.erase_polygon(&[p(f, f), p(f + 8.0, f), p(f + 4.0, f + 8.0)]);
            for (a, b) in s.alpha().iter().zip(&prev) {
                assert!(a <= b);
            }
            prev = s.alpha().to_vec();
        }
        assert_eq!(s.erased_pixels(), s.rescan_erased());
    }

    #[test]
    fn resize_to_same_size_keeps_pixels() {
        let mut s = RasterSurface::new(20, 20);
        s.erase_stroke(p(0.0, 10.0), p(19.0, 10.0), 4.0);
        let cov = s.sample_coverage();
        assert!(!s.resize(20, 20));
        assert_eq!(s.sample_coverage(), cov);
        assert!(s.resize(30, 10));
        assert_eq!(s.pixel_count(), 300);
        assert_eq!(s.sample_coverage(), 0.0);
    }

    #[test]
    fn zero_area_surface_is_inert() {
        let mut s = RasterSurface::new(0, 0);
        s.erase_stroke(p(0.0, 0.0), p(5.0, 5.0), 3.0);
        s.erase_polygon(&[p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)]);
        assert_eq!(s.sample_coverage(), 0.0);
        assert!(!s.contains(p(0.0, 0.0)));
    }

    #[test]
    fn clamp_only_moves_outside_points() {
        let s = RasterSurface::new(100, 50);
        assert_eq!(s.clamp(p(99.5, 10.0)), p(99.5, 10.0));
        assert_eq!(s.clamp(p(-3.0, 70.0)), p(0.0, 49.0));
        assert_eq!(s.clamp(p(f64::NAN, 5.0)), p(0.0, 5.0));
    }

    #[test]
    fn reset_restores_opacity() {
        let mut s = RasterSurface::new(10, 10);
        s.erase_stroke(p(0.0, 5.0), p(9.0, 5.0), 4.0);
        s.reset();
        assert!(s.alpha().iter().all(|&a| a == 255));
        assert_eq!(s.erased_pixels(), 0);
    }

    #[test]
    fn mask_image_mirrors_alpha() {
        let mut s = RasterSurface::new(8, 4);
        s.erase_stroke(p(4.0, 2.0), p(4.0, 2.0), 2.0);
        let img = s.to_mask_image();
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(img.get_pixel(4, 2)[0], s.alpha_at(4, 2).unwrap());
        assert_eq!(img.get_pixel(0, 0)[0], 255);
    }
}
