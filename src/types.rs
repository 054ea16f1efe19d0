// Core types shared by the surface, the recorder and the engine.

/// Surface-local position in pixels. Visual: (0,0) is the top-left corner of the paper.
pub use kurbo::Point;

/// Ordered points of one drag gesture; insertion order is drawing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub fn new(start: Point) -> Self {
        Self { points: vec![start] }
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Consecutive point pairs. A stroke with fewer than 2 points yields nothing,
    /// so a click without movement replays as no erasure at all.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Whether the underlying layer has been exposed. One-way until reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealState {
    #[default]
    Covered,
    Revealed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
}

/// Which pixels count as "erased" when measuring coverage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErasedPredicate {
    /// alpha < 255: any touch of the eraser counts.
    #[default]
    BelowOpaque,
    /// alpha == 0: only fully cleared pixels count.
    FullyCleared,
}

impl ErasedPredicate {
    #[inline]
    pub fn is_erased(self, alpha: u8) -> bool {
        match self {
            ErasedPredicate::BelowOpaque => alpha < u8::MAX,
            ErasedPredicate::FullyCleared => alpha == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_stroke_has_no_segments() {
        let s = Stroke::new(Point::new(3.0, 4.0));
        assert_eq!(s.len(), 1);
        assert_eq!(s.segments().count(), 0);
    }

    #[test]
    fn segments_follow_drawing_order() {
        let mut s = Stroke::new(Point::new(0.0, 0.0));
        s.push(Point::new(1.0, 0.0));
        s.push(Point::new(2.0, 1.0));
        let segs: Vec<_> = s.segments().collect();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1], (Point::new(1.0, 0.0), Point::new(2.0, 1.0)));
    }

    #[test]
    fn predicates_disagree_on_partial_alpha() {
        assert!(ErasedPredicate::BelowOpaque.is_erased(128));
        assert!(!ErasedPredicate::FullyCleared.is_erased(128));
        assert!(ErasedPredicate::FullyCleared.is_erased(0));
        assert!(!ErasedPredicate::BelowOpaque.is_erased(255));
    }
}
