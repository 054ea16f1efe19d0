// Records the pointer path of the current drag, and keeps finished drags
// around so a resized surface can be torn again the same way.

use crate::types::{Point, Stroke};

#[derive(Clone, Debug, Default)]
pub struct StrokeRecorder {
    active: Option<Stroke>,
    history: Vec<Stroke>,
    retain_history: bool,
}

impl StrokeRecorder {
    pub fn new(retain_history: bool) -> Self {
        Self { active: None, history: Vec::new(), retain_history }
    }

    /// Start a new stroke at `point`, replacing any unfinished one.
    pub fn begin(&mut self, point: Point) {
        self.active = Some(Stroke::new(point));
    }

    /// Append to the active stroke. Nothing happens between gestures.
    pub fn extend(&mut self, point: Point) {
        if let Some(stroke) = &mut self.active {
            stroke.push(point);
        }
    }

    /// Last point of the active stroke, i.e. where the next segment starts.
    pub fn last_point(&self) -> Option<Point> {
        self.active.as_ref().and_then(Stroke::last)
    }

    /// The stroke being drawn right now, if any.
    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Close the active stroke and file it into history. `None` if nothing was active.
    pub fn end(&mut self) -> Option<Stroke> {
        let stroke = self.active.take()?;
        self.record(stroke.clone());
        Some(stroke)
    }

    /// File a stroke that was not drawn through begin/extend (e.g. a scripted one).
    pub fn record(&mut self, stroke: Stroke) {
        if self.retain_history && !stroke.is_empty() {
            self.history.push(stroke);
        }
    }

    pub fn history(&self) -> &[Stroke] {
        &self.history
    }

    /// Forget every stroke, finished or not.
    pub fn clear(&mut self) {
        self.active = None;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn begin_extend_end_round_trip() {
        let mut rec = StrokeRecorder::new(true);
        rec.begin(p(1.0, 1.0));
        rec.extend(p(2.0, 2.0));
        assert_eq!(rec.last_point(), Some(p(2.0, 2.0)));
        let stroke = rec.end().unwrap();
        assert_eq!(stroke.points(), &[p(1.0, 1.0), p(2.0, 2.0)]);
        assert!(!rec.is_active());
        assert_eq!(rec.history(), &[stroke]);
    }

    #[test]
    fn extend_and_end_without_begin_are_noops() {
        let mut rec = StrokeRecorder::new(true);
        rec.extend(p(5.0, 5.0));
        assert!(rec.end().is_none());
        assert!(rec.history().is_empty());
    }

    #[test]
    fn history_keeps_insertion_order() {
        let mut rec = StrokeRecorder::new(true);
        for i in 0..3 {
            rec.begin(p(i as f64, 0.0));
            rec.end();
        }
        let starts: Vec<f64> = rec.history().iter().map(|s| s.points()[0].x).collect();
        assert_eq!(starts, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn no_history_when_not_retained() {
        let mut rec = StrokeRecorder::new(false);
        rec.begin(p(0.0, 0.0));
        rec.extend(p(3.0, 0.0));
        assert!(rec.end().is_some());
        assert!(rec.history().is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut rec = StrokeRecorder::new(true);
        rec.begin(p(0.0, 0.0));
        rec.end();
        rec.begin(p(1.0, 1.0));
        rec.clear();
        assert!(rec.history().is_empty());
        assert!(!rec.is_active());
    }
}
