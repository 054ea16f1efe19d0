// Scripted tear: an outward spiral from the center, fed to the engine one
// step at a time. The sequencer only produces geometry and delays; whoever
// owns the clock decides when each step actually runs.

use crate::config::AutoTearConfig;
use crate::types::Point;
use std::f64::consts::TAU;
use std::time::Duration;

/// One spiral sample and how long to wait after the previous one before feeding it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoTearStep {
    pub point: Point,
    pub delay: Duration,
}

#[derive(Clone, Debug)]
pub struct AutoTearSequencer {
    center: Point,
    max_radius: f64, // radius reached at progress 1.0
    turns: f64,
    step_delay: Duration,
}

impl AutoTearSequencer {
    pub fn new(width: usize, height: usize, config: &AutoTearConfig) -> Self {
        Self {
            center: Point::new(width as f64 / 2.0, height as f64 / 2.0),
            max_radius: width.min(height) as f64 * config.radius_factor,
            turns: config.turns,
            step_delay: config.step_delay,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Spiral position for `step` of `step_count`.
    /// Visual: starts at the center and winds outward `turns` times.
    pub fn point_at(&self, step: usize, step_count: usize) -> Point {
        if step_count == 0 {
            return self.center;
        }
        let progress = step as f64 / step_count as f64;
        let angle = progress * TAU * self.turns;
        let radius = progress * self.max_radius;
        Point::new(
            self.center.x + radius * angle.cos(),
            self.center.y + radius * angle.sin(),
        )
    }

    /// All steps in order. The first runs immediately, the rest after `step_delay` each.
    pub fn steps(&self, step_count: usize) -> impl Iterator<Item = AutoTearStep> + '_ {
        (0..step_count).map(move |step| AutoTearStep {
            point: self.point_at(step, step_count),
            delay: if step == 0 { Duration::ZERO } else { self.step_delay },
        })
    }

    /// Feed every step to `on_step` back to back, ignoring the delays.
    pub fn run(&self, step_count: usize, mut on_step: impl FnMut(Point)) {
        for step in self.steps(step_count) {
            on_step(step.point);
        }
    }
}

/// What a playback tick asks the engine to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AutoTearEvent {
    /// Tear up to spiral step `n`. The point is resolved by the engine
    /// against the paper's size at that moment.
    Step(usize),
    /// All steps delivered; force the reveal.
    Finish,
}

/// Frame-driven cursor over the step schedule: call `advance` with the
/// time since the last frame and apply whatever became due.
#[derive(Clone, Debug)]
pub struct AutoTearPlayback {
    step_count: usize,
    step_delay: Duration,
    next: usize,
    elapsed: Duration,
    finished: bool,
}

impl AutoTearPlayback {
    pub fn new(step_count: usize, step_delay: Duration) -> Self {
        Self { step_count, step_delay, next: 0, elapsed: Duration::ZERO, finished: false }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Instant (from playback start) at which item `k` is due; `k == step_count` is the finish.
    fn due_at(&self, k: usize) -> Duration {
        self.step_delay * k as u32
    }

    pub fn advance(&mut self, dt: Duration) -> Vec<AutoTearEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }
        self.elapsed += dt;
        while self.next < self.step_count && self.elapsed >= self.due_at(self.next) {
            events.push(AutoTearEvent::Step(self.next));
            self.next += 1;
        }
        if self.next == self.step_count && self.elapsed >= self.due_at(self.step_count) {
            events.push(AutoTearEvent::Finish);
            self.finished = true;
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer() -> AutoTearSequencer {
        AutoTearSequencer::new(200, 100, &AutoTearConfig::default())
    }

    #[test]
    fn spiral_starts_at_center_and_grows() {
        let seq = sequencer();
        assert_eq!(seq.point_at(0, 30), Point::new(100.0, 50.0));
        let mut last = 0.0;
        for step in 1..30 {
            let r = seq.point_at(step, 30).distance(seq.center());
            assert!(r > last);
            assert!(r <= 100.0 * 0.4 + 1e-9);
            last = r;
        }
    }

    #[test]
    fn half_way_is_a_full_turn_for_two_turns() {
        let seq = sequencer();
        let p = seq.point_at(15, 30);
        // progress 0.5 -> angle 2pi, radius 0.5 * 40
        assert!((p.x - 120.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn steps_carry_delays() {
        let seq = sequencer();
        let steps: Vec<_> = seq.steps(5).collect();
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].delay, Duration::ZERO);
        assert!(steps[1..].iter().all(|s| s.delay == Duration::from_millis(30)));
    }

    #[test]
    fn run_visits_every_step_in_order() {
        let seq = sequencer();
        let mut seen = Vec::new();
        seq.run(50, |p| seen.push(p));
        assert_eq!(seen.len(), 50);
        assert_eq!(seen[0], seq.center());
        assert_eq!(seen[49], seq.point_at(49, 50));
    }

    #[test]
    fn playback_paces_steps_then_finishes() {
        let mut pb = AutoTearPlayback::new(3, Duration::from_millis(30));
        assert_eq!(pb.advance(Duration::ZERO), vec![AutoTearEvent::Step(0)]);
        assert!(pb.advance(Duration::from_millis(10)).is_empty());
        assert_eq!(pb.advance(Duration::from_millis(20)), vec![AutoTearEvent::Step(1)]);
        let rest = pb.advance(Duration::from_millis(100));
        assert_eq!(rest, vec![AutoTearEvent::Step(2), AutoTearEvent::Finish]);
        assert!(pb.is_finished());
        assert!(pb.advance(Duration::from_secs(1)).is_empty());
    }
}
