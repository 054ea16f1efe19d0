// The tear state machine: turns gestures (live or scripted) into erasure on
// the surface and fires the one-shot reveal once enough paper is gone.
//
// Gesture axis:  Idle <-> Dragging
// Reveal axis:   Covered -> Revealed (only reset goes back)

use crate::auto_tear::{AutoTearPlayback, AutoTearSequencer};
use crate::config::{AutoTearConfig, TearConfig};
use crate::error::TearResult;
use crate::jagged::JaggedEdgeGenerator;
use crate::rng::{RandomSource, XorShift32};
use crate::stroke::StrokeRecorder;
use crate::surface::RasterSurface;
use crate::types::{GestureState, Point, RevealState, Stroke};
use tracing::{debug, info, trace};

/// Receives the engine's notifications. Both hooks default to doing nothing.
/// Visual: this is where particles, layer flips and shadows are triggered.
pub trait PresentationSink {
    /// Fired exactly once per session, on the Covered -> Revealed transition.
    fn on_revealed(&mut self) {}

    /// Fired after every erase with the new coverage fraction.
    fn on_coverage_changed(&mut self, _fraction: f64) {}
}

/// Sink for hosts that only poll state.
impl PresentationSink for () {}

pub struct TearEngine<R: RandomSource = XorShift32> {
    config: TearConfig,
    surface: RasterSurface,
    recorder: StrokeRecorder,
    jagged: JaggedEdgeGenerator,
    rng: R,
    gesture: GestureState,
    reveal: RevealState,
    auto: Option<AutoRun>,
}

/// A scripted tear in flight.
struct AutoRun {
    config: AutoTearConfig,
    torn: usize, // spiral steps applied so far
    path: Stroke,
}

impl AutoRun {
    fn new(config: &AutoTearConfig, width: usize, height: usize) -> Self {
        let center = AutoTearSequencer::new(width, height, config).center();
        Self { config: config.clone(), torn: 0, path: Stroke::new(center) }
    }

    /// Lay the steps torn so far out again for a surface of the given size.
    fn relayout(&mut self, width: usize, height: usize) {
        let sequencer = AutoTearSequencer::new(width, height, &self.config);
        let mut path = Stroke::new(sequencer.center());
        for step in 0..self.torn {
            path.push(sequencer.point_at(step, self.config.steps));
        }
        self.path = path;
    }
}

impl TearEngine<XorShift32> {
    /// Engine with unseeded jitter.
    pub fn new(width: usize, height: usize, config: TearConfig) -> TearResult<Self> {
        Self::with_rng(width, height, config, XorShift32::from_entropy())
    }
}

impl<R: RandomSource> TearEngine<R> {
    pub fn with_rng(width: usize, height: usize, config: TearConfig, rng: R) -> TearResult<Self> {
        config.validate()?;
        let surface = RasterSurface::with_options(
            width,
            height,
            config.erased_predicate,
            config.erase_strength,
        );
        Ok(Self {
            recorder: StrokeRecorder::new(config.retain_history),
            jagged: JaggedEdgeGenerator::new(config.jagged_points),
            surface,
            config,
            rng,
            gesture: GestureState::Idle,
            reveal: RevealState::Covered,
            auto: None,
        })
    }

    pub fn config(&self) -> &TearConfig {
        &self.config
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    /// Completed strokes in drawing order (read-only, for redraw).
    pub fn history(&self) -> &[Stroke] {
        self.recorder.history()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture
    }

    pub fn reveal_state(&self) -> RevealState {
        self.reveal
    }

    pub fn coverage(&self) -> f64 {
        self.surface.sample_coverage()
    }

    pub fn is_auto_tearing(&self) -> bool {
        self.auto.is_some()
    }

    /// Press. Ignored while already dragging or when the surface has no area.
    pub fn on_gesture_start(&mut self, point: Point) {
        if self.gesture != GestureState::Idle || self.surface.pixel_count() == 0 {
            return;
        }
        let point = self.surface.clamp(point);
        self.recorder.begin(point);
        self.gesture = GestureState::Dragging;
        debug!(x = point.x, y = point.y, "tear gesture started");
    }

    /// Drag sample. Leaving the surface ends the gesture instead of pausing it.
    pub fn on_gesture_move(&mut self, point: Point, sink: &mut impl PresentationSink) {
        if self.gesture != GestureState::Dragging {
            return;
        }
        if !self.surface.contains(point) {
            debug!(x = point.x, y = point.y, "pointer left the paper");
            self.on_gesture_end(sink);
            return;
        }
        let Some(prev) = self.recorder.last_point() else {
            return;
        };
        self.recorder.extend(point);
        self.tear_segment(prev, point);
        sink.on_coverage_changed(self.coverage());
        self.evaluate_coverage(sink);
    }

    /// Release. Double releases and releases without a press are ignored.
    pub fn on_gesture_end(&mut self, sink: &mut impl PresentationSink) {
        if self.gesture != GestureState::Dragging {
            return;
        }
        let points = self.recorder.end().map_or(0, |s| s.len());
        self.gesture = GestureState::Idle;
        debug!(points, coverage = self.coverage(), "tear gesture ended");
        self.evaluate_coverage(sink);
    }

    /// Reveal once coverage passes the threshold. Never re-checked after revealing.
    pub fn evaluate_coverage(&mut self, sink: &mut impl PresentationSink) {
        if self.reveal == RevealState::Revealed {
            return;
        }
        let coverage = self.coverage();
        trace!(coverage, threshold = self.config.coverage_threshold, "coverage sampled");
        if coverage > self.config.coverage_threshold {
            self.reveal(sink);
        }
    }

    /// Fresh opaque paper, no history, covered and idle.
    pub fn reset(&mut self) {
        self.surface.reset();
        self.recorder.clear();
        self.reveal = RevealState::Covered;
        self.gesture = GestureState::Idle;
        self.auto = None;
        info!("paper reset");
    }

    /// Follow the host's new geometry. Retained strokes are torn again onto
    /// the fresh surface; without history the tears are lost. A running auto
    /// tear is laid out for the new size first. Afterwards the sink hears the
    /// new coverage and the threshold is checked again, so a shrink can reveal.
    pub fn resize(&mut self, width: usize, height: usize, sink: &mut impl PresentationSink) {
        if !self.surface.resize(width, height) {
            return;
        }
        debug!(width, height, "surface resized");
        if let Some(run) = &mut self.auto {
            run.relayout(width, height);
        }
        if self.config.retain_history {
            // Finished strokes first, then whatever is still being drawn
            let mut strokes: Vec<Stroke> = self.recorder.history().to_vec();
            strokes.extend(self.recorder.active().cloned());
            strokes.extend(self.auto.as_ref().map(|run| run.path.clone()));
            for stroke in &strokes {
                for (from, to) in stroke.segments() {
                    self.tear_segment(from, to);
                }
            }
            debug!(strokes = strokes.len(), coverage = self.coverage(), "stroke history replayed");
        }
        sink.on_coverage_changed(self.coverage());
        self.evaluate_coverage(sink);
    }

    /// Begin a scripted spiral tear. Any live drag is ended first, and a
    /// spiral that is still running is kept in history as it stands.
    /// The returned playback is paced by the caller; feed its events to
    /// `auto_tear_step` and `finish_auto_tear`.
    pub fn start_auto_tear(
        &mut self,
        config: &AutoTearConfig,
        sink: &mut impl PresentationSink,
    ) -> TearResult<AutoTearPlayback> {
        config.validate()?;
        self.on_gesture_end(sink);
        if let Some(running) = self.auto.take() {
            debug!(steps = running.torn, "running auto tear superseded");
            self.recorder.record(running.path);
        }
        self.auto = Some(AutoRun::new(config, self.surface.width(), self.surface.height()));
        info!(steps = config.steps, "auto tear started");
        Ok(AutoTearPlayback::new(config.steps, config.step_delay))
    }

    /// Spiral step `step`, placed on the paper as it is sized now and torn
    /// as if it were a drag move. Returns the point torn to, or `None` when
    /// no auto tear runs.
    pub fn auto_tear_step(
        &mut self,
        step: usize,
        sink: &mut impl PresentationSink,
    ) -> Option<Point> {
        let run = self.auto.as_mut()?;
        let point = AutoTearSequencer::new(self.surface.width(), self.surface.height(), &run.config)
            .point_at(step, run.config.steps);
        let prev = run.path.last()?;
        run.path.push(point);
        run.torn = step + 1;
        self.tear_segment(prev, point);
        sink.on_coverage_changed(self.coverage());
        self.evaluate_coverage(sink);
        Some(point)
    }

    /// End the scripted tear and reveal no matter how much paper is left.
    pub fn finish_auto_tear(&mut self, sink: &mut impl PresentationSink) {
        let Some(run) = self.auto.take() else {
            return;
        };
        self.recorder.record(run.path);
        info!(coverage = self.coverage(), "auto tear finished");
        if self.reveal == RevealState::Covered {
            self.reveal(sink);
        }
    }

    /// Whole auto tear back to back, for hosts without a clock.
    #[tracing::instrument(level = "debug", skip(self, sink))]
    pub fn run_auto_tear(
        &mut self,
        config: &AutoTearConfig,
        sink: &mut impl PresentationSink,
    ) -> TearResult<()> {
        self.start_auto_tear(config, sink)?;
        for step in 0..config.steps {
            self.auto_tear_step(step, sink);
        }
        self.finish_auto_tear(sink);
        Ok(())
    }

    /// Erase one segment with a jittered width, plus a ragged bite at its end.
    fn tear_segment(&mut self, from: Point, to: Point) {
        let width = self.config.tear_width + self.rng.range(0.0, self.config.width_jitter);
        self.surface.erase_stroke(from, to, width);
        if self.config.jagged_edges {
            let bite = self.jagged.generate(to, self.config.tear_width / 2.0, &mut self.rng);
            self.surface.erase_polygon(&bite);
        }
    }

    fn reveal(&mut self, sink: &mut impl PresentationSink) {
        self.reveal = RevealState::Revealed;
        info!(coverage = self.coverage(), "paper torn open");
        sink.on_revealed();
    }
}
