// Tuning knobs for the tear and the scripted auto tear.
// Everything is checked once at construction so the engine itself never fails.

use crate::error::{TearError, TearResult};
use crate::jagged::DEFAULT_JAGGED_POINTS;
use crate::types::ErasedPredicate;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct TearConfig {
    pub tear_width: f64,           // pixels; visual: how wide each rip is
    pub width_jitter: f64,         // extra width in [0, jitter) per segment
    pub coverage_threshold: f64,   // reveal once coverage exceeds this
    pub jagged_edges: bool,        // bite a ragged polygon at every sample
    pub jagged_points: usize,      // polygon vertices per bite
    pub retain_history: bool,      // keep strokes so resize can replay them
    pub erased_predicate: ErasedPredicate,
    pub erase_strength: u8,        // destination-out opacity; 255 clears fully
}

impl Default for TearConfig {
    fn default() -> Self {
        Self {
            tear_width: 30.0,
            width_jitter: 8.0,
            coverage_threshold: 0.05,
            jagged_edges: true,
            jagged_points: DEFAULT_JAGGED_POINTS,
            retain_history: true,
            erased_predicate: ErasedPredicate::BelowOpaque,
            erase_strength: u8::MAX,
        }
    }
}

impl TearConfig {
    pub fn validate(&self) -> TearResult<()> {
        if !(self.tear_width.is_finite() && self.tear_width > 0.0) {
            return Err(TearError::config(format!(
                "tear_width must be positive, got {}",
                self.tear_width
            )));
        }
        if !(self.width_jitter.is_finite() && self.width_jitter >= 0.0) {
            return Err(TearError::config(format!(
                "width_jitter must be >= 0, got {}",
                self.width_jitter
            )));
        }
        if !(self.coverage_threshold > 0.0 && self.coverage_threshold < 1.0) {
            return Err(TearError::config(format!(
                "coverage_threshold must be in (0,1), got {}",
                self.coverage_threshold
            )));
        }
        if self.jagged_points < 3 {
            return Err(TearError::config(format!(
                "jagged_points must be >= 3, got {}",
                self.jagged_points
            )));
        }
        if self.erase_strength == 0 {
            return Err(TearError::config("erase_strength must be > 0"));
        }
        // A soft brush never reaches alpha 0, so a drag could never reveal
        if self.erased_predicate == ErasedPredicate::FullyCleared && self.erase_strength < u8::MAX {
            return Err(TearError::config(format!(
                "fully-cleared predicate needs erase_strength 255, got {}",
                self.erase_strength
            )));
        }
        Ok(())
    }
}

/// Shape and pacing of the scripted spiral tear.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoTearConfig {
    pub steps: usize,
    pub turns: f64,         // full revolutions over the whole run
    pub radius_factor: f64, // final radius as a fraction of min(width, height)
    pub step_delay: Duration,
}

impl Default for AutoTearConfig {
    fn default() -> Self {
        Self {
            steps: 30,
            turns: 2.0,
            radius_factor: 0.4,
            step_delay: Duration::from_millis(30),
        }
    }
}

impl AutoTearConfig {
    pub fn validate(&self) -> TearResult<()> {
        if self.steps == 0 {
            return Err(TearError::config("auto tear needs at least one step"));
        }
        if !(self.turns.is_finite() && self.turns > 0.0) {
            return Err(TearError::config(format!("turns must be positive, got {}", self.turns)));
        }
        if !(self.radius_factor > 0.0 && self.radius_factor <= 1.0) {
            return Err(TearError::config(format!(
                "radius_factor must be in (0,1], got {}",
                self.radius_factor
            )));
        }
        Ok(())
    }
}
