// Pluggable randomness for tear jitter and jagged edges.
// Production uses an unseeded xorshift; tests inject a seed or a fixed sequence.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of uniform values in [0,1).
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform in [min, max).
    #[inline]
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }
}

/// Xorshift32: fast and good enough for visual noise.
/// Visual: controls how wobbly each tear segment and edge looks.
#[derive(Clone, Debug)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn from_seed(seed: u32) -> Self {
        Self { state: seed | 1 } // zero state would stick at zero forever
    }

    /// Seeded from the clock, so every run tears differently.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Self::from_seed((nanos ^ (nanos >> 32)) as u32)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for XorShift32 {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (self.next_u32() >> 8) as f64 / (1u32 << 24) as f64
    }
}

/// Replays a fixed list of values, cycling when exhausted. Empty lists yield 0.
#[derive(Clone, Debug, Default)]
pub struct FixedSequence {
    values: Vec<f64>,
    next: usize,
}

impl FixedSequence {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let mut values: Vec<f64> = values.into();
        for v in &mut values {
            *v = v.clamp(0.0, 0.999_999); // keep range() half-open
        }
        Self { values, next: 0 }
    }

    /// Always returns the same value.
    pub fn constant(v: f64) -> Self {
        Self::new(vec![v])
    }
}

impl RandomSource for FixedSequence {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}
