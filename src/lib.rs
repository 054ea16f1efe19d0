//! Tear-to-reveal paper: drag across an opaque cover to rip it away, and
//! once enough of it is gone the layer underneath is revealed.
//!
//! [`TearEngine`] owns the alpha surface and the gesture/reveal state
//! machine. Hosts feed it pointer positions (or an [`AutoTearPlayback`] for
//! the scripted spiral) and receive notifications through a
//! [`PresentationSink`].

pub mod auto_tear;
pub mod config;
pub mod engine;
pub mod error;
pub mod jagged;
pub mod rng;
pub mod stroke;
pub mod surface;
pub mod types;

pub use auto_tear::{AutoTearEvent, AutoTearPlayback, AutoTearSequencer, AutoTearStep};
pub use config::{AutoTearConfig, TearConfig};
pub use engine::{PresentationSink, TearEngine};
pub use error::{TearError, TearResult};
pub use jagged::JaggedEdgeGenerator;
pub use rng::{FixedSequence, RandomSource, XorShift32};
pub use stroke::StrokeRecorder;
pub use surface::RasterSurface;
pub use types::{ErasedPredicate, GestureState, Point, RevealState, Stroke};
