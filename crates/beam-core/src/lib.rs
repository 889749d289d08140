//! Scroll-driven light beam engine.
//!
//! Converts scroll position into gradient geometry, opacity and mask values
//! for a decorative beam element, and drives the optional ambient loops
//! (dust, mist, pulse) layered over it. Platform-free; the browser binding
//! lives in `beam-web`.

pub mod ambient;
pub mod config;
pub mod constants;
pub mod progress;
pub mod range;
pub mod scheduler;
pub mod style;
pub mod visual;

pub use ambient::{AmbientChange, AmbientEffects, AmbientFrame, EffectChange};
pub use config::*;
pub use constants::*;
pub use progress::*;
pub use range::*;
pub use scheduler::*;
pub use style::*;
pub use visual::*;
