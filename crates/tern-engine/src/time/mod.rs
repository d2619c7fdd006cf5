//! Frame timing utilities.
//!
//! One `FrameClock` per frame loop; `tick()` once per presented frame.
//! Frame pacing itself is owned by the surface present mode (vsync) — the
//! clock only observes it.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
