//! Window + frame loop.
//!
//! Owns the `winit` EventLoop and Window and drives the per-frame sequence:
//! update callbacks first, then one render of every live object.

mod runtime;

pub(crate) use runtime::run;
