//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue (window-independent,
//!   so geometry can upload before a window exists)
//! - creating & configuring the Surface once the window is up
//! - acquiring frames and providing encoders/views for rendering

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction, WindowSurface};

pub(crate) use gpu::depth_format;
