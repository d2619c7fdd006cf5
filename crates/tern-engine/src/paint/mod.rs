//! Color model shared between images, fills, and the texture uploader.
//!
//! Scope:
//! - straight-alpha RGBA color in [0, 1]
//! - conversions to and from 8-bit texel data

pub mod color;

pub use color::Color;
