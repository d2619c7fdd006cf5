//! Mesh rendering.
//!
//! Responsibilities:
//! - upload built geometry + texture data to GPU buffers (`GpuMesh`)
//! - per-object model-uniform binding (`ModelBinding`)
//! - the one render pipeline: textured, depth-tested, camera + model
//!   uniforms (`MeshRenderer`)

mod buffers;
mod ctx;
mod mesh;

pub use buffers::{GpuMesh, ModelBinding};
pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::MeshRenderer;
