//! Mesh and texture-mapping containers plus the geometry buffer builder.
//!
//! Responsibilities:
//! - value types for points and triangles (GPU-compatible layout)
//! - append-only triangle containers (`Mesh`, `TextureMapping`)
//! - the `TexturedMesh` pairing invariant (one UV triangle per mesh triangle)
//! - deduplicated vertex/index construction (`build_geometry`)

mod builder;
mod mesh;
mod point;
mod texture;

pub use builder::{GeometryData, build_geometry};
pub use mesh::Mesh;
pub use point::{Point2, Point3, Triangle2, Triangle3};
pub use texture::{Image, TextureMapping, TexturedMesh};
