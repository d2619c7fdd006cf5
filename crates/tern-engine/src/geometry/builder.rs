use std::collections::HashMap;

use super::{Mesh, Point2, Point3, TextureMapping, TexturedMesh};

/// CPU-side output of the geometry builder: a deduplicated vertex set and
/// the index list that reconstructs the original triangles.
///
/// Invariants:
/// - `positions.len() == uvs.len()` (parallel arrays, one entry per vertex)
/// - `indices.len() == 3 * triangle_count`, grouped per source triangle in
///   corner order, so winding survives the rebuild
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub positions: Vec<Point3>,
    pub uvs: Vec<Point2>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Builds deduplicated vertex/index data from a textured mesh.
pub fn build_geometry(textured: &TexturedMesh) -> GeometryData {
    build(textured.mesh(), textured.mapping())
}

/// Dedup key: the exact bit pattern of a (position, UV) corner.
///
/// Vertex identity is exact float equality on all five components — shared
/// corners are expected to be authored with identical coordinates, so no
/// tolerance is applied. `-0.0` is folded to `+0.0` before taking bits;
/// without that, bit-pattern keying would split corners that compare equal
/// as floats.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
struct CornerKey([u32; 5]);

impl CornerKey {
    fn new(position: Point3, uv: Point2) -> Self {
        #[inline]
        fn bits(v: f32) -> u32 {
            if v == 0.0 { 0.0f32.to_bits() } else { v.to_bits() }
        }
        Self([
            bits(position.x),
            bits(position.y),
            bits(position.z),
            bits(uv.x),
            bits(uv.y),
        ])
    }
}

fn build(mesh: &Mesh, mapping: &TextureMapping) -> GeometryData {
    // TexturedMesh::new enforces parity; anything else reaching this point
    // is a bug in the caller.
    debug_assert_eq!(mesh.len(), mapping.len());

    let mut data = GeometryData::default();
    data.indices.reserve(mesh.len() * 3);

    // First occurrence of a (position, UV) pair claims the next vertex slot;
    // every later identical corner reuses that index.
    let mut seen: HashMap<CornerKey, u32> = HashMap::new();

    for (tri, uv_tri) in mesh.triangles().iter().zip(mapping.triangles()) {
        for (position, uv) in tri.corners().into_iter().zip(uv_tri.corners()) {
            let next = data.positions.len() as u32;
            let index = *seen.entry(CornerKey::new(position, uv)).or_insert_with(|| {
                data.positions.push(position);
                data.uvs.push(uv);
                next
            });
            data.indices.push(index);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Image, Triangle2, Triangle3};
    use crate::paint::Color;

    fn p3(x: f32, y: f32, z: f32) -> Point3 {
        Point3::new(x, y, z)
    }

    fn p2(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    fn textured_quad() -> TexturedMesh {
        let mut mesh = Mesh::new();
        mesh.add_quad(
            p3(-1.0, -1.0, 0.0),
            p3(1.0, -1.0, 0.0),
            p3(1.0, 1.0, 0.0),
            p3(-1.0, 1.0, 0.0),
        );
        let mut mapping = TextureMapping::new(Image::solid(Color::WHITE));
        mapping.add_quad(p2(0.0, 0.0), p2(1.0, 0.0), p2(1.0, 1.0), p2(0.0, 1.0));
        TexturedMesh::new(mesh, mapping)
    }

    /// Rebuilds (position, UV) corner pairs from builder output.
    fn reconstruct(data: &GeometryData) -> Vec<(Point3, Point2)> {
        data.indices
            .iter()
            .map(|&i| (data.positions[i as usize], data.uvs[i as usize]))
            .collect()
    }

    /// Flattens the source corner pairs in authoring order.
    fn source_corners(textured: &TexturedMesh) -> Vec<(Point3, Point2)> {
        textured
            .mesh()
            .triangles()
            .iter()
            .zip(textured.mapping().triangles())
            .flat_map(|(t3, t2)| t3.corners().into_iter().zip(t2.corners()))
            .collect()
    }

    #[test]
    fn single_quad_welds_to_four_vertices() {
        let data = build_geometry(&textured_quad());

        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.uvs.len(), 4);
        assert_eq!(data.index_count(), 6);

        // The two triangles of the quad share exactly the diagonal corners.
        let first: Vec<u32> = data.indices[0..3].to_vec();
        let second: Vec<u32> = data.indices[3..6].to_vec();
        let shared = first.iter().filter(|i| second.contains(i)).count();
        assert_eq!(shared, 2);
    }

    #[test]
    fn round_trip_reproduces_every_corner_in_order() {
        let mut mesh = Mesh::new();
        mesh.add_quad(
            p3(0.0, 0.0, 0.0),
            p3(1.0, 0.0, 0.0),
            p3(1.0, 1.0, 0.0),
            p3(0.0, 1.0, 0.0),
        );
        mesh.add_triangle(Triangle3::new(
            p3(2.0, 0.0, 0.5),
            p3(3.0, 0.0, 0.5),
            p3(2.5, 1.0, 0.5),
        ));

        let mut mapping = TextureMapping::new(Image::solid(Color::WHITE));
        mapping.add_quad(p2(0.0, 1.0), p2(1.0, 1.0), p2(1.0, 0.0), p2(0.0, 0.0));
        mapping.add_triangle(Triangle2::new(p2(0.0, 0.0), p2(1.0, 0.0), p2(0.5, 1.0)));

        let textured = TexturedMesh::new(mesh, mapping);
        let data = build_geometry(&textured);

        assert_eq!(reconstruct(&data), source_corners(&textured));
    }

    #[test]
    fn shared_edge_between_quads_is_welded_once() {
        // Two quads side by side sharing the edge x = 1 with identical UVs
        // on the shared corners.
        let mut mesh = Mesh::new();
        mesh.add_quad(
            p3(0.0, 0.0, 0.0),
            p3(1.0, 0.0, 0.0),
            p3(1.0, 1.0, 0.0),
            p3(0.0, 1.0, 0.0),
        );
        mesh.add_quad(
            p3(1.0, 0.0, 0.0),
            p3(2.0, 0.0, 0.0),
            p3(2.0, 1.0, 0.0),
            p3(1.0, 1.0, 0.0),
        );

        let mut mapping = TextureMapping::new(Image::solid(Color::WHITE));
        mapping.add_quad(p2(0.0, 0.0), p2(0.5, 0.0), p2(0.5, 1.0), p2(0.0, 1.0));
        mapping.add_quad(p2(0.5, 0.0), p2(1.0, 0.0), p2(1.0, 1.0), p2(0.5, 1.0));

        let textured = TexturedMesh::new(mesh, mapping);
        let data = build_geometry(&textured);

        // 8 quad corners total, 2 shared on the common edge.
        assert_eq!(data.vertex_count(), 6);

        // The shared corners appear exactly once each in the vertex list.
        for corner in [(p3(1.0, 0.0, 0.0), p2(0.5, 0.0)), (p3(1.0, 1.0, 0.0), p2(0.5, 1.0))] {
            let hits = data
                .positions
                .iter()
                .zip(&data.uvs)
                .filter(|&(&pos, &uv)| (pos, uv) == corner)
                .count();
            assert_eq!(hits, 1);
        }

        assert_eq!(reconstruct(&data), source_corners(&textured));
    }

    #[test]
    fn same_position_different_uv_stays_split() {
        // A shared position with disagreeing UVs is two distinct vertices.
        let mut mesh = Mesh::new();
        let tri = Triangle3::new(p3(0.0, 0.0, 0.0), p3(1.0, 0.0, 0.0), p3(0.0, 1.0, 0.0));
        mesh.add_triangle(tri);
        mesh.add_triangle(tri);

        let mut mapping = TextureMapping::new(Image::solid(Color::WHITE));
        mapping.add_triangle(Triangle2::new(p2(0.0, 0.0), p2(1.0, 0.0), p2(0.0, 1.0)));
        mapping.add_triangle(Triangle2::new(p2(0.5, 0.5), p2(1.0, 0.0), p2(0.0, 1.0)));

        let data = build_geometry(&TexturedMesh::new(mesh, mapping));

        // Corner a differs in UV; corners b and c weld.
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.indices[0..3], [0, 1, 2]);
        assert_eq!(data.indices[3..6], [3, 1, 2]);
    }

    #[test]
    fn solid_fill_quad_dedups_collapsed_uvs() {
        let mut mesh = Mesh::new();
        mesh.add_quad(
            p3(-1.0, -1.0, 0.0),
            p3(1.0, -1.0, 0.0),
            p3(1.0, 1.0, 0.0),
            p3(-1.0, 1.0, 0.0),
        );
        let fill = Color::rgb(0.9, 0.3, 0.0);
        let textured = TexturedMesh::solid(mesh, fill);
        let data = build_geometry(&textured);

        // Same welding as the textured quad: identical UVs everywhere cannot
        // merge distinct positions.
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.index_count(), 6);
        assert!(data.uvs.iter().all(|&uv| uv == p2(0.0, 0.0)));
        assert_eq!(reconstruct(&data), source_corners(&textured));
    }

    #[test]
    fn negative_zero_welds_with_positive_zero() {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle3::new(
            p3(0.0, 0.0, 0.0),
            p3(1.0, 0.0, 0.0),
            p3(0.0, 1.0, 0.0),
        ));
        mesh.add_triangle(Triangle3::new(
            p3(-0.0, -0.0, 0.0),
            p3(1.0, 0.0, 0.0),
            p3(0.0, 1.0, -0.0),
        ));

        let mut mapping = TextureMapping::new(Image::solid(Color::WHITE));
        let uv = Triangle2::new(p2(0.0, 0.0), p2(1.0, 0.0), p2(0.0, 1.0));
        mapping.add_triangle(uv);
        mapping.add_triangle(uv);

        let data = build_geometry(&TexturedMesh::new(mesh, mapping));

        // -0.0 == 0.0 as floats, so both triangles name the same vertices.
        assert_eq!(data.vertex_count(), 3);
        assert_eq!(data.indices, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn first_occurrence_wins_index_assignment() {
        let data = build_geometry(&textured_quad());
        // Vertices appear in the order their corners were first seen.
        assert_eq!(data.positions[0], p3(-1.0, -1.0, 0.0));
        assert_eq!(data.positions[1], p3(1.0, -1.0, 0.0));
        assert_eq!(data.positions[2], p3(1.0, 1.0, 0.0));
        assert_eq!(data.positions[3], p3(-1.0, 1.0, 0.0));
        assert_eq!(data.indices, vec![0, 1, 2, 0, 2, 3]);
    }
}
