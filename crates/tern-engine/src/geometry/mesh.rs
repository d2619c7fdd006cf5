use super::{Point3, Triangle3};

/// An ordered list of 3D triangles.
///
/// Append-only while being authored; once handed to
/// [`Scene::create_object`](crate::scene::Scene::create_object) (inside a
/// [`TexturedMesh`](super::TexturedMesh)) the content is frozen.
///
/// Builder methods return `&mut Self` so shapes chain:
///
/// ```
/// use tern_engine::geometry::{Mesh, Point3};
///
/// let mut mesh = Mesh::new();
/// mesh.add_quad(
///     Point3::new(-1.0, -1.0, 0.0),
///     Point3::new(1.0, -1.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(-1.0, 1.0, 0.0),
/// );
/// assert_eq!(mesh.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle3>,
}

impl Mesh {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_triangle(&mut self, triangle: Triangle3) -> &mut Self {
        self.triangles.push(triangle);
        self
    }

    /// Appends a quad `(a, b, c, d)` as the two triangles `(a, b, c)` and
    /// `(a, c, d)`, keeping the corner winding of the quad.
    pub fn add_quad(&mut self, a: Point3, b: Point3, c: Point3, d: Point3) -> &mut Self {
        self.triangles.push(Triangle3::new(a, b, c));
        self.triangles.push(Triangle3::new(a, c, d));
        self
    }

    /// Appends a convex polygon as a triangle fan anchored at `points[0]`.
    ///
    /// Fewer than three points append nothing.
    pub fn add_polygon(&mut self, points: &[Point3]) -> &mut Self {
        for window in points.windows(2).skip(1) {
            self.triangles
                .push(Triangle3::new(points[0], window[0], window[1]));
        }
        self
    }

    /// Appends every triangle of `other`, in order.
    pub fn add_mesh(&mut self, other: &Mesh) -> &mut Self {
        self.triangles.extend_from_slice(&other.triangles);
        self
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle3] {
        &self.triangles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn quad_splits_into_two_triangles_sharing_the_diagonal() {
        let mut mesh = Mesh::new();
        mesh.add_quad(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0));

        let tris = mesh.triangles();
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[0], Triangle3::new(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)));
        assert_eq!(tris[1], Triangle3::new(p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)));
    }

    #[test]
    fn polygon_fans_from_first_point() {
        let mut mesh = Mesh::new();
        mesh.add_polygon(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.5, 2.0), p(0.0, 1.0)]);

        // n points -> n - 2 triangles, all anchored at points[0].
        assert_eq!(mesh.len(), 3);
        for tri in mesh.triangles() {
            assert_eq!(tri.a, p(0.0, 0.0));
        }
        assert_eq!(mesh.triangles()[1].b, p(1.0, 1.0));
        assert_eq!(mesh.triangles()[1].c, p(0.5, 2.0));
    }

    #[test]
    fn degenerate_polygons_append_nothing() {
        let mut mesh = Mesh::new();
        mesh.add_polygon(&[]);
        mesh.add_polygon(&[p(0.0, 0.0)]);
        mesh.add_polygon(&[p(0.0, 0.0), p(1.0, 0.0)]);
        assert!(mesh.is_empty());
    }

    #[test]
    fn add_mesh_concatenates_in_order() {
        let mut left = Mesh::new();
        left.add_triangle(Triangle3::new(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)));

        let mut right = Mesh::new();
        right.add_quad(p(2.0, 0.0), p(3.0, 0.0), p(3.0, 1.0), p(2.0, 1.0));

        left.add_mesh(&right);
        assert_eq!(left.len(), 3);
        assert_eq!(left.triangles()[1], right.triangles()[0]);
        assert_eq!(left.triangles()[2], right.triangles()[1]);
    }
}
