use std::path::Path;

use anyhow::{Context, Result};

use crate::paint::Color;

use super::{Mesh, Point2, Triangle2};

/// A decoded image: RGBA f32 pixels in `[0, 1]`, row-major, first pixel
/// top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: Vec<Color>,
    width: u32,
    height: u32,
}

impl Image {
    /// Wraps already-decoded pixels.
    ///
    /// # Panics
    /// Panics if `pixels.len() != width * height`.
    pub fn from_pixels(pixels: Vec<Color>, width: u32, height: u32) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "pixel count must match image dimensions"
        );
        Self { pixels, width, height }
    }

    /// A 1×1 image of a single color. This is what solid fills render from.
    pub fn solid(color: Color) -> Self {
        Self {
            pixels: vec![color],
            width: 1,
            height: 1,
        }
    }

    /// Decodes a PNG file.
    ///
    /// Missing files and malformed data surface as errors with the path
    /// attached; there is no recovery path.
    pub fn load_png(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .with_context(|| format!("failed to load PNG image {}", path.display()))?
            .into_rgba8();

        let (width, height) = decoded.dimensions();
        let pixels = decoded
            .pixels()
            .map(|p| Color::from_rgba8(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self { pixels, width, height })
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// An image plus its mapping onto a mesh: one UV triangle per mesh triangle,
/// paired positionally.
///
/// UV coordinates live in `[0, 1]²` with `(0, 0)` the top-left corner of the
/// image and `(1, 1)` the bottom-right. The same `add_triangle` / `add_quad`
/// / `add_polygon` builders as [`Mesh`] keep the two containers easy to
/// author in lockstep.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureMapping {
    triangles: Vec<Triangle2>,
    image: Image,
}

impl TextureMapping {
    pub fn new(image: Image) -> Self {
        Self {
            triangles: Vec::new(),
            image,
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle2) -> &mut Self {
        self.triangles.push(triangle);
        self
    }

    /// Appends a quad `(a, b, c, d)` as `(a, b, c)` and `(a, c, d)`,
    /// matching the split [`Mesh::add_quad`] performs.
    pub fn add_quad(&mut self, a: Point2, b: Point2, c: Point2, d: Point2) -> &mut Self {
        self.triangles.push(Triangle2::new(a, b, c));
        self.triangles.push(Triangle2::new(a, c, d));
        self
    }

    /// Appends a convex polygon as a fan anchored at `points[0]`, matching
    /// [`Mesh::add_polygon`].
    pub fn add_polygon(&mut self, points: &[Point2]) -> &mut Self {
        for window in points.windows(2).skip(1) {
            self.triangles
                .push(Triangle2::new(points[0], window[0], window[1]));
        }
        self
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle2] {
        &self.triangles
    }

    #[inline]
    pub fn image(&self) -> &Image {
        &self.image
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

/// A mesh paired with a texture mapping of the same triangle count.
///
/// The pairing is positional: mesh triangle `k` samples from UV triangle
/// `k`, corner for corner. A count mismatch is a programming error and
/// panics at construction, before anything reaches the geometry builder.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturedMesh {
    mesh: Mesh,
    mapping: TextureMapping,
}

impl TexturedMesh {
    /// Pairs a mesh with its texture mapping.
    ///
    /// # Panics
    /// Panics if the triangle counts differ.
    pub fn new(mesh: Mesh, mapping: TextureMapping) -> Self {
        assert_eq!(
            mesh.len(),
            mapping.len(),
            "mesh and texture mapping must have the same number of triangles"
        );
        Self { mesh, mapping }
    }

    /// Pairs a mesh with a single flat color.
    ///
    /// The mapping is a 1×1 image of `fill` with every UV triangle collapsed
    /// onto its only pixel, so flat-colored geometry flows through the same
    /// textured pipeline. Degenerate UVs are valid input, not an error.
    pub fn solid(mesh: Mesh, fill: Color) -> Self {
        let mut mapping = TextureMapping::new(Image::solid(fill));
        let origin = Point2::new(0.0, 0.0);
        for _ in 0..mesh.len() {
            mapping.add_triangle(Triangle2::new(origin, origin, origin));
        }
        Self { mesh, mapping }
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn mapping(&self) -> &TextureMapping {
        &self.mapping
    }
}
