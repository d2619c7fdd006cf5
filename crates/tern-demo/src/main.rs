//! Demo scene: a spinning checkerboard cube orbited by solid-color pyramids
//! duplicated from a single template.

use std::f32::consts::TAU;

use anyhow::Result;
use tern_engine::geometry::{Image, Mesh, Point2, Point3, TextureMapping, TexturedMesh, Triangle3};
use tern_engine::paint::Color;
use tern_engine::{Game, LoggingConfig, init_logging};

const ORBIT_COUNT: usize = 5;
const ORBIT_RADIUS: f32 = 3.0;
const CUBE_DISTANCE: f32 = -6.0;

/// Procedural checkerboard so the demo needs no asset files.
fn checkerboard(size: u32, light: Color, dark: Color) -> Image {
    let mut pixels = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        for x in 0..size {
            pixels.push(if (x + y) % 2 == 0 { light } else { dark });
        }
    }
    Image::from_pixels(pixels, size, size)
}

fn checker_cube(image: Image) -> TexturedMesh {
    let p = Point3::new;

    let mut mesh = Mesh::new();
    mesh.add_quad(p(-1.0, -1.0, -1.0), p(1.0, -1.0, -1.0), p(1.0, 1.0, -1.0), p(-1.0, 1.0, -1.0));
    mesh.add_quad(p(1.0, -1.0, 1.0), p(-1.0, -1.0, 1.0), p(-1.0, 1.0, 1.0), p(1.0, 1.0, 1.0));
    mesh.add_quad(p(-1.0, -1.0, 1.0), p(-1.0, -1.0, -1.0), p(-1.0, 1.0, -1.0), p(-1.0, 1.0, 1.0));
    mesh.add_quad(p(1.0, -1.0, -1.0), p(1.0, -1.0, 1.0), p(1.0, 1.0, 1.0), p(1.0, 1.0, -1.0));
    mesh.add_quad(p(-1.0, 1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, 1.0, 1.0), p(-1.0, 1.0, 1.0));
    mesh.add_quad(p(-1.0, -1.0, 1.0), p(1.0, -1.0, 1.0), p(1.0, -1.0, -1.0), p(-1.0, -1.0, -1.0));

    // Every face shows the full image.
    let uv = Point2::new;
    let mut mapping = TextureMapping::new(image);
    for _ in 0..6 {
        mapping.add_quad(uv(0.0, 1.0), uv(1.0, 1.0), uv(1.0, 0.0), uv(0.0, 0.0));
    }

    TexturedMesh::new(mesh, mapping)
}

fn pyramid() -> Mesh {
    let apex = Point3::new(0.0, 1.0, 0.0);
    let base = [
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, 1.0),
        Point3::new(-1.0, -1.0, 1.0),
    ];

    let mut mesh = Mesh::new();
    mesh.add_polygon(&[base[3], base[2], base[1], base[0]]);
    for i in 0..4 {
        mesh.add_triangle(Triangle3::new(base[i], base[(i + 1) % 4], apex));
    }
    mesh
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let game = Game::new()?;
    let scene = game.scene();

    let cube = scene.create_object(
        checker_cube(checkerboard(8, Color::rgb(0.92, 0.92, 0.85), Color::rgb(0.12, 0.12, 0.2))),
        true,
    );
    cube.set_translate_z(CUBE_DISTANCE);

    // One template, several live copies — the copies share the template's
    // GPU geometry.
    let template = scene.create_object(
        TexturedMesh::solid(pyramid(), Color::rgb(0.95, 0.45, 0.1)),
        false,
    );
    template.set_scale(0.4);

    let satellites: Vec<_> = (0..ORBIT_COUNT)
        .map(|_| scene.duplicate_object(&template))
        .collect();

    log::info!("scene ready: {} live objects", scene.live_count());

    let spinner = cube.clone();
    scene.add_update_callback(move || {
        spinner.set_rotate_y(spinner.rotate_y() + 0.010);
        spinner.set_rotate_x(spinner.rotate_x() + 0.004);
    });

    let mut t = 0.0f32;
    scene.add_update_callback(move || {
        t += 0.02;
        for (i, satellite) in satellites.iter().enumerate() {
            let phase = t + i as f32 * TAU / ORBIT_COUNT as f32;
            satellite.set_translate_x(phase.cos() * ORBIT_RADIUS);
            satellite.set_translate_y(phase.sin() * 1.5);
            satellite.set_translate_z(CUBE_DISTANCE + phase.sin() * 1.5);
            satellite.set_rotate_y(phase);
        }
    });

    game.run("tern demo", 1024, 768)
}
