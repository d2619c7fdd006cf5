//! Top-level entry point.
//!
//! A [`Game`] owns the GPU context, the scene, and the renderer. Exactly one
//! may be alive per process: window/event-loop ownership is process-global
//! state, so a second instance is rejected up front with a distinct error.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use crate::device::{Gpu, GpuInit};
use crate::render::MeshRenderer;
use crate::scene::Scene;

static INSTANCE_ALIVE: AtomicBool = AtomicBool::new(false);

/// A `Game` was constructed while another one is still alive.
///
/// Recoverable only by dropping the first instance; downcast from the
/// `anyhow::Error` returned by [`Game::new`] to detect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyRunningError;

impl fmt::Display for AlreadyRunningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("another Game instance is alive; only one may exist at a time")
    }
}

impl std::error::Error for AlreadyRunningError {}

/// Clears the process-wide instance flag when its `Game` goes away,
/// whatever the exit path.
struct InstanceGuard;

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        INSTANCE_ALIVE.store(false, Ordering::SeqCst);
    }
}

/// The engine context: GPU, scene, renderer, and the run loop.
///
/// Construction acquires the GPU immediately so objects can be created (and
/// their geometry uploaded) before [`run`](Self::run) opens the window.
///
/// ```no_run
/// use tern_engine::{Game, geometry::{Mesh, Point3, TexturedMesh}, paint::Color};
///
/// fn main() -> anyhow::Result<()> {
///     let game = Game::new()?;
///     let scene = game.scene();
///
///     let mut mesh = Mesh::new();
///     mesh.add_quad(
///         Point3::new(-1.0, -1.0, -3.0),
///         Point3::new(1.0, -1.0, -3.0),
///         Point3::new(1.0, 1.0, -3.0),
///         Point3::new(-1.0, 1.0, -3.0),
///     );
///     let quad = scene.create_object(TexturedMesh::solid(mesh, Color::WHITE), true);
///
///     scene.add_update_callback(move || {
///         quad.set_rotate_z(quad.rotate_z() + 0.01);
///     });
///
///     game.run("spinning quad", 800, 600)
/// }
/// ```
pub struct Game {
    // Declared first so the flag clears only after everything else dropped.
    _guard: InstanceGuard,
    pub(crate) gpu: Rc<Gpu>,
    pub(crate) scene: Scene,
    pub(crate) renderer: MeshRenderer,
}

impl Game {
    /// Acquires the GPU and sets up an empty scene.
    ///
    /// Fails with [`AlreadyRunningError`] if another instance is alive, or
    /// with an adapter/device acquisition error.
    pub fn new() -> Result<Self> {
        if INSTANCE_ALIVE.swap(true, Ordering::SeqCst) {
            return Err(AlreadyRunningError.into());
        }
        let guard = InstanceGuard;

        let gpu = Rc::new(pollster::block_on(Gpu::new(GpuInit::default()))?);
        let renderer = MeshRenderer::new(gpu.device());
        let scene = Scene::new(Rc::clone(&gpu));

        Ok(Self {
            _guard: guard,
            gpu,
            scene,
            renderer,
        })
    }

    /// Handle to the scene, for creating objects and registering callbacks.
    pub fn scene(&self) -> Scene {
        self.scene.clone()
    }

    /// Opens the window and runs the frame loop until close is requested.
    ///
    /// Register objects and callbacks before calling; callbacks can extend
    /// the scene afterwards. `width == 0 && height == 0` selects borderless
    /// fullscreen on the current monitor. Consumes the game: returning tears
    /// everything down and releases GPU resources.
    pub fn run(self, title: &str, width: u32, height: u32) -> Result<()> {
        crate::window::run(self, title, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_instance_is_rejected_while_flag_held() {
        // Exercises the guard without touching the GPU.
        assert!(!INSTANCE_ALIVE.swap(true, Ordering::SeqCst));
        let guard = InstanceGuard;

        assert!(INSTANCE_ALIVE.load(Ordering::SeqCst));
        drop(guard);
        assert!(!INSTANCE_ALIVE.load(Ordering::SeqCst));
    }

    #[test]
    fn already_running_error_is_distinct_and_downcastable() {
        let err: anyhow::Error = AlreadyRunningError.into();
        assert!(err.downcast_ref::<AlreadyRunningError>().is_some());
    }
}
