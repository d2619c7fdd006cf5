use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Mat4;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

use crate::device::{SurfaceErrorAction, WindowSurface};
use crate::game::Game;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameClock;

// Fixed camera: 90° vertical FOV, identity view. There is no camera surface
// in this engine; the projection is written once per run.
const FOV_Y: f32 = std::f32::consts::FRAC_PI_2;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

// Frame-rate diagnostics cadence (frames).
const RATE_LOG_INTERVAL: u64 = 600;

/// Runs the frame loop until the window is closed.
///
/// Blocks the calling thread. A fatal error inside the loop (window or
/// surface failure) is carried out and returned.
pub(crate) fn run(game: Game, title: &str, width: u32, height: u32) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

    let mut state = AppState {
        game,
        title: title.to_owned(),
        width,
        height,
        window: None,
        surface: None,
        clock: FrameClock::new(),
        error: None,
    };

    event_loop
        .run_app(&mut state)
        .context("winit event loop terminated with error")?;

    match state.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct AppState {
    game: Game,
    title: String,
    width: u32,
    height: u32,

    window: Option<Arc<Window>>,
    surface: Option<WindowSurface>,
    clock: FrameClock,

    /// First fatal error seen inside the loop; returned from `run`.
    error: Option<anyhow::Error>,
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let fullscreen = self.width == 0 && self.height == 0;

        let mut attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_resizable(false);
        if fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        } else {
            attrs = attrs.with_inner_size(LogicalSize::new(self.width, self.height));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        let surface = WindowSurface::new(&self.game.gpu, Arc::clone(&window))?;

        // view/projection are static for the run; write them now.
        let size = surface.size();
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let projection = Mat4::perspective_rh(FOV_Y, aspect, Z_NEAR, Z_FAR);
        self.game
            .renderer
            .write_camera(self.game.gpu.queue(), Mat4::IDENTITY, projection);

        log::info!(
            "window up: {}x{} ({})",
            size.width,
            size.height,
            if fullscreen { "fullscreen" } else { "windowed" },
        );

        window.request_redraw();
        self.window = Some(window);
        self.surface = Some(surface);
        Ok(())
    }

    /// One frame: update callbacks, then render every live object.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let frame_time = self.clock.tick();
        if frame_time.frame_index % RATE_LOG_INTERVAL == 0 && frame_time.frame_index > 0 {
            log::debug!(
                "frame {}: {:.1} ms, {} live objects",
                frame_time.frame_index,
                frame_time.dt * 1000.0,
                self.game.scene.live_count(),
            );
        }

        // Callbacks run to completion before any rendering starts; whatever
        // they created this frame renders this frame.
        self.game.scene.run_update_callbacks();

        let (Some(window), Some(surface)) = (self.window.as_ref(), self.surface.as_mut()) else {
            return;
        };
        let gpu = &self.game.gpu;

        let mut frame = match surface.begin_frame(gpu) {
            Ok(frame) => frame,
            Err(err) => {
                if surface.handle_surface_error(gpu, err) == SurfaceErrorAction::Fatal {
                    self.error = Some(anyhow::anyhow!("GPU surface is out of memory"));
                    event_loop.exit();
                }
                return;
            }
        };

        let ctx = RenderCtx::new(gpu.device(), gpu.queue(), surface.format());
        {
            let mut target =
                RenderTarget::new(&mut frame.encoder, &frame.view, surface.depth_view());
            self.game.renderer.render(&ctx, &mut target, &self.game.scene);
        }

        window.pre_present_notify();
        surface.submit(gpu, frame);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; pacing comes from the FIFO present mode.
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested; shutting down");
                event_loop.exit();
            }

            // The window is non-resizable, but fullscreen transitions and
            // scale-factor changes still deliver new sizes.
            WindowEvent::Resized(new_size) => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.resize(&self.game.gpu, new_size);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
