//! Window management via winit.
//!
//! Implements [`winit::application::ApplicationHandler`] to drive the event
//! loop: window and GPU creation, key forwarding, resize, and the frame
//! loop (driver, then render, then the frame-cap sleep).
//!
//! Resources are acquired window → GPU → renderer and released in the
//! reverse order, including when a later stage failed to initialize.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::context::Context;
use crate::driver::{ControlFlow, Driver};
use crate::error::{GameError, Result};
use crate::render::draw::render_frame;
use crate::render::{DrawList, GpuContext, ShapeRenderer};

/// The application state that winit drives.
///
/// Field order is drop order: renderer, GPU, window.
pub(crate) struct WinitApp {
    renderer: Option<ShapeRenderer>,
    gpu: Option<GpuContext>,
    window: Option<Arc<Window>>,
    ctx: Context,
    driver: Driver,
    last_frame: Instant,
    title: String,
    error: Option<GameError>,
}

impl WinitApp {
    pub fn new(ctx: Context, driver: Driver) -> Self {
        let title = ctx.config.title.clone();
        Self {
            renderer: None,
            gpu: None,
            window: None,
            ctx,
            driver,
            last_frame: Instant::now(),
            title,
            error: None,
        }
    }

    /// The initialization error that stopped the loop, if any.
    pub fn take_error(&mut self) -> Option<GameError> {
        self.error.take()
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let config = &self.ctx.config;
        let attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width as f64, config.height as f64))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| GameError::Window(e.to_string()))?,
        );
        self.window = Some(window.clone());

        let gpu = GpuContext::new(window.clone())?;
        self.renderer = Some(ShapeRenderer::new(&gpu));
        self.gpu = Some(gpu);

        log::info!("Window created ({}x{})", config.width, config.height);
        window.request_redraw();
        Ok(())
    }

    /// Release renderer, GPU and window, newest first.
    fn release(&mut self) {
        if self.renderer.take().is_some() {
            log::debug!("Renderer released");
        }
        if self.gpu.take().is_some() {
            log::debug!("GPU context released");
        }
        if self.window.take().is_some() {
            log::debug!("Window released");
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(renderer)) = (self.gpu.as_mut(), self.renderer.as_ref()) else {
            return;
        };
        let list = DrawList::collect(&self.ctx.world);
        match render_frame(gpu, renderer, &list) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = gpu.surface_size();
                gpu.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory!");
                event_loop.exit();
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
            }
        }
    }

    fn update_title(&mut self) {
        let title = match self.driver.hud().overlay_text() {
            Some(overlay) => format!("{} | {}", self.ctx.config.title, overlay),
            None => self.ctx.config.title.clone(),
        };
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("Startup failed: {}", e);
            self.release();
            self.error = Some(e);
            event_loop.exit();
            return;
        }
        self.last_frame = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    self.driver.handle_key(&mut self.ctx, key_code, event.state);
                }
            }

            WindowEvent::RedrawRequested => {
                let frame_start = Instant::now();
                let dt = frame_start - self.last_frame;
                self.last_frame = frame_start;

                if self.driver.frame(&mut self.ctx, dt) == ControlFlow::Exit {
                    log::info!("Exit requested, leaving the frame loop");
                    event_loop.exit();
                    return;
                }

                self.render(event_loop);
                self.update_title();

                let spent = frame_start.elapsed();
                if spent < self.ctx.config.frame_cap {
                    std::thread::sleep(self.ctx.config.frame_cap - spent);
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.release();
        log::info!("Shut down after {} frames", self.ctx.time.frame_count());
    }
}
