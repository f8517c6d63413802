use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::window::{Window, WindowBuilder};

use crate::animation::AnimationClock;
use crate::gpu::GpuState;
use crate::render_loop::RenderLoop;
use crate::types::RendererConfig;

/// Owns the window, its GPU state, and the render loop driving both.
///
/// Field order matters: `gpu` holds a surface created from the window's raw
/// handles and must drop before `window`.
pub(crate) struct WindowHost {
    gpu: GpuState,
    render_loop: RenderLoop,
    window: Arc<Window>,
}

impl WindowHost {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.as_ref(), size, config)
            .context("failed to initialise GPU renderer")?;
        let profile = gpu.adapter_profile();
        if profile.is_software() {
            warn!(
                adapter = %profile.name,
                backend = ?profile.backend,
                "software rasterizer detected; expect low frame rates"
            );
        }

        let clock = AnimationClock::new(config.shift_step, config.wrap_period);
        Ok(Self {
            gpu,
            render_loop: RenderLoop::new(clock),
            window,
        })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<()>) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.render_loop.request_close();
                elwt.exit();
            }
            WindowEvent::Resized(new_size) => self.gpu.resize(new_size),
            WindowEvent::RedrawRequested => self.redraw(elwt),
            _ => {}
        }
    }

    fn redraw(&mut self, elwt: &EventLoopWindowTarget<()>) {
        match self.render_loop.render_frame(&mut self.gpu) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.window.inner_size();
                if size == self.gpu.size() {
                    self.gpu.reconfigure();
                } else {
                    self.gpu.resize(size);
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory; closing window");
                self.render_loop.request_close();
                elwt.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timeout; retrying next frame");
            }
            Err(other) => {
                warn!("surface error: {other:?}; retrying next frame");
            }
        }
    }
}

/// Opens the window and runs the render loop until the window closes.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialise event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut host = WindowHost::new(window, config)?;
    info!(
        width = config.surface_size.0,
        height = config.surface_size.1,
        step = config.shift_step,
        wrap_period = ?config.wrap_period,
        "render loop starting"
    );

    event_loop.set_control_flow(ControlFlow::Poll);
    host.window().request_redraw();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == host.window().id() => {
                host.handle_window_event(event, elwt);
            }
            Event::AboutToWait => {
                if host.render_loop.is_running() {
                    host.window().request_redraw();
                }
            }
            Event::LoopExiting => {
                info!(
                    frames = host.render_loop.clock().frames(),
                    "render loop stopped; releasing GPU resources"
                );
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
