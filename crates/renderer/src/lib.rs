//! Renderer crate for the animated cloud demo.
//!
//! Draws three octaves of value noise, thresholded into cloud cover, over a
//! full-screen quad. The overall flow is:
//!
//! ```text
//!   clouds CLI
//!        │ RendererConfig
//!        ▼
//!   Renderer::run ──▶ WindowHost ──▶ winit event loop ──▶ RenderLoop::render_frame()
//!                         │                                        │ FrameRequest
//!                         └── GpuState (device, quad, pipeline) ◀──┘
//! ```
//!
//! The pure parts (noise mirror, mesh, animation clock, compile/link, render
//! loop state machine) have no GPU dependency and are usable headlessly; the
//! `gpu` and `window` modules wire them to `wgpu` and `winit`.

pub mod animation;
pub mod compile;
mod gpu;
pub mod mesh;
pub mod noise;
pub mod render_loop;
pub mod shaders;
mod types;
mod window;

use anyhow::Result;

pub use animation::{AnimationClock, DEFAULT_SHIFT_STEP, DEFAULT_WRAP_PERIOD};
pub use compile::{
    build_program, compile, link, CompiledShader, LinkedProgram, ShaderError, ShaderStageKind,
    UniformLocation,
};
pub use mesh::{Vertex, QUAD_VERTEX_COUNT, QUAD_VERTICES};
pub use render_loop::{FrameRequest, FrameSink, LoopState, RenderLoop};
pub use types::{AdapterProfile, GpuPowerPreference, RendererConfig, ShaderFailurePolicy, VsyncMode};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the window and renders until it is closed.
    ///
    /// Returns an error if the window, surface, adapter, or device cannot be
    /// created, or if the cloud program fails while the failure policy is
    /// [`ShaderFailurePolicy::Abort`].
    pub fn run(&mut self) -> Result<()> {
        window::run(&self.config)
    }
}
