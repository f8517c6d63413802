//! GPU side of the renderer.
//!
//! - `context` owns the wgpu instance, device, queue, and surface.
//! - `geometry` uploads the static full-screen quad.
//! - `uniforms` holds the single uniform block `cloud_shift` lives in.
//! - `pipeline` turns a [`LinkedProgram`](crate::compile::LinkedProgram) into
//!   a render pipeline, reporting driver failures as link errors.
//! - `state` glues everything together and implements
//!   [`FrameSink`](crate::render_loop::FrameSink) for the window host.

mod context;
mod geometry;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
