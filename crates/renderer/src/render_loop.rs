use crate::animation::AnimationClock;
use crate::mesh::QUAD_VERTEX_COUNT;

/// Lifecycle of the render loop. `Running` only ever moves to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closed,
}

/// Everything a sink needs to produce one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRequest {
    /// 1-based index of the frame within the session.
    pub frame_index: u64,
    /// Value uploaded to the `cloud_shift` uniform.
    pub cloud_shift: f32,
    /// Vertices submitted by the single draw call.
    pub vertex_count: u32,
}

/// Consumer of frame requests; the GPU state in production, a recorder in tests.
pub trait FrameSink {
    type Error;

    /// Clears, uploads `cloud_shift`, draws the quad, and presents.
    fn draw_frame(&mut self, frame: &FrameRequest) -> Result<(), Self::Error>;
}

/// Drives the animation clock and hands one request per frame to a sink.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    state: LoopState,
    clock: AnimationClock,
}

impl RenderLoop {
    pub fn new(clock: AnimationClock) -> Self {
        Self {
            state: LoopState::Running,
            clock,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Observes a close request from the host. Idempotent.
    pub fn request_close(&mut self) {
        if self.state == LoopState::Running {
            tracing::debug!(frames = self.clock.frames(), "render loop closing");
        }
        self.state = LoopState::Closed;
    }

    /// Renders one frame if the loop is still running.
    ///
    /// Returns the request handed to the sink, or `None` once closed. The
    /// clock advances before the sink runs, so a failed frame still consumes
    /// one animation step.
    pub fn render_frame<S: FrameSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<Option<FrameRequest>, S::Error> {
        if !self.is_running() {
            return Ok(None);
        }

        let cloud_shift = self.clock.advance();
        let frame = FrameRequest {
            frame_index: self.clock.frames(),
            cloud_shift,
            vertex_count: QUAD_VERTEX_COUNT,
        };
        sink.draw_frame(&frame)?;
        Ok(Some(frame))
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(AnimationClock::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FailingSink {
        calls: usize,
    }

    impl FrameSink for FailingSink {
        type Error = &'static str;

        fn draw_frame(&mut self, _frame: &FrameRequest) -> Result<(), Self::Error> {
            self.calls += 1;
            Err("surface lost")
        }
    }

    #[test]
    fn closed_loop_never_renders() {
        let mut render_loop = RenderLoop::default();
        render_loop.request_close();
        render_loop.request_close();
        assert_eq!(render_loop.state(), LoopState::Closed);

        let mut sink = FailingSink::default();
        assert_eq!(render_loop.render_frame(&mut sink), Ok(None));
        assert_eq!(sink.calls, 0);
        assert_eq!(render_loop.clock().frames(), 0);
    }

    #[test]
    fn sink_errors_propagate_after_advancing() {
        let mut render_loop = RenderLoop::default();
        let mut sink = FailingSink::default();
        assert_eq!(render_loop.render_frame(&mut sink), Err("surface lost"));
        assert_eq!(sink.calls, 1);
        assert_eq!(render_loop.clock().frames(), 1);
        assert!(render_loop.is_running());
    }
}
