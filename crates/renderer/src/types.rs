use crate::animation::{DEFAULT_SHIFT_STEP, DEFAULT_WRAP_PERIOD};

/// What the driver does when the cloud program fails to compile or link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderFailurePolicy {
    /// Log the diagnostic and keep running; frames are cleared but nothing is drawn.
    #[default]
    Continue,
    /// Treat the failure as fatal before the render loop starts.
    Abort,
}

/// Adapter selection hint forwarded to `wgpu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    #[default]
    Low,
    High,
}

/// Presentation pacing for the swapchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VsyncMode {
    /// FIFO presentation; frame rate (and animation speed) follows the display.
    #[default]
    On,
    /// Prefer `Immediate`, then `Mailbox`, falling back to FIFO.
    Off,
}

/// Summary of the adapter `wgpu` picked, used for logging.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

impl AdapterProfile {
    pub(crate) fn from_wgpu(info: &wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
        }
    }

    /// True when rendering falls back to a CPU rasterizer.
    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// Mirrors the CLI flags of the `clouds` binary; the defaults reproduce the
/// classic 1280x960 "Clouds" window.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    pub title: String,
    /// Amount `cloud_shift` advances per rendered frame.
    pub shift_step: f32,
    /// Period `cloud_shift` wraps at; `None` lets it grow unbounded.
    pub wrap_period: Option<f32>,
    pub shader_failure: ShaderFailurePolicy,
    pub gpu_power: GpuPowerPreference,
    pub vsync: VsyncMode,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 960),
            title: "Clouds".to_string(),
            shift_step: DEFAULT_SHIFT_STEP,
            wrap_period: Some(DEFAULT_WRAP_PERIOD),
            shader_failure: ShaderFailurePolicy::default(),
            gpu_power: GpuPowerPreference::default(),
            vsync: VsyncMode::default(),
        }
    }
}
