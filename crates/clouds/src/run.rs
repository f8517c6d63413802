//! Turns parsed CLI arguments into a `RendererConfig`, configures logging, and
//! hosts the headless `shaders check` diagnostic.

use anyhow::{Context, Result};
use renderer::{build_program, Renderer, RendererConfig, VsyncMode};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;

const CLOUD_SHIFT_UNIFORM: &str = renderer::shaders::CLOUD_SHIFT_UNIFORM;

pub fn run(args: RunArgs) -> Result<()> {
    let config = renderer_config(&args);
    tracing::debug!(?config, "resolved renderer configuration");
    let mut renderer = Renderer::new(config);
    renderer.run().context("clouds renderer failed")
}

pub fn initialise_tracing() {
    let default_filter = "warn,clouds=info,renderer=info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error,winit=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn renderer_config(args: &RunArgs) -> RendererConfig {
    RendererConfig {
        surface_size: args.size,
        title: args.title.clone(),
        shift_step: args.step,
        wrap_period: (args.wrap_period > 0.0).then_some(args.wrap_period),
        shader_failure: args.on_shader_error.into(),
        gpu_power: args.gpu_power.into(),
        vsync: if args.no_vsync {
            VsyncMode::Off
        } else {
            VsyncMode::On
        },
    }
}

/// Compiles and links the embedded program, printing the uniform table.
pub fn check_shaders() -> Result<()> {
    let program = build_program().context("embedded cloud shaders failed to build")?;
    println!("cloud shader program: ok");
    for (name, location) in program.uniforms() {
        println!(
            "  uniform {name}: group {} binding {} offset {} (block {} bytes)",
            location.group, location.binding, location.offset, location.block_size
        );
    }
    if program.uniform_location(CLOUD_SHIFT_UNIFORM).is_none() {
        anyhow::bail!("uniform `{CLOUD_SHIFT_UNIFORM}` is not declared by the linked program");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use renderer::{GpuPowerPreference, ShaderFailurePolicy};

    fn config_from(args: &[&str]) -> RendererConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        renderer_config(&cli.run)
    }

    #[test]
    fn zero_wrap_period_means_unbounded() {
        let config = config_from(&["clouds", "--wrap-period", "0"]);
        assert_eq!(config.wrap_period, None);

        let config = config_from(&["clouds"]);
        assert_eq!(config.wrap_period, Some(renderer::DEFAULT_WRAP_PERIOD));
    }

    #[test]
    fn maps_flags_into_renderer_config() {
        let config = config_from(&[
            "clouds",
            "--size",
            "800x600",
            "--title",
            "Sky",
            "--step",
            "0.5",
            "--on-shader-error",
            "abort",
            "--gpu-power",
            "high",
            "--no-vsync",
        ]);
        assert_eq!(config.surface_size, (800, 600));
        assert_eq!(config.title, "Sky");
        assert_eq!(config.shift_step, 0.5);
        assert_eq!(config.shader_failure, ShaderFailurePolicy::Abort);
        assert_eq!(config.gpu_power, GpuPowerPreference::High);
        assert_eq!(config.vsync, VsyncMode::Off);
    }

    #[test]
    fn embedded_shaders_pass_check() {
        check_shaders().unwrap();
    }
}
