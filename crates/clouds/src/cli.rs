use clap::{Parser, Subcommand, ValueEnum};
use renderer::{GpuPowerPreference, ShaderFailurePolicy, DEFAULT_SHIFT_STEP, DEFAULT_WRAP_PERIOD};

#[derive(Parser, Debug)]
#[command(
    name = "clouds",
    author,
    version,
    about = "Animated procedural clouds over a full-screen quad"
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Window size in physical pixels (e.g. `1280x960`).
    #[arg(
        long,
        env = "CLOUDS_SIZE",
        value_name = "WIDTHxHEIGHT",
        value_parser = parse_surface_size,
        default_value = "1280x960"
    )]
    pub size: (u32, u32),

    /// Window title.
    #[arg(long, env = "CLOUDS_TITLE", default_value = "Clouds")]
    pub title: String,

    /// Amount the cloud animation advances per rendered frame.
    #[arg(
        long,
        env = "CLOUDS_STEP",
        value_name = "AMOUNT",
        value_parser = parse_step,
        default_value_t = DEFAULT_SHIFT_STEP
    )]
    pub step: f32,

    /// Wrap the animation parameter at this period; `0` lets it grow unbounded.
    #[arg(
        long,
        env = "CLOUDS_WRAP_PERIOD",
        value_name = "PERIOD",
        value_parser = parse_wrap_period,
        default_value_t = DEFAULT_WRAP_PERIOD
    )]
    pub wrap_period: f32,

    /// What to do when the shader program fails to compile or link.
    #[arg(
        long,
        env = "CLOUDS_ON_SHADER_ERROR",
        value_enum,
        default_value_t = ShaderErrorArg::Continue
    )]
    pub on_shader_error: ShaderErrorArg,

    /// GPU adapter power preference.
    #[arg(long, env = "CLOUDS_GPU_POWER", value_enum, default_value_t = GpuPowerArg::Low)]
    pub gpu_power: GpuPowerArg,

    /// Present without waiting for vertical sync when the surface allows it.
    #[arg(long)]
    pub no_vsync: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect the embedded shader program without opening a window.
    Shaders(ShadersCommand),
}

#[derive(Parser, Debug)]
pub struct ShadersCommand {
    #[command(subcommand)]
    pub action: ShadersAction,
}

#[derive(Subcommand, Debug)]
pub enum ShadersAction {
    /// Compile and link the embedded shaders and report the result.
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShaderErrorArg {
    /// Log the diagnostic and keep the window open.
    Continue,
    /// Exit with an error before the render loop starts.
    Abort,
}

impl From<ShaderErrorArg> for ShaderFailurePolicy {
    fn from(value: ShaderErrorArg) -> Self {
        match value {
            ShaderErrorArg::Continue => ShaderFailurePolicy::Continue,
            ShaderErrorArg::Abort => ShaderFailurePolicy::Abort,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GpuPowerArg {
    Low,
    High,
}

impl From<GpuPowerArg> for GpuPowerPreference {
    fn from(value: GpuPowerArg) -> Self {
        match value {
            GpuPowerArg::Low => GpuPowerPreference::Low,
            GpuPowerArg::High => GpuPowerPreference::High,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_surface_size(spec: &str) -> Result<(u32, u32), String> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| "expected WxH format, e.g. 1280x960".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in size specification '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in size specification '{trimmed}'"))?;

    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".to_string());
    }

    Ok((width, height))
}

pub fn parse_step(value: &str) -> Result<f32, String> {
    let step: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid animation step '{value}'"))?;
    if !step.is_finite() || step < 0.0 {
        return Err("animation step must be a finite, non-negative number".to_string());
    }
    Ok(step)
}

pub fn parse_wrap_period(value: &str) -> Result<f32, String> {
    let period: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid wrap period '{value}'"))?;
    if !period.is_finite() || period < 0.0 {
        return Err("wrap period must be a finite, non-negative number".to_string());
    }
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_surface_sizes() {
        assert_eq!(parse_surface_size("1280x960"), Ok((1280, 960)));
        assert_eq!(parse_surface_size(" 640 X 480 "), Ok((640, 480)));
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("0x960").is_err());
        assert!(parse_surface_size("widexhigh").is_err());
    }

    #[test]
    fn rejects_negative_or_non_finite_steps() {
        assert_eq!(parse_step("0.02"), Ok(0.02));
        assert!(parse_step("-1").is_err());
        assert!(parse_step("inf").is_err());
        assert_eq!(parse_wrap_period("0"), Ok(0.0));
        assert!(parse_wrap_period("NaN").is_err());
    }

    #[test]
    fn defaults_match_classic_window() {
        let cli = Cli::try_parse_from(["clouds"]).unwrap();
        assert_eq!(cli.run.size, (1280, 960));
        assert_eq!(cli.run.title, "Clouds");
        assert_eq!(cli.run.step, DEFAULT_SHIFT_STEP);
        assert_eq!(cli.run.on_shader_error, ShaderErrorArg::Continue);
        assert!(!cli.run.no_vsync);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_shaders_check_subcommand() {
        let cli = Cli::try_parse_from(["clouds", "shaders", "check"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Shaders(ShadersCommand {
                action: ShadersAction::Check
            }))
        ));
    }
}
