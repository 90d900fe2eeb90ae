use std::path::PathBuf;

use clap::{Parser, Subcommand};
use renderer::GpuPowerPreference;
use sceneconfig::AntialiasSetting;

#[derive(Parser, Debug)]
#[command(
    name = "wirescroll",
    author,
    version,
    about = "Scroll-driven wireframe sphere",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Scene config file; defaults to `scene.toml` in the config directory when present.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Initial window size in logical pixels (e.g. `1280x800`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialias, global = true)]
    pub antialias: Option<AntialiasSetting>,

    /// Adapter preference: `low` (integrated) or `high` (discrete).
    #[arg(
        long,
        value_name = "POWER",
        value_parser = parse_gpu_power,
        default_value = "low"
    )]
    pub gpu_power: GpuPowerPreference,

    /// Let the cursor position drive the displacement uniforms.
    #[arg(long, global = true)]
    pub pointer: bool,

    /// Fraction of the remaining scroll distance eased per frame (0-1].
    #[arg(long, value_name = "FACTOR", value_parser = parse_ease, global = true)]
    pub ease: Option<f32>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect and validate scene configuration.
    Config(ConfigCommand),
}

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration (file, then CLI overrides).
    Show {
        /// Emit JSON instead of TOML.
        #[arg(long)]
        json: bool,
    },
    /// Validate a scene config file and exit non-zero when it is invalid.
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the resolved config directory and scene file location.
    Where,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_antialias(value: &str) -> Result<AntialiasSetting, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }
    trimmed.parse()
}

pub fn parse_gpu_power(value: &str) -> Result<GpuPowerPreference, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" | "low-power" | "integrated" => Ok(GpuPowerPreference::Low),
        "high" | "high-performance" | "discrete" => Ok(GpuPowerPreference::High),
        other => Err(format!("unknown GPU power preference '{other}'; expected low or high")),
    }
}

pub fn parse_ease(value: &str) -> Result<f32, String> {
    let ease: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid ease factor '{value}'"))?;
    if !ease.is_finite() || ease <= 0.0 || ease > 1.0 {
        return Err(format!("ease factor must be in (0, 1], got {ease}"));
    }
    Ok(ease)
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{trimmed}'"))?;
    if width == 0 || height == 0 {
        return Err("size dimensions must be positive".to_string());
    }
    Ok((width, height))
}
