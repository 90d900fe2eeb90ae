use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use renderer::{Antialiasing, CameraOptions, MeshOptions, Renderer, RendererConfig};
use sceneconfig::{AntialiasSetting, SceneConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::paths::AppPaths;

const DEFAULT_SIZE: (u32, u32) = (1280, 800);

/// Scene configuration plus the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub config: SceneConfig,
    pub source: Option<PathBuf>,
}

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let scene = load_scene(&args, &paths)?;
    match &scene.source {
        Some(path) => tracing::info!(path = %path.display(), "loaded scene config"),
        None => tracing::info!("no scene config found; using built-in defaults"),
    }

    let config = renderer_config(&scene.config, &args)?;
    let mut renderer = Renderer::new(config);
    renderer.run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads `--config` if given, else `scene.toml` from the config directory if
/// it exists, else the defaults; then applies CLI overrides.
pub fn load_scene(args: &RunArgs, paths: &AppPaths) -> Result<LoadedScene> {
    let source = match &args.config {
        Some(path) => Some(path.clone()),
        None => {
            let candidate = paths.scene_file();
            candidate.is_file().then_some(candidate)
        }
    };

    let mut config = match &source {
        Some(path) => read_scene_file(path)?,
        None => SceneConfig::default(),
    };
    apply_overrides(&mut config, args)?;
    Ok(LoadedScene { config, source })
}

pub fn read_scene_file(path: &Path) -> Result<SceneConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene config at {}", path.display()))?;
    SceneConfig::from_toml_str(&raw)
        .with_context(|| format!("invalid scene config at {}", path.display()))
}

pub fn apply_overrides(config: &mut SceneConfig, args: &RunArgs) -> Result<()> {
    if let Some(ease) = args.ease {
        config.scroll.ease = ease;
    }
    if args.pointer {
        config.pointer.enabled = true;
    }
    if let Some(antialias) = args.antialias {
        config.render.antialias = Some(antialias);
    }
    config
        .validate()
        .context("command-line overrides produced an invalid configuration")?;
    Ok(())
}

pub fn renderer_config(scene: &SceneConfig, args: &RunArgs) -> Result<RendererConfig> {
    let settings = scene.settings()?;
    Ok(RendererConfig {
        surface_size: args.size.unwrap_or(DEFAULT_SIZE),
        title: "wirescroll".to_string(),
        antialiasing: antialiasing(scene.render.antialias.unwrap_or(AntialiasSetting::Auto)),
        gpu_power: args.gpu_power,
        mesh: MeshOptions {
            radius: scene.mesh.radius,
            detail: scene.mesh.detail,
        },
        camera: CameraOptions {
            fov_degrees: scene.camera.fov,
            near: scene.camera.near,
            far: scene.camera.far,
            distance: scene.camera.distance,
        },
        driver: scene.driver_options(),
        settings,
        sections: scene.sections.clone(),
        wheel_line: scene.scroll.wheel_line,
    })
}

fn antialiasing(setting: AntialiasSetting) -> Antialiasing {
    match setting {
        AntialiasSetting::Auto => Antialiasing::Auto,
        AntialiasSetting::Off => Antialiasing::Off,
        AntialiasSetting::Samples2 => Antialiasing::Samples(2),
        AntialiasSetting::Samples4 => Antialiasing::Samples(4),
        AntialiasSetting::Samples8 => Antialiasing::Samples(8),
        AntialiasSetting::Samples16 => Antialiasing::Samples(16),
    }
}
