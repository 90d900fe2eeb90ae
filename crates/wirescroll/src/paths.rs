use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "WIRESCROLL_CONFIG_DIR";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "Wirescroll";
const APPLICATION: &str = "wirescroll";
const SCENE_FILE: &str = "scene.toml";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    from_env: bool,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        if let Some(config_dir) = env_override(ENV_CONFIG_DIR) {
            return Ok(Self {
                config_dir,
                from_env: true,
            });
        }

        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
            .ok_or_else(|| anyhow!("failed to determine user directories"))?;
        Ok(Self {
            config_dir: project_dirs.config_dir().to_path_buf(),
            from_env: false,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// True when the config directory came from `WIRESCROLL_CONFIG_DIR`.
    pub fn is_overridden(&self) -> bool {
        self.from_env
    }

    pub fn scene_file(&self) -> PathBuf {
        self.config_dir.join(SCENE_FILE)
    }
}

#[cfg(test)]
impl AppPaths {
    pub fn from_config_dir(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            from_env: false,
        }
    }
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.as_os_str().is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}
