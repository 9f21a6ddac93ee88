//! Application configuration loaded from YAML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lv_kernel::KernelConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Path of the config file, overriding [`DEFAULT_CONFIG_FILE`].
pub const CONFIG_ENV: &str = "LVSIM_CONFIG";
/// Kernel command, overriding the config file.
pub const KERNEL_ENV: &str = "LVSIM_KERNEL";
pub const DEFAULT_CONFIG_FILE: &str = "lvsim.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub kernel: KernelConfig,
    pub store_path: PathBuf,
    pub animation_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            kernel: KernelConfig::default(),
            store_path: PathBuf::from("calculations_db.json"),
            animation_interval_ms: 50,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let content = serde_yaml::to_string(self).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `$LVSIM_CONFIG` or `./lvsim.yaml` if present, defaults otherwise,
    /// then apply `$LVSIM_KERNEL`.
    pub fn discover() -> AppResult<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config = if path.exists() {
            info!(path = %path.display(), "loading config");
            Self::load(&path)?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        Ok(config.with_kernel_override(std::env::var(KERNEL_ENV).ok()))
    }

    pub fn with_kernel_override(mut self, command: Option<String>) -> Self {
        if let Some(command) = command.filter(|c| !c.trim().is_empty()) {
            self.kernel.command = command;
        }
        self
    }

    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("store_path: runs/history.json\n").unwrap();
        assert_eq!(config.store_path, PathBuf::from("runs/history.json"));
        assert_eq!(config.kernel, KernelConfig::default());
        assert_eq!(config.animation_interval(), Duration::from_millis(50));
    }

    #[test]
    fn kernel_section_parses() {
        let yaml = "kernel:\n  command: /opt/wolfram/MathKernel\n  args: [\"-noprompt\", \"-rawterm\"]\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.kernel.command, "/opt/wolfram/MathKernel");
        assert_eq!(config.kernel.args, vec!["-noprompt", "-rawterm"]);
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("lvsim_config_{}.yaml", std::process::id()));
        let config = AppConfig {
            animation_interval_ms: 120,
            ..AppConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn kernel_override_ignores_blank() {
        let config = AppConfig::default().with_kernel_override(Some("  ".to_string()));
        assert_eq!(config.kernel.command, "WolframKernel");
        let config = config.with_kernel_override(Some("wolframscript".to_string()));
        assert_eq!(config.kernel.command, "wolframscript");
    }

    #[test]
    fn unreadable_file_is_config_error() {
        let err = AppConfig::load(Path::new("/definitely/not/here/lvsim.yaml")).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
