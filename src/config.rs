//! Settings from the config file and command line

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use fleetview_k8s::{CollectOptions, DEFAULT_TIMEOUT};
use fleetview_types::DEFAULT_POOL_LABEL;

/// Values that may come from the config file or the command line
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub kubeconfig: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub max_concurrency: Option<usize>,
    pub pool_label: Option<String>,
}

impl FileConfig {
    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load the default config file if there is one
    pub fn load_default() -> Result<Self> {
        match default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Fill unset values from `fallback`
    pub fn or(self, fallback: FileConfig) -> Self {
        Self {
            kubeconfig: self.kubeconfig.or(fallback.kubeconfig),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            max_concurrency: self.max_concurrency.or(fallback.max_concurrency),
            pool_label: self.pool_label.or(fallback.pool_label),
        }
    }
}

/// `fleetview/config.toml` under the platform config directory
fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fleetview").join("config.toml"))
}

/// Log file used while the terminal UI owns the screen
pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("fleetview").join("fleetview.log"))
}

/// Resolved settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub kubeconfig: Option<PathBuf>,
    /// None disables the per-context deadline
    pub timeout: Option<Duration>,
    pub max_concurrency: Option<usize>,
    pub pool_label: String,
}

impl Settings {
    pub fn resolve(config: FileConfig) -> Self {
        let timeout = match config.timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_TIMEOUT),
        };

        Self {
            kubeconfig: config.kubeconfig,
            timeout,
            max_concurrency: config.max_concurrency.filter(|&n| n > 0),
            pool_label: config
                .pool_label
                .unwrap_or_else(|| DEFAULT_POOL_LABEL.to_string()),
        }
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            timeout: self.timeout,
            max_concurrency: self.max_concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(FileConfig::default());

        assert_eq!(settings.timeout, Some(DEFAULT_TIMEOUT));
        assert_eq!(settings.max_concurrency, None);
        assert_eq!(settings.pool_label, "pool");
        assert!(settings.kubeconfig.is_none());
    }

    #[test]
    fn test_command_line_overrides_file() {
        let file = FileConfig::parse(
            r#"
            timeout_secs = 10
            max_concurrency = 4
            pool_label = "agentpool"
            "#,
        )
        .unwrap();
        let cli = FileConfig {
            timeout_secs: Some(5),
            ..Default::default()
        };

        let settings = Settings::resolve(cli.or(file));

        assert_eq!(settings.timeout, Some(Duration::from_secs(5)));
        assert_eq!(settings.max_concurrency, Some(4));
        assert_eq!(settings.pool_label, "agentpool");
    }

    #[test]
    fn test_zero_disables_limits() {
        let settings = Settings::resolve(FileConfig {
            timeout_secs: Some(0),
            max_concurrency: Some(0),
            ..Default::default()
        });

        assert_eq!(settings.timeout, None);
        assert_eq!(settings.max_concurrency, None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(FileConfig::parse("timeout = 3").is_err());
    }

    #[test]
    fn test_platform_paths() {
        if let Some(path) = default_path() {
            assert!(path.ends_with("fleetview/config.toml"));
        }
        if let Some(path) = log_path() {
            assert!(path.ends_with("fleetview/fleetview.log"));
        }
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(FileConfig::load(Path::new("/nonexistent/fleetview.toml")).is_err());
    }
}
