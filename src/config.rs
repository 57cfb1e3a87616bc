//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/ptree/ptree.toml`
//! 3. Environment variables: `PTREE_*` prefix
//! 4. Command line (`--proc-root`), applied by the caller

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::infrastructure::traits::DEFAULT_NAME_LIMIT;

/// Unified configuration for ptree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory laid out like /proc
    pub proc_root: PathBuf,
    /// Command line bytes captured per process
    pub max_name_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            max_name_len: DEFAULT_NAME_LIMIT,
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub proc_root: Option<PathBuf>,
    pub max_name_len: Option<usize>,
}

/// Get the XDG config directory for ptree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ptree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("ptree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings with layered precedence: defaults, global file, env.
    pub fn load() -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.finish()
    }

    /// Load a single config file over the compiled defaults.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        Self::default()
            .merge_with(&load_raw_settings(path)?)
            .finish()
    }

    /// Override the proc root, e.g. from the command line.
    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self.expand_paths();
        self
    }

    /// Scalar options: overlay wins if Some, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            proc_root: overlay
                .proc_root
                .clone()
                .unwrap_or_else(|| self.proc_root.clone()),
            max_name_len: overlay.max_name_len.unwrap_or(self.max_name_len),
        }
    }

    /// Apply PTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("PTREE"))
            .build()
            .map_err(config_err)?;

        match config.get_string("proc_root") {
            Ok(val) => settings.proc_root = PathBuf::from(val),
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }
        match config.get::<usize>("max_name_len") {
            Ok(val) => settings.max_name_len = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => {
                return Err(ApplicationError::Config {
                    message: format!("PTREE_MAX_NAME_LEN: {e}"),
                })
            }
        }

        Ok(settings)
    }

    fn finish(mut self) -> Result<Self, ApplicationError> {
        self.expand_paths();
        self.validate()?;
        Ok(self)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in the proc root.
    fn expand_paths(&mut self) {
        let raw = self.proc_root.to_string_lossy().into_owned();
        if let Ok(expanded) = shellexpand::full(&raw) {
            self.proc_root = PathBuf::from(expanded.into_owned());
        }
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.max_name_len == 0 {
            return Err(ApplicationError::Config {
                message: "max_name_len must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_no_config_when_created_then_uses_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.proc_root, PathBuf::from("/proc"));
        assert_eq!(settings.max_name_len, 1024);
    }

    #[test]
    fn given_partial_file_when_loading_then_keeps_unspecified_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ptree.toml");
        std::fs::write(&path, "max_name_len = 16\n").unwrap();

        let settings = Settings::load_file(&path).unwrap();

        assert_eq!(settings.max_name_len, 16);
        assert_eq!(settings.proc_root, PathBuf::from("/proc"));
    }

    #[test]
    fn given_zero_name_len_when_loading_then_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ptree.toml");
        std::fs::write(&path, "max_name_len = 0\n").unwrap();

        let result = Settings::load_file(&path);

        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_invalid_toml_when_loading_then_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ptree.toml");
        std::fs::write(&path, "proc_root = [\n").unwrap();

        assert!(matches!(
            Settings::load_file(&path),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_tilde_in_proc_root_when_overriding_then_expands_to_home() {
        let settings = Settings::default().with_proc_root("~/fixtures/proc");

        let root = settings.proc_root.to_string_lossy();
        assert!(!root.starts_with('~'), "tilde should be expanded: {root}");
        assert!(root.ends_with("fixtures/proc"));
    }

    #[test]
    fn given_env_overrides_when_applying_then_they_win_over_file_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ptree.toml");
        std::fs::write(&path, "proc_root = \"/from/file\"\nmax_name_len = 16\n").unwrap();
        let from_file = Settings::load_file(&path).unwrap();

        std::env::set_var("PTREE_PROC_ROOT", "/from/env");
        std::env::set_var("PTREE_MAX_NAME_LEN", "64");
        let overridden = Settings::apply_env_overrides(from_file.clone());

        std::env::set_var("PTREE_MAX_NAME_LEN", "abc");
        let malformed = Settings::apply_env_overrides(from_file);

        std::env::remove_var("PTREE_PROC_ROOT");
        std::env::remove_var("PTREE_MAX_NAME_LEN");

        let overridden = overridden.unwrap();
        assert_eq!(overridden.proc_root, PathBuf::from("/from/env"));
        assert_eq!(overridden.max_name_len, 64);
        assert!(matches!(malformed, Err(ApplicationError::Config { .. })));
    }
}
