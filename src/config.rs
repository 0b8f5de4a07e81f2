//! Configuration loader.
//!
//! `defaults/drybones.default.toml` is embedded into the binary so the documented
//! defaults and runtime behavior stay in sync. [`load`] layers the user's file
//! and `DRYBONES_*` environment variables on top before deserializing into
//! [`DryConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/drybones.default.toml");

/// Name of the per-user configuration file in `$HOME`.
pub const USER_CONFIG_FILE: &str = ".drybones.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryConfig {
    pub display: DisplayConfig,
    pub editing: EditingConfig,
    pub project: ProjectConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub right_margin: usize,
    pub fallback_width: usize,
    pub after_label_delimiter: String,
    pub column_delimiter: String,
    pub group_separator: String,
    pub use_pager: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditingConfig {
    pub output_suffix: String,
    pub max_redirect_attempts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub directory_name: String,
    pub config_file: String,
    /// Accent equivalence table, inside the project directory.
    pub diacritics_file: String,
}

/// `$HOME/.drybones.toml`, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(USER_CONFIG_FILE))
}

/// Defaults, then the user file, then the environment.
pub fn load() -> Result<DryConfig, ConfigError> {
    load_from(user_config_path().as_deref())
}

/// Like [`load`] with an explicit user file. A missing file is skipped.
pub fn load_from(user_file: Option<&Path>) -> Result<DryConfig, ConfigError> {
    layered(user_file, environment())
}

pub fn load_defaults() -> Result<DryConfig, ConfigError> {
    defaults().build()?.try_deserialize()
}

fn defaults() -> ConfigBuilder<DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml))
}

/// `DRYBONES_DISPLAY__RIGHT_MARGIN=4` sets `display.right_margin`.
fn environment() -> Environment {
    Environment::with_prefix("DRYBONES")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn layered(user_file: Option<&Path>, environment: Environment) -> Result<DryConfig, ConfigError> {
    let mut builder = defaults();
    if let Some(path) = user_file {
        tracing::debug!(path = %path.display(), "layering user configuration");
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
    }
    builder.add_source(environment).build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_environment() -> Environment {
        environment().source(Some(HashMap::new()))
    }

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.display.right_margin, 1);
        assert_eq!(config.display.column_delimiter, " | ");
        assert_eq!(config.editing.output_suffix, "_dryout");
        assert_eq!(config.editing.max_redirect_attempts, 100);
        assert_eq!(config.project.directory_name, ".drybones");
        assert_eq!(config.project.diacritics_file, "diacritics.conf");
    }

    #[test]
    fn user_file_is_layered_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[editing]\nmax_redirect_attempts = 3").unwrap();
        let config = layered(Some(file.path()), no_environment()).unwrap();
        assert_eq!(config.editing.max_redirect_attempts, 3);
        assert_eq!(config.editing.output_suffix, "_dryout");
    }

    #[test]
    fn environment_wins_over_user_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[display]\nuse_pager = true\nright_margin = 2").unwrap();
        let variables = HashMap::from([
            ("DRYBONES_DISPLAY__USE_PAGER".to_string(), "false".to_string()),
        ]);
        let config = layered(Some(file.path()), environment().source(Some(variables))).unwrap();
        assert!(!config.display.use_pager);
        assert_eq!(config.display.right_margin, 2);
    }

    #[test]
    fn missing_user_file_is_ignored() {
        let config = layered(Some(Path::new("/nonexistent/drybones.toml")), no_environment()).unwrap();
        assert_eq!(config, load_defaults().unwrap());
    }
}
