use crate::error::{ReleaseTagError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the repository root
pub const LOCAL_CONFIG_FILE: &str = "releasetag.toml";

/// Represents the complete configuration for git-release-tag.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name used in tag messages; defaults to the repository directory name
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    #[serde(default)]
    pub tag: TagConfig,
}

/// Which implementation talks to the repository
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The `git` command-line tool for every operation
    #[default]
    Cli,
    /// libgit2 for reads, the `git` CLI for signing
    Git2,
}

fn default_command_timeout_secs() -> u64 {
    60
}

fn default_message_template() -> String {
    "{project} {version}".to_string()
}

/// Tag annotation settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TagConfig {
    /// Message template; `{project}`, `{version}` and `{tag}` are substituted
    #[serde(default = "default_message_template")]
    pub message: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            message: default_message_template(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project: None,
            backend: Backend::default(),
            command_timeout_secs: default_command_timeout_secs(),
            tag: TagConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| ReleaseTagError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.command_timeout_secs == 0 {
            return Err(ReleaseTagError::config(
                "command_timeout_secs must be greater than zero",
            ));
        }
        if self.tag.message.trim().is_empty() {
            return Err(ReleaseTagError::config("tag.message must not be empty"));
        }
        Ok(())
    }

    /// Project name for tag messages, falling back to the directory name of `repo_root`
    pub fn project_name(&self, repo_root: &Path) -> String {
        self.project
            .clone()
            .or_else(|| {
                repo_root
                    .canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            })
            .unwrap_or_else(|| "Release".to_string())
    }
}

/// User-level config file location
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("git-release-tag").join("config.toml"))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releasetag.toml` in `search_dir`
/// 3. `git-release-tag/config.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>, search_dir: &Path) -> Result<Config> {
    let local = search_dir.join(LOCAL_CONFIG_FILE);

    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if local.exists() {
        local
    } else if let Some(user) = user_config_path().filter(|p| p.exists()) {
        user
    } else {
        tracing::debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let text = fs::read_to_string(&path).map_err(|e| {
        ReleaseTagError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    Config::from_toml(&text)
        .map_err(|e| ReleaseTagError::config(format!("{}: {}", path.display(), e)))
}
