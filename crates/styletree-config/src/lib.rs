use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use styletree_engine::TagPolicy;
use thiserror::Error;

/// Overrides the default config location. `~` and `$VARS` are expanded.
pub const CONFIG_PATH_ENV: &str = "STYLETREE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid tag policy in {config_path}: {reason}")]
    ConfigInvalidPolicy { config_path: PathBuf, reason: String },
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: TagPolicy,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        normalize_policy(&mut config.policy);
        validate_policy(&config.policy).map_err(|reason| ConfigError::ConfigInvalidPolicy {
            config_path: config_path.to_path_buf(),
            reason,
        })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Policy from the config file, or the built-in default when there is none.
    pub fn policy_or_default() -> Result<TagPolicy, ConfigError> {
        Ok(Self::load()?.map(|config| config.policy).unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        if let Ok(custom) = std::env::var(CONFIG_PATH_ENV) {
            let custom = PathBuf::from(custom);
            return Self::expand_path(&custom).unwrap_or(custom);
        }
        let config_dir = shellexpand::tilde("~/.config/styletree");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

/// Tag names are matched case-insensitively, so store them lowercased.
fn normalize_policy(policy: &mut TagPolicy) {
    policy.inline_tag = policy.inline_tag.trim().to_ascii_lowercase();
    policy.block_tags = policy
        .block_tags
        .iter()
        .map(|tag| tag.trim().to_ascii_lowercase())
        .collect();
    policy.preserved_tags = policy
        .preserved_tags
        .iter()
        .map(|tag| tag.trim().to_ascii_lowercase())
        .collect();
}

fn validate_policy(policy: &TagPolicy) -> Result<(), String> {
    if policy.inline_tag.is_empty() {
        return Err("inline_tag must not be empty".to_string());
    }
    if !policy.is_plain_inline(&policy.inline_tag) {
        return Err(format!(
            "inline_tag `{}` is also listed as a block or preserved tag",
            policy.inline_tag
        ));
    }
    Ok(())
}
