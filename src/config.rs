use std::path::Path;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::parse::ParseMode;

pub const DEFAULT_CONFIG_PATH: &str = "closings.toml";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub mode: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
    pub prompt_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: ParseMode,
    pub model: String,
    pub api_base: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub prompt_dir: Option<String>,
    pub json: bool,
    pub interactive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ParseMode::Summary,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            prompt_dir: None,
            json: false,
            interactive: false,
        }
    }
}

impl Config {
    /// Load `--config` (which must exist) or the default file (which may
    /// be absent), then apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_config = match cli.config {
            Some(ref path) => {
                let path = Path::new(path);
                if !path.exists() {
                    return Err(Error::ConfigNotFound(path.to_path_buf()));
                }
                parse_config(&std::fs::read_to_string(path)?)?
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    parse_config(&std::fs::read_to_string(path)?)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        merge(file_config, cli)
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ConfigFile) -> Result<()> {
    if let Some(ref mode) = config.mode {
        mode.parse::<ParseMode>()?;
    }
    if let Some(ref model) = config.model
        && model.trim().is_empty()
    {
        return Err(Error::ConfigValidation("model must not be empty".to_string()));
    }
    if let Some(ref env) = config.api_key_env
        && env.trim().is_empty()
    {
        return Err(Error::ConfigValidation(
            "api_key_env must not be empty".to_string(),
        ));
    }
    if let Some(timeout) = config.timeout_secs
        && timeout == 0
    {
        return Err(Error::ConfigValidation(
            "timeout_secs must be > 0".to_string(),
        ));
    }
    Ok(())
}

pub fn merge(file: ConfigFile, cli: &Cli) -> Result<Config> {
    let mode = match cli.mode.as_ref().or(file.mode.as_ref()) {
        Some(mode) => mode.parse()?,
        None => ParseMode::default(),
    };
    let model = cli
        .model
        .clone()
        .or(file.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    if model.trim().is_empty() {
        return Err(Error::ConfigValidation("model must not be empty".to_string()));
    }
    let timeout_secs = cli
        .timeout_secs
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(Error::ConfigValidation(
            "timeout_secs must be > 0".to_string(),
        ));
    }

    Ok(Config {
        mode,
        model,
        api_base: file
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        api_key_env: file
            .api_key_env
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
        timeout_secs,
        prompt_dir: cli.prompt_dir.clone().or(file.prompt_dir),
        json: cli.json,
        interactive: cli.interactive,
    })
}
