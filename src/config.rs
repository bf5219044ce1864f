use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::openai::SamplingConfig;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CATALOG_PATH: &str = "products.csv";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_INDEX_FILE: &str = "index.html";
pub const DEFAULT_LOG_LEVEL: &str = "info";

const CONFIG_DIR_NAME: &str = "shopchat";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub catalog_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub index_file: PathBuf,
    pub log_level: String,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub sampling: SamplingConfig,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingConfig::default(),
            timeout: Duration::from_millis(10_000),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    openai_api_key: Option<String>,
    openai_model: Option<String>,
    openai_base_url: Option<String>,
    catalog_path: Option<PathBuf>,
    bind_addr: Option<String>,
    static_dir: Option<PathBuf>,
    index_file: Option<PathBuf>,
    log_level: Option<String>,
    generation: Option<RawGenerationConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGenerationConfig {
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_ms: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Loads `path` when given, otherwise the discovered default location.
    /// A missing default file is fine; a missing explicit file is not.
    pub fn load_with_path(path: Option<&Path>) -> Result<Self> {
        let (config_path, file_config) = match path {
            Some(path) => {
                if !path.is_file() {
                    bail!("Failed to load config {}: file not found", path.display());
                }
                (path.to_path_buf(), load_file_config(path)?)
            }
            None => {
                let discovered = discover_config_path()?;
                let file_config = load_file_config(&discovered)?;
                (discovered, file_config)
            }
        };

        dotenvy::dotenv().ok();

        let file = file_config.as_ref();
        let file_string = |pick: fn(&RawFileConfig) -> Option<&String>| {
            file.and_then(pick)
                .and_then(|value| non_empty(value).map(ToOwned::to_owned))
        };

        let bind_raw = env_non_empty("SHOPCHAT_BIND")
            .or_else(|| file_string(|cfg| cfg.bind_addr.as_ref()))
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|err| {
            config_error(&config_path, "bind_addr", &format!("'{bind_raw}': {err}"))
        })?;

        let catalog_path = env_non_empty("SHOPCHAT_CATALOG")
            .map(PathBuf::from)
            .or_else(|| file.and_then(|cfg| cfg.catalog_path.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));

        let generation = validate_generation(
            file.and_then(|cfg| cfg.generation.as_ref()),
            &config_path,
        )?;

        Ok(Self {
            openai_api_key: env_non_empty("OPENAI_API_KEY")
                .or_else(|| file_string(|cfg| cfg.openai_api_key.as_ref())),
            openai_model: env_non_empty("OPENAI_MODEL")
                .or_else(|| file_string(|cfg| cfg.openai_model.as_ref()))
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: env_non_empty("OPENAI_BASE_URL")
                .or_else(|| file_string(|cfg| cfg.openai_base_url.as_ref()))
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            catalog_path,
            bind_addr,
            static_dir: file
                .and_then(|cfg| cfg.static_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            index_file: file
                .and_then(|cfg| cfg.index_file.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_FILE)),
            log_level: file_string(|cfg| cfg.log_level.as_ref())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            generation,
            config_path,
        })
    }
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow!("Failed to resolve config path: HOME directory is unavailable"))?;

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    toml::from_str(&config_text)
        .map(Some)
        .map_err(|err| anyhow!("Failed to load config {}: {err}", config_path.display()))
}

fn validate_generation(
    raw: Option<&RawGenerationConfig>,
    config_path: &Path,
) -> Result<GenerationConfig> {
    let mut config = GenerationConfig::default();
    let Some(raw) = raw else {
        return Ok(config);
    };

    if let Some(temperature) = raw.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(config_error(
                config_path,
                "generation.temperature",
                "must be between 0 and 2",
            ));
        }
        config.sampling.temperature = temperature;
    }

    if let Some(max_tokens) = raw.max_tokens {
        if max_tokens == 0 {
            return Err(config_error(
                config_path,
                "generation.max_tokens",
                "must be greater than 0",
            ));
        }
        config.sampling.max_tokens = max_tokens;
    }

    if let Some(timeout_ms) = raw.timeout_ms {
        if timeout_ms == 0 {
            return Err(config_error(
                config_path,
                "generation.timeout_ms",
                "must be greater than 0",
            ));
        }
        config.timeout = Duration::from_millis(timeout_ms);
    }

    Ok(config)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|value| non_empty(&value).map(ToOwned::to_owned))
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn config_error(config_path: &Path, key_path: &str, reason: &str) -> anyhow::Error {
    anyhow!(
        "Failed to load config {}: {key_path}: {reason}",
        config_path.display()
    )
}
