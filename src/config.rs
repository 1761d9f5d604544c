use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_PROJECT_ID: &str = "69ah3koy";
pub const DEFAULT_DATASET: &str = "production";
pub const DEFAULT_API_VERSION: &str = "2024-01-01";

pub const ENV_PROJECT_ID: &str = "PUBLIC_SANITY_PROJECT_ID";
pub const ENV_DATASET: &str = "PUBLIC_SANITY_DATASET";
pub const ENV_API_VERSION: &str = "PUBLIC_SANITY_API_VERSION";
pub const ENV_VISUAL_EDITING: &str = "PUBLIC_SANITY_VISUAL_EDITING_ENABLED";
pub const ENV_READ_TOKEN: &str = "SANITY_API_READ_TOKEN";
pub const ENV_STUDIO_PROJECT_ID: &str = "SANITY_STUDIO_PROJECT_ID";
pub const ENV_STUDIO_DATASET: &str = "SANITY_STUDIO_DATASET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error opening configuration file {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("Error parsing configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Connection settings for the content lake.
///
/// Built once at startup and never mutated afterwards; the query loader and
/// the image url builder receive it explicitly.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub visual_editing_enabled: bool,
    pub read_token: Option<String>,
}

impl Default for SanityConfig {
    fn default() -> Self {
        SanityConfig {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            use_cdn: true,
            visual_editing_enabled: false,
            read_token: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Site {
    pub base: String,
    pub preview_origin: String,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            base: "/pbnj-blog".to_string(),
            preview_origin: "https://peanutbutterandjelly.ai".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Studio {
    pub name: String,
    pub title: String,
    pub project_id: Option<String>,
    pub dataset: Option<String>,
}

impl Default for Studio {
    fn default() -> Self {
        Studio {
            name: "default".to_string(),
            title: "PB&J Blog".to_string(),
            project_id: None,
            dataset: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub sanity: SanityConfig,
    #[serde(default)]
    pub site: Site,
    #[serde(default)]
    pub studio: Studio,
    pub log: Option<Log>,
}

impl Config {
    /// Environment values win over whatever the file declared.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(project_id) = lookup(ENV_PROJECT_ID) {
            self.sanity.project_id = project_id;
        }
        if let Some(dataset) = lookup(ENV_DATASET) {
            self.sanity.dataset = dataset;
        }
        if let Some(api_version) = lookup(ENV_API_VERSION) {
            self.sanity.api_version = api_version;
        }
        if let Some(flag) = lookup(ENV_VISUAL_EDITING) {
            // Only the literal "true" turns visual editing on
            self.sanity.visual_editing_enabled = flag == "true";
        }
        if let Some(token) = lookup(ENV_READ_TOKEN) {
            self.sanity.read_token = Some(token);
        }
        if let Some(project_id) = lookup(ENV_STUDIO_PROJECT_ID) {
            self.studio.project_id = Some(project_id);
        }
        if let Some(dataset) = lookup(ENV_STUDIO_DATASET) {
            self.studio.dataset = Some(dataset);
        }
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()));
    match (exe_dir, path.to_str()) {
        (Some(exe_dir), Some(str_path)) => {
            PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
        }
        _ => path,
    }
}

pub fn parse_config(cfg_content: &str) -> Result<Config, ConfigError> {
    let mut cfg = toml::from_str::<Config>(cfg_content)?;

    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path);
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> Result<Config, ConfigError> {
    let cfg_content = fs::read_to_string(cfg_path).map_err(|e| ConfigError::Read {
        path: cfg_path.to_string_lossy().to_string(),
        source: e,
    })?;

    parse_config(&cfg_content)
}
