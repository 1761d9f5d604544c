use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use spdlog::info;

use pbnj::config::{read_config, Config};

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()));
    let candidates = [
        exe_dir,
        env::current_dir().ok(),
        dirs::config_dir(),
    ];

    candidates.into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// Reads the given config file, or the first `pbnj.toml` found next to the
/// executable, in the current dir or in the user config dir. Without any
/// file the defaults are used. The environment is applied last.
pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let mut config = match cfg_path.or_else(get_config_path) {
        Some(path) => {
            info!("Reading config from {}", path.display());
            read_config(&path).with_context(|| format!("Could not load {}", path.display()))?
        }
        None => {
            info!("No {} found, using defaults", CFG_FILE_NAME);
            Config::default()
        }
    };

    config.apply_env(|key| env::var(key).ok());
    Ok(config)
}
