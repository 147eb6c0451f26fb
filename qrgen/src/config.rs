use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Deserialize;

/// Optional settings from `<config_dir>/qrgen/config.toml`. A missing file
/// is the common case and yields the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub chart_endpoint: Option<String>,
    pub qr_server_endpoint: Option<String>,
}

pub fn load() -> Result<Config> {
    let Some(path) = dirs::config_dir().map(|mut p| {
        p.push("qrgen/config.toml");
        p
    }) else {
        bail!("config dir not found")
    };

    if !std::fs::exists(&path)? {
        return Ok(Config::default());
    }
    Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
}
