// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConsumerConfig, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate. The
/// raw file is one layer of [`crate::config::resolve`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file and validate it on its own, without any CLI or
/// environment overlay.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConsumerConfig> {
    let raw_config = load_from_path(&path)?;
    let config = ConsumerConfig::try_from(raw_config)?;
    Ok(config)
}
