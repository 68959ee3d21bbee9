//! Configuration loading from TOML files

mod constants;

pub use constants::{
    ArmorConstants, BlastConstants, CorrosiveConstants, DotConstants, GameConstants, GasConstants,
    HeatConstants,
};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load game constants from a TOML file, rejecting values the engine cannot run with
pub fn load_constants(path: &Path) -> Result<GameConstants, ConfigError> {
    let constants: GameConstants = load_toml(path)?;
    validate_constants(&constants)?;
    Ok(constants)
}

/// Parse game constants from a TOML string
pub fn parse_constants(content: &str) -> Result<GameConstants, ConfigError> {
    let constants: GameConstants = parse_toml(content)?;
    validate_constants(&constants)?;
    Ok(constants)
}

/// Reject constants the engine cannot run with
pub fn validate_constants(constants: &GameConstants) -> Result<(), ConfigError> {
    if constants.armor.cap <= 0.0 {
        return Err(ConfigError::ValidationError(
            "armor.cap must be positive".to_string(),
        ));
    }
    if constants.dot.interval_ticks == 0 {
        return Err(ConfigError::ValidationError(
            "dot.interval_ticks must be at least 1".to_string(),
        ));
    }
    if constants.gas.active_ticks > constants.gas.lifetime_ticks {
        return Err(ConfigError::ValidationError(format!(
            "gas.active_ticks ({}) exceeds gas.lifetime_ticks ({})",
            constants.gas.active_ticks, constants.gas.lifetime_ticks
        )));
    }
    if constants.blast.fuse_ticks > constants.blast.lifetime_ticks {
        return Err(ConfigError::ValidationError(format!(
            "blast.fuse_ticks ({}) exceeds blast.lifetime_ticks ({})",
            constants.blast.fuse_ticks, constants.blast.lifetime_ticks
        )));
    }
    Ok(())
}
