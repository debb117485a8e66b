//! Loading of encounter configuration files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use path_defence_core::SimulationConfig;

/// Reads the encounter configuration, falling back to defaults without a path.
pub(crate) fn load(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid configuration in {}", path.display()))
}

fn parse(text: &str) -> Result<SimulationConfig> {
    let config: SimulationConfig = toml::from_str(text).context("malformed TOML")?;
    config.validate()?;
    Ok(config)
}
