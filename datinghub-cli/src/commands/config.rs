//! Read resolved configuration values.

use anyhow::{anyhow, Context, Result};
use datinghub_core::Config;
use std::path::Path;

/// Print one dotted config value, e.g. `site.name` or `paths.data`
pub fn get_value(config_path: &Path, key: &str) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config {:?}", config_path))?;
    let value = config
        .get(key)
        .ok_or_else(|| anyhow!("Unknown config key: {}", key))?;
    println!("{}", value);
    Ok(())
}
