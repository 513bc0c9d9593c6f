use anyhow::{Context, Result};

use crate::config::Config;

pub fn handle_config_command() -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load_from(&path)?;
    let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;

    println!("Config file: {}\n", path.display());
    println!("{content}");
    Ok(())
}
