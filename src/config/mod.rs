use crate::global;
use crate::recorder::{AudioOptions, FactoryOptions, RecordOptions, DEFAULT_FRAME_RATE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recorder: RecorderConfig,
    pub audio: AudioOptions,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub frame_rate: u32,
    /// Milliseconds between chunks; unset records one chunk per session.
    pub time_slice_ms: Option<u32>,
    /// Forwarded verbatim to the record device, e.g. `mimeType`.
    pub record_options: RecordOptions,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            time_slice_ms: Some(100),
            record_options: RecordOptions::new(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub download_dir: Option<PathBuf>,
    pub host_name: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Reads `path`, writing the default config there first if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, creating default at {:?}", path);
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        global::config_file()
    }

    pub fn factory_options(&self) -> FactoryOptions {
        FactoryOptions {
            frame_rate: self.recorder.frame_rate,
            audio: self.audio.clone(),
            record_options: self.recorder.record_options.clone(),
        }
    }

    pub fn download_dir(&self) -> Result<PathBuf> {
        match &self.output.download_dir {
            Some(dir) => Ok(dir.clone()),
            None => global::download_dir(),
        }
    }
}
