//! Render profiles loaded from TOML.
//!
//! Built-in defaults are overridden by a profile file, which is overridden by command line
//! flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ascii_svg::{AnimationOptions, GridConfig, MarkupStyle, Ramp};
use clap::ValueEnum;
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RampPreset {
    #[default]
    Detailed,
    Standard,
    Blocks,
}

impl RampPreset {
    pub fn to_ramp(self) -> Ramp {
        match self {
            RampPreset::Detailed => Ramp::detailed(),
            RampPreset::Standard => Ramp::standard(),
            RampPreset::Blocks => Ramp::blocks(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub grid: GridConfig,
    pub style: MarkupStyle,
    pub animation: AnimationOptions,
    pub ramp: RampPreset,
    /// Custom densest-to-blank characters, takes precedence over `ramp`.
    pub ramp_chars: Option<String>,
}

impl Profile {
    /// Load `path` if given, else the per-user profile if one exists, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile {:?}", path))?;
        let profile: Profile = toml::from_str(&contents)
            .with_context(|| format!("failed to parse profile {:?}", path))?;
        debug!("loaded profile from {:?}", path);
        Ok(profile)
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ascii-svg").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn ramp(&self) -> Result<Ramp> {
        match &self.ramp_chars {
            Some(chars) => Ramp::new(chars.as_str()).context("invalid custom ramp"),
            None => Ok(self.ramp.to_ramp()),
        }
    }
}
