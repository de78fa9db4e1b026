//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The lottery section is validated into a [`LotteryConfig`] before any
//! engine sees it, so a bad weight table fails at startup rather than
//! mid-reveal.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::types::{LotteryConfig, PickConversion, Team};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub lottery: LotterySection,
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Raw lottery section as written in TOML.
#[derive(Debug, Deserialize, Clone)]
pub struct LotterySection {
    pub top_picks: usize,
    pub teams: Vec<Team>,
    #[serde(default)]
    pub conversions: Vec<PickConversion>,
}

impl LotterySection {
    /// Validate into the engine-facing configuration.
    pub fn to_lottery_config(&self) -> Result<LotteryConfig> {
        LotteryConfig::new(
            self.teams.clone(),
            self.top_picks,
            self.conversions.clone(),
        )
        .context("Invalid [lottery] section")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Reveal log path; the storage layer default applies when unset.
    #[serde(default)]
    pub reveal_log: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}
