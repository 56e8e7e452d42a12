//! Run configuration: YAML structures, validation, loading and CLI overrides.
//!
//! ```yaml
//! general:
//!   rounds: 10000
//!   log_level: info
//! relief:
//!   policy: modulus
//! notes: "input.txt"
//! checkpoints:
//!   rounds: [1, 20]
//!   every: 1000
//! ```
//!
//! Monkeys come either from a notes file (`notes`, resolved relative to the
//! configuration file) or from an inline `agents` descriptor list.

use std::fs::File;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use log::info;
use serde::{Deserialize, Serialize};

use crate::descriptor::AgentDescriptor;
use crate::parser::parse_notes_file;
use crate::relief::ReliefConfig;

/// Top-level run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub relief: ReliefConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agents: Option<Vec<AgentDescriptor>>,
    #[serde(default)]
    pub checkpoints: CheckpointConfig,
}

/// Shared general configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub rounds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Rounds after which inspection counts are logged and recorded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    #[serde(default)]
    pub rounds: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub every: Option<u64>,
}

impl CheckpointConfig {
    /// True when `round` (1-based) should be recorded
    pub fn is_checkpoint(&self, round: u64) -> bool {
        self.rounds.contains(&round) || self.every.is_some_and(|every| every > 0 && round % every == 0)
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid relief configuration: {0}")]
    InvalidRelief(String),
    #[error("Invalid agent configuration: {0}")]
    InvalidAgents(String),
    #[error("Invalid checkpoint configuration: {0}")]
    InvalidCheckpoints(String),
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.general.rounds == 0 {
            return Err(ValidationError::InvalidGeneral(
                "rounds must be greater than zero".to_string(),
            ));
        }

        if let ReliefConfig::Divide { divisor: 0 } = self.relief {
            return Err(ValidationError::InvalidRelief(
                "divide policy needs a positive divisor".to_string(),
            ));
        }

        match (&self.notes, &self.agents) {
            (Some(_), Some(_)) => {
                return Err(ValidationError::InvalidAgents(
                    "give either notes or agents, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(ValidationError::InvalidAgents(
                    "one of notes or agents is required".to_string(),
                ))
            }
            (Some(path), None) if path.as_os_str().is_empty() => {
                return Err(ValidationError::InvalidAgents(
                    "notes path cannot be empty".to_string(),
                ))
            }
            _ => {}
        }

        if self.checkpoints.every == Some(0) {
            return Err(ValidationError::InvalidCheckpoints(
                "every must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the monkey descriptors, reading `notes` relative to `base_dir`
    pub fn descriptors(&self, base_dir: &Path) -> Result<Vec<AgentDescriptor>> {
        // Guarantees exactly one of notes / agents is set
        self.validate()?;

        match &self.notes {
            Some(notes) => parse_notes_file(&base_dir.join(notes)),
            None => Ok(self.agents.clone().unwrap_or_default()),
        }
    }
}

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;
    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;
    Ok(config)
}

/// CLI arguments that override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub rounds: Option<u64>,
    pub relief: Option<ReliefConfig>,
    pub notes: Option<PathBuf>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(rounds) = overrides.rounds {
        info!("Overriding rounds: {} -> {}", config.general.rounds, rounds);
        config.general.rounds = rounds;
    }

    if let Some(relief) = overrides.relief {
        info!("Overriding relief policy: {} -> {}", config.relief, relief);
        config.relief = relief;
    }

    if let Some(notes) = &overrides.notes {
        info!("Overriding monkey source with notes file {:?}", notes);
        config.notes = Some(notes.clone());
        config.agents = None;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
