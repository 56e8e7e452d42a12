//! Thin simulation driver: runs a troop for a number of rounds and collects
//! checkpoint snapshots and the final result.

use color_eyre::eyre::{Result, WrapErr};
use log::{debug, info};
use serde::Serialize;

use crate::config::{CheckpointConfig, Config};
use crate::relief::ReliefConfig;
use crate::troop::Troop;

/// One simulation to run against a freshly built troop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub label: String,
    pub rounds: u64,
    pub relief: ReliefConfig,
    pub checkpoints: CheckpointConfig,
}

impl RunSpec {
    pub fn from_config(config: &Config) -> Self {
        Self {
            label: "configured run".to_string(),
            rounds: config.general.rounds,
            relief: config.relief,
            checkpoints: config.checkpoints.clone(),
        }
    }
}

/// The two classic runs: 20 rounds dividing by 3, then 10000 rounds modulo
/// the divisor product with periodic checkpoints.
pub fn standard_runs() -> Vec<RunSpec> {
    vec![
        RunSpec {
            label: "relieved".to_string(),
            rounds: 20,
            relief: ReliefConfig::Divide { divisor: 3 },
            checkpoints: CheckpointConfig::default(),
        },
        RunSpec {
            label: "unrelieved".to_string(),
            rounds: 10_000,
            relief: ReliefConfig::Modulus,
            checkpoints: CheckpointConfig {
                rounds: vec![1, 20],
                every: Some(1000),
            },
        },
    ]
}

/// Inspection counts recorded after a given round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    pub round: u64,
    pub inspection_counts: Vec<(usize, u64)>,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub label: String,
    pub rounds: u64,
    pub relief: String,
    pub inspection_counts: Vec<(usize, u64)>,
    pub leaders: Option<[usize; 2]>,
    pub business_level: u128,
    pub checkpoints: Vec<Checkpoint>,
}

/// Run `spec.rounds` rounds on `troop`
pub fn run_simulation(troop: &mut Troop, spec: &RunSpec) -> Result<SimulationReport> {
    let relief = spec
        .relief
        .build(troop)
        .wrap_err_with(|| format!("Cannot build relief policy for run '{}'", spec.label))?;
    info!(
        "Starting run '{}': {} rounds, relief {}",
        spec.label,
        spec.rounds,
        relief.describe()
    );

    let mut checkpoints = Vec::new();
    for round in 1..=spec.rounds {
        debug!("Starting round {}...", round);
        troop
            .run_round(relief.as_ref())
            .wrap_err_with(|| format!("Round {} of run '{}' failed", round, spec.label))?;

        if spec.checkpoints.is_checkpoint(round) {
            let counts = troop.inspection_counts();
            info!("After round {}: inspection counts {:?}", round, counts);
            checkpoints.push(Checkpoint {
                round,
                inspection_counts: counts,
            });
        }
    }

    let report = SimulationReport {
        label: spec.label.clone(),
        rounds: spec.rounds,
        relief: relief.describe(),
        inspection_counts: troop.inspection_counts(),
        leaders: troop.leaders(),
        business_level: troop.business_level(),
        checkpoints,
    };
    info!("Run '{}' finished with business level {}", spec.label, report.business_level);
    Ok(report)
}
