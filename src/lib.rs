//! # TroopSim - round-robin item-passing simulation for troops of monkeys
//!
//! A troop is an ordered set of monkeys. Each monkey holds a queue of items
//! identified by their *worry level*, an arbitrary-precision integer. On its
//! turn a monkey inspects every item it held when the turn started: it applies
//! its arithmetic transform, applies the run's relief policy, tests the result
//! for divisibility and throws the item to one of two other monkeys.
//!
//! ## Architecture
//!
//! - `queue`: FIFO item queue
//! - `relief`: relief policies (divide by a constant, reduce modulo the
//!   divisor product, or nothing)
//! - `agent`: monkeys and their transforms
//! - `descriptor`: validated construction input for monkeys
//! - `troop`: round scheduler and top-2 leaderboard
//! - `parser`: notes-format parser producing descriptors
//! - `config`: YAML run configuration and CLI overrides
//! - `simulation`: driver running N rounds with checkpoints
//! - `report`: text and JSON reports
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use troopsim::{parser, relief::ReliefConfig, simulation, troop::Troop};
//!
//! let descriptors = parser::parse_notes_file(Path::new("input.txt"))?;
//! let mut troop = Troop::from_descriptors(&descriptors)?;
//!
//! let spec = simulation::RunSpec {
//!     label: "long run".to_string(),
//!     rounds: 10_000,
//!     relief: ReliefConfig::Modulus,
//!     checkpoints: Default::default(),
//! };
//! let report = simulation::run_simulation(&mut troop, &spec)?;
//! println!("Monkey business: {}", report.business_level);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Each module defines its own `thiserror` enum. File-facing functions return
//! `color_eyre::Result` with context attached.

pub mod agent;
pub mod config;
pub mod descriptor;
pub mod parser;
pub mod queue;
pub mod relief;
pub mod report;
pub mod simulation;
pub mod troop;
