use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;

use troopsim::config::{self, CliOverrides, Config};
use troopsim::descriptor::AgentDescriptor;
use troopsim::relief::ReliefConfig;
use troopsim::report::{generate_json_report, generate_text_report, render_troop};
use troopsim::simulation::{run_simulation, standard_runs, RunSpec};
use troopsim::troop::Troop;

/// Round-robin item-passing simulation for troops of monkeys
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the monkey notes file (default: input.txt); overrides the config's monkeys
    #[arg(short, long)]
    notes: Option<PathBuf>,

    /// Number of rounds to simulate
    #[arg(short, long)]
    rounds: Option<u64>,

    /// Relief policy: none, modulus or divide:<n>
    #[arg(long)]
    relief: Option<ReliefConfig>,

    /// Write the run reports to this JSON file
    #[arg(long)]
    json_output: Option<PathBuf>,

    /// Print every monkey after reading the notes
    #[arg(long)]
    print_troop: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // The configuration's log level seeds the logger, so it is read first
    let loaded = args.config.as_deref().map(config::load_config).transpose()?;
    let log_level = args
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().and_then(|c| c.general.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("Starting TroopSim");
    if let Some(path) = &args.config {
        info!("Configuration file: {:?}", path);
    }

    let (descriptors, runs) = resolve_runs(&args, loaded)?;

    let mut reports = Vec::with_capacity(runs.len());
    for (i, spec) in runs.iter().enumerate() {
        // Every run starts from the notes as written
        let mut troop = Troop::from_descriptors(&descriptors)
            .wrap_err("Monkey descriptors do not form a valid troop")?;
        if args.print_troop && i == 0 {
            println!("{}\n", render_troop(&troop));
        }

        let report = run_simulation(&mut troop, spec)?;
        println!("{}\n", generate_text_report(&report));
        reports.push(report);
    }

    if let Some(path) = &args.json_output {
        generate_json_report(&reports, path)?;
    }

    info!("Simulation completed successfully");
    Ok(())
}

/// Work out which monkeys to build and which runs to perform
fn resolve_runs(args: &Args, loaded: Option<Config>) -> Result<(Vec<AgentDescriptor>, Vec<RunSpec>)> {
    if let (Some(mut cfg), Some(path)) = (loaded, &args.config) {
        let overrides = CliOverrides {
            rounds: args.rounds,
            relief: args.relief,
            notes: args.notes.clone(),
        };
        config::apply_overrides(&mut cfg, &overrides)?;

        // Notes given on the command line are relative to the working directory
        let base_dir = match &args.notes {
            Some(_) => Path::new("."),
            None => path.parent().unwrap_or_else(|| Path::new(".")),
        };
        return Ok((cfg.descriptors(base_dir)?, vec![RunSpec::from_config(&cfg)]));
    }

    let notes = args.notes.clone().unwrap_or_else(|| PathBuf::from("input.txt"));
    let descriptors = troopsim::parser::parse_notes_file(&notes)?;
    let runs = if args.rounds.is_none() && args.relief.is_none() {
        standard_runs()
    } else {
        vec![RunSpec {
            label: "custom run".to_string(),
            rounds: args.rounds.unwrap_or(20),
            relief: args.relief.unwrap_or(ReliefConfig::Divide { divisor: 3 }),
            checkpoints: Default::default(),
        }]
    };
    Ok((descriptors, runs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["troopsim", "--notes", "notes.txt"]);

        assert_eq!(args.notes, Some(PathBuf::from("notes.txt")));
        assert!(args.config.is_none());
        assert!(args.rounds.is_none());
        assert!(args.relief.is_none());
    }

    #[test]
    fn test_relief_and_rounds_args() {
        let args = Args::parse_from([
            "troopsim",
            "--rounds",
            "10000",
            "--relief",
            "divide:3",
            "--json-output",
            "out.json",
        ]);

        assert!(args.notes.is_none());
        assert_eq!(args.rounds, Some(10000));
        assert_eq!(args.relief, Some(ReliefConfig::Divide { divisor: 3 }));
        assert_eq!(args.json_output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_invalid_relief_rejected() {
        let result = Args::try_parse_from(["troopsim", "--relief", "halve"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_notes_flag_overrides_config_agents() {
        let dir = tempfile::tempdir().unwrap();
        let notes_path = dir.path().join("notes.txt");
        std::fs::write(&notes_path, include_str!("../tests/data/sample_notes.txt")).unwrap();

        let config_path = dir.path().join("run.yaml");
        std::fs::write(
            &config_path,
            r#"
general:
  rounds: 20
relief:
  policy: divide
  divisor: 3
agents:
  - index: 0
    starting_items: [1]
    operation: add
    operand: 1
    test_divisor: 2
    target_if_divisible: 0
    target_if_not: 0
"#,
        )
        .unwrap();

        let args = Args::parse_from([
            OsStr::new("troopsim"),
            OsStr::new("--config"),
            config_path.as_os_str(),
            OsStr::new("--notes"),
            notes_path.as_os_str(),
        ]);
        let loaded = config::load_config(&config_path).unwrap();
        let (descriptors, runs) = resolve_runs(&args, Some(loaded)).unwrap();

        assert_eq!(descriptors.len(), 4);
        assert_eq!(descriptors[2].test_divisor, 13);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].rounds, 20);

        let mut troop = Troop::from_descriptors(&descriptors).unwrap();
        let report = run_simulation(&mut troop, &runs[0]).unwrap();
        assert_eq!(report.business_level, 10605);
    }

    #[test]
    fn test_config_agents_used_without_notes_flag() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("run.yaml");
        std::fs::write(
            &config_path,
            "general:\n  rounds: 3\nagents:\n  - index: 0\n    starting_items: [1]\n    operation: add\n    operand: 1\n    test_divisor: 2\n    target_if_divisible: 0\n    target_if_not: 0\n",
        )
        .unwrap();

        let args = Args::parse_from([
            OsStr::new("troopsim"),
            OsStr::new("--config"),
            config_path.as_os_str(),
        ]);
        let loaded = config::load_config(&config_path).unwrap();
        let (descriptors, runs) = resolve_runs(&args, Some(loaded)).unwrap();

        assert_eq!(descriptors.len(), 1);
        assert_eq!(runs[0].rounds, 3);
    }
}
