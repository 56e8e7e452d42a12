//! Report generation for simulation runs.
//!
//! Generates both JSON and human-readable text reports.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};

use crate::simulation::SimulationReport;
use crate::troop::Troop;

/// Render the per-monkey counts and business level as text
pub fn generate_text_report(report: &SimulationReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "== {}: {} rounds, relief {} ==",
        report.label, report.rounds, report.relief
    ));
    for (index, count) in &report.inspection_counts {
        lines.push(format!("Monkey {} inspected items {} times.", index, count));
    }
    lines.push(format!("Monkey business: {}.", report.business_level));

    lines.join("\n")
}

/// Render every monkey of the troop in the notes format
pub fn render_troop(troop: &Troop) -> String {
    troop
        .agents()
        .iter()
        .map(|agent| agent.to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Write all run reports to `output_path` as a JSON array
pub fn generate_json_report(reports: &[SimulationReport], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(reports).wrap_err("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .wrap_err_with(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Checkpoint;

    fn sample_report() -> SimulationReport {
        SimulationReport {
            label: "relieved".to_string(),
            rounds: 20,
            relief: "divide by 3".to_string(),
            inspection_counts: vec![(0, 101), (1, 95), (2, 7), (3, 105)],
            leaders: Some([3, 0]),
            business_level: 10605,
            checkpoints: vec![Checkpoint {
                round: 1,
                inspection_counts: vec![(0, 2), (1, 4), (2, 3), (3, 5)],
            }],
        }
    }

    #[test]
    fn test_text_report_layout() {
        let text = generate_text_report(&sample_report());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "== relieved: 20 rounds, relief divide by 3 ==");
        assert_eq!(lines[1], "Monkey 0 inspected items 101 times.");
        assert_eq!(lines[4], "Monkey 3 inspected items 105 times.");
        assert_eq!(lines[5], "Monkey business: 10605.");
    }

    #[test]
    fn test_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        generate_json_report(&[sample_report()], &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["business_level"], 10605);
        assert_eq!(value[0]["leaders"][0], 3);
        assert_eq!(value[0]["checkpoints"][0]["round"], 1);
    }
}
