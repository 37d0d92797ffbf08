use serde::Serialize;
use std::io::Write as _;

use diskchurn_core::RunOutcome;
use diskchurn_core::runner::StressConfig;

use super::OutputFormatter;

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    fn print_header(&self, _cfg: &StressConfig) {}

    fn print_summary(&self, outcome: &RunOutcome) -> anyhow::Result<()> {
        let line = build_summary_line(outcome);
        let mut out = std::io::stdout().lock();
        serde_json::to_writer(&mut out, &line)?;
        writeln!(out)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSummaryLine {
    pub kind: &'static str,
    pub elapsed_secs: f64,

    pub operations: u64,
    pub expected_bytes: u64,
    pub write_bytes: u64,
    pub read_bytes: u64,
    pub write_errors: u64,
    pub read_errors: u64,
    pub write_max_duration_ms: f64,
    pub read_max_duration_ms: f64,

    pub available_bytes: u64,
    pub required_bytes: u64,

    pub workers: Vec<JsonWorker>,

    pub files_removed: usize,
    pub cleanup_failures: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonWorker {
    pub id: u64,
    pub iterations: u64,
}

fn build_summary_line(outcome: &RunOutcome) -> JsonSummaryLine {
    let t = &outcome.totals;
    JsonSummaryLine {
        kind: "summary",
        elapsed_secs: outcome.elapsed.as_secs_f64(),
        operations: t.operations,
        expected_bytes: t.bytes,
        write_bytes: t.write_bytes,
        read_bytes: t.read_bytes,
        write_errors: t.write_errors,
        read_errors: t.read_errors,
        write_max_duration_ms: t.write_max_duration.as_micros() as f64 / 1000.0,
        read_max_duration_ms: t.read_max_duration.as_micros() as f64 / 1000.0,
        available_bytes: outcome.preflight.available_bytes,
        required_bytes: outcome.preflight.required_bytes,
        workers: outcome
            .workers
            .iter()
            .map(|w| JsonWorker {
                id: w.id,
                iterations: w.iterations,
            })
            .collect(),
        files_removed: outcome.cleanup.removed.len(),
        cleanup_failures: outcome.cleanup.failed.len(),
    }
}
