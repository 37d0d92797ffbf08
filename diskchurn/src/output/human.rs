use std::fmt::Write as _;
use std::time::Duration;

use diskchurn_core::RunOutcome;
use diskchurn_core::format_bytes_iec;
use diskchurn_core::runner::StressConfig;

use super::OutputFormatter;

pub(crate) struct HumanReadableOutput;

impl OutputFormatter for HumanReadableOutput {
    fn print_header(&self, cfg: &StressConfig) {
        println!("path: {}", cfg.path.display());
        println!(
            "workers: {} size: {}..{} MB chunk: {}",
            cfg.workers,
            cfg.min_mb,
            cfg.max_mb,
            format_bytes_iec(cfg.chunk_size as u64)
        );
        println!();
    }

    fn print_summary(&self, outcome: &RunOutcome) -> anyhow::Result<()> {
        print!("{}", render(outcome));
        Ok(())
    }
}

fn format_duration_ms(d: Duration) -> String {
    let ms = Duration::from_millis(d.as_millis().min(u128::from(u64::MAX)) as u64);
    if ms.is_zero() {
        return format!("{}us", d.as_micros());
    }
    humantime::format_duration(ms).to_string()
}

pub(crate) fn render(outcome: &RunOutcome) -> String {
    let t = &outcome.totals;
    let mut out = String::new();

    out.push_str("summary\n");
    writeln!(&mut out, "  elapsed: {}", format_duration_ms(outcome.elapsed)).ok();
    writeln!(&mut out, "  operations: {}", t.operations).ok();
    writeln!(&mut out, "  expected: {}", format_bytes_iec(t.bytes)).ok();
    writeln!(
        &mut out,
        "  write: {} (errors {}, max {})",
        format_bytes_iec(t.write_bytes),
        t.write_errors,
        format_duration_ms(t.write_max_duration)
    )
    .ok();
    writeln!(
        &mut out,
        "  read: {} (errors {}, max {})",
        format_bytes_iec(t.read_bytes),
        t.read_errors,
        format_duration_ms(t.read_max_duration)
    )
    .ok();
    writeln!(
        &mut out,
        "  disk: {} available, {} peak",
        format_bytes_iec(outcome.preflight.available_bytes),
        format_bytes_iec(outcome.preflight.required_bytes)
    )
    .ok();

    let per_worker = outcome
        .workers
        .iter()
        .map(|w| format!("{}={}", w.id, w.iterations))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(&mut out, "  iterations by worker: {per_worker}").ok();

    if outcome.cleanup.is_clean() {
        writeln!(&mut out, "  cleanup: removed {}", outcome.cleanup.removed.len()).ok();
    } else {
        writeln!(
            &mut out,
            "  cleanup: removed {} failed {}",
            outcome.cleanup.removed.len(),
            outcome.cleanup.failed.len()
        )
        .ok();
        for (path, err) in &outcome.cleanup.failed {
            writeln!(&mut out, "    {}: {err}", path.display()).ok();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskchurn_core::Totals;
    use diskchurn_core::runner::{CleanupReport, Preflight, WorkerExit};
    use std::path::PathBuf;

    fn outcome() -> RunOutcome {
        RunOutcome {
            preflight: Preflight {
                available_bytes: 3_221_225_472,
                required_bytes: 209_715_200,
            },
            totals: Totals {
                operations: 3,
                bytes: 2_097_152,
                read_bytes: 2_359_296,
                write_bytes: 2_359_296,
                read_errors: 0,
                write_errors: 1,
                read_max_duration: Duration::from_micros(1_250_400),
                write_max_duration: Duration::from_micros(800),
            },
            workers: vec![
                WorkerExit {
                    id: 0,
                    iterations: 2,
                },
                WorkerExit {
                    id: 1,
                    iterations: 1,
                },
            ],
            cleanup: CleanupReport {
                removed: vec![PathBuf::from("/d/test_file_0")],
                failed: Vec::new(),
            },
            elapsed: Duration::from_secs(61),
        }
    }

    #[test]
    fn render_includes_totals_and_cleanup() {
        let text = render(&outcome());
        assert!(text.starts_with("summary\n"));
        assert!(text.contains("elapsed: 1m 1s"));
        assert!(text.contains("operations: 3"));
        assert!(text.contains("expected: 2.00Mi"));
        assert!(text.contains("write: 2.25Mi (errors 1, max 800us)"));
        assert!(text.contains("read: 2.25Mi (errors 0, max 1s 250ms)"));
        assert!(text.contains("disk: 3.00Gi available, 200.00Mi peak"));
        assert!(text.contains("iterations by worker: 0=2 1=1"));
        assert!(text.contains("cleanup: removed 1"));
    }

    #[test]
    fn render_lists_cleanup_failures() {
        let mut o = outcome();
        o.cleanup.failed.push((
            PathBuf::from("/d/test_file_1"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ));

        let text = render(&o);
        assert!(text.contains("cleanup: removed 1 failed 1"));
        assert!(text.contains("/d/test_file_1: denied"));
    }
}
