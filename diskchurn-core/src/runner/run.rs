use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use super::cleanup::{CleanupReport, cleanup};
use super::config::StressConfig;
use super::error::{Error, Result};
use super::sampler::{RandomSampler, Sampler};
use super::totals::{Totals, aggregate};
use super::worker::{Worker, WorkerExit, WorkerSettings};
use crate::platform::Platform;
use crate::units::format_bytes_iec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preflight {
    pub available_bytes: u64,
    pub required_bytes: u64,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub preflight: Preflight,
    pub totals: Totals,
    pub workers: Vec<WorkerExit>,
    pub cleanup: CleanupReport,
    /// Time from worker start until the last worker stopped.
    pub elapsed: Duration,
}

/// Validates `cfg` and checks that the worst-case footprint fits on the target filesystem.
///
/// Nothing is written to disk here; a failure means no worker was ever started.
pub fn preflight(cfg: &StressConfig, platform: &dyn Platform) -> Result<Preflight> {
    cfg.validate()?;
    let required = cfg.peak_usage()?;

    let available = platform
        .available_bytes(&cfg.path)
        .map_err(|source| Error::SpaceProbe {
            path: cfg.path.clone(),
            source,
        })?;

    tracing::info!(
        path = %cfg.path.display(),
        free = %format_bytes_iec(available),
        "available disk space"
    );

    if required > available {
        tracing::error!(
            expected = %format_bytes_iec(required),
            free = %format_bytes_iec(available),
            "not enough disk space for the configured workload"
        );
        return Err(Error::InsufficientSpace {
            required,
            available,
        });
    }

    Ok(Preflight {
        available_bytes: available,
        required_bytes: required,
    })
}

/// Runs the workload until `stop` resolves, then shuts down and cleans up.
///
/// Shutdown is cooperative: each worker finishes its current write, read, emit and pause before
/// it observes cancellation, so the time between `stop` resolving and this function returning is
/// bounded by one full iteration at the largest file size.
pub async fn run<F>(cfg: StressConfig, platform: Arc<dyn Platform>, stop: F) -> Result<RunOutcome>
where
    F: Future<Output = ()>,
{
    let seed = cfg.seed;
    run_with_samplers(cfg, platform, stop, move |id| match seed {
        Some(seed) => RandomSampler::seeded(seed.wrapping_add(id)),
        None => RandomSampler::from_entropy(),
    })
    .await
}

/// Like [`run`], with the per-worker random source supplied by `sampler_for`.
pub async fn run_with_samplers<F, S, M>(
    cfg: StressConfig,
    platform: Arc<dyn Platform>,
    stop: F,
    mut sampler_for: M,
) -> Result<RunOutcome>
where
    F: Future<Output = ()>,
    S: Sampler + 'static,
    M: FnMut(u64) -> S,
{
    let preflight = preflight(&cfg, platform.as_ref())?;

    tracing::info!(workers = cfg.workers, "starting data generation");

    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel(cfg.channel_capacity);
    let aggregator = tokio::spawn(aggregate(rx));

    let settings = WorkerSettings::from(&cfg);
    let started = Instant::now();
    let mut handles = Vec::with_capacity(usize::try_from(cfg.workers).unwrap_or(0));
    for id in 0..cfg.workers {
        let worker = Worker::new(
            id,
            &cfg.path,
            sampler_for(id),
            settings.clone(),
            platform.clone(),
        );
        handles.push(tokio::spawn(worker.run(tx.clone(), cancel.clone())));
    }
    // Workers hold the only senders from here on, so the channel closes once the last one stops.
    drop(tx);

    stop.await;
    tracing::info!("shutting down");
    cancel.cancel();

    let mut workers = Vec::with_capacity(handles.len());
    let mut join_error = None;
    for h in handles {
        match h.await {
            Ok(exit) => workers.push(exit),
            Err(err) => {
                tracing::error!(error = %err, "worker task failed");
                join_error.get_or_insert(err);
            }
        }
    }
    let elapsed = started.elapsed();

    let (totals, cleanup) = finish(&cfg.path, aggregator.await, join_error).await?;

    Ok(RunOutcome {
        preflight,
        totals,
        workers,
        cleanup,
        elapsed,
    })
}

/// Removes worker files, then reports the first task failure seen during shutdown.
async fn finish(
    dir: &Path,
    totals: std::result::Result<Totals, JoinError>,
    join_error: Option<JoinError>,
) -> Result<(Totals, CleanupReport)> {
    let cleanup = match cleanup(dir).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(path = %dir.display(), error = %err, "cannot clean up");
            CleanupReport::default()
        }
    };

    if let Some(err) = join_error {
        return Err(Error::Join(err));
    }
    let totals = totals.inspect_err(|err| tracing::error!(error = %err, "aggregator task failed"))?;

    Ok((totals, cleanup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::sampler::SequenceSampler;
    use crate::units::MIB;
    use std::io;

    struct FixedSpace(io::Result<u64>);

    impl Platform for FixedSpace {
        fn available_bytes(&self, _path: &Path) -> io::Result<u64> {
            match &self.0 {
                Ok(v) => Ok(*v),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }

        fn drop_caches(&self) -> io::Result<()> {
            Ok(())
        }
    }

    fn small_config(dir: &Path) -> StressConfig {
        StressConfig {
            min_mb: 1,
            max_mb: 2,
            workers: 1,
            chunk_size: 65_536,
            pause: Duration::from_millis(10)..Duration::from_millis(20),
            ..StressConfig::new(dir)
        }
    }

    #[test]
    fn preflight_accepts_exact_fit() {
        let cfg = StressConfig {
            workers: 2,
            max_mb: 10,
            ..StressConfig::new("/data")
        };
        let p = preflight(&cfg, &FixedSpace(Ok(20 * MIB)))
            .unwrap_or_else(|e| panic!("preflight failed: {e}"));
        assert_eq!(p.required_bytes, 20 * MIB);
        assert_eq!(p.available_bytes, 20 * MIB);
    }

    #[test]
    fn preflight_rejects_oversized_workload() {
        let cfg = StressConfig {
            workers: 2,
            max_mb: 10,
            ..StressConfig::new("/data")
        };
        let err = match preflight(&cfg, &FixedSpace(Ok(20 * MIB - 1))) {
            Ok(p) => panic!("expected rejection, got {p:?}"),
            Err(e) => e,
        };
        assert!(matches!(err, Error::InsufficientSpace { required, .. } if required == 20 * MIB));
        assert!(err.is_preflight());
    }

    #[test]
    fn preflight_aborts_when_probe_fails() {
        let cfg = StressConfig::new("/data");
        let probe = FixedSpace(Err(io::Error::new(io::ErrorKind::Unsupported, "no statfs")));
        let err = match preflight(&cfg, &probe) {
            Ok(p) => panic!("expected probe failure, got {p:?}"),
            Err(e) => e,
        };
        assert!(matches!(err, Error::SpaceProbe { .. }));
        assert!(err.is_preflight());
    }

    #[test]
    fn preflight_validates_config_first() {
        let cfg = StressConfig {
            workers: 0,
            ..StressConfig::new("/data")
        };
        let err = match preflight(&cfg, &FixedSpace(Ok(u64::MAX))) {
            Ok(p) => panic!("expected invalid config, got {p:?}"),
            Err(e) => e,
        };
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn rejected_run_creates_no_files() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let cfg = small_config(dir.path());

        let res = run(cfg, Arc::new(FixedSpace(Ok(MIB))), std::future::ready(())).await;
        assert!(matches!(res, Err(Error::InsufficientSpace { .. })));

        let count = std::fs::read_dir(dir.path())
            .unwrap_or_else(|e| panic!("read_dir: {e}"))
            .count();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn immediate_stop_still_shuts_down_cleanly() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let cfg = StressConfig {
            workers: 3,
            ..small_config(dir.path())
        };

        let outcome = run_with_samplers(
            cfg,
            Arc::new(FixedSpace(Ok(u64::MAX))),
            std::future::ready(()),
            |_| SequenceSampler::new([0]),
        )
        .await
        .unwrap_or_else(|e| panic!("run failed: {e}"));

        assert_eq!(outcome.workers.len(), 3);
        let iterations: u64 = outcome.workers.iter().map(|w| w.iterations).sum();
        assert_eq!(outcome.totals.operations, iterations);
        assert!(outcome.cleanup.is_clean());

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap_or_else(|e| panic!("read_dir: {e}"))
            .count();
        assert_eq!(leftovers, 0);
    }

    async fn failed_task() -> JoinError {
        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();
        match handle.await {
            Ok(()) => panic!("aborted task completed"),
            Err(err) => err,
        }
    }

    #[tokio::test]
    async fn failed_aggregator_still_removes_worker_files() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        for name in ["test_file_0", "test_file_1", "keep.txt"] {
            std::fs::write(dir.path().join(name), b"x")
                .unwrap_or_else(|e| panic!("write {name}: {e}"));
        }

        let res = finish(dir.path(), Err(failed_task().await), None).await;
        assert!(matches!(res, Err(Error::Join(_))));

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap_or_else(|e| panic!("read_dir: {e}"))
            .map(|e| match e {
                Ok(e) => e.file_name().to_string_lossy().into_owned(),
                Err(e) => panic!("entry: {e}"),
            })
            .collect();
        names.sort();
        assert_eq!(names, vec!["keep.txt".to_string()]);
    }

    #[tokio::test]
    async fn worker_failure_is_reported_before_totals() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        std::fs::write(dir.path().join("test_file_0"), b"x")
            .unwrap_or_else(|e| panic!("write: {e}"));

        let res = finish(dir.path(), Ok(Totals::default()), Some(failed_task().await)).await;
        assert!(matches!(res, Err(Error::Join(_))));
        assert!(!dir.path().join("test_file_0").exists());
    }
}
