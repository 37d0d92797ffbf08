use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::config::{StressConfig, worker_file};
use super::sampler::Sampler;
use super::totals::IterationResult;
use crate::file_io::{read_file, write_file};
use crate::platform::Platform;
use crate::units::{MIB, format_bytes_iec};

/// Where a worker is within its write/read/pace cycle.
///
/// `Stopped` is terminal and only entered from the cancellation check at the top of the loop, so
/// an in-flight write, read or pause always runs to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum WorkerState {
    Running,
    Writing,
    Reading,
    Pacing,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub size_range_mb: Range<u64>,
    pub pause_ms: Range<u64>,
    pub chunk_size: usize,
    pub drop_caches: bool,
}

impl From<&StressConfig> for WorkerSettings {
    fn from(cfg: &StressConfig) -> Self {
        Self {
            size_range_mb: cfg.size_range_mb(),
            pause_ms: cfg.pause_range_ms(),
            chunk_size: cfg.chunk_size,
            drop_caches: cfg.drop_caches,
        }
    }
}

/// Returned by a worker once it reaches [`WorkerState::Stopped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerExit {
    pub id: u64,
    /// Results successfully handed to the aggregator.
    pub iterations: u64,
}

pub struct Worker<S> {
    id: u64,
    file: PathBuf,
    sampler: S,
    settings: WorkerSettings,
    platform: Arc<dyn Platform>,
    state: WorkerState,
}

impl<S: Sampler> Worker<S> {
    pub fn new(
        id: u64,
        dir: &std::path::Path,
        sampler: S,
        settings: WorkerSettings,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            id,
            file: worker_file(dir, id),
            sampler,
            settings,
            platform,
            state: WorkerState::Running,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Runs iterations until `cancel` is observed at an iteration boundary.
    ///
    /// Emitting a result waits for room in the channel. A closed channel also stops the worker.
    pub async fn run(
        mut self,
        results: mpsc::Sender<IterationResult>,
        cancel: CancellationToken,
    ) -> WorkerExit {
        tracing::info!(worker = self.id, file = %self.file.display(), "starting worker");

        let mut iterations: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                break;
            }
            self.enter(WorkerState::Running);

            let result = self.iterate().await;
            let success = result.is_consistent();

            if results.send(result).await.is_err() {
                tracing::warn!(worker = self.id, "results channel closed");
                break;
            }
            iterations = iterations.saturating_add(1);
            tracing::info!(worker = self.id, success, "finished operation");

            self.pace().await;
        }

        self.enter(WorkerState::Stopped);
        tracing::info!(worker = self.id, iterations, "stopping worker");

        WorkerExit {
            id: self.id,
            iterations,
        }
    }

    /// One write followed by one read of the worker's file.
    pub async fn iterate(&mut self) -> IterationResult {
        let size = self
            .sampler
            .pick(self.settings.size_range_mb.clone())
            .saturating_mul(MIB);

        self.enter(WorkerState::Writing);
        tracing::info!(worker = self.id, size = %format_bytes_iec(size), "start write");
        let started = Instant::now();
        let written = write_file(&self.file, size, self.settings.chunk_size).await;
        let write_duration = started.elapsed();
        let (write_bytes, write_error) = match written {
            Ok(n) => (n, false),
            Err(err) => {
                tracing::error!(worker = self.id, error = %err, "write failed");
                (err.bytes, true)
            }
        };
        tracing::info!(
            worker = self.id,
            total = %format_bytes_iec(write_bytes),
            duration = ?write_duration,
            error = write_error,
            "end write"
        );

        if self.settings.drop_caches
            && let Err(err) = self.platform.drop_caches()
        {
            tracing::warn!(worker = self.id, error = %err, "cannot drop page cache");
        }

        self.enter(WorkerState::Reading);
        tracing::info!(worker = self.id, size = %format_bytes_iec(size), "start read");
        let started = Instant::now();
        let read = read_file(&self.file, self.settings.chunk_size).await;
        let read_duration = started.elapsed();
        let (read_bytes, read_error) = match read {
            Ok(n) => (n, false),
            Err(err) => {
                tracing::error!(worker = self.id, error = %err, "read failed");
                (err.bytes, true)
            }
        };
        tracing::info!(
            worker = self.id,
            total = %format_bytes_iec(read_bytes),
            duration = ?read_duration,
            error = read_error,
            "end read"
        );

        IterationResult {
            worker_id: self.id,
            size,
            write_bytes,
            read_bytes,
            write_error,
            read_error,
            write_duration,
            read_duration,
        }
    }

    async fn pace(&mut self) {
        self.enter(WorkerState::Pacing);
        let pause = Duration::from_millis(self.sampler.pick(self.settings.pause_ms.clone()));
        tokio::time::sleep(pause).await;
    }

    fn enter(&mut self, state: WorkerState) {
        tracing::trace!(worker = self.id, from = %self.state, to = %state, "worker state");
        self.state = state;
    }
}
