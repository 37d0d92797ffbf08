mod cleanup;
mod config;
mod error;
mod run;
mod sampler;
mod totals;
mod worker;

pub use cleanup::{CleanupReport, cleanup, is_worker_file};
pub use config::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_MB, DEFAULT_MIN_MB, DEFAULT_PAUSE,
    DEFAULT_WORKERS, StressConfig, WORKER_FILE_PREFIX, worker_file,
};
pub use error::{Error, Result};
pub use run::{Preflight, RunOutcome, preflight, run, run_with_samplers};
pub use sampler::{RandomSampler, Sampler, SequenceSampler};
pub use totals::{IterationResult, Totals, aggregate};
pub use worker::{Worker, WorkerExit, WorkerSettings, WorkerState};
