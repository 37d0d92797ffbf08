use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{Error, Result};
use crate::units::MIB;

pub const DEFAULT_WORKERS: u64 = 2;
pub const DEFAULT_MIN_MB: u64 = 5;
pub const DEFAULT_MAX_MB: u64 = 100;
pub const DEFAULT_CHUNK_SIZE: usize = 262_144;
pub const DEFAULT_PAUSE: Range<Duration> = Duration::from_millis(200)..Duration::from_millis(1200);
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// File name prefix shared by every worker file.
pub const WORKER_FILE_PREFIX: &str = "test_file_";

#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Directory the worker files are created in.
    pub path: PathBuf,
    /// Inclusive lower bound of the file size, in megabytes.
    pub min_mb: u64,
    /// Exclusive upper bound of the file size, in megabytes.
    pub max_mb: u64,
    pub workers: u64,
    pub chunk_size: usize,
    /// Pause between iterations, picked uniformly from this range.
    pub pause: Range<Duration>,
    /// Base seed; worker `n` uses `seed + n`. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Drop the OS page cache between the write and the read of each iteration.
    pub drop_caches: bool,
    pub channel_capacity: usize,
}

impl StressConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            min_mb: DEFAULT_MIN_MB,
            max_mb: DEFAULT_MAX_MB,
            workers: DEFAULT_WORKERS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            pause: DEFAULT_PAUSE,
            seed: None,
            drop_caches: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Uses the process working directory as the target path.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(Error::WorkingDirectory)?;
        Ok(Self::new(cwd))
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidWorkers);
        }
        if self.min_mb >= self.max_mb {
            return Err(Error::InvalidSizeRange {
                min_mb: self.min_mb,
                max_mb: self.max_mb,
            });
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }
        if self.pause.start > self.pause.end {
            return Err(Error::InvalidPause);
        }
        if self.channel_capacity == 0 {
            return Err(Error::InvalidChannelCapacity);
        }
        self.peak_usage()?;
        Ok(())
    }

    /// The megabyte range a worker draws its file size from.
    pub fn size_range_mb(&self) -> Range<u64> {
        self.min_mb..self.max_mb
    }

    /// Worst-case disk usage if every worker writes a max-sized file at once.
    pub fn peak_usage(&self) -> Result<u64> {
        self.workers
            .checked_mul(self.max_mb)
            .and_then(|v| v.checked_mul(MIB))
            .ok_or(Error::SizeOverflow)
    }

    pub fn pause_range_ms(&self) -> Range<u64> {
        duration_ms(self.pause.start)..duration_ms(self.pause.end)
    }
}

fn duration_ms(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

/// Path of the file owned by worker `id`.
pub fn worker_file(dir: &Path, id: u64) -> PathBuf {
    dir.join(format!("{WORKER_FILE_PREFIX}{id}"))
}
