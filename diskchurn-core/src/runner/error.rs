use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("cannot resolve working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    #[error("`workers` must be a positive integer")]
    InvalidWorkers,

    #[error("`min` ({min_mb} MB) must be lower than `max` ({max_mb} MB)")]
    InvalidSizeRange { min_mb: u64, max_mb: u64 },

    #[error("`chunk_size` must be a positive integer")]
    InvalidChunkSize,

    #[error("pause range is empty (min must be <= max)")]
    InvalidPause,

    #[error("results channel capacity must be a positive integer")]
    InvalidChannelCapacity,

    #[error("projected disk usage does not fit in 64 bits")]
    SizeOverflow,

    #[error("cannot query available space at `{}`: {source}", .path.display())]
    SpaceProbe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not enough disk space: need {required} bytes, {available} available")]
    InsufficientSpace { required: u64, available: u64 },
}

impl Error {
    /// Errors raised before any worker starts, leaving nothing to clean up.
    #[must_use]
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::WorkingDirectory(_) | Self::SpaceProbe { .. } | Self::InsufficientSpace { .. }
        )
    }

    /// Errors caused by an invalid configuration.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidWorkers
                | Self::InvalidSizeRange { .. }
                | Self::InvalidChunkSize
                | Self::InvalidPause
                | Self::InvalidChannelCapacity
                | Self::SizeOverflow
        )
    }
}
