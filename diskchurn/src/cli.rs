use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use diskchurn_core::runner::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_MB, DEFAULT_MIN_MB, DEFAULT_WORKERS};

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    HumanReadable,
    /// Emit the final totals as a single JSON line on stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "diskchurn",
    author,
    version,
    about = "Disk I/O stress test: concurrent workers writing and reading back random-sized files",
    long_about = "diskchurn starts a fixed pool of workers. Each worker owns one file (`test_file_<id>`) in the target directory and repeatedly writes it with a random size, reads it back and pauses.\n\nThe run stops on SIGINT/SIGTERM (or after --duration). Workers finish their current iteration, generated files are removed and the totals are printed.\n\nBefore starting, the available space at the target path must cover `workers * max` megabytes.",
    after_help = "Examples:\n  diskchurn --path /mnt/scratch\n  diskchurn --workers 8 --min 1 --max 50 --duration 10m\n  diskchurn --cs 65536 --drop-caches --output json\n\nLogging is controlled with RUST_LOG (default: info)."
)]
pub struct Cli {
    /// Destination directory (defaults to the current working directory)
    #[arg(long, env = "DISKCHURN_PATH")]
    pub path: Option<PathBuf>,

    /// Minimum file size in megabytes
    #[arg(long, env = "DISKCHURN_MIN_MB", default_value_t = DEFAULT_MIN_MB)]
    pub min: u64,

    /// Maximum file size in megabytes (exclusive)
    #[arg(long, env = "DISKCHURN_MAX_MB", default_value_t = DEFAULT_MAX_MB)]
    pub max: u64,

    /// Number of workers
    #[arg(long, env = "DISKCHURN_WORKERS", default_value_t = DEFAULT_WORKERS)]
    pub workers: u64,

    /// Chunk size in bytes used for both writes and reads
    #[arg(
        long = "chunk-size",
        visible_alias = "cs",
        env = "DISKCHURN_CHUNK_SIZE",
        default_value_t = DEFAULT_CHUNK_SIZE
    )]
    pub chunk_size: usize,

    /// Shortest pause between iterations (e.g. 200ms)
    #[arg(long, value_parser = humantime::parse_duration, default_value = "200ms")]
    pub pause_min: Duration,

    /// Longest pause between iterations, exclusive (e.g. 1200ms)
    #[arg(long, value_parser = humantime::parse_duration, default_value = "1200ms")]
    pub pause_max: Duration,

    /// Stop on its own after this long (e.g. 30s, 10m); otherwise run until interrupted
    #[arg(long, value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,

    /// Seed for file sizes and pauses, for reproducible runs
    #[arg(long, env = "DISKCHURN_SEED")]
    pub seed: Option<u64>,

    /// Drop the OS page cache between write and read (linux, needs root)
    #[arg(long)]
    pub drop_caches: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,
}
