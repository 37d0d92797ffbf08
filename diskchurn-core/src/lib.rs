mod file_io;
mod platform;
mod units;

pub mod runner;

pub use file_io::{FILLER_BYTE, TransferError, read_file, write_file};
pub use platform::{Platform, SystemPlatform};
pub use runner::{Error, Result, RunOutcome, StressConfig, Totals};
pub use units::{KIB, MIB, format_bytes_iec};
