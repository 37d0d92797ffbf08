#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Normal shutdown. Read/write errors counted during the run do not change this.
    Success = 0,

    /// The run was refused before any worker started (working directory, disk space probe,
    /// insufficient space).
    PreflightFailed = 10,

    /// Invalid CLI/config values (bad flags, empty size range, zero workers, etc.).
    InvalidInput = 30,

    /// Internal/runtime error (worker task panics, unexpected IO errors).
    RuntimeError = 40,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
