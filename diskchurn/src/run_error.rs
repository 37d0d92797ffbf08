use crate::exit_codes::ExitCode;

#[derive(Debug)]
pub enum RunError {
    InvalidInput(anyhow::Error),
    Preflight(anyhow::Error),
    RuntimeError(anyhow::Error),
}

impl RunError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::InvalidInput,
            Self::Preflight(_) => ExitCode::PreflightFailed,
            Self::RuntimeError(_) => ExitCode::RuntimeError,
        }
    }

    #[must_use]
    pub fn anyhow(&self) -> &anyhow::Error {
        match self {
            Self::InvalidInput(e) | Self::Preflight(e) | Self::RuntimeError(e) => e,
        }
    }
}

impl From<diskchurn_core::Error> for RunError {
    fn from(err: diskchurn_core::Error) -> Self {
        if err.is_invalid_input() {
            Self::InvalidInput(err.into())
        } else if err.is_preflight() {
            Self::Preflight(err.into())
        } else {
            Self::RuntimeError(err.into())
        }
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.anyhow())
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.anyhow().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskchurn_core::Error;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (Error::InvalidWorkers, ExitCode::InvalidInput),
            (
                Error::InvalidSizeRange {
                    min_mb: 3,
                    max_mb: 1,
                },
                ExitCode::InvalidInput,
            ),
            (
                Error::InsufficientSpace {
                    required: 2,
                    available: 1,
                },
                ExitCode::PreflightFailed,
            ),
            (
                Error::WorkingDirectory(std::io::Error::other("gone")),
                ExitCode::PreflightFailed,
            ),
            (Error::SizeOverflow, ExitCode::InvalidInput),
        ];

        for (err, code) in cases {
            assert_eq!(RunError::from(err).exit_code(), code);
        }
    }
}
