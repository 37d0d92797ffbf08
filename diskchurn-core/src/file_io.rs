use std::path::Path;

use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};

/// Byte written repeatedly into every test file (ASCII `'0'`).
pub const FILLER_BYTE: u8 = b'0';

/// A failed transfer, carrying how far it got before the first error.
#[derive(Debug, thiserror::Error)]
#[error("{source} (after {bytes} bytes)")]
pub struct TransferError {
    pub bytes: u64,
    #[source]
    pub source: std::io::Error,
}

impl TransferError {
    fn new(bytes: u64, source: std::io::Error) -> Self {
        Self { bytes, source }
    }
}

/// Creates (or truncates) `path` and fills it with `chunk_size` chunks until more than `size`
/// bytes were written.
///
/// The last chunk always overshoots: the file is never smaller than `size` and exceeds it by at
/// most one chunk. A partially written file is left on disk when an error occurs.
pub async fn write_file(path: &Path, size: u64, chunk_size: usize) -> Result<u64, TransferError> {
    let chunk = vec![FILLER_BYTE; chunk_size.max(1)];
    let mut total: u64 = 0;

    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| TransferError::new(total, e))?;

    while total <= size {
        file.write_all(&chunk)
            .await
            .map_err(|e| TransferError::new(total, e))?;
        total = total.saturating_add(chunk.len() as u64);
    }

    // tokio's File buffers the last write in a background task; flush surfaces its error.
    file.flush()
        .await
        .map_err(|e| TransferError::new(total, e))?;

    Ok(total)
}

/// Reads `path` to the end in `chunk_size` chunks and returns the number of bytes read.
pub async fn read_file(path: &Path, chunk_size: usize) -> Result<u64, TransferError> {
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total: u64 = 0;

    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| TransferError::new(total, e))?;

    loop {
        match file.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => total = total.saturating_add(n as u64),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransferError::new(total, e)),
        }
    }

    Ok(total)
}
