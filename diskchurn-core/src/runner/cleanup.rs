use std::io;
use std::path::{Path, PathBuf};

use super::config::WORKER_FILE_PREFIX;

#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl CleanupReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// `test_file_<digits>`, the name every worker file gets.
pub fn is_worker_file(name: &str) -> bool {
    name.strip_prefix(WORKER_FILE_PREFIX)
        .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
}

/// Removes every worker file directly under `dir`.
///
/// A failed removal is recorded and the remaining files are still attempted. Listing the
/// directory itself is the only hard error.
pub async fn cleanup(dir: &Path) -> io::Result<CleanupReport> {
    let mut report = CleanupReport::default();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !is_worker_file(name) {
            continue;
        }

        let path = entry.path();
        match entry.file_type().await {
            Ok(ft) if ft.is_file() => {}
            Ok(_) => continue,
            Err(err) => {
                tracing::error!(file = %path.display(), error = %err, "cannot stat worker file");
                report.failed.push((path, err));
                continue;
            }
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => report.removed.push(path),
            Err(err) => {
                tracing::error!(file = %path.display(), error = %err, "cannot remove worker file");
                report.failed.push((path, err));
            }
        }
    }

    Ok(report)
}
