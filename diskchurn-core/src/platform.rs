use std::io;
use std::path::Path;
#[cfg(any(not(unix), test))]
use std::path::PathBuf;

/// OS services the engine needs but does not implement itself.
pub trait Platform: Send + Sync {
    /// Bytes available to unprivileged users on the filesystem holding `path`.
    fn available_bytes(&self, path: &Path) -> io::Result<u64>;

    /// Asks the OS to drop clean page cache so the next read hits the device.
    fn drop_caches(&self) -> io::Result<()>;
}

/// Probes the host through `statvfs` (or `sysinfo` off unix) and procfs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    #[cfg(unix)]
    fn available_bytes(&self, path: &Path) -> io::Result<u64> {
        let path = std::fs::canonicalize(path)?;
        let stat = nix::sys::statvfs::statvfs(&path)?;
        Ok(u64::from(stat.blocks_available()).saturating_mul(u64::from(stat.fragment_size())))
    }

    #[cfg(not(unix))]
    fn available_bytes(&self, path: &Path) -> io::Result<u64> {
        let path = std::fs::canonicalize(path)?;
        let disks = sysinfo::Disks::new_with_refreshed_list();
        let mounts = disks
            .list()
            .iter()
            .map(|d| (d.mount_point().to_path_buf(), d.available_space()));

        longest_mount_match(&path, mounts).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no mounted filesystem found for {}", path.display()),
            )
        })
    }

    #[cfg(target_os = "linux")]
    fn drop_caches(&self) -> io::Result<()> {
        std::fs::write("/proc/sys/vm/drop_caches", b"3")
    }

    #[cfg(not(target_os = "linux"))]
    fn drop_caches(&self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "dropping the page cache is only supported on linux",
        ))
    }
}

/// Picks the available space of the deepest mount point containing `path`.
#[cfg(any(not(unix), test))]
fn longest_mount_match(
    path: &Path,
    mounts: impl IntoIterator<Item = (PathBuf, u64)>,
) -> Option<u64> {
    mounts
        .into_iter()
        .filter(|(mount, _)| path.starts_with(mount))
        .max_by_key(|(mount, _)| mount.components().count())
        .map(|(_, available)| available)
}
