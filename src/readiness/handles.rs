//! Detection of files another process is still writing.

use std::path::Path;

/// Whether any process holds `path` open with write access.
///
/// Returns `false` when the platform offers no way to tell.
pub fn open_for_writing(path: &Path) -> bool {
    imp::open_for_writing(path)
}

#[cfg(target_os = "linux")]
mod imp {
    use std::fs;
    use std::path::{Path, PathBuf};

    const O_ACCMODE: u32 = 0o3;
    const O_WRONLY: u32 = 0o1;
    const O_RDWR: u32 = 0o2;

    pub fn open_for_writing(path: &Path) -> bool {
        let target = match fs::canonicalize(path) {
            Ok(p) => p,
            Err(_) => return false,
        };

        let procs = match fs::read_dir("/proc") {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Cannot read /proc, skipping open-handle check: {}", e);
                return false;
            }
        };

        for proc_entry in procs.filter_map(|e| e.ok()) {
            let name = proc_entry.file_name();
            let pid = match name.to_str() {
                Some(s) if s.bytes().all(|b| b.is_ascii_digit()) => s.to_string(),
                _ => continue,
            };

            // Processes of other users are unreadable without privileges.
            let fds = match fs::read_dir(proc_entry.path().join("fd")) {
                Ok(fds) => fds,
                Err(_) => continue,
            };

            for fd_entry in fds.filter_map(|e| e.ok()) {
                let link = match fs::read_link(fd_entry.path()) {
                    Ok(link) => link,
                    Err(_) => continue,
                };
                if link != target {
                    continue;
                }

                let fdinfo = PathBuf::from("/proc")
                    .join(&pid)
                    .join("fdinfo")
                    .join(fd_entry.file_name());
                if writable_fd(&fdinfo) {
                    tracing::debug!(pid = %pid, file = %target.display(), "File open for writing");
                    return true;
                }
            }
        }

        false
    }

    /// A descriptor closed since its link was read is not writable.
    fn writable_fd(fdinfo: &Path) -> bool {
        let content = match fs::read_to_string(fdinfo) {
            Ok(c) => c,
            Err(_) => return false,
        };
        match parse_flags(&content) {
            Some(flags) => matches!(flags & O_ACCMODE, O_WRONLY | O_RDWR),
            None => true,
        }
    }

    pub(super) fn parse_flags(fdinfo: &str) -> Option<u32> {
        fdinfo
            .lines()
            .find_map(|line| line.strip_prefix("flags:"))
            .and_then(|value| u32::from_str_radix(value.trim(), 8).ok())
    }
}

#[cfg(all(unix, not(target_os = "linux")))]
mod imp {
    use std::path::Path;
    use std::process::Command;

    /// Asks `lsof` for the access mode of every descriptor on the file.
    pub fn open_for_writing(path: &Path) -> bool {
        if which::which("lsof").is_err() {
            tracing::debug!("lsof not available, skipping open-handle check");
            return false;
        }

        let output = match Command::new("lsof").arg("-Fa").arg("--").arg(path).output() {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!("lsof failed: {}", e);
                return false;
            }
        };

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| line.strip_prefix('a'))
            .any(|mode| mode.contains('w') || mode.contains('u'))
    }
}

#[cfg(not(unix))]
mod imp {
    use std::path::Path;

    pub fn open_for_writing(_path: &Path) -> bool {
        tracing::debug!("Open-handle check unsupported on this platform");
        false
    }
}
