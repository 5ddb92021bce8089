//! Bounded-lifetime cleanup of uploaded files.
//!
//! `release_after_use` is the per-request path; `UploadJanitor` is the
//! backstop that sweeps orphans on a fixed interval until cancelled.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Deletes `path` if it exists. Errors are logged, never returned.
///
/// Returns whether this call removed the file; a file that is already gone
/// (for example swept concurrently) is not an error.
pub async fn release_after_use(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Temporary upload deleted");
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to delete temporary upload");
            false
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub removed: usize,
    pub failed: usize,
}

/// Deletes regular files directly inside `dir` whose age exceeds `max_age`.
/// Symlinks are aged by the link itself and removed without touching their
/// target. A missing directory is a no-op.
pub async fn sweep(dir: &Path, max_age: Duration) -> SweepReport {
    sweep_at(dir, max_age, SystemTime::now()).await
}

async fn sweep_at(dir: &Path, max_age: Duration, now: SystemTime) -> SweepReport {
    sweep_with(dir, max_age, now, |path: PathBuf| tokio::fs::remove_file(path)).await
}

async fn sweep_with<F, Fut>(
    dir: &Path,
    max_age: Duration,
    now: SystemTime,
    remove: F,
) -> SweepReport
where
    F: Fn(PathBuf) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let mut report = SweepReport::default();

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return report,
        Err(e) => {
            error!(dir = %dir.display(), error = %e, "Upload sweep could not list directory");
            return report;
        }
    };

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                error!(dir = %dir.display(), error = %e, "Upload sweep stopped listing early");
                report.failed += 1;
                break;
            }
        };

        // Each file gets its own error boundary so one bad entry never blocks the rest.
        match sweep_entry(&entry.path(), max_age, now, &remove).await {
            Ok(Some(removed)) => {
                report.scanned += 1;
                if removed {
                    report.removed += 1;
                }
            }
            Ok(None) => {}
            Err(e) => {
                report.scanned += 1;
                report.failed += 1;
                warn!(path = %entry.path().display(), error = %e, "Upload sweep failed for file");
            }
        }
    }

    report
}

/// `Ok(None)` for directories and vanished entries, `Ok(Some(removed))` otherwise.
async fn sweep_entry<F, Fut>(
    path: &Path,
    max_age: Duration,
    now: SystemTime,
    remove: &F,
) -> io::Result<Option<bool>>
where
    F: Fn(PathBuf) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let file_type = metadata.file_type();
    if !file_type.is_file() && !file_type.is_symlink() {
        return Ok(None);
    }

    // Future timestamps count as brand new.
    let age = now
        .duration_since(metadata.modified()?)
        .unwrap_or(Duration::ZERO);
    if age <= max_age {
        return Ok(Some(false));
    }

    match remove(path.to_path_buf()).await {
        Ok(()) => {
            info!(path = %path.display(), age_secs = age.as_secs(), "Cleaned up old upload");
            Ok(Some(true))
        }
        // Released by its request handler in the meantime.
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Some(false)),
        Err(e) => Err(e),
    }
}

/// Periodic sweep of the upload directory, owned by the process lifecycle.
#[derive(Debug, Clone)]
pub struct UploadJanitor {
    dir: PathBuf,
    max_age: Duration,
    interval: Duration,
}

impl UploadJanitor {
    pub fn new(dir: impl Into<PathBuf>, max_age: Duration, interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            max_age,
            interval,
        }
    }

    pub async fn sweep_now(&self) -> SweepReport {
        sweep(&self.dir, self.max_age).await
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Sweeps immediately, then once per interval, until `cancel` is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            dir = %self.dir.display(),
            max_age_secs = self.max_age.as_secs(),
            interval_secs = self.interval.as_secs(),
            "Upload janitor started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Upload janitor stopping");
                    break;
                }
                _ = interval.tick() => {
                    let report = self.sweep_now().await;
                    if report.removed > 0 || report.failed > 0 {
                        info!(
                            scanned = report.scanned,
                            removed = report.removed,
                            failed = report.failed,
                            "Upload sweep finished"
                        );
                    } else {
                        debug!(scanned = report.scanned, "Upload sweep: nothing to remove");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    const HOUR: Duration = Duration::from_secs(3600);

    fn write_file(dir: &Path, name: &str, age: Duration) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
        path
    }

    #[tokio::test]
    async fn test_release_twice_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "resume-1.pdf", Duration::ZERO);

        assert!(release_after_use(&path).await);
        assert!(!release_after_use(&path).await);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!release_after_use(&dir.path().join("never-existed.pdf")).await);
    }

    #[tokio::test]
    async fn test_concurrent_release_of_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "resume-2.pdf", Duration::ZERO);

        let (a, b) = tokio::join!(release_after_use(&path), release_after_use(&path));
        assert!(a ^ b, "exactly one deleter removes the file");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_old_files() {
        let dir = tempfile::tempdir().unwrap();
        let old = write_file(dir.path(), "old.pdf", 2 * HOUR);
        let young = write_file(dir.path(), "young.pdf", Duration::from_secs(60));

        let report = sweep(dir.path(), HOUR).await;

        assert!(!old.exists());
        assert!(young.exists());
        assert_eq!(
            report,
            SweepReport {
                scanned: 2,
                removed: 1,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_sweep_missing_directory_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let report = sweep(&dir.path().join("missing"), HOUR).await;
        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn test_sweep_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        let inner = write_file(&nested, "inner.pdf", 2 * HOUR);

        let report = sweep(dir.path(), HOUR).await;

        assert!(inner.exists());
        assert!(nested.exists());
        assert_eq!(report.removed, 0);
    }

    #[tokio::test]
    async fn test_future_mtime_counts_as_new() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.pdf");
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::now() + HOUR).unwrap();

        let report = sweep(dir.path(), Duration::ZERO).await;

        assert!(path.exists());
        assert_eq!(report.removed, 0);
    }

    #[tokio::test]
    async fn test_sweep_at_uses_given_clock() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "fresh.pdf", Duration::ZERO);

        let later = SystemTime::now() + 2 * HOUR;
        let report = sweep_at(dir.path(), HOUR, later).await;

        assert!(!path.exists());
        assert_eq!(report.removed, 1);
    }

    #[tokio::test]
    async fn test_one_failing_file_does_not_block_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let stuck = write_file(dir.path(), "stuck.pdf", 2 * HOUR);
        let old = write_file(dir.path(), "old.pdf", 2 * HOUR);

        let report = sweep_with(dir.path(), HOUR, SystemTime::now(), |path: PathBuf| async move {
            if path.file_name().is_some_and(|name| name == "stuck.pdf") {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
            } else {
                tokio::fs::remove_file(path).await
            }
        })
        .await;

        assert!(stuck.exists());
        assert!(!old.exists());
        assert_eq!(
            report,
            SweepReport {
                scanned: 2,
                removed: 1,
                failed: 1
            }
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_is_swept_like_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling.pdf");
        std::os::unix::fs::symlink(dir.path().join("gone.pdf"), &link).unwrap();
        let old = write_file(dir.path(), "old.pdf", 2 * HOUR);

        let later = SystemTime::now() + 2 * HOUR;
        let report = sweep_at(dir.path(), HOUR, later).await;

        assert!(std::fs::symlink_metadata(&link).is_err());
        assert!(!old.exists());
        assert_eq!(report.failed, 0);
        assert_eq!(report.removed, 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_removal_keeps_its_target() {
        let outside = tempfile::tempdir().unwrap();
        let target = write_file(outside.path(), "keep.pdf", 10 * HOUR);
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link.pdf");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let later = SystemTime::now() + 2 * HOUR;
        sweep_at(dir.path(), HOUR, later).await;

        assert!(std::fs::symlink_metadata(&link).is_err());
        assert!(target.exists());
    }

    #[tokio::test]
    async fn test_janitor_sweeps_on_start_and_stops_on_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let old = write_file(dir.path(), "orphan.pdf", 2 * HOUR);

        let cancel = CancellationToken::new();
        let handle = UploadJanitor::new(dir.path(), HOUR, HOUR).spawn(cancel.clone());

        for _ in 0..200 {
            if !old.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!old.exists(), "first tick sweeps immediately");

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("janitor stops after cancellation")
            .unwrap();
    }

    #[tokio::test]
    async fn test_sweep_now_uses_configured_retention() {
        let dir = tempfile::tempdir().unwrap();
        let old = write_file(dir.path(), "a.pdf", 10 * HOUR);
        let young = write_file(dir.path(), "b.pdf", HOUR);

        let janitor = UploadJanitor::new(dir.path(), 5 * HOUR, HOUR);
        let report = janitor.sweep_now().await;

        assert_eq!(report.removed, 1);
        assert!(!old.exists());
        assert!(young.exists());
    }
}
