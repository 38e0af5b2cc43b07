use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;

/// Seconds after which an abandoned lock file is ignored.
const STALE_LOCK_SECS: i64 = 60;

/// Write to a sibling temp file, fsync, then rename over `path`.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp_path = dir.join(format!(".{}.tmp", temp_suffix()));

    let mut file = std::fs::File::create(&temp_path)
        .with_context(|| format!("cannot create temp file for {}", path.display()))?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("cannot rename temp to {}", path.display()));
    }
    Ok(())
}

/// Advisory `<file>.lock` held while a document is rewritten.
///
/// The lock file holds the owner PID and a unix timestamp. Locks older than
/// a minute are treated as abandoned.
#[derive(Debug)]
pub struct WriteLock {
    lock_path: PathBuf,
}

impl WriteLock {
    pub fn acquire(path: &Path) -> Result<Self> {
        let mut lock_path = path.as_os_str().to_owned();
        lock_path.push(".lock");
        let lock_path = PathBuf::from(lock_path);

        if lock_path.exists() {
            let content = std::fs::read_to_string(&lock_path).unwrap_or_default();
            let held_since = content.lines().nth(1).and_then(|ts| ts.parse::<i64>().ok());
            match held_since {
                Some(ts) if Utc::now().timestamp() - ts > STALE_LOCK_SECS => {
                    let _ = std::fs::remove_file(&lock_path);
                }
                _ => bail!(
                    "{} is locked by another writer ({})",
                    path.display(),
                    lock_path.display()
                ),
            }
        }

        let body = format!("{}\n{}\n", std::process::id(), Utc::now().timestamp());
        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .and_then(|mut f| f.write_all(body.as_bytes()))
            .with_context(|| format!("cannot acquire lock {}", lock_path.display()))?;

        Ok(Self { lock_path })
    }

    pub fn release(self) -> Result<()> {
        if self.lock_path.exists() {
            std::fs::remove_file(&self.lock_path)
                .with_context(|| format!("cannot release lock {}", self.lock_path.display()))?;
        }
        Ok(())
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.lock_path);
    }
}

fn temp_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{:x}-{nanos:x}", std::process::id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn lock_path(path: &Path) -> PathBuf {
        PathBuf::from(format!("{}.lock", path.display()))
    }

    #[test]
    fn atomic_write_replaces_content() {
        let file = NamedTempFile::new().unwrap();
        atomic_write(file.path(), b"first").unwrap();
        atomic_write(file.path(), b"second").unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "second");
    }

    #[test]
    fn atomic_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("sow.json");
        atomic_write(&target, b"{}").unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["sow.json"]);
    }

    #[test]
    fn lock_blocks_second_writer_until_dropped() {
        let file = NamedTempFile::new().unwrap();
        {
            let _held = WriteLock::acquire(file.path()).unwrap();
            assert!(lock_path(file.path()).exists());
            assert!(WriteLock::acquire(file.path()).is_err());
        }
        assert!(!lock_path(file.path()).exists());
        let again = WriteLock::acquire(file.path()).unwrap();
        again.release().unwrap();
        assert!(!lock_path(file.path()).exists());
    }

    #[test]
    fn stale_lock_is_reclaimed() {
        let file = NamedTempFile::new().unwrap();
        let stale = Utc::now().timestamp() - STALE_LOCK_SECS - 10;
        std::fs::write(lock_path(file.path()), format!("1\n{stale}\n")).unwrap();
        assert!(WriteLock::acquire(file.path()).is_ok());
    }

    #[test]
    fn concurrent_writers_serialize() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::{Arc, Barrier};
        use std::thread;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("diagnostic.json");
        std::fs::write(&target, "0").unwrap();

        let barrier = Arc::new(Barrier::new(4));
        let wins = Arc::new(AtomicU32::new(0));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let barrier = Arc::clone(&barrier);
                let wins = Arc::clone(&wins);
                let target = target.clone();
                thread::spawn(move || {
                    barrier.wait();
                    if let Ok(lock) = WriteLock::acquire(&target) {
                        let _ = atomic_write(&target, format!("writer-{i}").as_bytes());
                        wins.fetch_add(1, Ordering::SeqCst);
                        let _ = lock.release();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert!(wins.load(Ordering::SeqCst) >= 1);
        assert!(std::fs::read_to_string(&target).unwrap().starts_with("writer-"));
    }
}
