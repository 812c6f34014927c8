use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Build a process-unique path for an intermediate file.
pub(crate) fn unique_temp_path(dir: &Path, prefix: &str, ext: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(
        "{prefix}_{}_{nanos}_{seq}.{ext}",
        std::process::id()
    ))
}

/// Scoped set of intermediate files removed when the guard drops.
///
/// Covers success, error and panic unwinding alike. Paths that no longer exist (for example a
/// partial output that was already renamed into place) are skipped silently.
#[derive(Debug, Default)]
pub(crate) struct TempArtifacts {
    paths: Vec<PathBuf>,
}

impl TempArtifacts {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `path` for removal and hand it back.
    pub(crate) fn track(&mut self, path: PathBuf) -> PathBuf {
        self.paths.push(path.clone());
        path
    }

    pub(crate) fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(&path) {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary file");
                } else {
                    tracing::debug!(path = %path.display(), "removed temporary file");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/temp.rs"]
mod tests;
