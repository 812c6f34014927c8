//! Uniqueness bookkeeping for produced comparisons.
//!
//! The compositor never consults this; callers inject a [`UniquenessCheck`] before starting a run.

use crate::comparison::{ComparisonSpec, Side};
use crate::foundation::error::VersusResult;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Order-independent identity of a comparison.
///
/// Subjects are sorted by lower-cased name so `A vs B` and `B vs A` collide.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct ComparisonKey {
    /// Stat title.
    pub title: String,
    /// Subjects as `(name, final value)`, sorted by lower-cased name.
    pub subjects: [(String, u64); 2],
}

impl ComparisonKey {
    /// Derive the key for `spec`.
    pub fn of(spec: &ComparisonSpec) -> Self {
        let mut subjects = Side::BOTH.map(|side| {
            let s = spec.subject(side);
            (s.name.clone(), s.final_value)
        });
        subjects.sort_by_key(|(name, _)| name.to_lowercase());
        Self {
            title: spec.title().to_owned(),
            subjects,
        }
    }
}

/// Output file name derived from the comparison key.
///
/// `<title>_<a>_vs_<b>_<statA>_<statB>.mp4` with spaces and hyphens replaced by `_`.
pub fn suggested_file_name(spec: &ComparisonSpec) -> String {
    let key = ComparisonKey::of(spec);
    let clean = |s: &str| s.replace([' ', '-'], "_");
    let [(a, va), (b, vb)] = &key.subjects;
    format!(
        "{}_{}_vs_{}_{va}_{vb}.mp4",
        clean(&key.title),
        clean(a),
        clean(b)
    )
}

/// Deduplication collaborator.
pub trait UniquenessCheck {
    /// Return `true` when `spec` has not been produced before.
    fn is_unique(&self, spec: &ComparisonSpec) -> bool;
    /// Remember `spec` as produced.
    fn record(&mut self, spec: &ComparisonSpec) -> VersusResult<()>;
}

/// Process-local registry.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    seen: BTreeSet<ComparisonKey>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded comparisons.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Return `true` when nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl UniquenessCheck for InMemoryRegistry {
    fn is_unique(&self, spec: &ComparisonSpec) -> bool {
        !self.seen.contains(&ComparisonKey::of(spec))
    }

    fn record(&mut self, spec: &ComparisonSpec) -> VersusResult<()> {
        self.seen.insert(ComparisonKey::of(spec));
        Ok(())
    }
}

/// Registry persisted as a JSON array of [`ComparisonKey`]s.
#[derive(Debug)]
pub struct JsonFileRegistry {
    path: PathBuf,
    inner: InMemoryRegistry,
}

impl JsonFileRegistry {
    /// Load the registry at `path`; a missing file is an empty registry.
    pub fn open(path: impl Into<PathBuf>) -> VersusResult<Self> {
        use anyhow::Context as _;
        let path = path.into();
        let mut inner = InMemoryRegistry::new();
        if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read registry '{}'", path.display()))?;
            let keys: Vec<ComparisonKey> = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse registry '{}'", path.display()))?;
            inner.seen.extend(keys);
        }
        Ok(Self { path, inner })
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UniquenessCheck for JsonFileRegistry {
    fn is_unique(&self, spec: &ComparisonSpec) -> bool {
        self.inner.is_unique(spec)
    }

    fn record(&mut self, spec: &ComparisonSpec) -> VersusResult<()> {
        use anyhow::Context as _;
        self.inner.record(spec)?;
        let keys: Vec<&ComparisonKey> = self.inner.seen.iter().collect();
        let text = serde_json::to_string_pretty(&keys).context("failed to encode registry")?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("failed to write registry '{}'", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/dedup.rs"]
mod tests;
