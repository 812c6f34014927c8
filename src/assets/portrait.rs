use crate::assets::color::balance_blue_cast;
use crate::foundation::error::{VersusError, VersusResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::theme::PORTRAIT_SIZE;
use anyhow::Context as _;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extensions tried, in order, when resolving a portrait.
pub const PORTRAIT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Decoded, color-corrected, square-resized portrait.
#[derive(Clone, Debug)]
pub struct Portrait {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 pixels.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Lookup key of a subject's portrait: the lower-cased name.
pub fn portrait_key(name: &str) -> String {
    name.to_lowercase()
}

/// Resolve `<dir>/<lower-cased name>.<ext>` trying [`PORTRAIT_EXTENSIONS`] in order.
pub fn resolve_portrait_path(dir: &Path, name: &str) -> VersusResult<PathBuf> {
    let key = portrait_key(name);
    PORTRAIT_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{key}.{ext}")))
        .find(|p| p.is_file())
        .ok_or_else(|| {
            VersusError::asset_not_found(
                format!("portrait for '{name}'"),
                dir.join(format!("{key}.{}", PORTRAIT_EXTENSIONS[0])),
            )
        })
}

/// Decode encoded bytes into a renderer-ready portrait.
pub fn prepare_portrait(bytes: &[u8]) -> VersusResult<Portrait> {
    let decoded = image::load_from_memory(bytes)
        .context("decode portrait image")?
        .to_rgba8();
    let balanced = balance_blue_cast(&decoded);
    let resized = image::imageops::resize(
        &balanced,
        PORTRAIT_SIZE,
        PORTRAIT_SIZE,
        image::imageops::FilterType::Lanczos3,
    );
    let (width, height) = resized.dimensions();
    let mut rgba8_premul = resized.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Ok(Portrait {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Portraits keyed by lower-cased subject name.
///
/// Loaded once per run and shared read-only by every render worker.
#[derive(Clone, Debug, Default)]
pub struct PortraitStore {
    by_key: HashMap<String, Portrait>,
}

impl PortraitStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve and prepare the portrait of every name in `names`.
    ///
    /// Fails with [`VersusError::AssetNotFound`] on the first missing portrait.
    pub fn load(dir: &Path, names: &[&str]) -> VersusResult<Self> {
        let mut store = Self::new();
        for name in names {
            let key = portrait_key(name);
            if store.by_key.contains_key(&key) {
                continue;
            }
            let path = resolve_portrait_path(dir, name)?;
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read portrait '{}'", path.display()))?;
            let portrait = prepare_portrait(&bytes)
                .map_err(|e| VersusError::render(format!("portrait '{}': {e}", path.display())))?;
            tracing::debug!(name = %name, path = %path.display(), "portrait loaded");
            store.by_key.insert(key, portrait);
        }
        Ok(store)
    }

    /// Insert an already prepared portrait under `name`.
    pub fn insert(&mut self, name: &str, portrait: Portrait) {
        self.by_key.insert(portrait_key(name), portrait);
    }

    /// Portrait for `name`, or [`VersusError::AssetNotFound`].
    pub fn get(&self, name: &str) -> VersusResult<&Portrait> {
        let key = portrait_key(name);
        self.by_key.get(&key).ok_or_else(|| {
            VersusError::asset_not_found(format!("portrait for '{name}'"), PathBuf::from(key))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/portrait.rs"]
mod tests;
