//! Photo registry: the ordered list of portraits the viewer can switch between.
//!
//! Persisted as a JSON array, newest first. The first entry is the default
//! photo the viewer opens with.

use anyhow::{bail, Context, Result};
use gaze_core::GridSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoEntry {
    pub key: String,
    /// Source portrait the pose images are generated from.
    pub source: PathBuf,
    pub prefix: String,
    pub x_steps: u32,
    pub y_steps: u32,
}

impl PhotoEntry {
    pub fn grid_spec(&self) -> Result<GridSpec> {
        GridSpec::new(self.x_steps, self.y_steps, self.prefix.as_str())
            .with_context(|| format!("photo {:?} has an invalid grid", self.key))
    }

    /// The key names the imported copy, so it must be a plain file stem.
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() || self.key.contains(['/', '\\']) || self.key.starts_with('.') {
            bail!("invalid photo key {:?}", self.key);
        }
        self.grid_spec().map(|_| ())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRegistry {
    entries: Vec<PhotoEntry>,
}

impl PhotoRegistry {
    /// Read the registry; a missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text + "\n").with_context(|| format!("writing {}", path.display()))
    }

    pub fn entries(&self) -> &[PhotoEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&PhotoEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// The photo the viewer opens with.
    pub fn default_entry(&self) -> Option<&PhotoEntry> {
        self.entries.first()
    }

    /// Insert at the front. Re-adding an existing key replaces it and moves
    /// it to the front.
    pub fn add(&mut self, entry: PhotoEntry) -> Result<()> {
        entry.validate()?;
        self.entries.retain(|e| e.key != entry.key);
        self.entries.insert(0, entry);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<PhotoEntry> {
        let pos = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Copy a portrait into the managed `photos` directory as `{key}{.ext}` and
/// return the copy's path. The registry only ever points at such copies.
pub fn import_source(source: &Path, photos: &Path, key: &str) -> Result<PathBuf> {
    if !source.is_file() {
        bail!("no photo at {}", source.display());
    }
    fs::create_dir_all(photos).with_context(|| format!("creating {}", photos.display()))?;
    let name = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{key}.{ext}"),
        None => key.to_string(),
    };
    let dest = photos.join(name);
    let same = match (source.canonicalize(), dest.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if !same {
        fs::copy(source, &dest)
            .with_context(|| format!("copying {} to {}", source.display(), dest.display()))?;
        log::info!("[photos] imported {} as {}", source.display(), dest.display());
    }
    Ok(dest)
}

/// True if `path` exists and lies inside `dir`.
fn is_within(path: &Path, dir: &Path) -> bool {
    match (path.canonicalize(), dir.canonicalize()) {
        (Ok(path), Ok(dir)) => path != dir && path.starts_with(dir),
        _ => false,
    }
}

/// Delete a removed photo's managed copy and its generated outputs.
///
/// A source outside `photos` is never deleted. Paths that are already gone
/// are skipped.
pub fn delete_photo_files(entry: &PhotoEntry, photos: &Path, outputs: &Path) -> Result<()> {
    if entry.source.is_file() {
        if is_within(&entry.source, photos) {
            fs::remove_file(&entry.source)
                .with_context(|| format!("removing {}", entry.source.display()))?;
            log::info!("[photos] removed source {}", entry.source.display());
        } else {
            log::warn!(
                "[photos] keeping {}, it is outside {}",
                entry.source.display(),
                photos.display()
            );
        }
    }
    let dir = outputs.join(&entry.prefix);
    let depth = dir.join(gaze_core::DEPTH_DIR);
    for path in [depth, dir] {
        if path.is_dir() {
            fs::remove_dir_all(&path).with_context(|| format!("removing {}", path.display()))?;
            log::info!("[photos] removed {}", path.display());
        }
    }
    Ok(())
}
