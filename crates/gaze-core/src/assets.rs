//! Asset lookup for the active grid.
//!
//! Caches are filled out-of-band by background loads; lookups never block and
//! report [`Resolved::Pending`] until the resource arrives. Every cache is
//! tagged with the [`Generation`] of the grid it belongs to so late
//! completions from a previous grid are dropped instead of polluting the new one.

use crate::constants::{DEPTH_DIR, DEPTH_SUFFIX, PRELOAD_BATCH_SIZE, VIDEO_EXTENSION};
use crate::grid::{Grid, Sample};
use fnv::FnvHashMap;

/// Identifier of one grid load; bumped on every grid switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolved<T> {
    Ready(T),
    Pending,
}

impl<T> Resolved<T> {
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Resolved::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Resolved::Ready(v) => Some(v),
            Resolved::Pending => None,
        }
    }
}

impl<T> From<Option<T>> for Resolved<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Resolved::Pending, Resolved::Ready)
    }
}

/// `filename → handle` map for one grid generation.
#[derive(Debug)]
pub struct AssetCache<H> {
    generation: Generation,
    entries: FnvHashMap<String, H>,
}

impl<H> Default for AssetCache<H> {
    fn default() -> Self {
        Self {
            generation: Generation::default(),
            entries: FnvHashMap::default(),
        }
    }
}

impl<H> AssetCache<H> {
    pub fn new(generation: Generation) -> Self {
        Self {
            generation,
            entries: FnvHashMap::default(),
        }
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Drop every entry and start accepting loads for `generation`.
    pub fn reset(&mut self, generation: Generation) {
        self.entries.clear();
        self.generation = generation;
    }

    /// Store a completed load. Returns false (and drops `handle`) when the load
    /// was started for a different generation.
    pub fn insert(&mut self, generation: Generation, filename: &str, handle: H) -> bool {
        if generation != self.generation {
            log::debug!(
                "[assets] dropping stale load {} (gen {} != {})",
                filename,
                generation.0,
                self.generation.0
            );
            return false;
        }
        self.entries.insert(filename.to_string(), handle);
        true
    }

    #[inline]
    pub fn get(&self, filename: &str) -> Option<&H> {
        self.entries.get(filename)
    }

    #[inline]
    pub fn resolve(&self, sample: &Sample) -> Resolved<&H> {
        self.get(&sample.filename).into()
    }

    #[inline]
    pub fn contains(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Color texture plus optional depth map for the displacement mesh.
#[derive(Debug, PartialEq, Eq)]
pub struct TexturePair<'a, H> {
    pub color: &'a H,
    /// `None` renders flat geometry.
    pub depth: Option<&'a H>,
}

impl<H> Clone for TexturePair<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for TexturePair<'_, H> {}

/// Color decides readiness; a missing depth map only flattens the mesh.
pub fn resolve_pair<'a, H>(
    sample: &Sample,
    color: &'a AssetCache<H>,
    depth: &'a AssetCache<H>,
) -> Resolved<TexturePair<'a, H>> {
    match color.resolve(sample) {
        Resolved::Ready(c) => Resolved::Ready(TexturePair {
            color: c,
            depth: depth.get(&sample.filename),
        }),
        Resolved::Pending => Resolved::Pending,
    }
}

/// URL/path scheme of generated assets under a common root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetLayout {
    root: String,
    prefix: String,
}

impl AssetLayout {
    pub fn new(root: &str, prefix: &str) -> Self {
        Self {
            root: root.trim_end_matches('/').to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// Directory holding the pose images of this prefix.
    pub fn dir(&self) -> String {
        format!("{}/{}", self.root, self.prefix)
    }

    pub fn image(&self, filename: &str) -> String {
        format!("{}/{}", self.dir(), filename)
    }

    pub fn depth_dir(&self) -> String {
        format!("{}/{}", self.dir(), DEPTH_DIR)
    }

    pub fn depth(&self, filename: &str) -> String {
        format!("{}/{}{}", self.depth_dir(), filename, DEPTH_SUFFIX)
    }

    pub fn video(&self) -> String {
        format!("{}/{}.{}", self.dir(), self.prefix, VIDEO_EXTENSION)
    }
}

/// One background load the platform layer should start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreloadRequest {
    pub generation: Generation,
    pub filename: String,
    pub image_url: String,
    pub depth_url: String,
}

/// Every asset of `grid`, in row-major order, chunked into load batches.
pub fn preload_plan(
    grid: &Grid,
    layout: &AssetLayout,
    generation: Generation,
) -> Vec<Vec<PreloadRequest>> {
    let requests: Vec<PreloadRequest> = grid
        .filenames()
        .map(|filename| PreloadRequest {
            generation,
            filename: filename.to_string(),
            image_url: layout.image(filename),
            depth_url: layout.depth(filename),
        })
        .collect();
    requests
        .chunks(PRELOAD_BATCH_SIZE)
        .map(|batch| batch.to_vec())
        .collect()
}
