//! Sprite loading and storage
//!
//! Sprites are loaded once per path; loading the same path again returns the
//! existing handle.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::core::EngineError;

/// Opaque reference to a sprite owned by the render backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteHandle(pub u64);

/// Metadata of a loaded sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    /// File the sprite was loaded from
    pub path: PathBuf,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Path-deduplicated sprite store
#[derive(Debug, Default)]
pub struct SpriteLibrary {
    sprites: FxHashMap<SpriteHandle, Sprite>,
    /// Path to handle mapping for deduplication
    by_path: FxHashMap<PathBuf, SpriteHandle>,
    next_id: u64,
}

impl SpriteLibrary {
    /// Create an empty library
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the image at `path`, reading only its header.
    ///
    /// # Errors
    ///
    /// [`EngineError::AssetNotFound`] if the file is missing or is not a
    /// readable image.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<SpriteHandle, EngineError> {
        let path = path.as_ref();
        if let Some(&handle) = self.by_path.get(path) {
            return Ok(handle);
        }

        let (width, height) = image::image_dimensions(path).map_err(|err| {
            log::warn!("Failed to load sprite {}: {err}", path.display());
            EngineError::AssetNotFound(path.to_path_buf())
        })?;
        Ok(self.insert(Sprite {
            path: path.to_path_buf(),
            width,
            height,
        }))
    }

    /// Add a sprite without touching the filesystem
    pub fn insert(&mut self, sprite: Sprite) -> SpriteHandle {
        if let Some(&handle) = self.by_path.get(&sprite.path) {
            return handle;
        }
        let handle = SpriteHandle(self.next_id);
        self.next_id += 1;
        log::debug!(
            "Loaded sprite {} ({}x{})",
            sprite.path.display(),
            sprite.width,
            sprite.height
        );
        self.by_path.insert(sprite.path.clone(), handle);
        self.sprites.insert(handle, sprite);
        handle
    }

    /// Look up a sprite
    #[must_use]
    pub fn get(&self, handle: SpriteHandle) -> Option<&Sprite> {
        self.sprites.get(&handle)
    }

    /// Handle of an already loaded path
    #[must_use]
    pub fn get_by_path(&self, path: impl AsRef<Path>) -> Option<SpriteHandle> {
        self.by_path.get(path.as_ref()).copied()
    }

    /// Remove a sprite. Returns true if it was present.
    pub fn remove(&mut self, handle: SpriteHandle) -> bool {
        match self.sprites.remove(&handle) {
            Some(sprite) => {
                self.by_path.remove(&sprite.path);
                true
            }
            None => false,
        }
    }

    /// Number of loaded sprites
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Check if nothing is loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
