//! Name → texture handle registry.
//!
//! The engine never touches pixel data. A backend (see
//! [`crate::render`]) loads the actual images and keeps them indexed by
//! [`TextureHandle`]; everything else refers to textures through handles.

use std::path::Path;

use rustc_hash::FxHashMap;

/// Opaque texture reference, valid for the store that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
pub struct TextureStore {
    by_name: FxHashMap<String, TextureHandle>,
    names: Vec<String>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, returning the existing handle if already known.
    pub fn register(&mut self, name: impl Into<String>) -> TextureHandle {
        let name = name.into();
        if let Some(handle) = self.by_name.get(&name) {
            return *handle;
        }
        let handle = TextureHandle(self.names.len() as u32);
        self.names.push(name.clone());
        self.by_name.insert(name, handle);
        handle
    }

    pub fn get(&self, name: &str) -> Option<TextureHandle> {
        self.by_name.get(name).copied()
    }

    /// Resolve an image reference such as `"sprites/penguin.png"` by its
    /// file stem (`"penguin"`).
    pub fn resolve_image(&self, image: &str) -> Option<TextureHandle> {
        self.get(image_key(image))
    }

    pub fn name(&self, handle: TextureHandle) -> Option<&str> {
        self.names.get(handle.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered names in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (TextureHandle, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (TextureHandle(i as u32), name.as_str()))
    }
}

/// Store key for an image reference: directory and extension stripped.
pub fn image_key(image: &str) -> &str {
    Path::new(image)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(image)
}
