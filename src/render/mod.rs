//! Drawing seam between the engine and a graphics backend.
//!
//! The engine only ever asks a [`Renderer`] to blit a rectangle of a texture
//! at a position. [`RecordingRenderer`] keeps those requests in memory, which
//! is what the headless runner and the tests use; the raylib backend lives
//! in [`raylib_backend`] behind the `raylib` feature.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::collider::Collider;
use crate::resources::texturestore::TextureHandle;

#[cfg(feature = "raylib")]
pub mod raylib_backend;

/// Integer pixel rectangle, as found in sprite-sheet metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

pub trait Renderer {
    fn begin_frame(&mut self) {}
    fn end_frame(&mut self) {}

    /// Draw `source` from `texture` with its top-left corner at `dest`.
    fn draw(&mut self, texture: TextureHandle, source: Rect, dest: Vec2);

    /// Debug outline. Backends may ignore it.
    fn draw_rect_lines(&mut self, _rect: Collider) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Texture {
        texture: TextureHandle,
        source: Rect,
        dest: Vec2,
    },
    RectLines(Collider),
}

/// Keeps the draw calls of the current frame.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<DrawCall>,
    frames: u64,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since the last `begin_frame`.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Only the texture draws, in submission order.
    pub fn texture_draws(&self) -> Vec<(TextureHandle, Rect, Vec2)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Texture {
                    texture,
                    source,
                    dest,
                } => Some((*texture, *source, *dest)),
                DrawCall::RectLines(_) => None,
            })
            .collect()
    }

    /// Completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self) {
        self.calls.clear();
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }

    fn draw(&mut self, texture: TextureHandle, source: Rect, dest: Vec2) {
        self.calls.push(DrawCall::Texture {
            texture,
            source,
            dest,
        });
    }

    fn draw_rect_lines(&mut self, rect: Collider) {
        self.calls.push(DrawCall::RectLines(rect));
    }
}
