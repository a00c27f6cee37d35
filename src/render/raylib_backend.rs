//! raylib implementation of [`Renderer`].
//!
//! Textures are loaded once, in [`TextureStore`] handle order, from
//! `<dir>/<name>.png`. A texture that fails to load keeps its slot so handle
//! indices stay aligned; drawing with it is skipped.

use std::path::Path;

use log::{error, info};
use raylib::prelude::{
    Color, RaylibDraw, RaylibHandle, RaylibThread, Rectangle, Texture2D, Vector2,
};

use super::{Rect, Renderer};
use crate::collider::Collider;
use crate::resources::texturestore::{TextureHandle, TextureStore};

pub fn load_textures(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    store: &TextureStore,
    dir: &Path,
) -> Vec<Option<Texture2D>> {
    store
        .iter()
        .map(|(_, name)| {
            let path = dir.join(format!("{name}.png"));
            let path_str = path.to_string_lossy();
            match rl.load_texture(thread, &path_str) {
                Ok(texture) => {
                    info!("Loaded texture '{}' from {}", name, path_str);
                    Some(texture)
                }
                Err(e) => {
                    error!("Failed to load texture '{}' from {}: {}", name, path_str, e);
                    None
                }
            }
        })
        .collect()
}

pub struct RaylibRenderer<'a, D: RaylibDraw> {
    handle: &'a mut D,
    textures: &'a [Option<Texture2D>],
    scale: f32,
}

impl<'a, D: RaylibDraw> RaylibRenderer<'a, D> {
    pub fn new(handle: &'a mut D, textures: &'a [Option<Texture2D>], scale: f32) -> Self {
        Self {
            handle,
            textures,
            scale,
        }
    }
}

impl<D: RaylibDraw> Renderer for RaylibRenderer<'_, D> {
    fn draw(&mut self, texture: TextureHandle, source: Rect, dest: glam::Vec2) {
        let Some(Some(tex)) = self.textures.get(texture.index()) else {
            return;
        };
        let src = Rectangle {
            x: source.x as f32,
            y: source.y as f32,
            width: source.w as f32,
            height: source.h as f32,
        };
        let dst = Rectangle {
            x: dest.x * self.scale,
            y: dest.y * self.scale,
            width: source.w as f32 * self.scale,
            height: source.h as f32 * self.scale,
        };
        self.handle
            .draw_texture_pro(tex, src, dst, Vector2::zero(), 0.0, Color::WHITE);
    }

    fn draw_rect_lines(&mut self, rect: Collider) {
        self.handle.draw_rectangle_lines(
            (rect.left() * self.scale) as i32,
            (rect.top() * self.scale) as i32,
            ((rect.right() - rect.left()) * self.scale) as i32,
            ((rect.bottom() - rect.top()) * self.scale) as i32,
            Color::RED,
        );
    }
}
