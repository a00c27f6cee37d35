//! Explicit per-hook context objects.
//!
//! Hooks never reach for global engine state. The update phase receives an
//! [`UpdateContext`] and the draw phase a [`DrawContext`], both built by the
//! owning [`Scene`](crate::scene::Scene) from what the
//! [`SceneDirector`](crate::director::SceneDirector) hands it each frame.

use log::debug;

use crate::actor::Actor;
use crate::actorlist::{ActorId, ListHandle};
use crate::render::Renderer;
use crate::resources::frametime::FrameTime;
use crate::resources::texturestore::TextureStore;
use crate::scene::{Scene, SceneClock};

/// What the director lends a scene for one update-phase call.
pub struct FrameEnv<'a> {
    pub time: FrameTime,
    pub textures: &'a TextureStore,
    pub next_scene: &'a mut Option<Scene>,
}

pub struct UpdateContext<'a> {
    pub time: FrameTime,
    /// Snapshot of the owning scene's timers, taken after this frame's advance.
    pub clock: SceneClock,
    pub textures: &'a TextureStore,
    list: ListHandle,
    next_scene: &'a mut Option<Scene>,
}

impl<'a> UpdateContext<'a> {
    pub fn new(
        time: FrameTime,
        clock: SceneClock,
        textures: &'a TextureStore,
        list: ListHandle,
        next_scene: &'a mut Option<Scene>,
    ) -> Self {
        Self {
            time,
            clock,
            textures,
            list,
            next_scene,
        }
    }

    /// Scaled frame delta in seconds.
    pub fn delta_time(&self) -> f32 {
        self.time.delta
    }

    pub fn raw_delta_time(&self) -> f32 {
        self.time.raw_delta
    }

    /// The list of the scene currently being processed.
    pub fn list(&self) -> &ListHandle {
        &self.list
    }

    /// Queue a new actor in the current scene. It becomes live at the end of
    /// this frame's update phase.
    pub fn spawn<A: Actor + 'static>(&self, actor: A) -> Option<ActorId> {
        self.list.add(Box::new(actor))
    }

    /// Queue an actor of the current scene for removal. Returns `false` for
    /// an id issued by another scene's list.
    pub fn despawn(&self, id: ActorId) -> bool {
        self.list.remove(id)
    }

    /// Request a scene switch. Applied by the director after the update
    /// phase; a later request in the same frame replaces an earlier one.
    pub fn change_scene(&mut self, scene: Scene) {
        if let Some(replaced) = self.next_scene.replace(scene) {
            debug!("Pending scene '{}' replaced before switch", replaced.name());
        }
    }

    pub fn has_pending_scene(&self) -> bool {
        self.next_scene.is_some()
    }
}

pub struct DrawContext<'a> {
    pub time: FrameTime,
    pub clock: SceneClock,
    pub textures: &'a TextureStore,
    pub renderer: &'a mut dyn Renderer,
}

impl<'a> DrawContext<'a> {
    pub fn new(
        time: FrameTime,
        textures: &'a TextureStore,
        renderer: &'a mut dyn Renderer,
    ) -> Self {
        Self {
            time,
            clock: SceneClock::default(),
            textures,
            renderer,
        }
    }
}
