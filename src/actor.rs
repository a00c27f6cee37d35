//! Actors: positioned, orderable simulation units with lifecycle hooks.
//!
//! Every actor embeds an [`ActorCore`] holding the state the engine needs to
//! schedule it (depth, active/visible flags, collider) and implements
//! [`Actor`], overriding only the hooks it cares about.
//!
//! # Hook order within one frame
//!
//! `before_update` → `update` → `after_update` (only while `active`), then
//! `before_draw` → `draw` → `after_draw` (only while `visible`).
//! `scene_begin`/`scene_end` bracket the owning scene's focus, and
//! `on_added` fires once when the actor enters its list's live sequence.

use glam::Vec2;
use log::warn;

use crate::actorlist::{ActorId, ListHandle};
use crate::collider::Collider;
use crate::context::{DrawContext, UpdateContext};

/// Scheduling state shared by every actor.
#[derive(Debug)]
pub struct ActorCore {
    pub position: Vec2,
    depth: i32,
    /// Gates the update-phase hooks.
    pub active: bool,
    /// Gates the draw-phase hooks.
    pub visible: bool,
    pub collidable: bool,
    pub collider: Option<Collider>,
    id: Option<ActorId>,
    list: Option<ListHandle>,
}

/// A clone is a new, unqueued actor: it keeps the scheduling state but not
/// the id or list membership of the original.
impl Clone for ActorCore {
    fn clone(&self) -> Self {
        Self {
            position: self.position,
            depth: self.depth,
            active: self.active,
            visible: self.visible,
            collidable: self.collidable,
            collider: self.collider,
            id: None,
            list: None,
        }
    }
}

impl Default for ActorCore {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorCore {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            depth: 0,
            active: true,
            visible: true,
            collidable: true,
            collider: None,
            id: None,
            list: None,
        }
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::new()
        }
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Change the ordering key.
    ///
    /// If the actor already lives in a list, the list is only marked dirty;
    /// the actual re-sort happens at its next flush.
    pub fn set_depth(&mut self, depth: i32) {
        if self.depth == depth {
            return;
        }
        self.depth = depth;
        if let Some(list) = &self.list {
            list.request_sort();
        }
    }

    /// Id assigned by the list on `add`. `None` until queued.
    pub fn id(&self) -> Option<ActorId> {
        self.id
    }

    /// Back-reference to the owning list. `None` until the actor has been
    /// flushed into a live sequence.
    pub fn list(&self) -> Option<&ListHandle> {
        self.list.as_ref()
    }

    pub fn is_in_list(&self) -> bool {
        self.list.is_some()
    }

    pub(crate) fn assign_id(&mut self, id: ActorId) {
        if let Some(old) = self.id {
            warn!("Actor {:?} re-queued as {:?}", old, id);
        }
        self.id = Some(id);
    }

    /// Set once; an actor belongs to exactly one list for its lifetime.
    pub(crate) fn attach(&mut self, handle: ListHandle) {
        if let Some(existing) = &self.list {
            warn!(
                "Actor {:?} already belongs to list {:?}; ignoring attach to {:?}",
                self.id,
                existing.id(),
                handle.id()
            );
            return;
        }
        self.list = Some(handle);
    }

    /// Collider translated to world space.
    pub fn world_collider(&self) -> Option<Collider> {
        self.collider.map(|c| c.at(self.position))
    }

    /// True if both actors are collidable and their colliders overlap.
    pub fn collides_with(&self, other: &ActorCore) -> bool {
        if !self.collidable || !other.collidable {
            return false;
        }
        match (self.world_collider(), other.world_collider()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }
}

/// Lifecycle hooks. All have empty defaults.
pub trait Actor {
    fn core(&self) -> &ActorCore;
    fn core_mut(&mut self) -> &mut ActorCore;

    fn scene_begin(&mut self, _ctx: &mut UpdateContext<'_>) {}
    fn scene_end(&mut self, _ctx: &mut UpdateContext<'_>) {}

    fn before_update(&mut self, _ctx: &mut UpdateContext<'_>) {}
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}
    fn after_update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    fn before_draw(&mut self, _ctx: &mut DrawContext<'_>) {}
    fn draw(&mut self, _ctx: &mut DrawContext<'_>) {}
    fn after_draw(&mut self, _ctx: &mut DrawContext<'_>) {}

    /// Called once, when the actor joins `list`'s live sequence.
    fn on_added(&mut self, _list: &ListHandle) {}
}

/// An actor with no behaviour of its own. Useful as a marker or as a
/// collision body.
#[derive(Debug, Clone, Default)]
pub struct BasicActor {
    core: ActorCore,
}

impl BasicActor {
    pub fn new(core: ActorCore) -> Self {
        Self { core }
    }
}

impl Actor for BasicActor {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }
}
