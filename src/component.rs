//! Behaviour attached to a [`ComponentActor`](crate::componentactor::ComponentActor).
//!
//! A component is owned by exactly one actor. The parent's state is lent to
//! every call instead of being stored, so a component can read and move its
//! actor without holding a pointer to it.

use std::any::Any;

use crate::actor::ActorCore;
use crate::context::{DrawContext, UpdateContext};

/// Per-component flags, independent of the parent's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentState {
    pub active: bool,
    pub visible: bool,
}

impl Default for ComponentState {
    fn default() -> Self {
        Self {
            active: true,
            visible: true,
        }
    }
}

pub trait Component: Any {
    fn state(&self) -> &ComponentState;
    fn state_mut(&mut self) -> &mut ComponentState;

    /// Called once when the component is attached to `parent`.
    fn on_attached(&mut self, _parent: &ActorCore) {}

    fn update(&mut self, _parent: &mut ActorCore, _ctx: &mut UpdateContext<'_>) {}
    fn draw(&mut self, _parent: &ActorCore, _ctx: &mut DrawContext<'_>) {}

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
