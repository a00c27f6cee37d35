//! Per-scene actor container with deferred insertion and lazy depth sorting.
//!
//! The live sequence is only touched by [`ActorList::flush`]. Everything that
//! can happen while the sequence is being walked (adding an actor, removing
//! one, changing a depth) goes through the shared pending state behind a
//! [`ListHandle`], so hooks can freely spawn or despawn actors mid-frame.
//!
//! # Ordering
//!
//! Actors are kept sorted by ascending [`depth`](crate::actor::ActorCore::depth).
//! Lower depth is updated and drawn first, so higher depth ends up on top.
//! The sort is stable: actors at equal depth keep their insertion order.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use rustc_hash::FxHashSet;

use crate::actor::Actor;
use crate::context::{DrawContext, UpdateContext};
use crate::render::Renderer;

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier handed out by [`ActorList::add`].
///
/// Carries the id of the list that issued it, so an id from one list never
/// matches an actor of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId {
    list: ListId,
    index: u64,
}

impl ActorId {
    /// The list that issued this id.
    pub fn list(self) -> ListId {
        self.list
    }

    /// Position in the issuing list's insertion sequence.
    pub fn index(self) -> u64 {
        self.index
    }
}

/// Process-unique identifier of an [`ActorList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(u64);

impl ListId {
    pub fn to_bits(self) -> u64 {
        self.0
    }
}

/// State that may be touched while the live sequence is being iterated.
struct PendingState {
    list: ListId,
    inserts: RefCell<Vec<Box<dyn Actor>>>,
    removals: RefCell<FxHashSet<ActorId>>,
    dirty: Cell<bool>,
    next_actor: Cell<u64>,
}

impl PendingState {
    fn enqueue(&self, mut actor: Box<dyn Actor>) -> ActorId {
        let id = ActorId {
            list: self.list,
            index: self.next_actor.get(),
        };
        self.next_actor.set(id.index + 1);
        actor.core_mut().assign_id(id);
        self.inserts.borrow_mut().push(actor);
        self.dirty.set(true);
        id
    }

    /// Ids issued by other lists are ignored.
    fn queue_removal(&self, id: ActorId) -> bool {
        if id.list != self.list {
            return false;
        }
        self.removals.borrow_mut().insert(id)
    }
}

/// Non-owning reference to an [`ActorList`].
///
/// Actors receive one when they enter the live sequence. It never keeps the
/// list alive; once the list is dropped every operation becomes a no-op.
#[derive(Clone, Debug)]
pub struct ListHandle {
    id: ListId,
    pending: Weak<PendingState>,
}

impl ListHandle {
    pub fn id(&self) -> ListId {
        self.id
    }

    /// Whether the list this handle points to still exists.
    pub fn is_alive(&self) -> bool {
        self.pending.strong_count() > 0
    }

    /// Queue an actor for insertion at the next flush.
    ///
    /// Returns `None` if the list is gone; the actor is dropped in that case.
    pub fn add(&self, actor: Box<dyn Actor>) -> Option<ActorId> {
        let pending = self.pending.upgrade()?;
        Some(pending.enqueue(actor))
    }

    /// Queue an actor for removal at the next flush.
    ///
    /// Returns `false` if the list is gone or `id` was issued by another list.
    pub fn remove(&self, id: ActorId) -> bool {
        match self.pending.upgrade() {
            Some(pending) => pending.queue_removal(id),
            None => false,
        }
    }

    /// Mark the list dirty so it is re-sorted at the next flush.
    pub fn request_sort(&self) {
        if let Some(pending) = self.pending.upgrade() {
            pending.dirty.set(true);
        }
    }
}

pub struct ActorList {
    id: ListId,
    actors: Vec<Box<dyn Actor>>,
    pending: Rc<PendingState>,
}

impl Default for ActorList {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorList {
    pub fn new() -> Self {
        let id = ListId(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            id,
            actors: Vec::new(),
            pending: Rc::new(PendingState {
                list: id,
                inserts: RefCell::new(Vec::new()),
                removals: RefCell::new(FxHashSet::default()),
                dirty: Cell::new(false),
                next_actor: Cell::new(0),
            }),
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn handle(&self) -> ListHandle {
        ListHandle {
            id: self.id,
            pending: Rc::downgrade(&self.pending),
        }
    }

    /// Queue an actor for insertion. It joins the live sequence at the next
    /// [`flush`](Self::flush), never immediately.
    pub fn add<A: Actor + 'static>(&self, actor: A) -> ActorId {
        self.add_boxed(Box::new(actor))
    }

    pub fn add_boxed(&self, actor: Box<dyn Actor>) -> ActorId {
        self.pending.enqueue(actor)
    }

    /// Queue the actor with `id` for removal at the next flush. Ids issued
    /// by another list are ignored and return `false`.
    pub fn remove(&self, id: ActorId) -> bool {
        self.pending.queue_removal(id)
    }

    /// Number of actors in the live sequence.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Number of actors waiting for the next flush.
    pub fn pending_len(&self) -> usize {
        self.pending.inserts.borrow().len()
    }

    pub fn is_dirty(&self) -> bool {
        self.pending.dirty.get()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Actor> {
        self.actors.iter().map(|actor| actor.as_ref())
    }

    /// Live sequence order, as ids.
    pub fn ids(&self) -> Vec<ActorId> {
        self.actors.iter().filter_map(|a| a.core().id()).collect()
    }

    pub fn get(&self, id: ActorId) -> Option<&dyn Actor> {
        self.actors
            .iter()
            .find(|a| a.core().id() == Some(id))
            .map(|a| a.as_ref())
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut (dyn Actor + 'static)> {
        self.actors
            .iter_mut()
            .find(|a| a.core().id() == Some(id))
            .map(|a| a.as_mut())
    }

    /// Commit point: append queued actors in call order, apply queued
    /// removals, then stable-sort by depth if anything marked the list dirty.
    pub fn flush(&mut self) {
        let handle = self.handle();
        loop {
            // on_added may queue more actors; keep draining until quiet.
            let batch = std::mem::take(&mut *self.pending.inserts.borrow_mut());
            if batch.is_empty() {
                break;
            }
            for mut actor in batch {
                actor.core_mut().attach(handle.clone());
                actor.on_added(&handle);
                self.actors.push(actor);
            }
        }

        let removals = std::mem::take(&mut *self.pending.removals.borrow_mut());
        if !removals.is_empty() {
            let before = self.actors.len();
            self.actors
                .retain(|a| a.core().id().is_none_or(|id| !removals.contains(&id)));
            debug!(
                "ActorList {:?}: removed {} actor(s)",
                self.id,
                before - self.actors.len()
            );
        }

        if self.pending.dirty.replace(false) {
            self.actors.sort_by_key(|a| a.core().depth());
        }
    }

    pub fn scene_begin(&mut self, ctx: &mut UpdateContext<'_>) {
        for actor in self.actors.iter_mut() {
            actor.scene_begin(ctx);
        }
    }

    pub fn scene_end(&mut self, ctx: &mut UpdateContext<'_>) {
        for actor in self.actors.iter_mut() {
            actor.scene_end(ctx);
        }
    }

    pub fn before_update(&mut self, ctx: &mut UpdateContext<'_>) {
        for actor in self.actors.iter_mut() {
            if actor.core().active {
                actor.before_update(ctx);
            }
        }
    }

    pub fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        for actor in self.actors.iter_mut() {
            if actor.core().active {
                actor.update(ctx);
            }
        }
    }

    /// Runs every active actor's `after_update`, then flushes.
    pub fn after_update(&mut self, ctx: &mut UpdateContext<'_>) {
        for actor in self.actors.iter_mut() {
            if actor.core().active {
                actor.after_update(ctx);
            }
        }
        self.flush();
    }

    pub fn before_draw(&mut self, ctx: &mut DrawContext<'_>) {
        for actor in self.actors.iter_mut() {
            if actor.core().visible {
                actor.before_draw(ctx);
            }
        }
    }

    pub fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        for actor in self.actors.iter_mut() {
            if actor.core().visible {
                actor.draw(ctx);
            }
        }
    }

    pub fn after_draw(&mut self, ctx: &mut DrawContext<'_>) {
        for actor in self.actors.iter_mut() {
            if actor.core().visible {
                actor.after_draw(ctx);
            }
        }
    }

    /// Outline every collidable actor's world-space collider.
    pub fn draw_colliders(&self, renderer: &mut dyn Renderer) {
        for actor in self.actors.iter().filter(|a| a.core().collidable) {
            if let Some(collider) = actor.core().world_collider() {
                renderer.draw_rect_lines(collider);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorCore, BasicActor};

    fn depths(list: &ActorList) -> Vec<i32> {
        list.iter().map(|a| a.core().depth()).collect()
    }

    #[test]
    fn test_add_is_deferred_until_flush() {
        let mut list = ActorList::new();
        list.add(BasicActor::default());
        list.add(BasicActor::default());
        assert_eq!(list.len(), 0);
        assert_eq!(list.pending_len(), 2);
        assert!(list.is_dirty());

        list.flush();
        assert_eq!(list.len(), 2);
        assert_eq!(list.pending_len(), 0);
        assert!(!list.is_dirty());
    }

    #[test]
    fn test_flush_keeps_call_order_and_sorts_by_depth() {
        let mut list = ActorList::new();
        let a = list.add(BasicActor::new(ActorCore::new().with_depth(5)));
        let b = list.add(BasicActor::new(ActorCore::new().with_depth(-1)));
        let c = list.add(BasicActor::new(ActorCore::new().with_depth(5)));
        list.flush();
        assert_eq!(list.ids(), vec![b, a, c]);
        assert_eq!(depths(&list), vec![-1, 5, 5]);
    }

    #[test]
    fn test_flush_attaches_back_reference() {
        let mut list = ActorList::new();
        let id = list.add(BasicActor::default());
        list.flush();
        let actor = list.get(id).expect("actor should be live");
        assert_eq!(actor.core().list().map(|h| h.id()), Some(list.id()));
    }

    #[test]
    fn test_depth_change_marks_dirty_but_does_not_sort() {
        let mut list = ActorList::new();
        let a = list.add(BasicActor::default());
        let b = list.add(BasicActor::default());
        list.flush();

        list.get_mut(a).expect("a").core_mut().set_depth(10);
        assert!(list.is_dirty());
        assert_eq!(list.ids(), vec![a, b]);
        assert_eq!(list.len(), 2);

        list.flush();
        assert_eq!(list.ids(), vec![b, a]);
    }

    #[test]
    fn test_same_depth_write_does_not_mark_dirty() {
        let mut list = ActorList::new();
        let a = list.add(BasicActor::default());
        list.flush();
        list.get_mut(a).expect("a").core_mut().set_depth(0);
        assert!(!list.is_dirty());
    }

    #[test]
    fn test_remove_applies_at_flush() {
        let mut list = ActorList::new();
        let a = list.add(BasicActor::default());
        let b = list.add(BasicActor::default());
        list.flush();

        assert!(list.remove(a));
        assert_eq!(list.len(), 2);
        list.flush();
        assert_eq!(list.ids(), vec![b]);
    }

    #[test]
    fn test_add_and_remove_in_same_frame() {
        let mut list = ActorList::new();
        let a = list.add(BasicActor::default());
        list.remove(a);
        list.flush();
        assert!(list.is_empty());
    }

    #[test]
    fn test_handle_outlives_list_safely() {
        let (handle, id) = {
            let list = ActorList::new();
            let id = list.add(BasicActor::default());
            (list.handle(), id)
        };
        assert!(!handle.is_alive());
        assert!(handle.add(Box::new(BasicActor::default())).is_none());
        assert!(!handle.remove(id));
        handle.request_sort();
    }

    #[test]
    fn test_list_ids_are_unique() {
        assert_ne!(ActorList::new().id(), ActorList::new().id());
    }
    #[test]
    fn test_cloned_actor_sorts_in_the_list_it_joins() {
        let mut a = ActorList::new();
        let original = a.add(BasicActor::default());
        a.flush();
        let copy = a
            .get(original)
            .and_then(|actor| actor.core().list().map(|_| actor.core().clone()))
            .expect("original is live and attached");
        assert!(copy.id().is_none());
        assert!(!copy.is_in_list());

        let mut b = ActorList::new();
        let x = b.add(BasicActor::new(copy));
        let y = b.add(BasicActor::new(ActorCore::new().with_depth(5)));
        b.flush();
        assert_eq!(b.ids(), vec![x, y]);
        let joined = b.get(x).and_then(|actor| actor.core().list().map(ListHandle::id));
        assert_eq!(joined, Some(b.id()));

        b.get_mut(x).expect("x is live").core_mut().set_depth(10);
        assert!(b.is_dirty());
        assert!(!a.is_dirty());
        b.flush();
        assert_eq!(b.ids(), vec![y, x]);
    }

    #[test]
    fn test_remove_ignores_ids_from_other_lists() {
        let mut a = ActorList::new();
        let mut b = ActorList::new();
        let from_a = a.add(BasicActor::default());
        let from_b = b.add(BasicActor::default());
        a.flush();
        b.flush();
        assert_eq!(from_a.index(), from_b.index());
        assert_ne!(from_a, from_b);

        assert!(!b.remove(from_a));
        assert!(!b.handle().remove(from_a));
        b.flush();
        assert_eq!(b.ids(), vec![from_b]);

        assert!(a.remove(from_a));
        a.flush();
        assert!(a.is_empty());
    }
}
