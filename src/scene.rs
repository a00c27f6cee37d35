//! Scenes: one [`ActorList`] plus scene-scoped timers.
//!
//! A scene is driven by the [`SceneDirector`](crate::director::SceneDirector)
//! and swapped wholesale. Custom per-scene logic plugs in through
//! [`SceneHooks`], which run before the scene's actors in every phase.

use log::info;

use crate::actor::Actor;
use crate::actorlist::{ActorId, ActorList};
use crate::context::{DrawContext, FrameEnv, UpdateContext};
use crate::resources::frametime::FrameTime;

/// Scene timers and the interval helpers built on them.
///
/// `time_active` only advances while the scene is unpaused; `raw_time_active`
/// always advances. Both start at zero and never decrease.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneClock {
    pub time_active: f32,
    pub raw_time_active: f32,
    /// Delta applied to `time_active` on the last advance (zero while paused).
    pub delta: f32,
    pub raw_delta: f32,
    pub paused: bool,
}

impl SceneClock {
    pub fn advance(&mut self, time: &FrameTime, paused: bool) {
        self.paused = paused;
        self.delta = if paused { 0.0 } else { time.delta.max(0.0) };
        self.raw_delta = time.raw_delta.max(0.0);
        self.time_active += self.delta;
        self.raw_time_active += self.raw_delta;
    }

    /// True on the frame `time_active` crosses a multiple of `interval`.
    ///
    /// Fires once per crossing; if one frame skips several multiples it still
    /// fires only once.
    pub fn on_interval(&self, interval: f32) -> bool {
        crossed(self.time_active, self.delta, interval, 0.0)
    }

    /// [`on_interval`](Self::on_interval) shifted by `offset` seconds.
    pub fn on_interval_offset(&self, interval: f32, offset: f32) -> bool {
        crossed(self.time_active, self.delta, interval, offset)
    }

    /// Alternates every `interval` seconds: false for the first interval,
    /// true for the next, and so on.
    pub fn between_interval(&self, interval: f32) -> bool {
        between(self.time_active, interval)
    }

    pub fn on_raw_interval(&self, interval: f32) -> bool {
        crossed(self.raw_time_active, self.raw_delta, interval, 0.0)
    }

    pub fn on_raw_interval_offset(&self, interval: f32, offset: f32) -> bool {
        crossed(self.raw_time_active, self.raw_delta, interval, offset)
    }

    pub fn between_raw_interval(&self, interval: f32) -> bool {
        between(self.raw_time_active, interval)
    }
}

fn crossed(time: f32, delta: f32, interval: f32, offset: f32) -> bool {
    if interval <= 0.0 {
        return false;
    }
    ((time - offset - delta) / interval).floor() < ((time - offset) / interval).floor()
}

fn between(time: f32, interval: f32) -> bool {
    if interval <= 0.0 {
        return false;
    }
    time.rem_euclid(interval * 2.0) > interval
}

/// Optional per-scene behaviour. Every hook runs before the actors of the
/// same phase, except `on_end`, which runs after them.
pub trait SceneHooks {
    fn on_begin(&mut self, _ctx: &mut UpdateContext<'_>) {}
    fn on_end(&mut self, _ctx: &mut UpdateContext<'_>) {}
    fn before_update(&mut self, _ctx: &mut UpdateContext<'_>) {}
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}
    fn after_update(&mut self, _ctx: &mut UpdateContext<'_>) {}
    fn draw(&mut self, _ctx: &mut DrawContext<'_>) {}
}

pub struct Scene {
    name: String,
    pub paused: bool,
    focused: bool,
    clock: SceneClock,
    actors: ActorList,
    hooks: Option<Box<dyn SceneHooks>>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paused: false,
            focused: false,
            clock: SceneClock::default(),
            actors: ActorList::new(),
            hooks: None,
        }
    }

    pub fn with_hooks(mut self, hooks: impl SceneHooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True only between `scene_begin` and `scene_end`.
    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn clock(&self) -> SceneClock {
        self.clock
    }

    pub fn time_active(&self) -> f32 {
        self.clock.time_active
    }

    pub fn raw_time_active(&self) -> f32 {
        self.clock.raw_time_active
    }

    pub fn on_interval(&self, interval: f32) -> bool {
        self.clock.on_interval(interval)
    }

    pub fn actors(&self) -> &ActorList {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut ActorList {
        &mut self.actors
    }

    /// Shortcut for `actors().add(actor)`.
    pub fn add<A: Actor + 'static>(&self, actor: A) -> ActorId {
        self.actors.add(actor)
    }

    fn context<'a>(&self, env: &'a mut FrameEnv<'_>) -> UpdateContext<'a> {
        UpdateContext::new(
            env.time,
            self.clock,
            env.textures,
            self.actors.handle(),
            &mut *env.next_scene,
        )
    }

    /// Gains focus. Actors queued before this point are flushed first so
    /// they all see `scene_begin`.
    pub fn scene_begin(&mut self, env: &mut FrameEnv<'_>) {
        self.focused = true;
        info!("Scene '{}' begin", self.name);
        let mut ctx = self.context(env);
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_begin(&mut ctx);
        }
        self.actors.flush();
        self.actors.scene_begin(&mut ctx);
    }

    pub fn scene_end(&mut self, env: &mut FrameEnv<'_>) {
        self.focused = false;
        let mut ctx = self.context(env);
        self.actors.scene_end(&mut ctx);
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_end(&mut ctx);
        }
        info!("Scene '{}' end", self.name);
    }

    /// Advances the scene timers, then runs the actors' `before_update`.
    pub fn before_update(&mut self, env: &mut FrameEnv<'_>) {
        self.clock.advance(&env.time, self.paused);
        let mut ctx = self.context(env);
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.before_update(&mut ctx);
        }
        self.actors.before_update(&mut ctx);
    }

    pub fn update(&mut self, env: &mut FrameEnv<'_>) {
        let mut ctx = self.context(env);
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.update(&mut ctx);
        }
        self.actors.update(&mut ctx);
    }

    /// Runs `after_update` and flushes the actor list.
    pub fn after_update(&mut self, env: &mut FrameEnv<'_>) {
        let mut ctx = self.context(env);
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.after_update(&mut ctx);
        }
        self.actors.after_update(&mut ctx);
    }

    pub fn before_draw(&mut self, ctx: &mut DrawContext<'_>) {
        ctx.clock = self.clock;
        self.actors.before_draw(ctx);
    }

    pub fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        ctx.clock = self.clock;
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.draw(ctx);
        }
        self.actors.draw(ctx);
    }

    pub fn after_draw(&mut self, ctx: &mut DrawContext<'_>) {
        ctx.clock = self.clock;
        self.actors.after_draw(ctx);
    }
}
