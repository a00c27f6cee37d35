//! The boundary between actors and an embedded scripting engine.
//!
//! The engine only knows [`ScriptHost`]: "call the function with this name,
//! if it exists". [`ScriptedActor`](crate::scriptedactor::ScriptedActor)
//! drives it; [`LuaRuntime`](crate::resources::lua_runtime::LuaRuntime) is
//! the mlua-backed implementation.

use thiserror::Error;

use crate::actor::ActorCore;
use crate::context::{DrawContext, UpdateContext};

/// Entry-point names looked up for each lifecycle hook.
pub mod hooks {
    pub const SCENE_BEGIN: &str = "SceneBegin";
    pub const SCENE_END: &str = "SceneEnd";
    pub const BEFORE_UPDATE: &str = "BeforeUpdate";
    pub const UPDATE: &str = "Update";
    pub const AFTER_UPDATE: &str = "AfterUpdate";
    pub const BEFORE_DRAW: &str = "BeforeDraw";
    pub const DRAW: &str = "Draw";
    pub const AFTER_DRAW: &str = "AfterDraw";
    pub const ON_ADDED: &str = "OnAdded";

    pub const ALL: [&str; 9] = [
        SCENE_BEGIN,
        SCENE_END,
        BEFORE_UPDATE,
        UPDATE,
        AFTER_UPDATE,
        BEFORE_DRAW,
        DRAW,
        AFTER_DRAW,
        ON_ADDED,
    ];
}

/// Values crossing the script boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScriptValue {
    #[default]
    Nil,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    /// A script value with no host representation (table, function, ...),
    /// named by its script-side type.
    Opaque(&'static str),
}

impl ScriptValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScriptValue::Integer(i) => Some(*i as f64),
            ScriptValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, ScriptValue::Nil)
    }
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to load script '{name}': {message}")]
    Load { name: String, message: String },
    #[error("error in {function}(): {message}")]
    Runtime { function: String, message: String },
    #[error("failed to sync script bindings: {0}")]
    Binding(String),
}

/// Actor state mirrored into the script before a hook and read back after.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorBinding {
    pub x: f32,
    pub y: f32,
    pub depth: i32,
    pub active: bool,
    pub visible: bool,
    pub collidable: bool,
}

impl ActorBinding {
    pub fn capture(core: &ActorCore) -> Self {
        Self {
            x: core.position.x,
            y: core.position.y,
            depth: core.depth(),
            active: core.active,
            visible: core.visible,
            collidable: core.collidable,
        }
    }

    /// Write back into `core`. Depth goes through `set_depth` so the owning
    /// list is asked to re-sort.
    pub fn apply(&self, core: &mut ActorCore) {
        core.position.x = self.x;
        core.position.y = self.y;
        core.active = self.active;
        core.visible = self.visible;
        core.collidable = self.collidable;
        core.set_depth(self.depth);
    }
}

/// Read-only engine state exposed to the script for one hook.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineBinding {
    pub delta_time: f32,
    pub raw_delta_time: f32,
    pub time_active: f32,
    pub frame: u64,
}

impl EngineBinding {
    pub fn from_update(ctx: &UpdateContext<'_>) -> Self {
        Self {
            delta_time: ctx.time.delta,
            raw_delta_time: ctx.time.raw_delta,
            time_active: ctx.clock.time_active,
            frame: ctx.time.frame_count,
        }
    }

    pub fn from_draw(ctx: &DrawContext<'_>) -> Self {
        Self {
            delta_time: ctx.time.delta,
            raw_delta_time: ctx.time.raw_delta,
            time_active: ctx.clock.time_active,
            frame: ctx.time.frame_count,
        }
    }
}

/// A script execution context able to call its functions by name.
pub trait ScriptHost {
    /// Call `name` with `args`.
    ///
    /// `Ok(None)` when no such function exists. `Ok(Some(_))` with the
    /// function's first return value otherwise.
    fn try_call(
        &mut self,
        name: &str,
        args: &[ScriptValue],
    ) -> Result<Option<ScriptValue>, ScriptError>;

    /// Publish actor and engine state before a call.
    fn push_bindings(
        &mut self,
        _actor: &ActorBinding,
        _engine: &EngineBinding,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    /// Read back actor state the script may have changed.
    fn pull_bindings(&mut self, _actor: &mut ActorBinding) -> Result<(), ScriptError> {
        Ok(())
    }
}
