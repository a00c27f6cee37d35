//! Lua scripting host.
//!
//! Each [`LuaRuntime`] owns an independent Lua state. Two global tables are
//! exposed to the script:
//!
//! - `engine`: logging functions plus per-hook timing (`delta_time`,
//!   `raw_delta_time`, `time_active`, `frame`).
//! - `actor`: the owning actor's `x`, `y`, `depth`, `active`, `visible` and
//!   `collidable`, refreshed before every hook and read back after it.
//!
//! ```lua
//! function Update(dt)
//!     actor.x = actor.x + 60 * dt
//!     if actor.x > 320 then
//!         engine.log_warn("off screen")
//!     end
//! end
//! ```

use log::{error, info, warn};
use mlua::prelude::*;

use crate::scripting::{ActorBinding, EngineBinding, ScriptError, ScriptHost, ScriptValue};

pub struct LuaRuntime {
    lua: Lua,
    name: String,
    engine: LuaTable,
    actor: LuaTable,
}

impl LuaRuntime {
    /// Creates a new Lua state and registers the `engine` and `actor` tables.
    ///
    /// # Errors
    ///
    /// Returns an error if Lua initialization or API registration fails.
    pub fn new(name: impl Into<String>) -> LuaResult<Self> {
        let lua = Lua::new();
        let engine = lua.create_table()?;
        let actor = lua.create_table()?;
        lua.globals().set("engine", engine.clone())?;
        lua.globals().set("actor", actor.clone())?;

        let runtime = Self {
            lua,
            name: name.into(),
            engine,
            actor,
        };
        runtime.register_base_api()?;
        Ok(runtime)
    }

    /// Creates a runtime and executes `source` in it, defining its functions.
    pub fn from_source(name: impl Into<String>, source: &str) -> Result<Self, ScriptError> {
        let name = name.into();
        let load_error = |e: LuaError| ScriptError::Load {
            name: name.clone(),
            message: e.to_string(),
        };
        let runtime = Self::new(name.clone()).map_err(load_error)?;
        runtime.exec(source).map_err(load_error)?;
        Ok(runtime)
    }

    fn register_base_api(&self) -> LuaResult<()> {
        self.engine.set(
            "log",
            self.lua.create_function(|_, msg: String| {
                info!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;
        self.engine.set(
            "log_info",
            self.lua.create_function(|_, msg: String| {
                info!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;
        self.engine.set(
            "log_warn",
            self.lua.create_function(|_, msg: String| {
                warn!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;
        self.engine.set(
            "log_error",
            self.lua.create_function(|_, msg: String| {
                error!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Executes a chunk of Lua source in this state.
    pub fn exec(&self, source: &str) -> LuaResult<()> {
        self.lua.load(source).set_name(self.name.as_str()).exec()
    }

    /// Checks if a global function exists.
    pub fn has_function(&self, name: &str) -> bool {
        self.lua.globals().get::<LuaFunction>(name).is_ok()
    }

    fn to_lua(&self, value: &ScriptValue) -> LuaResult<LuaValue> {
        Ok(match value {
            ScriptValue::Nil | ScriptValue::Opaque(_) => LuaValue::Nil,
            ScriptValue::Bool(b) => LuaValue::Boolean(*b),
            ScriptValue::Integer(i) => LuaValue::Integer(*i as mlua::Integer),
            ScriptValue::Number(n) => LuaValue::Number(*n),
            ScriptValue::String(s) => LuaValue::String(self.lua.create_string(s)?),
        })
    }
}

fn from_lua(value: LuaValue) -> ScriptValue {
    match value {
        LuaValue::Nil => ScriptValue::Nil,
        LuaValue::Boolean(b) => ScriptValue::Bool(b),
        LuaValue::Integer(i) => ScriptValue::Integer(i as i64),
        LuaValue::Number(n) => ScriptValue::Number(n),
        LuaValue::String(s) => ScriptValue::String(s.to_string_lossy().to_string()),
        other => ScriptValue::Opaque(other.type_name()),
    }
}

fn binding_error(e: LuaError) -> ScriptError {
    ScriptError::Binding(e.to_string())
}

impl ScriptHost for LuaRuntime {
    fn try_call(
        &mut self,
        name: &str,
        args: &[ScriptValue],
    ) -> Result<Option<ScriptValue>, ScriptError> {
        let runtime_error = |e: LuaError| ScriptError::Runtime {
            function: name.to_string(),
            message: e.to_string(),
        };
        let func = match self.lua.globals().get::<LuaValue>(name) {
            Ok(LuaValue::Function(func)) => func,
            Ok(_) => return Ok(None),
            Err(e) => return Err(runtime_error(e)),
        };
        let args = args
            .iter()
            .map(|a| self.to_lua(a))
            .collect::<LuaResult<LuaVariadic<LuaValue>>>()
            .map_err(runtime_error)?;
        let result: LuaValue = func.call(args).map_err(runtime_error)?;
        Ok(Some(from_lua(result)))
    }

    fn push_bindings(
        &mut self,
        actor: &ActorBinding,
        engine: &EngineBinding,
    ) -> Result<(), ScriptError> {
        let push = || -> LuaResult<()> {
            self.actor.set("x", actor.x)?;
            self.actor.set("y", actor.y)?;
            self.actor.set("depth", actor.depth)?;
            self.actor.set("active", actor.active)?;
            self.actor.set("visible", actor.visible)?;
            self.actor.set("collidable", actor.collidable)?;
            self.engine.set("delta_time", engine.delta_time)?;
            self.engine.set("raw_delta_time", engine.raw_delta_time)?;
            self.engine.set("time_active", engine.time_active)?;
            self.engine.set("frame", engine.frame)?;
            Ok(())
        };
        push().map_err(binding_error)
    }

    fn pull_bindings(&mut self, actor: &mut ActorBinding) -> Result<(), ScriptError> {
        let pull = || -> LuaResult<ActorBinding> {
            Ok(ActorBinding {
                x: self.actor.get("x")?,
                y: self.actor.get("y")?,
                depth: self.actor.get("depth")?,
                active: self.actor.get("active")?,
                visible: self.actor.get("visible")?,
                collidable: self.actor.get("collidable")?,
            })
        };
        *actor = pull().map_err(binding_error)?;
        Ok(())
    }
}
