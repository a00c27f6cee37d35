//! Actor whose lifecycle hooks are implemented by a script.
//!
//! Each hook calls the same-named entry point (see [`hooks`]) in the actor's
//! own [`ScriptHost`]. A missing entry point is skipped silently. A fault
//! inside one is logged under the `script` target and counted; the hook is
//! abandoned and the frame carries on.

use log::error;

use crate::actor::{Actor, ActorCore};
use crate::actorlist::ListHandle;
use crate::context::{DrawContext, UpdateContext};
use crate::scripting::{hooks, ActorBinding, EngineBinding, ScriptHost, ScriptValue};

pub struct ScriptedActor {
    core: ActorCore,
    host: Box<dyn ScriptHost>,
    name: String,
    faults: u64,
}

impl ScriptedActor {
    pub fn new(name: impl Into<String>, core: ActorCore, host: Box<dyn ScriptHost>) -> Self {
        Self {
            core,
            host,
            name: name.into(),
            faults: 0,
        }
    }

    /// Build an actor backed by its own Lua state running `source`.
    #[cfg(feature = "lua")]
    pub fn from_lua_source(
        name: impl Into<String>,
        core: ActorCore,
        source: &str,
    ) -> Result<Self, crate::scripting::ScriptError> {
        let name = name.into();
        let runtime = crate::resources::lua_runtime::LuaRuntime::from_source(&name, source)?;
        Ok(Self::new(name, core, Box::new(runtime)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Script faults caught so far.
    pub fn fault_count(&self) -> u64 {
        self.faults
    }

    pub fn host(&self) -> &dyn ScriptHost {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> &mut dyn ScriptHost {
        self.host.as_mut()
    }

    /// Call an arbitrary script function outside the frame hooks.
    pub fn call(&mut self, function: &str, args: &[ScriptValue]) -> Option<ScriptValue> {
        self.invoke(function, EngineBinding::default(), args)
    }

    fn invoke(
        &mut self,
        function: &str,
        engine: EngineBinding,
        args: &[ScriptValue],
    ) -> Option<ScriptValue> {
        let mut binding = ActorBinding::capture(&self.core);
        if let Err(e) = self.host.push_bindings(&binding, &engine) {
            self.fault(function, &e);
            return None;
        }
        let result = self.host.try_call(function, args);
        match self.host.pull_bindings(&mut binding) {
            Ok(()) => binding.apply(&mut self.core),
            Err(e) => self.fault(function, &e),
        }
        match result {
            Ok(value) => value,
            Err(e) => {
                self.fault(function, &e);
                None
            }
        }
    }

    fn fault(&mut self, function: &str, e: &dyn std::error::Error) {
        self.faults += 1;
        error!(target: "script", "Script actor '{}' failed in {}: {}", self.name, function, e);
    }

    fn update_hook(&mut self, function: &str, ctx: &UpdateContext<'_>) {
        let engine = EngineBinding::from_update(ctx);
        self.invoke(
            function,
            engine,
            &[ScriptValue::Number(engine.delta_time as f64)],
        );
    }
}

impl Actor for ScriptedActor {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn scene_begin(&mut self, ctx: &mut UpdateContext<'_>) {
        self.invoke(hooks::SCENE_BEGIN, EngineBinding::from_update(ctx), &[]);
    }

    fn scene_end(&mut self, ctx: &mut UpdateContext<'_>) {
        self.invoke(hooks::SCENE_END, EngineBinding::from_update(ctx), &[]);
    }

    fn before_update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.update_hook(hooks::BEFORE_UPDATE, ctx);
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.update_hook(hooks::UPDATE, ctx);
    }

    fn after_update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.update_hook(hooks::AFTER_UPDATE, ctx);
    }

    fn before_draw(&mut self, ctx: &mut DrawContext<'_>) {
        self.invoke(hooks::BEFORE_DRAW, EngineBinding::from_draw(ctx), &[]);
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        self.invoke(hooks::DRAW, EngineBinding::from_draw(ctx), &[]);
    }

    fn after_draw(&mut self, ctx: &mut DrawContext<'_>) {
        self.invoke(hooks::AFTER_DRAW, EngineBinding::from_draw(ctx), &[]);
    }

    fn on_added(&mut self, list: &ListHandle) {
        self.invoke(
            hooks::ON_ADDED,
            EngineBinding::default(),
            &[ScriptValue::Integer(list.id().to_bits() as i64)],
        );
    }
}
