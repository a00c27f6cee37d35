//! Stagehand library.
//!
//! A frame-driven actor/scene runtime: depth-ordered actor lists with
//! deferred insertion and removal, scenes switched at a single point per
//! frame, Aseprite-driven sprite animation, and actors whose hooks are
//! implemented by Lua scripts.

pub mod actor;
pub mod actorlist;
pub mod collider;
pub mod component;
pub mod componentactor;
pub mod components;
pub mod context;
pub mod director;
pub mod render;
pub mod resources;
pub mod scene;
pub mod scriptedactor;
pub mod scripting;
