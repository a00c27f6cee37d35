//! Long-lived data the engine hands to scenes and actors.
//!
//! Overview
//! - `animationdocument` – parsed Aseprite sheet metadata (frames and tags)
//! - `engineconfig` – INI-backed window and timing settings
//! - `frametime` – scaled/raw delta and frame counter for the current frame
//! - `lua_runtime` – mlua-backed script host (feature `lua`)
//! - `texturestore` – texture names resolved to opaque handles
pub mod animationdocument;
pub mod engineconfig;
pub mod frametime;
#[cfg(feature = "lua")]
pub mod lua_runtime;
pub mod texturestore;
