//! Components that can be attached to a
//! [`ComponentActor`](crate::componentactor::ComponentActor).
//!
//! - `aseprite` – sprite-sheet animation playback over an Aseprite export
pub mod aseprite;
