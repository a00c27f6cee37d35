//! Per-frame driver and the scene-switch protocol.
//!
//! # Frame flow
//!
//! 1. [`SceneDirector::update`]: advance [`FrameTime`]; unless frozen, run the
//!    current scene's `before_update` → `update` → `after_update`.
//! 2. If a scene is pending, switch: `scene_end` on the old scene, drop it
//!    (its whole actor graph is released right here), install the new one
//!    and call `scene_begin`.
//! 3. [`SceneDirector::draw`]: renderer `begin_frame`, `before_draw`, `draw`,
//!    `after_draw`, optional collider outlines, renderer `end_frame`.
//!
//! The switch happens only at step 2, so no actor ever sees an update from
//! a scene that is halfway through being replaced.

use log::{debug, info};

use crate::context::{DrawContext, FrameEnv};
use crate::render::Renderer;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::frametime::FrameTime;
use crate::resources::texturestore::TextureStore;
use crate::scene::Scene;

/// Coarse state of the scene slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorState {
    NoScene,
    SceneActive,
    /// A switch will happen at the end of the next update.
    SwitchPending,
}

pub struct SceneDirector {
    current: Option<Scene>,
    next: Option<Scene>,
    time: FrameTime,
    freeze_timer: f32,
    textures: TextureStore,
    debug_colliders: bool,
    scene_switches: u64,
}

impl Default for SceneDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneDirector {
    pub fn new() -> Self {
        Self {
            current: None,
            next: None,
            time: FrameTime::default(),
            freeze_timer: 0.0,
            textures: TextureStore::new(),
            debug_colliders: false,
            scene_switches: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut director = Self::new();
        director.time = FrameTime::default().with_time_scale(config.time_rate);
        director.debug_colliders = config.debug_colliders;
        director
    }

    /// Queue `scene` to replace the current one at the end of the next update.
    pub fn set_scene(&mut self, scene: Scene) {
        debug!("Scene '{}' queued", scene.name());
        self.next = Some(scene);
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.current.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.current.as_mut()
    }

    pub fn pending_scene(&self) -> Option<&Scene> {
        self.next.as_ref()
    }

    pub fn state(&self) -> DirectorState {
        match (&self.current, &self.next) {
            (_, Some(_)) => DirectorState::SwitchPending,
            (Some(_), None) => DirectorState::SceneActive,
            (None, None) => DirectorState::NoScene,
        }
    }

    pub fn scene_switches(&self) -> u64 {
        self.scene_switches
    }

    pub fn time(&self) -> FrameTime {
        self.time
    }

    pub fn time_rate(&self) -> f32 {
        self.time.time_scale
    }

    pub fn set_time_rate(&mut self, rate: f32) {
        self.time.time_scale = rate;
    }

    /// Skip scene updates for `seconds` of raw time. Drawing continues.
    pub fn freeze(&mut self, seconds: f32) {
        self.freeze_timer = self.freeze_timer.max(seconds);
        debug!("Updates frozen for {:.3}s", self.freeze_timer);
    }

    pub fn freeze_timer(&self) -> f32 {
        self.freeze_timer
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_timer > 0.0
    }

    pub fn debug_colliders(&self) -> bool {
        self.debug_colliders
    }

    pub fn set_debug_colliders(&mut self, enabled: bool) {
        self.debug_colliders = enabled;
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureStore {
        &mut self.textures
    }

    /// Update phase from an unscaled delta; the time rate is applied here.
    pub fn update(&mut self, raw_delta: f32) {
        let delta = raw_delta * self.time.time_scale;
        self.update_with(delta, raw_delta);
    }

    /// Update phase from an already-scaled delta plus the raw one.
    pub fn update_with(&mut self, delta: f32, raw_delta: f32) {
        self.time.step(delta, raw_delta);

        if self.freeze_timer > 0.0 {
            self.freeze_timer = (self.freeze_timer - raw_delta).max(0.0);
        } else if let Some(scene) = self.current.as_mut() {
            let mut env = FrameEnv {
                time: self.time,
                textures: &self.textures,
                next_scene: &mut self.next,
            };
            scene.before_update(&mut env);
            scene.update(&mut env);
            scene.after_update(&mut env);
        }

        if self.next.is_some() {
            self.switch_scene();
        }
    }

    fn switch_scene(&mut self) {
        let Some(incoming) = self.next.take() else {
            return;
        };

        if let Some(mut outgoing) = self.current.take() {
            let mut env = FrameEnv {
                time: self.time,
                textures: &self.textures,
                next_scene: &mut self.next,
            };
            outgoing.scene_end(&mut env);
            let released = outgoing.actors().len() + outgoing.actors().pending_len();
            drop(outgoing);
            debug!("Released {} actor(s) from previous scene", released);
        }

        info!("Switching to scene '{}'", incoming.name());
        self.scene_switches += 1;
        let scene = self.current.insert(incoming);
        let mut env = FrameEnv {
            time: self.time,
            textures: &self.textures,
            next_scene: &mut self.next,
        };
        scene.scene_begin(&mut env);
    }

    /// Draw phase. Every update for this frame has already finished.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        if let Some(scene) = self.current.as_mut() {
            renderer.begin_frame();
            let mut ctx = DrawContext::new(self.time, &self.textures, &mut *renderer);
            scene.before_draw(&mut ctx);
            scene.draw(&mut ctx);
            scene.after_draw(&mut ctx);
            if self.debug_colliders {
                scene.actors().draw_colliders(&mut *ctx.renderer);
            }
            ctx.renderer.end_frame();
        } else {
            renderer.begin_frame();
            renderer.end_frame();
        }
        self.time.frame_count += 1;
    }

    /// One full frame: update then draw.
    pub fn tick(&mut self, raw_delta: f32, renderer: &mut dyn Renderer) {
        self.update(raw_delta);
        self.draw(renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;

    #[test]
    fn test_state_transitions() {
        let mut director = SceneDirector::new();
        assert_eq!(director.state(), DirectorState::NoScene);
        director.set_scene(Scene::new("title"));
        assert_eq!(director.state(), DirectorState::SwitchPending);
        director.update(0.016);
        assert_eq!(director.state(), DirectorState::SceneActive);
        assert_eq!(director.scene().map(Scene::name), Some("title"));
        assert!(director.scene().is_some_and(Scene::focused));
        assert_eq!(director.scene_switches(), 1);
    }

    #[test]
    fn test_time_rate_scales_scene_time() {
        let mut director = SceneDirector::new();
        director.set_scene(Scene::new("s"));
        director.update(0.0);
        director.set_time_rate(0.5);
        director.update(0.2);
        let scene = director.scene().expect("scene installed");
        assert!((scene.time_active() - 0.1).abs() < 1e-6);
        assert!((scene.raw_time_active() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_freeze_skips_updates_until_expired() {
        let mut director = SceneDirector::new();
        director.set_scene(Scene::new("s"));
        director.update(0.0);
        director.freeze(0.25);
        director.update(0.1);
        director.update(0.1);
        assert!(director.is_frozen());
        assert_eq!(director.scene().map(Scene::raw_time_active), Some(0.0));
        director.update(0.1);
        assert!(!director.is_frozen());
        director.update(0.1);
        assert!(director.scene().is_some_and(|s| s.raw_time_active() > 0.0));
    }

    #[test]
    fn test_from_config() {
        let mut config = EngineConfig::new();
        config.time_rate = 2.0;
        config.debug_colliders = true;
        let director = SceneDirector::from_config(&config);
        assert_eq!(director.time_rate(), 2.0);
        assert!(director.debug_colliders());
    }

    #[test]
    fn test_draw_counts_frames_without_scene() {
        let mut director = SceneDirector::new();
        let mut renderer = RecordingRenderer::new();
        director.draw(&mut renderer);
        director.draw(&mut renderer);
        assert_eq!(director.time().frame_count, 2);
        assert_eq!(renderer.frames(), 2);
    }
}
