//! Sprite-sheet animation driven by an [`AnimationDocument`].
//!
//! An [`AnimationPlayer`] shows one frame of its document at a time. With no
//! tag bound it shows the default frame (frame 0 unless changed). `play`
//! binds a tag and steps through its frame range, honouring the tag's
//! direction, using each frame's own duration.
//!
//! `frame_index` is always the offset of the shown frame from the tag's
//! `from`, whatever the direction.

use std::rc::Rc;

use glam::Vec2;
use log::{debug, warn};

use crate::actor::ActorCore;
use crate::component::{Component, ComponentState};
use crate::context::{DrawContext, UpdateContext};
use crate::resources::animationdocument::{AnimationDocument, Direction, FrameData, Tag};
use crate::resources::texturestore::{TextureHandle, TextureStore};

/// Upper bound on frames stepped by one `CatchUp` advance.
const MAX_CATCH_UP_STEPS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// How much of a long delta is turned into frame steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameAdvance {
    /// At most one frame per update; leftover time is dropped.
    #[default]
    Single,
    /// Step through every frame whose duration fits in the accumulated time,
    /// carrying the remainder.
    CatchUp,
}

pub struct AnimationPlayer {
    state: ComponentState,
    document: Rc<AnimationDocument>,
    texture: TextureHandle,
    tag: Option<usize>,
    frame_index: usize,
    elapsed: f32,
    playing: bool,
    pingpong_forward: bool,
    default_frame: usize,
    pub speed_scale: f32,
    pub advance: FrameAdvance,
    /// Added to the parent's position when drawing.
    pub offset: Vec2,
}

impl AnimationPlayer {
    pub fn new(document: Rc<AnimationDocument>, texture: TextureHandle) -> Self {
        Self {
            state: ComponentState::default(),
            document,
            texture,
            tag: None,
            frame_index: 0,
            elapsed: 0.0,
            playing: false,
            pingpong_forward: true,
            default_frame: 0,
            speed_scale: 1.0,
            advance: FrameAdvance::Single,
            offset: Vec2::ZERO,
        }
    }

    /// Bind to the texture registered for the document's image, if any.
    pub fn from_store(document: Rc<AnimationDocument>, textures: &TextureStore) -> Option<Self> {
        let Some(texture) = textures.resolve_image(document.image()) else {
            warn!(
                "No texture registered for sheet image '{}'",
                document.image()
            );
            return None;
        };
        Some(Self::new(document, texture))
    }

    pub fn with_advance(mut self, advance: FrameAdvance) -> Self {
        self.advance = advance;
        self
    }

    pub fn with_default_frame(mut self, frame: usize) -> Self {
        self.default_frame = frame;
        self
    }

    pub fn document(&self) -> &AnimationDocument {
        &self.document
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Start `tag_name` from its first frame.
    ///
    /// An unknown tag, or one pointing past the document's frames, leaves the
    /// player stopped. Returns whether playback started.
    pub fn play(&mut self, tag_name: &str) -> bool {
        self.stop();
        let Some(index) = self.document.tag_index(tag_name) else {
            debug!("Animation tag '{}' not found; player stays stopped", tag_name);
            return false;
        };
        let tag = &self.document.tags()[index];
        if tag.from > tag.to || tag.to >= self.document.frame_count() {
            warn!(
                "Animation tag '{}' ({}..={}) out of range for {} frames",
                tag_name,
                tag.from,
                tag.to,
                self.document.frame_count()
            );
            return false;
        }
        let (frame_index, forward) = match tag.direction {
            Direction::Forward | Direction::Pingpong => (0, true),
            Direction::Reverse | Direction::PingpongReverse => (tag.span(), false),
        };
        self.tag = Some(index);
        self.frame_index = frame_index;
        self.pingpong_forward = forward;
        self.playing = true;
        true
    }

    /// Unbind the tag and go back to the default frame.
    pub fn stop(&mut self) {
        self.tag = None;
        self.frame_index = 0;
        self.elapsed = 0.0;
        self.playing = false;
        self.pingpong_forward = true;
    }

    /// Freeze on the current frame. No effect while stopped.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        if self.tag.is_some() {
            self.playing = true;
        }
    }

    pub fn playback(&self) -> PlaybackState {
        match (self.tag, self.playing) {
            (None, _) => PlaybackState::Stopped,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        }
    }

    pub fn current_tag(&self) -> Option<&Tag> {
        self.tag.and_then(|i| self.document.tags().get(i))
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Time spent on the shown frame, in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Index of the shown frame in the document.
    pub fn absolute_frame(&self) -> usize {
        match self.current_tag() {
            Some(tag) => tag.from + self.frame_index,
            None => self.default_frame,
        }
    }

    pub fn current_frame(&self) -> Option<&FrameData> {
        self.document.frame(self.absolute_frame())
    }

    /// Accumulate `delta_time * speed_scale` and step frames per the advance
    /// policy. A frame is left once its duration has been reached.
    pub fn advance(&mut self, delta_time: f32) {
        if !self.playing {
            return;
        }
        let document = Rc::clone(&self.document);
        let Some(tag) = self.tag.and_then(|i| document.tags().get(i)) else {
            return;
        };
        self.elapsed += (delta_time * self.speed_scale).max(0.0);

        match self.advance {
            FrameAdvance::Single => {
                if self.elapsed >= self.frame_duration(&document, tag) {
                    self.step(tag);
                    self.elapsed = 0.0;
                }
            }
            FrameAdvance::CatchUp => {
                let mut steps = 0;
                loop {
                    let duration = self.frame_duration(&document, tag);
                    if duration <= 0.0 {
                        self.step(tag);
                        self.elapsed = 0.0;
                        break;
                    }
                    if self.elapsed < duration {
                        break;
                    }
                    self.elapsed -= duration;
                    self.step(tag);
                    steps += 1;
                    if steps >= MAX_CATCH_UP_STEPS {
                        debug!("Animation catch-up capped after {} frames", steps);
                        self.elapsed = 0.0;
                        break;
                    }
                }
            }
        }
    }

    fn frame_duration(&self, document: &AnimationDocument, tag: &Tag) -> f32 {
        document
            .frame(tag.from + self.frame_index)
            .map(FrameData::duration_secs)
            .unwrap_or(0.0)
    }

    fn step(&mut self, tag: &Tag) {
        let span = tag.span();
        match tag.direction {
            Direction::Forward => {
                self.frame_index = if self.frame_index >= span {
                    0
                } else {
                    self.frame_index + 1
                };
            }
            Direction::Reverse => {
                self.frame_index = if self.frame_index == 0 {
                    span
                } else {
                    self.frame_index - 1
                };
            }
            Direction::Pingpong | Direction::PingpongReverse => {
                if span == 0 {
                    return;
                }
                if self.pingpong_forward {
                    if self.frame_index >= span {
                        self.pingpong_forward = false;
                        self.frame_index = span - 1;
                    } else {
                        self.frame_index += 1;
                    }
                } else if self.frame_index == 0 {
                    self.pingpong_forward = true;
                    self.frame_index = 1;
                } else {
                    self.frame_index -= 1;
                }
            }
        }
    }
}

impl Component for AnimationPlayer {
    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }

    fn update(&mut self, _parent: &mut ActorCore, ctx: &mut UpdateContext<'_>) {
        self.advance(ctx.delta_time());
    }

    fn draw(&mut self, parent: &ActorCore, ctx: &mut DrawContext<'_>) {
        let Some(frame) = self.current_frame() else {
            return;
        };
        let trim = Vec2::new(
            frame.sprite_source_size.x as f32,
            frame.sprite_source_size.y as f32,
        );
        let dest = parent.position + self.offset + trim;
        ctx.renderer.draw(self.texture, frame.frame, dest);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
