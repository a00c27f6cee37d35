//! Sprite-sheet animation metadata in the shape Aseprite exports.
//!
//! An [`AnimationDocument`] is read-only input: an external loader builds it
//! (typically through `serde_json`) and animation players share it behind an
//! `Rc`. Frames keep the exact order they appear in the export; tags address
//! frames by that position.
//!
//! Both Aseprite layouts are accepted for `frames`: the array form
//! (`[{ "filename": ..., ... }]`) and the hash form
//! (`{ "name": { ... } }`). The hash form keeps document order.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::render::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameData {
    /// Frame name. Filled from the map key in the hash layout.
    #[serde(default)]
    pub filename: String,
    /// Source rectangle inside the sheet image.
    pub frame: Rect,
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub trimmed: bool,
    /// Where the trimmed rectangle sits inside the untrimmed sprite.
    #[serde(default)]
    pub sprite_source_size: Rect,
    #[serde(default)]
    pub source_size: Size,
    /// Milliseconds.
    pub duration: u32,
}

impl FrameData {
    pub fn duration_secs(&self) -> f32 {
        self.duration as f32 / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
    Pingpong,
    PingpongReverse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub direction: Direction,
}

impl Tag {
    /// Number of frames after the first one (`to - from`).
    pub fn span(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn frame_count(&self) -> usize {
        self.span() + 1
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMeta {
    #[serde(default)]
    pub app: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Sheet image reference, e.g. `"penguin.png"`.
    pub image: String,
    #[serde(default)]
    pub format: Option<String>,
    pub size: Size,
    #[serde(default)]
    pub scale: Option<String>,
    #[serde(default)]
    pub frame_tags: Vec<Tag>,
}

#[derive(Deserialize)]
struct DocumentData {
    frames: OrderedFrames,
    meta: SheetMeta,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "DocumentData")]
pub struct AnimationDocument {
    frames: Vec<FrameData>,
    meta: SheetMeta,
    by_name: FxHashMap<String, usize>,
}

impl From<DocumentData> for AnimationDocument {
    fn from(data: DocumentData) -> Self {
        Self::new(data.frames.0, data.meta)
    }
}

impl AnimationDocument {
    pub fn new(frames: Vec<FrameData>, meta: SheetMeta) -> Self {
        let mut by_name = FxHashMap::default();
        for (index, frame) in frames.iter().enumerate() {
            by_name.entry(frame.filename.clone()).or_insert(index);
        }
        Self {
            frames,
            meta,
            by_name,
        }
    }

    pub fn frames(&self) -> &[FrameData] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&FrameData> {
        self.frames.get(index)
    }

    pub fn frame_by_name(&self, name: &str) -> Option<&FrameData> {
        self.frame_index(name).and_then(|i| self.frames.get(i))
    }

    pub fn frame_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn meta(&self) -> &SheetMeta {
        &self.meta
    }

    pub fn image(&self) -> &str {
        &self.meta.image
    }

    pub fn size(&self) -> Size {
        self.meta.size
    }

    pub fn tags(&self) -> &[Tag] {
        &self.meta.frame_tags
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.meta.frame_tags.iter().find(|t| t.name == name)
    }

    pub fn tag_index(&self, name: &str) -> Option<usize> {
        self.meta.frame_tags.iter().position(|t| t.name == name)
    }
}

/// Frames in export order, from either the array or the hash layout.
struct OrderedFrames(Vec<FrameData>);

impl<'de> Deserialize<'de> for OrderedFrames {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OrderedFramesVisitor)
    }
}

struct OrderedFramesVisitor;

impl<'de> Visitor<'de> for OrderedFramesVisitor {
    type Value = OrderedFrames;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of frames or a map of frame name to frame")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut frames = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(frame) = seq.next_element::<FrameData>()? {
            frames.push(frame);
        }
        Ok(OrderedFrames(frames))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut frames = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, mut frame)) = map.next_entry::<String, FrameData>()? {
            frame.filename = name;
            frames.push(frame);
        }
        Ok(OrderedFrames(frames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH_JSON: &str = r#"{
        "frames": {
            "penguin 10.aseprite": { "frame": {"x":0,"y":0,"w":16,"h":16}, "duration": 100,
                "spriteSourceSize": {"x":0,"y":0,"w":16,"h":16}, "sourceSize": {"w":16,"h":16} },
            "penguin 2.aseprite": { "frame": {"x":16,"y":0,"w":16,"h":16}, "duration": 150,
                "spriteSourceSize": {"x":0,"y":0,"w":16,"h":16}, "sourceSize": {"w":16,"h":16} }
        },
        "meta": {
            "app": "https://www.aseprite.org/",
            "image": "penguin.png",
            "size": {"w":32,"h":16},
            "frameTags": [ { "name": "rotate", "from": 0, "to": 1, "direction": "pingpong" } ],
            "layers": [ { "name": "Layer 1", "opacity": 255, "blendMode": "normal" } ]
        }
    }"#;

    #[test]
    fn test_hash_layout_keeps_document_order() {
        let doc: AnimationDocument = serde_json::from_str(HASH_JSON).expect("valid json");
        assert_eq!(doc.frame_count(), 2);
        assert_eq!(doc.frames()[0].filename, "penguin 10.aseprite");
        assert_eq!(doc.frames()[1].filename, "penguin 2.aseprite");
        assert_eq!(doc.frame_index("penguin 2.aseprite"), Some(1));
    }

    #[test]
    fn test_array_layout() {
        let json = r#"{
            "frames": [
                { "filename": "a", "frame": {"x":0,"y":0,"w":8,"h":8}, "duration": 50 },
                { "filename": "b", "frame": {"x":8,"y":0,"w":8,"h":8}, "duration": 60 }
            ],
            "meta": { "image": "a.png", "size": {"w":16,"h":8} }
        }"#;
        let doc: AnimationDocument = serde_json::from_str(json).expect("valid json");
        assert_eq!(doc.frame_by_name("b").map(|f| f.duration), Some(60));
        assert!(doc.tags().is_empty());
    }

    #[test]
    fn test_tag_lookup_and_direction() {
        let doc: AnimationDocument = serde_json::from_str(HASH_JSON).expect("valid json");
        let tag = doc.tag("rotate").expect("tag exists");
        assert_eq!(tag.direction, Direction::Pingpong);
        assert_eq!(tag.span(), 1);
        assert!(doc.tag("missing").is_none());
    }

    #[test]
    fn test_missing_frames_return_none() {
        let doc: AnimationDocument = serde_json::from_str(HASH_JSON).expect("valid json");
        assert!(doc.frame(2).is_none());
        assert!(doc.frame_by_name("nope").is_none());
    }

    #[test]
    fn test_duration_secs() {
        let doc: AnimationDocument = serde_json::from_str(HASH_JSON).expect("valid json");
        assert_eq!(doc.frames()[1].duration_secs(), 0.15);
    }

    #[test]
    fn test_pingpong_reverse_direction_name() {
        let tag: Tag =
            serde_json::from_str(r#"{"name":"t","from":0,"to":3,"direction":"pingpong_reverse"}"#)
                .expect("valid tag");
        assert_eq!(tag.direction, Direction::PingpongReverse);
        assert_eq!(tag.frame_count(), 4);
    }
}
