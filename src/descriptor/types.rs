use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::geometry::Rect;

/// `{x, y, w, h}` as written by TexturePacker-style exporters
#[derive(Debug, Clone, Copy, Deserialize)]
pub(super) struct Xywh {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl From<Xywh> for Rect {
    fn from(r: Xywh) -> Self {
        Rect::new(r.x, r.y, r.w, r.h)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(super) struct Wh {
    pub w: u32,
    pub h: u32,
}

/// One frame entry as it appears in the document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawFrame {
    pub frame: Xywh,
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub trimmed: bool,
    pub sprite_source_size: Option<Xywh>,
    pub source_size: Option<Wh>,
}

/// Array-layout entry: the frame name travels inside the object
#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawNamedFrame {
    pub filename: String,
    #[serde(flatten)]
    pub frame: RawFrame,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawMeta {
    #[serde(default)]
    pub app: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub image: String,
    #[serde(default)]
    pub format: Option<String>,
    pub size: Wh,
    #[serde(default)]
    pub scale: Option<serde_json::Value>,
    #[serde(default, rename = "smartupdate")]
    pub smart_update: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawDocument {
    pub frames: RawFrames,
    pub meta: RawMeta,
}

/// The `frames` member, entries kept in document order and undecoded so
/// errors can name the frame. Repeated keys in the object layout all survive.
#[derive(Debug, Clone)]
pub(super) enum RawFrames {
    /// `{"name": {...}, ...}`
    Hash(Vec<(String, serde_json::Value)>),
    /// `[{"filename": "name", ...}, ...]`
    Array(Vec<serde_json::Value>),
}

impl<'de> Deserialize<'de> for RawFrames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawFramesVisitor)
    }
}

struct RawFramesVisitor;

impl<'de> Visitor<'de> for RawFramesVisitor {
    type Value = RawFrames;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object keyed by frame name or an array of frames")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
            entries.push(entry);
        }
        Ok(RawFrames::Hash(entries))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<serde_json::Value>()? {
            items.push(item);
        }
        Ok(RawFrames::Array(items))
    }
}

/// Placement of one sprite inside the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Rectangle occupied in the atlas, as placed (after rotation)
    pub packed: Rect,
    /// Sprite was rotated 90° clockwise when placed
    pub rotated: bool,
    /// Transparent borders were stripped before packing
    pub trimmed: bool,
    /// Trimmed content inside the untrimmed sprite canvas (sprite space, before rotation)
    pub trim_offset: Rect,
    /// Untrimmed sprite canvas width
    pub source_width: u32,
    /// Untrimmed sprite canvas height
    pub source_height: u32,
}

impl FrameDescriptor {
    /// Frame that was neither rotated nor trimmed
    pub fn untransformed(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            packed: Rect::new(x, y, width, height),
            rotated: false,
            trimmed: false,
            trim_offset: Rect::from_size(width, height),
            source_width: width,
            source_height: height,
        }
    }

    /// Size of the trimmed content in natural sprite orientation
    pub fn content_size(&self) -> (u32, u32) {
        if self.rotated {
            (self.packed.height, self.packed.width)
        } else {
            (self.packed.width, self.packed.height)
        }
    }

    /// Size of the reconstructed sprite canvas
    pub fn sprite_size(&self) -> (u32, u32) {
        if self.trimmed {
            (self.source_width, self.source_height)
        } else {
            self.content_size()
        }
    }
}

/// Atlas-level metadata
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasMeta {
    pub app: Option<String>,
    pub version: Option<String>,
    /// Atlas image file, relative to the descriptor
    pub image: String,
    pub format: Option<String>,
    pub width: u32,
    pub height: u32,
    pub scale: Option<String>,
    pub smart_update: Option<String>,
}

/// A parsed frame descriptor document
#[derive(Debug, Clone)]
pub struct AtlasDescriptor {
    pub meta: AtlasMeta,
    /// Frames keyed by name; names may contain `/` separators
    pub frames: BTreeMap<String, FrameDescriptor>,
}

impl AtlasDescriptor {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_size_swaps_when_rotated() {
        let mut frame = FrameDescriptor::untransformed(0, 0, 20, 10);
        assert_eq!(frame.content_size(), (20, 10));

        frame.rotated = true;
        assert_eq!(frame.content_size(), (10, 20));
    }

    #[test]
    fn test_sprite_size_uses_source_when_trimmed() {
        let frame = FrameDescriptor {
            packed: Rect::new(0, 0, 6, 6),
            rotated: false,
            trimmed: true,
            trim_offset: Rect::new(2, 3, 6, 6),
            source_width: 10,
            source_height: 10,
        };
        assert_eq!(frame.content_size(), (6, 6));
        assert_eq!(frame.sprite_size(), (10, 10));
    }
}
