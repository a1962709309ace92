use image::RgbaImage;
use log::{debug, info, warn};

use super::Atlas;
use crate::cli::CompositeMode;
use crate::descriptor::{AtlasDescriptor, FrameDescriptor};
use crate::error::UnpackerError;
use crate::sprite::SpriteSource;
use crate::transform::{bleed_window, composite, crop, opaque_bounds, to_atlas_space};

/// Configuration for rebuilding an atlas from sprites
pub struct AtlasBuilder {
    pub width: u32,
    pub height: u32,
    pub bleed: u32,
    pub mode: CompositeMode,
}

impl AtlasBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bleed: 0,
            mode: CompositeMode::Overlay,
        }
    }

    /// Builder sized to the atlas recorded in the descriptor
    pub fn for_descriptor(descriptor: &AtlasDescriptor) -> Self {
        Self::new(descriptor.meta.width, descriptor.meta.height)
    }

    pub fn bleed(mut self, bleed: u32) -> Self {
        self.bleed = bleed;
        self
    }

    pub fn mode(mut self, mode: CompositeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Draw every frame of `descriptor` onto a fresh canvas.
    ///
    /// Frames are drawn one after another in name order. Overlapping packed
    /// rectangles are reported but not rejected; later frames paint over
    /// earlier ones.
    pub fn build<S: SpriteSource + ?Sized>(
        &self,
        descriptor: &AtlasDescriptor,
        source: &S,
    ) -> Result<Atlas, UnpackerError> {
        warn_overlaps(descriptor);

        let mut atlas = Atlas::new(self.width, self.height).map_err(UnpackerError::Canvas)?;

        for (name, frame) in &descriptor.frames {
            self.place(&mut atlas.image, name, frame, source)?;
            atlas.frames.push(name.clone());
        }

        info!(
            "Atlas {}x{} with {} frames",
            atlas.width,
            atlas.height,
            atlas.frames.len()
        );

        Ok(atlas)
    }

    fn place<S: SpriteSource + ?Sized>(
        &self,
        canvas: &mut RgbaImage,
        name: &str,
        frame: &FrameDescriptor,
        source: &S,
    ) -> Result<(), UnpackerError> {
        let geometry = |e| UnpackerError::geometry(name, e);

        // Checked before the sprite is even loaded
        let window = bleed_window(frame.packed, self.bleed, canvas.width(), canvas.height())
            .map_err(geometry)?;

        let sprite = source.load(name)?;
        if self.bleed == 0 {
            warn_if_content_lost(name, frame, &sprite);
        }

        let placed = to_atlas_space(&sprite, frame, self.bleed).map_err(geometry)?;
        let pixels = if self.bleed == 0 {
            placed
        } else {
            // Bleed border may hang over the atlas edge
            crop(&placed, window.inner).map_err(geometry)?
        };
        composite(canvas, window.outer, &pixels, self.mode).map_err(geometry)?;

        debug!("Placed '{}' at {}", name, frame.packed);
        Ok(())
    }
}

fn warn_overlaps(descriptor: &AtlasDescriptor) {
    let frames: Vec<_> = descriptor.frames.iter().collect();
    for (i, (name_a, a)) in frames.iter().enumerate() {
        for (name_b, b) in &frames[i + 1..] {
            if a.packed.intersects(&b.packed) {
                warn!(
                    "Frames '{}' {} and '{}' {} overlap; '{}' is drawn last",
                    name_a, a.packed, name_b, b.packed, name_b
                );
            }
        }
    }
}

/// Trimming keeps only the content rectangle, so anything visible outside it is dropped.
fn warn_if_content_lost(name: &str, frame: &FrameDescriptor, sprite: &RgbaImage) {
    if !frame.trimmed {
        return;
    }
    if let Some(bounds) = opaque_bounds(sprite).filter(|b| !frame.trim_offset.contains(b)) {
        warn!(
            "Sprite '{}' has visible pixels in {} outside its trim rectangle {}; they will be dropped",
            name, bounds, frame.trim_offset
        );
    }
}
