use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::cli::CompositeMode;
use crate::descriptor::{AtlasDescriptor, FrameDescriptor};
use crate::error::UnpackerError;
use crate::output::SpriteSink;
use crate::transform::{blank_canvas, bleed_window, composite, crop, to_sprite_space};

/// Reconstructs sprites from a decoded atlas image
pub struct SpriteExtractor<'a> {
    atlas: &'a RgbaImage,
    pub bleed: u32,
}

impl<'a> SpriteExtractor<'a> {
    pub fn new(atlas: &'a RgbaImage) -> Self {
        Self { atlas, bleed: 0 }
    }

    pub fn bleed(mut self, bleed: u32) -> Self {
        self.bleed = bleed;
        self
    }

    /// Rebuild a single sprite. Frames are independent, so this can be
    /// dispatched on any thread in any order.
    pub fn extract(&self, name: &str, frame: &FrameDescriptor) -> Result<RgbaImage, UnpackerError> {
        let geometry = |e| UnpackerError::geometry(name, e);

        let placed = if self.bleed == 0 {
            crop(self.atlas, frame.packed).map_err(geometry)?
        } else {
            // Border pixels that fall outside the atlas stay transparent
            let (width, height) = self.atlas.dimensions();
            let window = bleed_window(frame.packed, self.bleed, width, height).map_err(geometry)?;
            let mut grown = blank_canvas(frame.packed.width, frame.packed.height, self.bleed)
                .map_err(geometry)?;
            let pixels = crop(self.atlas, window.outer).map_err(geometry)?;
            composite(&mut grown, window.inner, &pixels, CompositeMode::Overwrite)
                .map_err(geometry)?;
            grown
        };

        to_sprite_space(placed, frame, self.bleed).map_err(geometry)
    }

    /// Extract every frame of `descriptor` and hand it to `sink`, in parallel
    /// on the current rayon pool. Returns the number of sprites written.
    ///
    /// The first failure stops frames that have not started yet; sprites
    /// already written stay where they are.
    pub fn unpack<S: SpriteSink>(
        &self,
        descriptor: &AtlasDescriptor,
        sink: &S,
        cancel_token: Option<&Arc<AtomicBool>>,
    ) -> Result<usize, UnpackerError> {
        let (width, height) = self.atlas.dimensions();
        if (width, height) != (descriptor.meta.width, descriptor.meta.height) {
            warn!(
                "Atlas image is {}x{} but the descriptor says {}x{}",
                width, height, descriptor.meta.width, descriptor.meta.height
            );
        }

        info!("Unpacking {} frames...", descriptor.len());

        let frames: Vec<_> = descriptor.frames.iter().collect();

        frames.par_iter().try_for_each(|(name, frame)| {
            if cancel_token.is_some_and(|token| token.load(Ordering::Relaxed)) {
                return Err(UnpackerError::Cancelled);
            }

            let sprite = self.extract(name, frame)?;
            sink.write(name, &sprite)?;
            debug!("Extracted '{}' from {}", name, frame.packed);
            Ok(())
        })?;

        Ok(frames.len())
    }
}
