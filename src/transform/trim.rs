use image::RgbaImage;

use super::region::{blank_canvas, composite, crop, expect_size, grown_size};
use crate::cli::CompositeMode;
use crate::descriptor::FrameDescriptor;
use crate::error::GeometryError;
use crate::geometry::Rect;

/// Rectangle of the trimmed content inside a sprite canvas carrying a
/// `bleed` border. The canvas and the content both grow by `bleed` on every
/// side, so the top-left corner stays at the trim offset.
fn content_rect(frame: &FrameDescriptor, bleed: u32) -> Result<Rect, GeometryError> {
    let (width, height) = frame.content_size();
    let (width, height) = grown_size(width, height, bleed)?;
    Ok(Rect::new(frame.trim_offset.x, frame.trim_offset.y, width, height))
}

/// Put trimmed content back onto a transparent canvas of the frame's source size.
///
/// Untrimmed frames pass through unchanged after a size check.
pub fn pad_to_source(
    content: RgbaImage,
    frame: &FrameDescriptor,
    bleed: u32,
) -> Result<RgbaImage, GeometryError> {
    let rect = content_rect(frame, bleed)?;
    expect_size(&content, rect.width, rect.height)?;

    if !frame.trimmed {
        return Ok(content);
    }

    let mut canvas = blank_canvas(frame.source_width, frame.source_height, bleed)?;
    composite(&mut canvas, rect, &content, CompositeMode::Overwrite)?;
    Ok(canvas)
}

/// Cut the trimmed content out of a full sprite canvas.
///
/// The sprite must have exactly the size `pad_to_source` produces for this frame.
pub fn trim_to_content(
    sprite: &RgbaImage,
    frame: &FrameDescriptor,
    bleed: u32,
) -> Result<RgbaImage, GeometryError> {
    let (width, height) = frame.sprite_size();
    let (width, height) = grown_size(width, height, bleed)?;
    expect_size(sprite, width, height)?;

    if frame.trimmed {
        crop(sprite, content_rect(frame, bleed)?)
    } else {
        Ok(sprite.clone())
    }
}

/// Bounding box of all pixels with non-zero alpha, or `None` if the image is
/// fully transparent.
pub fn opaque_bounds(image: &RgbaImage) -> Option<Rect> {
    let (width, height) = image.dimensions();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    // Fully transparent
    if max_x < min_x || max_y < min_y {
        return None;
    }

    Some(Rect::new(
        min_x,
        min_y,
        max_x - min_x + 1,
        max_y - min_y + 1,
    ))
}
