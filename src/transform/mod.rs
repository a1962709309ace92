//! Moves pixels between atlas space and sprite space.
//!
//! Unpacking a frame is crop, reverse rotation, then padding back to the
//! source canvas. Repacking runs the inverse chain: trim to the content,
//! forward rotation, then composite into the atlas.

mod region;
mod rotate;
mod trim;

use image::RgbaImage;

use crate::descriptor::FrameDescriptor;
use crate::error::GeometryError;

pub use region::{BleedWindow, blank_canvas, bleed_window, composite, crop, grown_size};
pub use rotate::{Direction, rotate};
pub use trim::{opaque_bounds, pad_to_source, trim_to_content};

/// Turn the pixels of a frame's packed rectangle (grown by `bleed` on every
/// side) into the finished sprite.
pub fn to_sprite_space(
    placed: RgbaImage,
    frame: &FrameDescriptor,
    bleed: u32,
) -> Result<RgbaImage, GeometryError> {
    let (width, height) = grown_size(frame.packed.width, frame.packed.height, bleed)?;
    region::expect_size(&placed, width, height)?;

    let content = if frame.rotated {
        rotate(&placed, Direction::Reverse)
    } else {
        placed
    };

    pad_to_source(content, frame, bleed)
}

/// Turn a finished sprite into the pixels that belong in the frame's packed
/// rectangle (grown by `bleed` on every side).
pub fn to_atlas_space(
    sprite: &RgbaImage,
    frame: &FrameDescriptor,
    bleed: u32,
) -> Result<RgbaImage, GeometryError> {
    let content = trim_to_content(sprite, frame, bleed)?;

    if frame.rotated {
        Ok(rotate(&content, Direction::Forward))
    } else {
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use image::Rgba;

    fn numbered(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 200, 255]))
    }

    fn frames() -> Vec<FrameDescriptor> {
        vec![
            FrameDescriptor::untransformed(0, 0, 10, 20),
            FrameDescriptor {
                packed: Rect::new(0, 0, 20, 10),
                rotated: true,
                trimmed: false,
                trim_offset: Rect::new(0, 0, 10, 20),
                source_width: 10,
                source_height: 20,
            },
            FrameDescriptor {
                packed: Rect::new(0, 0, 6, 6),
                rotated: false,
                trimmed: true,
                trim_offset: Rect::new(2, 3, 6, 6),
                source_width: 10,
                source_height: 10,
            },
            FrameDescriptor {
                packed: Rect::new(0, 0, 4, 7),
                rotated: true,
                trimmed: true,
                trim_offset: Rect::new(1, 0, 7, 4),
                source_width: 9,
                source_height: 5,
            },
        ]
    }

    #[test]
    fn test_sprite_then_atlas_round_trip() {
        for bleed in [0, 1, 3] {
            for frame in frames() {
                let placed = numbered(
                    frame.packed.width + 2 * bleed,
                    frame.packed.height + 2 * bleed,
                );
                let sprite = to_sprite_space(placed.clone(), &frame, bleed).unwrap();

                let (w, h) = frame.sprite_size();
                assert_eq!(sprite.dimensions(), (w + 2 * bleed, h + 2 * bleed));
                assert_eq!(to_atlas_space(&sprite, &frame, bleed).unwrap(), placed);
            }
        }
    }

    #[test]
    fn test_rotated_frame_uses_reverse_mapping() {
        let frame = &frames()[1];
        let placed = numbered(20, 10);
        let sprite = to_sprite_space(placed.clone(), frame, 0).unwrap();

        assert_eq!(sprite.dimensions(), (10, 20));
        for (x, y, p) in sprite.enumerate_pixels() {
            assert_eq!(p, placed.get_pixel(20 - 1 - y, x));
        }
    }

    #[test]
    fn test_placed_size_is_checked() {
        let frame = FrameDescriptor::untransformed(0, 0, 10, 20);
        assert!(matches!(
            to_sprite_space(numbered(20, 10), &frame, 0),
            Err(GeometryError::SizeMismatch { .. })
        ));
    }
}
