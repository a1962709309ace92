use image::{Pixel, RgbaImage, imageops};

use crate::cli::CompositeMode;
use crate::error::GeometryError;
use crate::geometry::{Rect, canvas_bytes, grown};

fn check_bounds(image: &RgbaImage, rect: Rect) -> Result<(), GeometryError> {
    let (width, height) = image.dimensions();
    if rect.fits_within(width, height) {
        Ok(())
    } else {
        Err(GeometryError::OutOfBounds {
            rect,
            width,
            height,
        })
    }
}

pub(super) fn expect_size(image: &RgbaImage, width: u32, height: u32) -> Result<(), GeometryError> {
    if image.dimensions() == (width, height) {
        Ok(())
    } else {
        Err(GeometryError::SizeMismatch {
            expected_width: width,
            expected_height: height,
            width: image.width(),
            height: image.height(),
        })
    }
}

/// Size of a `width`x`height` image extended by `bleed` on every side.
///
/// Fails when the result overflows or would be too large to allocate.
pub fn grown_size(width: u32, height: u32, bleed: u32) -> Result<(u32, u32), GeometryError> {
    let too_large = || GeometryError::TooLarge {
        width,
        height,
        bleed,
    };
    let grown_width = grown(width, bleed).ok_or_else(too_large)?;
    let grown_height = grown(height, bleed).ok_or_else(too_large)?;
    canvas_bytes(grown_width, grown_height).ok_or_else(too_large)?;
    Ok((grown_width, grown_height))
}

/// Transparent canvas of `width`x`height` plus a `bleed` border
pub fn blank_canvas(width: u32, height: u32, bleed: u32) -> Result<RgbaImage, GeometryError> {
    let (width, height) = grown_size(width, height, bleed)?;
    Ok(RgbaImage::new(width, height))
}

/// Copy `rect` out of `image`. Never clamps: a rectangle reaching past the
/// image edge is an error.
pub fn crop(image: &RgbaImage, rect: Rect) -> Result<RgbaImage, GeometryError> {
    check_bounds(image, rect)?;
    Ok(imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image())
}

/// Draw `src` into `dest` at `dest_rect`, whose size must match `src`.
///
/// Overlay copies straight into fully transparent destination pixels and
/// alpha-blends everywhere else, so drawing onto a fresh canvas is exact in
/// both modes.
pub fn composite(
    dest: &mut RgbaImage,
    dest_rect: Rect,
    src: &RgbaImage,
    mode: CompositeMode,
) -> Result<(), GeometryError> {
    let (width, height) = src.dimensions();
    if (width, height) != (dest_rect.width, dest_rect.height) {
        return Err(GeometryError::SizeMismatch {
            expected_width: dest_rect.width,
            expected_height: dest_rect.height,
            width,
            height,
        });
    }
    check_bounds(dest, dest_rect)?;

    for (x, y, pixel) in src.enumerate_pixels() {
        let target = dest.get_pixel_mut(dest_rect.x + x, dest_rect.y + y);
        match mode {
            CompositeMode::Overwrite => *target = *pixel,
            CompositeMode::Overlay => {
                if target[3] == 0 {
                    *target = *pixel;
                } else {
                    target.blend(pixel);
                }
            }
        }
    }

    Ok(())
}

/// A frame rectangle grown by a bleed border and clipped to its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BleedWindow {
    /// Grown rectangle in image coordinates, clipped to the image
    pub outer: Rect,
    /// The same pixels in the coordinates of the unclipped grown rectangle
    pub inner: Rect,
}

/// Grow `rect` by `bleed` pixels on every side, clipped to a `width`x`height`
/// image. The rectangle itself must lie inside the image.
pub fn bleed_window(
    rect: Rect,
    bleed: u32,
    width: u32,
    height: u32,
) -> Result<BleedWindow, GeometryError> {
    if !rect.fits_within(width, height) {
        return Err(GeometryError::OutOfBounds {
            rect,
            width,
            height,
        });
    }

    let left = rect.x - rect.x.min(bleed);
    let top = rect.y - rect.y.min(bleed);
    let right = (rect.right() + u64::from(bleed)).min(u64::from(width));
    let bottom = (rect.bottom() + u64::from(bleed)).min(u64::from(height));
    // both are clamped to u32 image dimensions above
    let right = u32::try_from(right).unwrap_or(width);
    let bottom = u32::try_from(bottom).unwrap_or(height);

    let outer = Rect::new(left, top, right - left, bottom - top);
    let inner = Rect::new(
        bleed - (rect.x - left),
        bleed - (rect.y - top),
        outer.width,
        outer.height,
    );

    Ok(BleedWindow { outer, inner })
}
