use image::RgbaImage;

use crate::error::GeometryError;
use crate::transform::blank_canvas;

/// A rebuilt texture atlas
#[derive(Debug)]
pub struct Atlas {
    /// Atlas width
    pub width: u32,
    /// Atlas height
    pub height: u32,
    /// Rendered atlas image
    pub image: RgbaImage,
    /// Names of the frames drawn, in drawing order
    pub frames: Vec<String>,
}

impl Atlas {
    /// Empty transparent atlas. Fails when the canvas is too large to allocate.
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        Ok(Self {
            width,
            height,
            image: blank_canvas(width, height, 0)?,
            frames: Vec::new(),
        })
    }
}
