use image::{RgbaImage, imageops};

/// Which way a frame is being moved between sprite space and atlas space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Sprite to atlas: 90° clockwise
    Forward,
    /// Atlas to sprite: 90° counter-clockwise, the exact inverse of `Forward`
    Reverse,
}

/// Rotate a whole image by a quarter turn.
///
/// `Forward` produces a `height`x`width` image where output pixel `(x, y)`
/// is input pixel `(y, height - 1 - x)`. `Reverse` maps output `(x, y)` to
/// input `(width - 1 - y, x)`, so the two cancel out in either order.
pub fn rotate(image: &RgbaImage, direction: Direction) -> RgbaImage {
    match direction {
        Direction::Forward => imageops::rotate90(image),
        Direction::Reverse => imageops::rotate270(image),
    }
}
