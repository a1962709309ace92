mod canvas;
mod rect;

pub use canvas::{MAX_CANVAS_BYTES, canvas_bytes, grown};
pub use rect::Rect;
