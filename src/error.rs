use std::path::PathBuf;
use thiserror::Error;

use crate::geometry::Rect;

/// Problems with the frame descriptor document itself.
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Failed to read descriptor '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse descriptor '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse frame '{name}': {source}")]
    InvalidFrame {
        name: String,
        source: serde_json::Error,
    },

    #[error("Frame '{name}' appears more than once")]
    DuplicateFrame { name: String },

    #[error("Frame '{name}' is inconsistent: {message}")]
    InconsistentFrame { name: String, message: String },

    #[error("Frame name '{0}' is not a safe relative path")]
    UnsafeFrameName(String),

    #[error("Atlas size {width}x{height} in '{path}' is too large")]
    AtlasTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

/// A rectangle that does not fit the image it is applied to, or an image
/// too large to create.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("rectangle {rect} exceeds image bounds {width}x{height}")]
    OutOfBounds { rect: Rect, width: u32, height: u32 },

    #[error("expected a {expected_width}x{expected_height} image, got {width}x{height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("a {width}x{height} image with a {bleed}px border is too large to allocate")]
    TooLarge { width: u32, height: u32, bleed: u32 },
}

#[derive(Error, Debug)]
pub enum UnpackerError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("Frame '{frame}': {source}")]
    Geometry {
        frame: String,
        source: GeometryError,
    },

    #[error("Atlas canvas: {0}")]
    Canvas(#[source] GeometryError),

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No sprite image for frame '{name}'")]
    SpriteNotFound { name: String },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl UnpackerError {
    pub fn geometry(frame: &str, source: GeometryError) -> Self {
        UnpackerError::Geometry {
            frame: frame.to_string(),
            source,
        }
    }

    /// True for missing/corrupt images and failed writes.
    pub fn is_image_io(&self) -> bool {
        matches!(
            self,
            UnpackerError::ImageLoad { .. }
                | UnpackerError::SpriteNotFound { .. }
                | UnpackerError::ImageSave { .. }
                | UnpackerError::OutputWrite { .. }
                | UnpackerError::PngCompress { .. }
        )
    }
}
