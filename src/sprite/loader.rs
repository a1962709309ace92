use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{ImageReader, RgbaImage};

use crate::error::UnpackerError;

/// Where repacking finds the sprite image for each frame
pub trait SpriteSource {
    fn load(&self, name: &str) -> Result<RgbaImage, UnpackerError>;
}

/// Reads sprites from `<root>/<frame name>`, the layout unpacking produces
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl SpriteSource for DirectorySource {
    fn load(&self, name: &str) -> Result<RgbaImage, UnpackerError> {
        load_image(&self.path_for(name))
    }
}

impl SpriteSource for BTreeMap<String, RgbaImage> {
    fn load(&self, name: &str) -> Result<RgbaImage, UnpackerError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| UnpackerError::SpriteNotFound {
                name: name.to_string(),
            })
    }
}

/// Decode an image file as straight-alpha RGBA.
///
/// The format is sniffed from the file contents, so frame names without an
/// image extension still load.
pub fn load_image(path: &Path) -> Result<RgbaImage, UnpackerError> {
    let img = ImageReader::open(path)
        .map_err(|e| UnpackerError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| UnpackerError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| UnpackerError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    Ok(img)
}
