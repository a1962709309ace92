use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::RgbaImage;
use log::debug;

use super::save_png;
use crate::cli::CompressionLevel;
use crate::error::UnpackerError;

/// Destination for unpacked sprites.
///
/// Unpacking may run on several threads at once, so sinks must be `Sync`.
pub trait SpriteSink: Sync {
    fn write(&self, name: &str, image: &RgbaImage) -> Result<(), UnpackerError>;
}

/// Writes each sprite as a PNG at `<root>/<frame name>`
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    compress: Option<CompressionLevel>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            compress: None,
        }
    }

    pub fn compress(mut self, compress: Option<CompressionLevel>) -> Self {
        self.compress = compress;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Frame names may contain `/`, which become nested directories
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl SpriteSink for DirectorySink {
    fn write(&self, name: &str, image: &RgbaImage) -> Result<(), UnpackerError> {
        let path = self.path_for(name);
        save_png(image, &path, self.compress)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Collects sprites in memory, keyed by frame name
#[derive(Debug, Default)]
pub struct MemorySink {
    sprites: Mutex<BTreeMap<String, RgbaImage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> BTreeMap<String, RgbaImage> {
        self.sprites
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SpriteSink for MemorySink {
    fn write(&self, name: &str, image: &RgbaImage) -> Result<(), UnpackerError> {
        self.sprites
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string(), image.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_nests_frame_paths() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("unpacked"));

        sink.write("hero/idle/0.png", &RgbaImage::new(2, 2)).unwrap();

        assert!(dir.path().join("unpacked/hero/idle/0.png").is_file());
    }

    #[test]
    fn test_memory_sink_collects() {
        let sink = MemorySink::new();
        sink.write("b", &RgbaImage::new(1, 1)).unwrap();
        sink.write("a", &RgbaImage::new(2, 1)).unwrap();

        let sprites = sink.into_inner();
        assert_eq!(sprites.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(sprites["a"].dimensions(), (2, 1));
    }
}
