use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::cli::CompressionLevel;
use crate::error::UnpackerError;

/// Encode an image as PNG in memory, optionally recompressing with oxipng
pub fn encode_png(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<Vec<u8>, UnpackerError> {
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| UnpackerError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let Some(level) = compress else {
        return Ok(png_data.into_inner());
    };

    let opts = match level {
        CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
        CompressionLevel::Max => oxipng::Options::max_compression(),
    };
    oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
        UnpackerError::PngCompress {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })
}

/// Save an image as PNG, creating missing parent directories
pub fn save_png(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<(), UnpackerError> {
    let output_data = encode_png(image, path, compress)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| UnpackerError::OutputWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, output_data).map_err(|e| UnpackerError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_save_png_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/sprite.png");
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 128]));

        save_png(&img, &path, None).unwrap();

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded, img);
    }

    #[test]
    fn test_compressed_png_is_lossless() {
        let img = RgbaImage::from_fn(16, 16, |x, y| Rgba([x as u8 * 16, y as u8 * 16, 0, 255]));
        let path = Path::new("memory.png");

        let plain = encode_png(&img, path, None).unwrap();
        let packed = encode_png(&img, path, Some(CompressionLevel::Level(2))).unwrap();

        let decoded = image::load_from_memory(&packed).unwrap().into_rgba8();
        assert_eq!(decoded, img);
        assert!(!plain.is_empty());
    }
}
