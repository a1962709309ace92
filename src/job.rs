//! One unpack or repack run over a single descriptor file.

use std::path::{Path, PathBuf};

use log::info;

use crate::atlas::AtlasBuilder;
use crate::cli::{CompositeMode, CompressionLevel};
use crate::descriptor::AtlasDescriptor;
use crate::error::UnpackerError;
use crate::output::{DirectorySink, save_png};
use crate::sprite::{DirectorySource, SpriteExtractor, load_image};

/// Settings shared by every descriptor in a run
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Sprite directory, relative to the descriptor unless absolute
    pub prefix: PathBuf,
    /// Atlas image override: input for unpack, output for repack
    pub image: Option<PathBuf>,
    pub bleed: u32,
    pub compress: Option<CompressionLevel>,
    /// Replaces the descriptor's extension to name the repacked atlas
    pub repack_suffix: String,
    pub mode: CompositeMode,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            prefix: PathBuf::from("unpacked"),
            image: None,
            bleed: 0,
            compress: None,
            repack_suffix: ".repack.png".to_string(),
            mode: CompositeMode::Overlay,
        }
    }
}

fn descriptor_dir(descriptor_path: &Path) -> &Path {
    descriptor_path.parent().unwrap_or_else(|| Path::new(""))
}

/// Directory holding the sprites for a descriptor
pub fn sprite_root(descriptor_path: &Path, prefix: &Path) -> PathBuf {
    descriptor_dir(descriptor_path).join(prefix)
}

/// Atlas image to unpack: the override as given, else `meta.image` next to the descriptor
pub fn atlas_image_path(descriptor_path: &Path, meta_image: &str, image: Option<&Path>) -> PathBuf {
    match image {
        Some(path) => path.to_path_buf(),
        None => descriptor_dir(descriptor_path).join(meta_image),
    }
}

/// Default repack output: `sheet.json` becomes `sheet<suffix>`
pub fn repack_output_path(descriptor_path: &Path, suffix: &str) -> PathBuf {
    let mut name = descriptor_path.with_extension("").into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Unpack every frame of the descriptor at `path` into `<prefix>/<frame name>`.
///
/// Runs on the current rayon pool. Returns the number of sprites written.
pub fn unpack_descriptor(path: &Path, options: &JobOptions) -> Result<usize, UnpackerError> {
    let descriptor = AtlasDescriptor::load(path)?;

    let image_path = atlas_image_path(path, &descriptor.meta.image, options.image.as_deref());
    let atlas = load_image(&image_path)?;
    info!(
        "Loaded atlas {} ({}x{})",
        image_path.display(),
        atlas.width(),
        atlas.height()
    );

    let sink = DirectorySink::new(sprite_root(path, &options.prefix)).compress(options.compress);
    let count = SpriteExtractor::new(&atlas)
        .bleed(options.bleed)
        .unpack(&descriptor, &sink, None)?;

    info!("Unpacked {} sprites into {}", count, sink.root().display());
    Ok(count)
}

/// Rebuild the atlas for the descriptor at `path` from `<prefix>/<frame name>`.
///
/// Returns where the atlas was written.
pub fn repack_descriptor(path: &Path, options: &JobOptions) -> Result<PathBuf, UnpackerError> {
    let descriptor = AtlasDescriptor::load(path)?;
    let source = DirectorySource::new(sprite_root(path, &options.prefix));

    let atlas = AtlasBuilder::for_descriptor(&descriptor)
        .bleed(options.bleed)
        .mode(options.mode)
        .build(&descriptor, &source)?;

    let output = options
        .image
        .clone()
        .unwrap_or_else(|| repack_output_path(path, &options.repack_suffix));
    save_png(&atlas.image, &output, options.compress)?;

    info!("Saved {}", output.display());
    Ok(output)
}
