use std::collections::BTreeMap;
use std::path::{Component, Path};

use log::debug;

use super::types::{
    AtlasDescriptor, AtlasMeta, FrameDescriptor, RawDocument, RawFrame, RawFrames, RawNamedFrame,
};
use crate::error::DescriptorError;
use crate::geometry::{Rect, canvas_bytes};

impl AtlasDescriptor {
    /// Read and parse a descriptor file.
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        let content = std::fs::read_to_string(path).map_err(|e| DescriptorError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_json(&content, path)
    }

    /// Parse a descriptor document. `path` is only used in error messages.
    pub fn from_json(content: &str, path: &Path) -> Result<Self, DescriptorError> {
        let doc: RawDocument =
            serde_json::from_str(content).map_err(|e| DescriptorError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        if canvas_bytes(doc.meta.size.w, doc.meta.size.h).is_none() {
            return Err(DescriptorError::AtlasTooLarge {
                path: path.to_path_buf(),
                width: doc.meta.size.w,
                height: doc.meta.size.h,
            });
        }

        let raw_frames = collect_raw_frames(doc.frames)?;

        let mut frames = BTreeMap::new();
        for (name, raw) in raw_frames {
            if !is_safe_frame_name(&name) {
                return Err(DescriptorError::UnsafeFrameName(name));
            }
            let frame = build_frame(&name, raw)?;
            if frames.insert(name.clone(), frame).is_some() {
                return Err(DescriptorError::DuplicateFrame { name });
            }
        }

        let meta = AtlasMeta {
            app: doc.meta.app,
            version: doc.meta.version,
            image: doc.meta.image,
            format: doc.meta.format,
            width: doc.meta.size.w,
            height: doc.meta.size.h,
            scale: doc.meta.scale.map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            smart_update: doc.meta.smart_update,
        };

        debug!(
            "Parsed {} frames from {} ({}x{} atlas '{}')",
            frames.len(),
            path.display(),
            meta.width,
            meta.height,
            meta.image
        );

        Ok(AtlasDescriptor { meta, frames })
    }
}

/// Decode each entry of either layout, keeping its name.
fn collect_raw_frames(frames: RawFrames) -> Result<Vec<(String, RawFrame)>, DescriptorError> {
    match frames {
        RawFrames::Hash(entries) => entries
            .into_iter()
            .map(|(name, value)| match serde_json::from_value::<RawFrame>(value) {
                Ok(raw) => Ok((name, raw)),
                Err(e) => Err(DescriptorError::InvalidFrame { name, source: e }),
            })
            .collect(),
        RawFrames::Array(items) => items
            .into_iter()
            .enumerate()
            .map(
                |(i, value)| match serde_json::from_value::<RawNamedFrame>(value) {
                    Ok(named) => Ok((named.filename, named.frame)),
                    Err(e) => Err(DescriptorError::InvalidFrame {
                        name: format!("#{}", i),
                        source: e,
                    }),
                },
            )
            .collect(),
    }
}

fn build_frame(name: &str, raw: RawFrame) -> Result<FrameDescriptor, DescriptorError> {
    let inconsistent = |message: String| DescriptorError::InconsistentFrame {
        name: name.to_string(),
        message,
    };

    let packed = Rect::from(raw.frame);
    if packed.width == 0 || packed.height == 0 {
        return Err(inconsistent(format!(
            "frame has an empty rectangle ({}x{})",
            packed.width, packed.height
        )));
    }

    let natural = if raw.rotated {
        packed.transposed()
    } else {
        packed
    };

    let trim_offset = match raw.sprite_source_size {
        Some(sss) => Rect::from(sss),
        None if raw.trimmed => {
            return Err(inconsistent(
                "trimmed frame is missing spriteSourceSize".to_string(),
            ));
        }
        None => Rect::from_size(natural.width, natural.height),
    };

    let (source_width, source_height) = match raw.source_size {
        Some(wh) => (wh.w, wh.h),
        None if raw.trimmed => {
            return Err(inconsistent("trimmed frame is missing sourceSize".to_string()));
        }
        None => (natural.width, natural.height),
    };

    if (trim_offset.width, trim_offset.height) != (natural.width, natural.height) {
        return Err(inconsistent(format!(
            "spriteSourceSize is {}x{} but the {} frame holds {}x{}",
            trim_offset.width,
            trim_offset.height,
            if raw.rotated { "rotated" } else { "unrotated" },
            natural.width,
            natural.height
        )));
    }

    if canvas_bytes(source_width, source_height).is_none() {
        return Err(inconsistent(format!(
            "sourceSize {}x{} is too large",
            source_width, source_height
        )));
    }

    if raw.trimmed {
        if !trim_offset.fits_within(source_width, source_height) {
            return Err(inconsistent(format!(
                "spriteSourceSize {} does not fit sourceSize {}x{}",
                trim_offset, source_width, source_height
            )));
        }
    } else if trim_offset != Rect::from_size(natural.width, natural.height)
        || (source_width, source_height) != (natural.width, natural.height)
    {
        return Err(inconsistent(
            "untrimmed frame has a trim offset or a different sourceSize".to_string(),
        ));
    }

    Ok(FrameDescriptor {
        packed,
        rotated: raw.rotated,
        trimmed: raw.trimmed,
        trim_offset,
        source_width,
        source_height,
    })
}

/// Frame names become paths under the output prefix, so they must stay inside it.
fn is_safe_frame_name(name: &str) -> bool {
    let path = Path::new(name);
    let mut has_normal = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    has_normal
}
