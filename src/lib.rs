pub mod atlas;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod job;
pub mod output;
pub mod sprite;
pub mod transform;

pub use atlas::{Atlas, AtlasBuilder};
pub use cli::{CliArgs, Command, CommonArgs, CompositeMode, CompressionLevel};
pub use descriptor::{AtlasDescriptor, AtlasMeta, FrameDescriptor};
pub use error::{DescriptorError, GeometryError, UnpackerError};
pub use geometry::Rect;
pub use job::{JobOptions, repack_descriptor, unpack_descriptor};
pub use sprite::{DirectorySource, SpriteExtractor, SpriteSource};
