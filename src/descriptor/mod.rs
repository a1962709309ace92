mod load;
mod types;

pub use types::{AtlasDescriptor, AtlasMeta, FrameDescriptor};
