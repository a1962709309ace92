mod load;
mod types;

pub use load::{LoadedConfig, expand_patterns};
pub use types::{CompressConfig, UnpackerConfig};
