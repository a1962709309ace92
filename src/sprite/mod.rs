mod extractor;
mod loader;

pub use extractor::SpriteExtractor;
pub use loader::{DirectorySource, SpriteSource, load_image};
