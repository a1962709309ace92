mod format;
mod writer;

pub use format::{encode_png, save_png};
pub use writer::{DirectorySink, MemorySink, SpriteSink};
