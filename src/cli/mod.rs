mod args;

pub use args::{
    CliArgs, Command, CommonArgs, CompositeMode, CompressionLevel, RepackArgs, UnpackArgs,
};
