use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "atlas-unpacker")]
#[command(version, about = "Sprite atlas unpacker and repacker", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract every frame of an atlas into individual sprite images
    Unpack(UnpackArgs),
    /// Rebuild an atlas from previously unpacked sprite images
    Repack(RepackArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Unpack(args) => &args.common,
            Command::Repack(args) => &args.common,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct UnpackArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of worker threads used to extract frames [default: all cores]
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct RepackArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// How frames are drawn onto the atlas [default: overlay]
    #[arg(long, value_enum)]
    pub mode: Option<CompositeMode>,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Frame descriptor JSON files (glob patterns are expanded)
    #[arg(required_unless_present = "config")]
    pub descriptors: Vec<String>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Atlas image: input when unpacking (overrides meta.image), output when repacking.
    /// Taken as given, relative to the working directory rather than the descriptor
    #[arg(short, long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Directory holding the sprite images, relative to the descriptor [default: unpacked]
    #[arg(short, long)]
    pub prefix: Option<PathBuf>,

    /// Extend every frame by N pixels of surrounding atlas content [default: 0]
    #[arg(long, value_name = "N")]
    pub bleed: Option<u32>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// How a source image is combined with the pixels already in the destination
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum CompositeMode {
    /// Replace destination pixels
    #[value(name = "overwrite")]
    Overwrite,
    /// Alpha-composite the source over the destination
    #[default]
    #[value(name = "overlay")]
    Overlay,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_parse() {
        assert_eq!("max".parse(), Ok(CompressionLevel::Max));
        assert_eq!("MAX".parse(), Ok(CompressionLevel::Max));
        assert_eq!("4".parse(), Ok(CompressionLevel::Level(4)));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_parse_unpack_command() {
        let cli = CliArgs::try_parse_from([
            "atlas-unpacker",
            "unpack",
            "sheet.json",
            "--prefix",
            "out",
            "--bleed",
            "1",
            "-j",
            "4",
        ])
        .unwrap();

        match cli.command {
            Command::Unpack(args) => {
                assert_eq!(args.common.descriptors, vec!["sheet.json".to_string()]);
                assert_eq!(args.common.prefix, Some(PathBuf::from("out")));
                assert_eq!(args.common.bleed, Some(1));
                assert_eq!(args.jobs, Some(4));
            }
            Command::Repack(_) => panic!("expected unpack"),
        }
    }

    #[test]
    fn test_parse_repack_mode_and_compress() {
        let cli = CliArgs::try_parse_from([
            "atlas-unpacker",
            "repack",
            "sheet.json",
            "--mode",
            "overwrite",
            "--compress",
        ])
        .unwrap();

        match cli.command {
            Command::Repack(args) => {
                assert_eq!(args.mode, Some(CompositeMode::Overwrite));
                assert_eq!(args.common.compress, Some(CompressionLevel::Level(2)));
            }
            Command::Unpack(_) => panic!("expected repack"),
        }
    }

    #[test]
    fn test_descriptor_required_without_config() {
        assert!(CliArgs::try_parse_from(["atlas-unpacker", "unpack"]).is_err());
        assert!(CliArgs::try_parse_from(["atlas-unpacker", "unpack", "-c", "a.json"]).is_ok());
    }

    #[test]
    fn test_image_help_names_working_directory() {
        use clap::CommandFactory;

        let mut cmd = CliArgs::command();
        let unpack = cmd.find_subcommand_mut("unpack").unwrap();
        let help = unpack.render_long_help().to_string();
        let help = help.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(help.contains("relative to the working directory"));
    }
}
