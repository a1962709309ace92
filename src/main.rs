use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use atlas_unpacker::cli::{CliArgs, Command, CompositeMode, CompressionLevel};
use atlas_unpacker::config::{CompressConfig, LoadedConfig, expand_patterns};
use atlas_unpacker::job::{JobOptions, repack_descriptor, unpack_descriptor};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    // Load config if specified and merge with CLI args
    let merged = merge_config_with_args(&cli.command)?;

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("atlas-unpacker v{}", env!("CARGO_PKG_VERSION"));

    if merged.descriptors.is_empty() {
        bail!("no descriptor files given");
    }
    if merged.descriptors.len() > 1 && merged.options.image.is_some() {
        bail!("--image cannot be used with more than one descriptor");
    }

    match &cli.command {
        Command::Unpack(_) => {
            let pool = {
                let mut builder = rayon::ThreadPoolBuilder::new();
                if let Some(jobs) = merged.jobs {
                    builder = builder.num_threads(jobs);
                }
                builder.build().context("failed to start worker threads")?
            };

            let mut total = 0;
            for path in &merged.descriptors {
                info!("Unpacking {}", path.display());
                total += pool
                    .install(|| unpack_descriptor(path, &merged.options))
                    .with_context(|| format!("failed to unpack {}", path.display()))?;
            }
            info!("Done! {} sprites written", total);
        }
        Command::Repack(_) => {
            for path in &merged.descriptors {
                info!("Repacking {}", path.display());
                repack_descriptor(path, &merged.options)
                    .with_context(|| format!("failed to repack {}", path.display()))?;
            }
            info!("Done!");
        }
    }

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    descriptors: Vec<PathBuf>,
    options: JobOptions,
    jobs: Option<usize>,
    verbose: bool,
}

/// Merge CLI arguments with an optional config file.
/// CLI arguments take precedence over config file values.
fn merge_config_with_args(command: &Command) -> Result<MergedConfig> {
    let args = command.common();

    let loaded_config = args
        .config
        .as_ref()
        .map(|path| LoadedConfig::load(path))
        .transpose()?;

    // Descriptors: CLI > config
    let descriptors = if !args.descriptors.is_empty() {
        expand_patterns(&args.descriptors, None)?
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_descriptors()?
    } else {
        Vec::new()
    };

    let defaults = JobOptions::default();

    let prefix = args.prefix.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| PathBuf::from(&lc.config.prefix))
            .unwrap_or_else(|| defaults.prefix.clone())
    });

    let bleed = args.bleed.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.bleed)
            .unwrap_or(defaults.bleed)
    });

    let repack_suffix = loaded_config
        .as_ref()
        .map(|lc| lc.config.repack_suffix.clone())
        .unwrap_or_else(|| defaults.repack_suffix.clone());

    // Composite mode: CLI > config > default (repack only)
    let cli_mode = match command {
        Command::Repack(repack) => repack.mode,
        Command::Unpack(_) => None,
    };
    let mode = if let Some(m) = cli_mode {
        m
    } else if let Some(ref lc) = loaded_config {
        parse_mode(&lc.config.mode).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown mode '{}' in config file. Valid values: overlay, overwrite",
                lc.config.mode
            )
        })?
    } else {
        defaults.mode
    };

    // Jobs: CLI > config (unpack only)
    let cli_jobs = match command {
        Command::Unpack(unpack) => unpack.jobs,
        Command::Repack(_) => None,
    };
    let jobs = cli_jobs.or_else(|| loaded_config.as_ref().and_then(|lc| lc.config.jobs));
    if jobs == Some(0) {
        bail!("--jobs must be at least 1");
    }

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else if let Some(ref lc) = loaded_config {
        lc.config
            .compress
            .as_ref()
            .map(parse_compress)
            .transpose()?
    } else {
        None
    };

    Ok(MergedConfig {
        descriptors,
        options: JobOptions {
            prefix,
            image: args.image.clone(),
            bleed,
            compress,
            repack_suffix,
            mode,
        },
        jobs,
        verbose: args.verbose,
    })
}

fn parse_mode(s: &str) -> Option<CompositeMode> {
    match s {
        "overlay" => Some(CompositeMode::Overlay),
        "overwrite" => Some(CompositeMode::Overwrite),
        _ => None,
    }
}

fn parse_compress(c: &CompressConfig) -> Result<CompressionLevel> {
    let parsed: Result<CompressionLevel, String> = match c {
        CompressConfig::Level(n) => n.to_string().parse(),
        CompressConfig::Max(s) => s.parse(),
    };
    parsed.map_err(|message| anyhow::anyhow!("invalid compress value in config file: {}", message))
}
