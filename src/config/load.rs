use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::types::UnpackerConfig;

/// A loaded configuration file with its associated directory.
///
/// Descriptor paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: UnpackerConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: UnpackerConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        if config.version != 1 {
            bail!(
                "unsupported config version {} in {} (expected 1)",
                config.version,
                path.display()
            );
        }

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Resolve descriptor patterns to actual file paths, relative to the
    /// config file directory.
    pub fn resolve_descriptors(&self) -> Result<Vec<PathBuf>> {
        expand_patterns(&self.config.descriptors, Some(&self.config_dir))
    }
}

/// Expand descriptor paths and glob patterns.
///
/// Plain paths are kept even if they do not exist yet, so the loader reports
/// the real error; a glob that matches nothing is an error here.
pub fn expand_patterns(patterns: &[String], base: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for pattern in patterns {
        let full = match base {
            Some(dir) => dir.join(pattern),
            None => PathBuf::from(pattern),
        };

        if !is_glob_pattern(pattern) {
            results.push(full);
            continue;
        }

        let pattern_str = full.to_string_lossy();
        let paths = glob::glob(&pattern_str)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?;

        let before = results.len();
        for entry in paths {
            let path = entry.with_context(|| format!("failed to read glob entry: {}", pattern))?;
            results.push(path);
        }
        if results.len() == before {
            bail!("pattern '{}' matched no descriptor files", pattern);
        }
    }

    Ok(results)
}

/// Check if a pattern contains glob characters.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.json"));
        assert!(is_glob_pattern("atlases/*.json"));
        assert!(is_glob_pattern("atlases/**/*.json"));
        assert!(is_glob_pattern("sheet?.json"));
        assert!(is_glob_pattern("sheet[0-9].json"));
        assert!(!is_glob_pattern("sheet.json"));
        assert!(!is_glob_pattern("atlases/hero.json"));
    }

    #[test]
    fn test_expand_plain_paths_relative_to_base() {
        let paths =
            expand_patterns(&["a.json".to_string()], Some(Path::new("/project"))).unwrap();
        assert_eq!(paths, vec![PathBuf::from("/project/a.json")]);
    }

    #[test]
    fn test_expand_glob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.json"), "{}").unwrap();
        std::fs::write(dir.path().join("two.json"), "{}").unwrap();
        std::fs::write(dir.path().join("skip.png"), "").unwrap();

        let mut paths = expand_patterns(&["*.json".to_string()], Some(dir.path())).unwrap();
        paths.sort();

        assert_eq!(
            paths,
            vec![dir.path().join("one.json"), dir.path().join("two.json")]
        );
    }

    #[test]
    fn test_glob_without_matches_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(expand_patterns(&["*.json".to_string()], Some(dir.path())).is_err());
    }

    #[test]
    fn test_load_config_relative_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unpacker.json");
        std::fs::write(&path, r#"{"descriptors": ["sheets/hero.json"], "bleed": 1}"#).unwrap();

        let loaded = LoadedConfig::load(&path).unwrap();

        assert_eq!(loaded.config.bleed, 1);
        assert_eq!(
            loaded.resolve_descriptors().unwrap(),
            vec![dir.path().join("sheets/hero.json")]
        );
    }

    #[test]
    fn test_unknown_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unpacker.json");
        std::fs::write(&path, r#"{"version": 2}"#).unwrap();

        assert!(LoadedConfig::load(&path).is_err());
    }
}
