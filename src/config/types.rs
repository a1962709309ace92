use serde::Deserialize;

/// PNG compression level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Config file structure.
///
/// Descriptor paths are relative to the config file location; every other
/// path is relative to the descriptor it applies to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UnpackerConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Descriptor file paths or glob patterns
    pub descriptors: Vec<String>,
    /// Directory holding the unpacked sprites
    pub prefix: String,
    /// Pixels of surrounding atlas content kept around every frame
    pub bleed: u32,
    /// Suffix replacing the descriptor's extension to name the repacked atlas
    pub repack_suffix: String,
    /// How repacked frames are drawn: "overlay" or "overwrite"
    pub mode: String,
    /// Worker threads for unpacking (all cores when unset)
    pub jobs: Option<usize>,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
}

impl Default for UnpackerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            descriptors: Vec::new(),
            prefix: "unpacked".to_string(),
            bleed: 0,
            repack_suffix: ".repack.png".to_string(),
            mode: "overlay".to_string(),
            jobs: None,
            compress: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: UnpackerConfig =
            serde_json::from_str(r#"{"bleed": 2, "compress": "max"}"#).unwrap();

        assert_eq!(config.bleed, 2);
        assert_eq!(config.prefix, "unpacked");
        assert_eq!(config.repack_suffix, ".repack.png");
        assert_eq!(config.mode, "overlay");
        assert!(matches!(config.compress, Some(CompressConfig::Max(_))));
    }

    #[test]
    fn test_numeric_compress_level() {
        let config: UnpackerConfig = serde_json::from_str(r#"{"compress": 4}"#).unwrap();
        assert!(matches!(config.compress, Some(CompressConfig::Level(4))));
    }
}
