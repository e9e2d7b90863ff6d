use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::{Context, Result};

use crate::format::EncodedFormat;

pub const DEFAULT_CONFIG_FILE: &str = "huffzip.toml";
pub const MAX_INPUT_SIZE: u64 = 256 * 1024 * 1024; // 256MB

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub format: EncodedFormat,
    pub encoded_suffix: String,
    pub decoded_suffix: String,
    pub write_metadata: bool,
    pub verify_after_write: bool,
    pub preview_chars: usize,
    pub max_input_size: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            format: EncodedFormat::Ascii,
            encoded_suffix: "_codificado".to_string(),
            decoded_suffix: "_decodificado".to_string(),
            write_metadata: true,
            verify_after_write: true,
            preview_chars: 300,
            max_input_size: MAX_INPUT_SIZE,
        }
    }
}

impl ToolConfig {
    /// Reads the config file, falling back to defaults when it is absent.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let config_file = config_path.unwrap_or(DEFAULT_CONFIG_FILE);

        if Path::new(config_file).exists() {
            let content = std::fs::read_to_string(config_file)
                .with_context(|| format!("failed to read config {}", config_file))?;
            let config: ToolConfig = toml::from_str(&content)
                .with_context(|| format!("invalid config {}", config_file))?;
            tracing::debug!("Loaded config from {}", config_file);
            Ok(config)
        } else if config_path.is_some() {
            anyhow::bail!("config file {} not found", config_file)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, config_path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        tracing::info!("Wrote config to {}", config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_naming() {
        let config = ToolConfig::default();
        assert_eq!(config.format, EncodedFormat::Ascii);
        assert_eq!(config.encoded_suffix, "_codificado");
        assert_eq!(config.preview_chars, 300);
    }

    #[test]
    fn toml_roundtrip() {
        let config = ToolConfig {
            format: EncodedFormat::Packed,
            preview_chars: 80,
            ..ToolConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("format = \"packed\""));
        assert_eq!(toml::from_str::<ToolConfig>(&text).unwrap(), config);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ToolConfig = toml::from_str("write_metadata = false\n").unwrap();
        assert!(!config.write_metadata);
        assert_eq!(config.encoded_suffix, "_codificado");
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("huffzip-config-{}.toml", std::process::id()));
        let path_str = path.to_string_lossy().into_owned();

        let config = ToolConfig { verify_after_write: false, ..ToolConfig::default() };
        config.save(&path_str).unwrap();
        assert_eq!(ToolConfig::load(Some(&path_str)).unwrap(), config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        assert!(ToolConfig::load(Some("/definitely/not/here/huffzip.toml")).is_err());
    }
}
