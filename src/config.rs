// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::extractor::OutputMode;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL, file path, or `-` for stdin.
    pub location: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file; stdout when unset.
    pub path: Option<PathBuf>,
    pub include_header: bool,
    pub mode: OutputMode,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: None,
            timeout_secs: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GEOFEED_RANGES")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.timeout_secs == 0 {
            return Err(PipelineError::Config(
                "source.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.source.user_agent.trim().is_empty() {
            return Err(PipelineError::Config(
                "source.user_agent must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.output.mode, OutputMode::Normalize);
        assert!(!config.output.include_header);
        assert!(config.source.user_agent.starts_with("geofeed_ranges/"));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("geofeed.toml");
        fs::write(
            &path,
            r#"
[source]
location = "https://example.com/geofeed.csv"
timeout_secs = 5

[output]
path = "ranges.txt"
include_header = true
mode = "raw"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(
            config.source.location.as_deref(),
            Some("https://example.com/geofeed.csv")
        );
        assert_eq!(config.source.timeout_secs, 5);
        assert_eq!(config.output.path, Some(PathBuf::from("ranges.txt")));
        assert!(config.output.include_header);
        assert_eq!(config.output.mode, OutputMode::Raw);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default_config();
        config.source.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_blank_user_agent_rejected() {
        let mut config = Config::default_config();
        config.source.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
