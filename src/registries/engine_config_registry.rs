use crate::data::EngineConfig;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "lorepatch.yml";

/// Errors raised while loading the engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read engine configuration {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid engine configuration YAML: {0}")]
    InvalidYaml(String),
}

/// File-based engine configuration
/// Loads settings from a YAML file, falling back to defaults when it is absent
#[derive(Clone, Debug)]
pub struct FileEngineConfigRegistry {
    config_path: PathBuf,
}

impl FileEngineConfigRegistry {
    /// Creates a new FileEngineConfigRegistry
    ///
    /// # Arguments
    /// * `config_path` - Optional path to the config file (defaults to "lorepatch.yml")
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path: config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Loads the configuration; a missing file yields the defaults
    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        if !self.config_path.exists() {
            return Ok(EngineConfig::default());
        }

        let content = fs::read_to_string(&self.config_path).map_err(|e| ConfigError::Read {
            path: self.config_path.display().to_string(),
            source: e,
        })?;

        parse_config(&content)
    }
}

/// Parses the YAML config. Unknown keys are ignored and mistyped values keep their defaults
fn parse_config(yaml_content: &str) -> Result<EngineConfig, ConfigError> {
    use yaml_rust::YamlLoader;

    let docs = YamlLoader::load_from_str(yaml_content)
        .map_err(|e| ConfigError::InvalidYaml(e.to_string()))?;

    let mut config = EngineConfig::default();
    let Some(doc) = docs.first() else {
        return Ok(config);
    };

    if let Some(mode) = doc["breadcrumbs"].as_str() {
        config.breadcrumbs = mode.parse().map_err(ConfigError::InvalidYaml)?;
    }

    if let Some(lines) = doc["preview_lines"].as_i64() {
        if lines >= 0 {
            config.preview_lines = lines as usize;
        }
    }

    if let Some(files) = doc["narrative_files"].as_vec() {
        config.narrative_files = files
            .iter()
            .filter_map(|f| f.as_str())
            .map(|f| f.to_string())
            .collect();
    } else if let Some(file) = doc["narrative_files"].as_str() {
        config.narrative_files = vec![file.to_string()];
    }

    Ok(config)
}
