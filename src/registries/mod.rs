mod engine_config_registry;

pub use engine_config_registry::{ConfigError, FileEngineConfigRegistry, DEFAULT_CONFIG_FILE};
