use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub stats: StatsConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

#[derive(Debug, Deserialize)]
pub struct StatsConfig {
    /// Number of shards a query is split into (0 = one per available CPU)
    pub shard_count: usize,
    /// Hard ceiling for memory held by open groups; falls back to `memory_fraction` of RAM
    pub max_state_bytes: Option<u64>,
    pub memory_fraction: f64,
    /// Accumulators allocated per arena page
    pub arena_page_size: usize,
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("LOGAGG_CONFIG").unwrap_or_else(|_| "config/logagg".to_string());
    load_settings_from(&config_path)
}

/// Layers built-in defaults, the optional file at `config_path` and `LOGAGG__*` env vars.
pub fn load_settings_from(config_path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .set_default("logging.log_dir", "logs")?
        .set_default("logging.stdout_level", "info")?
        .set_default("logging.file_level", "debug")?
        .set_default("stats.shard_count", 0)?
        .set_default("stats.memory_fraction", 0.3)?
        .set_default("stats.arena_page_size", 1024)?
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("LOGAGG").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
