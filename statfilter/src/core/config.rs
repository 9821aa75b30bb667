use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_INPUT_CHANNEL_CAPACITY, DEFAULT_POOL_SIZE,
    DEFAULT_STAT_ACCUM_CAPACITY,
};
use crate::domain::stats::{DEFAULT_STAT_ACCUM_NAME, MetricTemplate, StatFilterConfig};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Stat filter configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StatFilterFileConfig {
    /// Accumulator input the filter delivers stats to
    pub stat_accum_name: Option<String>,
    /// Metric templates keyed by arbitrary id
    pub metric: Option<HashMap<String, MetricTemplate>>,
}

/// Stat accumulator input configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StatAccumFileConfig {
    /// Registry name of the accumulator input
    pub name: Option<String>,
    pub channel_capacity: Option<usize>,
}

/// Pipeline runtime configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PipelineFileConfig {
    /// Maximum number of messages in flight
    pub pool_size: Option<usize>,
    /// Capacity of the input -> filter channel
    pub channel_capacity: Option<usize>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub stat_filter: Option<StatFilterFileConfig>,
    pub stat_accum: Option<StatAccumFileConfig>,
    pub pipeline: Option<PipelineFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        // Stat filter (metric maps merge by id)
        if let Some(stat_filter) = other.stat_filter {
            let current = self
                .stat_filter
                .get_or_insert_with(StatFilterFileConfig::default);
            if stat_filter.stat_accum_name.is_some() {
                tracing::trace!(name = ?stat_filter.stat_accum_name, "Merging stat_filter.stat_accum_name");
                current.stat_accum_name = stat_filter.stat_accum_name;
            }
            if let Some(metrics) = stat_filter.metric {
                let current_metrics = current.metric.get_or_insert_with(HashMap::new);
                for (id, template) in metrics {
                    tracing::trace!(id = %id, "Merging stat_filter.metric");
                    current_metrics.insert(id, template);
                }
            }
        }

        // Stat accumulator
        if let Some(stat_accum) = other.stat_accum {
            let current = self
                .stat_accum
                .get_or_insert_with(StatAccumFileConfig::default);
            if stat_accum.name.is_some() {
                tracing::trace!(name = ?stat_accum.name, "Merging stat_accum.name");
                current.name = stat_accum.name;
            }
            if stat_accum.channel_capacity.is_some() {
                tracing::trace!(channel_capacity = ?stat_accum.channel_capacity, "Merging stat_accum.channel_capacity");
                current.channel_capacity = stat_accum.channel_capacity;
            }
        }

        // Pipeline
        if let Some(pipeline) = other.pipeline {
            let current = self
                .pipeline
                .get_or_insert_with(PipelineFileConfig::default);
            if pipeline.pool_size.is_some() {
                tracing::trace!(pool_size = ?pipeline.pool_size, "Merging pipeline.pool_size");
                current.pool_size = pipeline.pool_size;
            }
            if pipeline.channel_capacity.is_some() {
                tracing::trace!(channel_capacity = ?pipeline.channel_capacity, "Merging pipeline.channel_capacity");
                current.channel_capacity = pipeline.channel_capacity;
            }
        }
    }
}

// =============================================================================
// Resolved Config Structs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatAccumConfig {
    pub name: String,
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub pool_size: usize,
    pub channel_capacity: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub stat_filter: StatFilterConfig,
    pub stat_accum: StatAccumConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.statfilter/statfilter.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        Self::load_with_profile(cli, get_profile_config_path())
    }

    /// Load with an explicit profile config location (`None` skips it)
    fn load_with_profile(cli: &CliConfig, profile_path: Option<PathBuf>) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.statfilter/statfilter.json) - skip if not exists
        if let Some(profile_path) = profile_path
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_home(path);
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(file_config, cli)
    }

    /// Layer defaults -> file config -> CLI/env overrides, then validate
    fn resolve(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_stat_filter = file_config.stat_filter.unwrap_or_default();
        let file_stat_accum = file_config.stat_accum.unwrap_or_default();
        let file_pipeline = file_config.pipeline.unwrap_or_default();

        let stat_filter = StatFilterConfig {
            metrics: file_stat_filter.metric.unwrap_or_default(),
            stat_accum_name: cli
                .stat_accum_name
                .clone()
                .or(file_stat_filter.stat_accum_name)
                .unwrap_or_else(|| DEFAULT_STAT_ACCUM_NAME.to_string()),
        };

        // Unless named explicitly, the accumulator registers under the filter's target
        let stat_accum = StatAccumConfig {
            name: file_stat_accum
                .name
                .unwrap_or_else(|| stat_filter.stat_accum_name.clone()),
            channel_capacity: cli
                .stat_accum_capacity
                .or(file_stat_accum.channel_capacity)
                .unwrap_or(DEFAULT_STAT_ACCUM_CAPACITY),
        };

        let pipeline = PipelineConfig {
            pool_size: cli
                .pool_size
                .or(file_pipeline.pool_size)
                .unwrap_or(DEFAULT_POOL_SIZE),
            channel_capacity: file_pipeline
                .channel_capacity
                .unwrap_or(DEFAULT_INPUT_CHANNEL_CAPACITY),
        };

        let config = Self {
            stat_filter,
            stat_accum,
            pipeline,
        };
        config.validate()?;

        tracing::debug!(
            metrics = config.stat_filter.metrics.len(),
            stat_accum_name = %config.stat_filter.stat_accum_name,
            pool_size = config.pipeline.pool_size,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reject unusable sizes; warn about templates that will resolve as counters
    fn validate(&self) -> Result<()> {
        if self.pipeline.pool_size == 0 {
            anyhow::bail!("pipeline.pool_size must be greater than 0");
        }
        if self.pipeline.channel_capacity == 0 {
            anyhow::bail!("pipeline.channel_capacity must be greater than 0");
        }
        if self.stat_accum.channel_capacity == 0 {
            anyhow::bail!("stat_accum.channel_capacity must be greater than 0");
        }

        if self.stat_filter.metrics.is_empty() {
            tracing::warn!("No metric templates configured, no stats will be generated");
        }

        let mut ids: Vec<&String> = self.stat_filter.metrics.keys().collect();
        ids.sort();
        for id in ids {
            let kind = &self.stat_filter.metrics[id].kind;
            if !kind.is_known() {
                tracing::warn!(
                    metric = %id,
                    kind = %kind,
                    "Unrecognized metric type, stats will be sent as counters"
                );
            }
        }

        Ok(())
    }
}

/// Get the profile config path (~/.statfilter/statfilter.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
