// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "statfilter";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".statfilter";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "statfilter.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "STATFILTER_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "STATFILTER_LOG";

// =============================================================================
// Environment Variables - Stat Filter
// =============================================================================

/// Environment variable for the accumulator input the filter delivers to
pub const ENV_STAT_ACCUM_NAME: &str = "STATFILTER_STAT_ACCUM_NAME";

/// Environment variable for the accumulator channel capacity
pub const ENV_STAT_ACCUM_CAPACITY: &str = "STATFILTER_STAT_ACCUM_CAPACITY";

// =============================================================================
// Environment Variables - Pipeline
// =============================================================================

/// Environment variable for the pack pool size
pub const ENV_POOL_SIZE: &str = "STATFILTER_POOL_SIZE";

// =============================================================================
// Pipeline Defaults
// =============================================================================

/// Default number of packs in flight
pub const DEFAULT_POOL_SIZE: usize = 100;

/// Default capacity of the input -> filter work channel
pub const DEFAULT_INPUT_CHANNEL_CAPACITY: usize = 50;

/// Default capacity of the accumulator stat channel
pub const DEFAULT_STAT_ACCUM_CAPACITY: usize = 1024;

/// Registry name of the stdin JSON-lines input
pub const JSON_LINES_INPUT_NAME: &str = "JsonLinesInput";

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks on shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
