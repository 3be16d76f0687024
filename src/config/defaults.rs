//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = constants::api::GEMINI_MODEL;

/// Default Gemini API base URL
pub const DEFAULT_BASE_URL: &str = constants::api::GEMINI_BASE_URL;

/// Default maximum number of search candidates
pub const DEFAULT_MAX_RESULTS: usize = constants::search::MAX_RESULTS;

/// Default request timeout for the geocoding provider
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default simulated commit delay
pub const DEFAULT_COMMIT_DELAY_MS: u64 = constants::timing::COMMIT_DELAY_MS;

/// Default success status display duration
pub const DEFAULT_STATUS_DISPLAY_MS: u64 = constants::timing::STATUS_DISPLAY_MS;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7879;

/// Default target app preset
pub const DEFAULT_PRESET: &str = "dingtalk";

/// Default map URL provider
pub const DEFAULT_URL_PROVIDER: &str = "amap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "smartloc";
