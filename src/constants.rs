//! Centralized constants for the smartloc crate
//!
//! Values shared by the search, history and teleport modules live here so
//! the CLI and the server agree on them.

/// External API endpoints
pub mod api {
    /// Google Generative Language API base URL
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

    /// Model used for place resolution
    pub const GEMINI_MODEL: &str = "gemini-3-flash-preview";

    /// Environment variables checked for the API key, in order
    pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];
}

/// Client-local storage
pub mod storage {
    /// Key holding the serialized history list
    pub const HISTORY_KEY: &str = "smartloc_history";

    /// Maximum number of history entries kept
    pub const MAX_HISTORY_ENTRIES: usize = 10;
}

/// Search limits
pub mod search {
    /// Maximum number of candidates returned by a search
    pub const MAX_RESULTS: usize = 3;
}

/// Teleport lifecycle timing, in milliseconds
pub mod timing {
    /// Simulated engine latency before a teleport is committed
    pub const COMMIT_DELAY_MS: u64 = 1200;

    /// How long the success status stays visible
    pub const STATUS_DISPLAY_MS: u64 = 3000;
}

/// User-facing strings (Simplified Chinese UI locale)
pub mod text {
    /// Name given to a candidate created from a direct map click
    pub const CUSTOM_POINT_NAME: &str = "自定义坐标点";

    /// Status shown while a teleport is being committed
    pub const STATUS_COMMITTING: &str = "高德引擎正在重写 GPS 信号...";

    /// Status shown after a successful teleport
    pub fn status_success(name: &str) -> String {
        format!("[高德内核] {} 定位成功", name)
    }
}

/// Geographic constants
pub mod geo {
    /// Initial simulated position (Tiananmen, GCJ-02)
    pub const INITIAL_LAT: f64 = 39.9087;
    pub const INITIAL_LNG: f64 = 116.3975;

    /// Krasovsky 1940 ellipsoid semi-major axis, used by the GCJ-02 transform
    pub const KRASOVSKY_A: f64 = 6_378_245.0;

    /// Krasovsky 1940 ellipsoid eccentricity squared
    pub const KRASOVSKY_EE: f64 = 0.006_693_421_622_965_943;
}
