// Defaults loaded from the environment (and .env, which main loads first).

use std::env;

// Use lazy_static to initialize static variables safely.
lazy_static::lazy_static! {
    // Missing key is not fatal: calls fail and the UI shows its retry notice.
    pub static ref GEMINI_API_KEY: String = env::var("GEMINI_API_KEY").unwrap_or_default();
    pub static ref GEMINI_API_BASE: String = env::var("GEMINI_API_BASE")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());
    pub static ref STYLECAST_MODEL: String = env::var("STYLECAST_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
    pub static ref HTTP_TIMEOUT_SECS: u64 = env::var("STYLECAST_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60);
    pub static ref TEMPLATES_DIR: String = env::var("STYLECAST_TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string());
    pub static ref STATIC_DIR: String = env::var("STYLECAST_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
}

pub const DEFAULT_PORT: u16 = 9900;

/// Seconds between self-refreshes while a model call is outstanding.
pub const PENDING_REFRESH_SECS: u64 = 2;
