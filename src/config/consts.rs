// src/config/consts.rs

// Net config
pub const APPLE_WIKI_API_URL: &str = "https://theapplewiki.com/api.php";
pub const WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org/wiki/";
pub const USER_AGENT: &str = "apple_specs/0.3 (device catalog builder)";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Retry
pub const MAX_ATTEMPTS: usize = 5;
pub const BACKOFF_BASE_MS: u64 = 1_000;
pub const RETRY_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

// Xcode device traits
pub const XCODE_ROOT: &str = "/Applications";
pub const XCODE_DEFAULT_BUNDLE: &str = "Xcode.app";
pub const XCODE_DEFAULT_LABEL: &str = "Xcode";
pub const DEVICE_TRAITS_REL: &str =
    "Contents/Developer/Platforms/iPhoneOS.platform/usr/standalone/device_traits.db";
pub const XCODEBUILD_REL: &str = "Contents/Developer/usr/bin/xcodebuild";
pub const PREFERRED_XCODE_MARKERS: &[&str] = &["26.0", "Beta", "Developer"];

// Wiki markup
pub const MEDIA_PREFIXES: &[&str] = &["File:", "Image:"];

// Resolution
pub const UNKNOWN: &str = "Unknown";
pub const OVERRIDE_ONLY_MEMORY: &str = "8 GB";

// Output
pub const DEFAULT_OUT_DIR: &str = "apple";
pub const LOG_DIR: &str = "apple/.log";
pub const LOG_FILE: &str = "debug.log";
