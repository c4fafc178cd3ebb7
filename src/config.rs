use std::time::Duration;

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server: String,
    pub refresh_delay: Duration,
    pub supersede_uploads: bool,
    pub chunk_size: usize, // in bytes
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: std::env::var("DROPSHARE_SERVER")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),
            refresh_delay: Duration::from_millis(
                std::env::var("DROPSHARE_REFRESH_DELAY_MS")
                    .ok()
                    .and_then(|ms| ms.parse().ok())
                    .unwrap_or(2000),
            ),
            supersede_uploads: std::env::var("DROPSHARE_SUPERSEDE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            chunk_size: std::env::var("DROPSHARE_CHUNK_SIZE")
                .ok()
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(64 * 1024), // 64KB default
        }
    }
}
