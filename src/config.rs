//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of messages kept per room window
    pub window_size: usize,
    /// Idle TTL in seconds for a room window
    pub ttl_seconds: u64,
    /// Per-operation backend timeout in milliseconds
    pub backend_timeout_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_WINDOW_SIZE` - Messages kept per room (default: 90)
    /// - `CACHE_TTL_SECONDS` - Idle window TTL in seconds (default: 3600)
    /// - `BACKEND_TIMEOUT_MS` - Backend operation timeout (default: 2000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            window_size: env::var("CACHE_WINDOW_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(90),
            ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            backend_timeout_ms: env::var("BACKEND_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: 90,
            ttl_seconds: 3600,
            backend_timeout_ms: 2000,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.window_size, 90);
        assert_eq!(config.ttl_seconds, 3600);
        assert_eq!(config.backend_timeout_ms, 2000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
    }

    // One test owns all env-var manipulation; parallel test threads share
    // the process environment
    #[test]
    fn test_config_from_env() {
        env::remove_var("CACHE_WINDOW_SIZE");
        env::remove_var("CACHE_TTL_SECONDS");
        env::remove_var("BACKEND_TIMEOUT_MS");
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");

        let config = Config::from_env();
        assert_eq!(config.window_size, 90);
        assert_eq!(config.ttl_seconds, 3600);
        assert_eq!(config.backend_timeout_ms, 2000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);

        // A zero window would make every trim empty the list
        env::set_var("CACHE_WINDOW_SIZE", "0");
        assert_eq!(Config::from_env().window_size, 90);
        env::remove_var("CACHE_WINDOW_SIZE");
    }
}
