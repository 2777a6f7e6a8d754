//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Allow cross-origin requests from any origin.
    #[serde(default = "default_true")]
    pub cors_permissive: bool,

    // === Storage ===
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    // === Monitoring ===
    /// CPU sampling window in milliseconds.
    #[serde(default = "default_cpu_sample_ms")]
    pub cpu_sample_ms: u64,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_port() -> u16 {
    5000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_database_path() -> PathBuf {
    PathBuf::from("blog.db")
}

fn default_cpu_sample_ms() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Upper bound on the CPU sampling window.
const MAX_CPU_SAMPLE_MS: u64 = 5_000;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            cors_permissive: default_true(),
            database_path: default_database_path(),
            cpu_sample_ms: default_cpu_sample_ms(),
            rust_log: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be between 1 and 65535".to_string());
        }

        if self.database_path.as_os_str().is_empty() {
            return Err("DATABASE_PATH must not be empty".to_string());
        }

        if self.cpu_sample_ms == 0 || self.cpu_sample_ms > MAX_CPU_SAMPLE_MS {
            return Err(format!(
                "CPU_SAMPLE_MS must be between 1 and {MAX_CPU_SAMPLE_MS}"
            ));
        }

        Ok(())
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// CPU sampling window.
    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_ms)
    }
}
