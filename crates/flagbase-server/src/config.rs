//! Server configuration loaded from environment variables.
//!
//! All settings have defaults. Override any variable at process startup;
//! no config file is read.
//!
//! | Variable                          | Default     | Description                                   |
//! |-----------------------------------|-------------|-----------------------------------------------|
//! | `FLAGBASE_DB_PATH`                | `./data.db` | SQLite database file                          |
//! | `FLAGBASE_HTTP_PORT`              | `8080`      | HTTP/JSON listen port                         |
//! | `FLAGBASE_GRPC_PORT`              | `50051`     | gRPC listen port                              |
//! | `FLAGBASE_LOG_LEVEL`              | `info`      | tracing filter (trace/debug/info/warn/error)  |
//! | `FLAGBASE_BUSY_TIMEOUT_MS`        | `5000`      | SQLite busy timeout                           |
//! | `FLAGBASE_FORCE_ACTIVE_ON_CREATE` | `true`      | store every new feature as active             |
//! | `FLAGBASE_GRPC_REFLECTION`        | `true`      | expose the gRPC reflection service            |

use std::time::Duration;

use flagbase_table::{ActivePolicy, StoreOptions};

/// Runtime configuration for the flagbase server process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file.
    pub db_path: String,

    /// HTTP listen port.
    pub http_port: u16,

    /// gRPC listen port.
    pub grpc_port: u16,

    /// Tracing filter string, e.g. `"flagbase_table=debug,info"`.
    pub log_level: String,

    /// Milliseconds a statement waits on a locked database.
    pub busy_timeout_ms: u64,

    /// `true` keeps the historical "new features are always active" rule.
    pub force_active_on_create: bool,

    /// Register the gRPC server reflection service.
    pub grpc_reflection: bool,
}

impl Config {
    /// Load configuration from environment variables, applying defaults where
    /// a variable is absent or unparseable.
    pub fn from_env() -> Self {
        Self {
            db_path:                env_str("FLAGBASE_DB_PATH", "./data.db"),
            http_port:              env_parse("FLAGBASE_HTTP_PORT", 8080),
            grpc_port:              env_parse("FLAGBASE_GRPC_PORT", 50051),
            log_level:              env_str("FLAGBASE_LOG_LEVEL", "info"),
            busy_timeout_ms:        env_parse("FLAGBASE_BUSY_TIMEOUT_MS", 5_000),
            force_active_on_create: env_bool("FLAGBASE_FORCE_ACTIVE_ON_CREATE", true),
            grpc_reflection:        env_bool("FLAGBASE_GRPC_REFLECTION", true),
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions { busy_timeout: Duration::from_millis(self.busy_timeout_ms) }
    }

    pub fn active_policy(&self) -> ActivePolicy {
        if self.force_active_on_create {
            ActivePolicy::ForceOnCreate
        } else {
            ActivePolicy::Honor
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => v == "1" || v.eq_ignore_ascii_case("true"),
        Err(_) => default,
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
