//! MongoDB connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// `[mongo]` section.
///
/// Optional settings override the same option parsed from `uri` only when
/// set; left unset, the URI value (or the driver default) stays in effect.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MongoConfig {
    /// Connection string (e.g., `mongodb://localhost:27017`).
    #[serde(default)]
    pub uri: String,

    /// Database that repositories open their collections in.
    #[serde(default)]
    pub database: String,

    /// Application name reported to the server in the handshake.
    #[serde(default)]
    pub app_name: Option<String>,

    /// Minimum number of pooled connections per server. Driver default when unset.
    #[serde(default)]
    pub min_pool_size: Option<u32>,

    /// Maximum number of pooled connections per server. Driver default when unset.
    #[serde(default)]
    pub max_pool_size: Option<u32>,

    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,

    #[serde(default)]
    pub server_selection_timeout_ms: Option<u64>,
}

impl MongoConfig {
    /// Check if the connection string and database name are both present.
    pub fn is_configured(&self) -> bool {
        !self.uri.is_empty() && !self.database.is_empty()
    }

    /// Reject values the driver would only complain about at connect time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a URI without a `mongodb://` or
    /// `mongodb+srv://` scheme, zero timeouts, or a minimum pool size above the
    /// maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.uri.is_empty()
            && !self.uri.starts_with("mongodb://")
            && !self.uri.starts_with("mongodb+srv://")
        {
            return Err(ConfigError::InvalidValue {
                field: "mongo.uri".into(),
                reason: format!("expected a mongodb:// or mongodb+srv:// URI, got '{}'", self.uri),
            });
        }
        if self.connect_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "mongo.connect_timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.server_selection_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "mongo.server_selection_timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if let (Some(min), Some(max)) = (self.min_pool_size, self.max_pool_size) {
            if min > max {
                return Err(ConfigError::InvalidValue {
                    field: "mongo.min_pool_size".into(),
                    reason: format!("{min} exceeds max_pool_size {max}"),
                });
            }
        }
        Ok(())
    }

    /// Ensure the section can be used to open a connection.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when `uri` or `database` is empty,
    /// otherwise whatever [`MongoConfig::validate`] reports.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        let mut missing = Vec::new();
        if self.uri.is_empty() {
            missing.push("uri");
        }
        if self.database.is_empty() {
            missing.push("database");
        }
        if !missing.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "mongo".into(),
                missing,
            });
        }
        self.validate()?;
        Ok(self)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn server_selection_timeout(&self) -> Option<Duration> {
        self.server_selection_timeout_ms.map(Duration::from_millis)
    }
}
