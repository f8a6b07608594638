//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default page size for paginated reads.
const fn default_page_size() -> i64 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Page size used when a caller asks for a page without an explicit size.
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}
