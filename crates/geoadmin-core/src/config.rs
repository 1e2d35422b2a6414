// crates/geoadmin-core/src/config.rs

//! Runtime configuration, loadable from TOML.
//!
//! ```toml
//! api_base_url = "https://geo.example.org/api"
//! enrich_flags = false
//!
//! [collections]
//! departments = "states"
//! ```

use crate::error::{GeoAdminError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_FLAG_API_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Banners stay between 2 and 4 seconds.
const NOTICE_TTL_RANGE_MS: std::ops::RangeInclusive<u64> = 2_000..=4_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionPaths {
    pub countries: String,
    pub departments: String,
    pub cities: String,
}

impl Default for CollectionPaths {
    fn default() -> Self {
        Self {
            countries: "countries".into(),
            departments: "departments".into(),
            cities: "cities".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Root of the persistence API.
    pub api_base_url: String,
    pub collections: CollectionPaths,
    /// Root of the country directory used for flag images.
    pub flag_api_base_url: String,
    /// When false no flag lookups are made.
    pub enrich_flags: bool,
    pub request_timeout_secs: u64,
    pub notice_ttl_ms: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            collections: CollectionPaths::default(),
            flag_api_base_url: DEFAULT_FLAG_API_BASE_URL.into(),
            enrich_flags: true,
            request_timeout_secs: 10,
            notice_ttl_ms: 3_000,
        }
    }
}

impl AdminConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: AdminConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_base_url)?;
        url::Url::parse(&self.flag_api_base_url)?;
        if self.request_timeout_secs == 0 {
            return Err(GeoAdminError::Config("request_timeout_secs must be positive".into()));
        }
        if !NOTICE_TTL_RANGE_MS.contains(&self.notice_ttl_ms) {
            return Err(GeoAdminError::Config(format!(
                "notice_ttl_ms must be within {}..={}, got {}",
                NOTICE_TTL_RANGE_MS.start(),
                NOTICE_TTL_RANGE_MS.end(),
                self.notice_ttl_ms
            )));
        }
        Ok(())
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}
