#[cfg(feature = "cli")]
pub mod cli;

use crate::core::render::NestedResponseBody;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_pattern, validate_positive_number, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SITE_URL: &str = "https://alphaxiv.org/";
pub const DEFAULT_SCRIPT_PREFIX: &str = "/_next/static/chunks/";
pub const DEFAULT_ENDPOINT_PATTERN: &str =
    r"https://[a-zA-Z0-9\-]+\.execute-api\.[a-zA-Z0-9\-]+\.amazonaws\.com/default";
pub const DEFAULT_PAPER_PAGE_BASE: &str = "https://alphaxiv.org/abs";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub discovery: DiscoveryConfig,
    pub http: HttpConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Root page scanned for script bundles.
    pub site_url: String,
    pub script_prefix: String,
    pub endpoint_pattern: String,
    /// Upper bound on scripts fetched per discovery attempt.
    pub max_scripts: usize,
    pub staleness_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            script_prefix: DEFAULT_SCRIPT_PREFIX.to_string(),
            endpoint_pattern: DEFAULT_ENDPOINT_PATTERN.to_string(),
            max_scripts: 64,
            staleness_secs: 3600,
        }
    }
}

impl DiscoveryConfig {
    pub fn staleness(&self) -> Duration {
        Duration::from_secs(self.staleness_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub attempts: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            attempts: 1,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Comment links point at `{paper_page_base}/{version}`.
    pub paper_page_base: String,
    pub nested_response_body: NestedResponseBody,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            paper_page_base: DEFAULT_PAPER_PAGE_BASE.to_string(),
            nested_response_body: NestedResponseBody::default(),
        }
    }
}

impl CommentsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CommentsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for CommentsConfig {
    fn validate(&self) -> Result<()> {
        validate_url("discovery.site_url", &self.discovery.site_url)?;
        validate_non_empty_string("discovery.script_prefix", &self.discovery.script_prefix)?;
        validate_pattern("discovery.endpoint_pattern", &self.discovery.endpoint_pattern)?;
        validate_positive_number("discovery.max_scripts", self.discovery.max_scripts as u64, 1)?;
        validate_range("http.timeout_ms", self.http.timeout_ms, 1, 60_000)?;
        validate_range("http.attempts", self.http.attempts, 1, 5)?;
        validate_url("render.paper_page_base", &self.render.paper_page_base)?;
        Ok(())
    }
}
