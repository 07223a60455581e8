use crate::config::credentials::{EnvCredentials, StaticCredentials};
use crate::core::client::{HttpSettings, DEFAULT_USER_AGENT};
use crate::core::url::{derive_api_base, normalize};
use crate::domain::model::{ApiBase, BaseUrl};
use crate::domain::ports::{ConfigProvider, CredentialSource};
use crate::utils::error::{redact, CortexError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_optional_base_url, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CortexConfig {
    pub cortex: CortexSection,
    pub http: HttpSection,
    pub cache: CacheSection,
    pub runtime: RuntimeSection,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CortexSection {
    pub base_url: String,
    pub api_url: String,
    pub org_slug: String,
    pub token: Option<String>,
}

impl fmt::Debug for CortexSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CortexSection")
            .field("base_url", &self.base_url)
            .field("api_url", &self.api_url)
            .field("org_slug", &self.org_slug)
            .field("token", &redact(self.token.as_deref()))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub connect_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: 5,
            request_timeout_seconds: 8,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub ttl_seconds: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self { ttl_seconds: 300 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    pub worker_threads: usize,
    pub max_concurrent_fetches: usize,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            worker_threads: 4,
            max_concurrent_fetches: 8,
        }
    }
}

impl CortexConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.cortex.base_url = base_url.into();
        config
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CortexError::ConfigParse {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CORTEX_TOKEN})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CortexError::ConfigParse {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_secs(self.http.connect_timeout_seconds),
            request_timeout: Duration::from_secs(self.http.request_timeout_seconds),
            user_agent: self.http.user_agent.clone(),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }

    /// Token from the file when present, otherwise `CORTEX_TOKEN`.
    pub fn credentials(&self) -> Arc<dyn CredentialSource> {
        let from_file = self
            .cortex
            .token
            .clone()
            // an unresolved ${VAR} placeholder is not a token
            .filter(|t| !t.trim().is_empty() && !t.starts_with("${"));
        match from_file {
            Some(token) => Arc::new(StaticCredentials::new(Some(token))),
            None => Arc::new(EnvCredentials::default()),
        }
    }

    pub fn build_runtime(&self) -> Result<tokio::runtime::Runtime> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.runtime.worker_threads)
            .thread_name("cortex-links-worker")
            .enable_all()
            .build()?;
        Ok(runtime)
    }
}

impl ConfigProvider for CortexConfig {
    fn base_url(&self) -> Option<BaseUrl> {
        normalize(self.cortex.base_url.as_str())
    }

    fn api_base(&self) -> Option<ApiBase> {
        match normalize(self.cortex.api_url.as_str()) {
            Some(explicit) => Some(ApiBase::explicit(explicit)),
            None => self.base_url().map(|base| derive_api_base(&base)),
        }
    }

    fn org_slug(&self) -> Option<&str> {
        Some(self.cortex.org_slug.trim()).filter(|s| !s.is_empty())
    }
}

impl Validate for CortexConfig {
    fn validate(&self) -> Result<()> {
        validate_optional_base_url("cortex.base_url", &self.cortex.base_url)?;
        validate_optional_base_url("cortex.api_url", &self.cortex.api_url)?;
        validate_range(
            "http.connect_timeout_seconds",
            self.http.connect_timeout_seconds,
            1,
            120,
        )?;
        validate_range(
            "http.request_timeout_seconds",
            self.http.request_timeout_seconds,
            1,
            120,
        )?;
        validate_non_empty_string("http.user_agent", &self.http.user_agent)?;
        validate_range("cache.ttl_seconds", self.cache.ttl_seconds, 1, 86_400)?;
        validate_range("runtime.worker_threads", self.runtime.worker_threads, 1, 64)?;
        validate_range(
            "runtime.max_concurrent_fetches",
            self.runtime.max_concurrent_fetches,
            1,
            256,
        )?;
        Ok(())
    }
}
