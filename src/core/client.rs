use crate::core::url;
use crate::domain::model::{ApiBase, BaseUrl, CatalogEntity, HealthReport, TeamRef};
use crate::domain::ports::CatalogApi;
use crate::utils::error::{CortexError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("cortex-links/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(8),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// Response bodies: only the fields we read, everything else is ignored.

#[derive(Debug, Deserialize)]
struct EntityBody {
    id: Option<String>,
    #[serde(rename = "type")]
    entity_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamBody {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceBody {
    name: Option<String>,
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CortexError::MalformedResponse {
            field: field.to_string(),
        })
}

/// Stateless client for the Cortex REST API.
///
/// The underlying `reqwest::Client` pools connections and is cheap to clone,
/// so one instance is shared by every background fetch.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// GET with optional bearer auth; non-2xx statuses become errors.
    async fn get(&self, url: &str, token: Option<&str>) -> Result<reqwest::Response> {
        let mut request = self.client.get(url);
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            request = request.bearer_auth(token);
        }

        tracing::debug!("GET {}", url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status.is_success() {
            Ok(response)
        } else {
            Err(CortexError::from_status(status.as_u16(), url))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, token: Option<&str>) -> Result<T> {
        let body = self.get(url, token).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| CortexError::MalformedResponse {
            field: format!("body ({})", e),
        })
    }

    async fn health(&self, url: &str, token: Option<&str>) -> HealthReport {
        match self.get(url, token).await {
            Ok(response) => HealthReport {
                ok: true,
                message: "Connection successful".to_string(),
                http_code: Some(response.status().as_u16()),
            },
            Err(e) => {
                let code = match &e {
                    CortexError::Unauthorized => Some(401),
                    CortexError::NotFound { .. } => Some(404),
                    CortexError::UnexpectedStatus { status } => Some(*status),
                    _ => None,
                };
                tracing::warn!("Health check failed: {}", e);
                HealthReport::failed(e.to_string(), code)
            }
        }
    }

    /// Folds every lookup failure into `None`. Remote-side failures are
    /// expected misses; anything else is logged louder.
    fn miss<T>(what: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) if e.is_resolution_miss() => {
                tracing::debug!("{} lookup missed: {}", what, e);
                None
            }
            Err(e) => {
                tracing::warn!("{} lookup failed: {} ({:?})", what, e, e.category());
                None
            }
        }
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn check_health(&self, base: &BaseUrl, token: Option<&str>) -> HealthReport {
        self.health(&url::health_url(base), token).await
    }

    async fn check_api_health(&self, api_base: &ApiBase, token: Option<&str>) -> HealthReport {
        self.health(&url::catalog_definitions_url(api_base), token)
            .await
    }

    async fn fetch_entity_by_tag(
        &self,
        api_base: &ApiBase,
        token: Option<&str>,
        tag: &str,
    ) -> Option<CatalogEntity> {
        let url = url::catalog_entity_url(api_base, tag);
        let result: Result<CatalogEntity> = async {
            let body: EntityBody = self.get_json(&url, token).await?;
            Ok(CatalogEntity {
                id: required("id", body.id)?,
                entity_type: required("type", body.entity_type)?,
            })
        }
        .await;
        Self::miss("Catalog", result)
    }

    async fn fetch_team(
        &self,
        api_base: &ApiBase,
        token: Option<&str>,
        tag_or_id: &str,
    ) -> Option<TeamRef> {
        let url = url::team_lookup_url(api_base, tag_or_id);
        let result: Result<TeamRef> = async {
            let body: TeamBody = self.get_json(&url, token).await?;
            Ok(TeamRef {
                id: required("id", body.id)?,
            })
        }
        .await;
        Self::miss("Team", result)
    }

    async fn fetch_service_name(
        &self,
        api_base: &ApiBase,
        token: Option<&str>,
        id: &str,
    ) -> Option<String> {
        let url = url::service_lookup_url(api_base, id);
        let result: Result<String> = async {
            let body: ServiceBody = self.get_json(&url, token).await?;
            required("name", body.name)
        }
        .await;
        Self::miss("Service", result)
    }
}
