use crate::domain::model::{ApiBase, BaseUrl, CatalogEntity, HealthReport, TeamRef};
use async_trait::async_trait;

/// Read-only view of the user's Cortex settings.
pub trait ConfigProvider: Send + Sync {
    /// Normalized UI base URL, `None` when unset or invalid.
    fn base_url(&self) -> Option<BaseUrl>;
    /// Configured API URL, or one derived from [`ConfigProvider::base_url`].
    fn api_base(&self) -> Option<ApiBase>;
    fn org_slug(&self) -> Option<&str>;
}

pub trait CredentialSource: Send + Sync {
    /// Current access token; blank tokens are reported as `None`.
    fn token(&self) -> Option<String>;
}

/// Remote catalog operations. Lookups return `None` for every kind of failure.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn check_health(&self, base: &BaseUrl, token: Option<&str>) -> HealthReport;

    async fn check_api_health(&self, api_base: &ApiBase, token: Option<&str>) -> HealthReport;

    async fn fetch_entity_by_tag(
        &self,
        api_base: &ApiBase,
        token: Option<&str>,
        tag: &str,
    ) -> Option<CatalogEntity>;

    async fn fetch_team(
        &self,
        api_base: &ApiBase,
        token: Option<&str>,
        tag_or_id: &str,
    ) -> Option<TeamRef>;

    async fn fetch_service_name(
        &self,
        api_base: &ApiBase,
        token: Option<&str>,
        id: &str,
    ) -> Option<String>;
}
