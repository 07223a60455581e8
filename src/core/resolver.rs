use crate::core::cache::{EntityCache, DEFAULT_TTL};
use crate::core::url;
use crate::domain::model::{ReferenceKind, ResolutionRequest};
use crate::domain::ports::{CatalogApi, ConfigProvider, CredentialSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

pub const TOOLTIP_PREFIX: &str = "Open in Cortex: ";
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Entry point for UI layers: labels, prefetching and navigation targets for
/// classified references.
///
/// Create one per session and share it. All network traffic runs on the
/// runtime behind `runtime`; the methods returning plain values never wait
/// on I/O and can be called from any thread.
pub struct EntityResolver {
    cache: EntityCache,
    catalog: Arc<dyn CatalogApi>,
    config: Arc<dyn ConfigProvider>,
    credentials: Arc<dyn CredentialSource>,
    runtime: Handle,
    permits: Arc<Semaphore>,
}

impl EntityResolver {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        config: Arc<dyn ConfigProvider>,
        credentials: Arc<dyn CredentialSource>,
        runtime: Handle,
    ) -> Self {
        Self {
            cache: EntityCache::with_ttl(runtime.clone(), DEFAULT_TTL),
            catalog,
            config,
            credentials,
            runtime,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_FETCHES)),
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = EntityCache::with_ttl(self.runtime.clone(), ttl);
        self
    }

    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    /// Label for a reference. Service ids show the cached display name when
    /// one is known and start a background fetch otherwise, so the label may
    /// trail the catalog by one fetch.
    pub fn label_for(&self, kind: ReferenceKind, raw_value: &str) -> String {
        if kind != ReferenceKind::ServiceId {
            return raw_value.to_string();
        }
        match self.cache.get(raw_value) {
            Some(name) => name,
            None => {
                self.prefetch(kind, raw_value);
                raw_value.to_string()
            }
        }
    }

    pub fn tooltip_for(&self, kind: ReferenceKind, raw_value: &str) -> String {
        format!("{}{}", TOOLTIP_PREFIX, self.label_for(kind, raw_value))
    }

    /// Warms the service name cache. Other kinds are resolved on navigation only.
    pub fn prefetch(&self, kind: ReferenceKind, raw_value: &str) -> Option<JoinHandle<()>> {
        if kind != ReferenceKind::ServiceId {
            return None;
        }
        if self.cache.get(raw_value).is_some() {
            return None;
        }
        let Some(api_base) = self.config.api_base() else {
            tracing::debug!("Cortex base URL not configured; skipping prefetch");
            return None;
        };

        let catalog = Arc::clone(&self.catalog);
        let permits = Arc::clone(&self.permits);
        let token = self.credentials.token();
        let id = raw_value.to_string();

        self.cache.ensure_fetching(raw_value, move || async move {
            let _permit = permits.acquire_owned().await.ok()?;
            catalog
                .fetch_service_name(&api_base, token.as_deref(), &id)
                .await
        })
    }

    /// Builds a navigation request from the current settings, or `None` when
    /// Cortex is not configured.
    pub fn request_for(&self, kind: ReferenceKind, raw_value: &str) -> Option<ResolutionRequest> {
        let base_url = self.config.base_url()?;
        let api_base = self
            .config
            .api_base()
            .unwrap_or_else(|| url::derive_api_base(&base_url));
        Some(ResolutionRequest {
            kind,
            value: raw_value.to_string(),
            base_url,
            api_base,
            token: self.credentials.token(),
        })
    }

    /// Resolves the URL to open for a reference on the background runtime.
    ///
    /// Lookups that miss for any reason fall back to the admin landing page.
    pub fn resolve_for_navigation(&self, request: ResolutionRequest) -> JoinHandle<String> {
        if request.kind == ReferenceKind::ServiceId {
            self.prefetch(request.kind, &request.value);
        }

        let catalog = Arc::clone(&self.catalog);
        let permits = Arc::clone(&self.permits);
        self.runtime.spawn(async move {
            navigation_url(catalog.as_ref(), &permits, &request).await
        })
    }
}

/// Only the catalog lookups take a permit; a service link never waits on
/// other fetches.
async fn navigation_url(
    catalog: &dyn CatalogApi,
    permits: &Semaphore,
    request: &ResolutionRequest,
) -> String {
    let base = &request.base_url;
    let token = request.token.as_deref();

    match request.kind {
        // service ids are canonical already
        ReferenceKind::ServiceId => url::service_url(base, &request.value),
        ReferenceKind::CrossReferenceTag => {
            let _permit = permits.acquire().await.ok();
            match catalog
                .fetch_entity_by_tag(&request.api_base, token, &request.value)
                .await
            {
                Some(entity) => url::admin_url(base, &entity.entity_type, &entity.id),
                None => url::admin_landing_url(base),
            }
        }
        ReferenceKind::OwnerReference => {
            let _permit = permits.acquire().await.ok();
            match catalog
                .fetch_team(&request.api_base, token, &request.value)
                .await
            {
                Some(team) => url::admin_teams_url(base, &team.id),
                None => url::admin_landing_url(base),
            }
        }
        ReferenceKind::None => {
            tracing::debug!("Navigation requested for unclassified value {}", request.value);
            url::admin_landing_url(base)
        }
    }
}
