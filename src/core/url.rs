//! URL construction for the Cortex web UI and REST API.
//!
//! Everything here is a pure string function. Identifiers are inserted into
//! paths verbatim, the same way the Cortex UI builds its own links.

use crate::domain::model::{ApiBase, BaseUrl, EntityKind};
use ::url::Url;

/// Normalize user-provided base URL input.
///
/// - trims whitespace
/// - defaults the scheme to `https://`
/// - requires an http(s) scheme and a non-empty host
/// - strips trailing slashes
///
/// Blank input yields `None`, meaning "not configured".
pub fn normalize<'a>(raw: impl Into<Option<&'a str>>) -> Option<BaseUrl> {
    let raw = raw.into().unwrap_or_default().trim();
    if raw.is_empty() {
        return None;
    }

    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else if raw.contains("://") {
        // some other explicit scheme
        return None;
    } else {
        format!("https://{}", raw)
    };

    let parsed = Url::parse(&with_scheme).ok()?;
    match parsed.scheme() {
        "http" | "https" => {}
        _ => return None,
    }
    let host = parsed.host_str().filter(|h| !h.trim().is_empty())?;

    Some(BaseUrl {
        raw: with_scheme.trim_end_matches('/').to_string(),
        scheme: parsed.scheme().to_string(),
        host: host.to_string(),
        port: parsed.port(),
    })
}

/// Derive the API base from the UI base: `https://cortex.example.com`
/// becomes `https://api.cortex.example.com`. Hosts already starting with
/// `api.` are kept. Scheme and explicit port carry over; any path does not.
///
/// IP-literal hosts get the prefix too (`api.10.0.0.5`), which does not
/// resolve; such deployments need an explicit `api_url`.
pub fn derive_api_base(base: &BaseUrl) -> ApiBase {
    let host = if base.host().starts_with("api.") {
        base.host().to_string()
    } else {
        format!("api.{}", base.host())
    };
    let port = base.port().map(|p| format!(":{}", p)).unwrap_or_default();

    ApiBase(BaseUrl {
        raw: format!("{}://{}{}", base.scheme(), host, port),
        scheme: base.scheme().to_string(),
        host,
        port: base.port(),
    })
}

pub fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub fn entity_url(base: &BaseUrl, kind: EntityKind, id: &str) -> String {
    join(base.as_str(), &format!("/{}/{}", kind.plural(), id))
}

pub fn service_url(base: &BaseUrl, id: &str) -> String {
    entity_url(base, EntityKind::Service, id)
}

pub fn team_url(base: &BaseUrl, id: &str) -> String {
    entity_url(base, EntityKind::Team, id)
}

pub fn scorecard_url(base: &BaseUrl, id: &str) -> String {
    entity_url(base, EntityKind::Scorecard, id)
}

/// Admin deep link for a catalog entity.
///
/// `team` and its UI alias `group` both land on the teams page; every other
/// type keeps its lowercase name as path segment and is pluralized with `s`
/// for the catalog page slug:
///
/// - `service` -> `/admin/service/{id}?catalogPageSlug=services`
/// - `group` -> `/admin/teams/{id}?catalogPageSlug=teams`
pub fn admin_url(base: &BaseUrl, entity_type: &str, id: &str) -> String {
    let normalized = entity_type.to_lowercase();
    let (segment, plural) = match normalized.as_str() {
        "team" | "group" => ("teams".to_string(), "teams".to_string()),
        _ => (normalized.clone(), format!("{}s", normalized)),
    };
    join(
        base.as_str(),
        &format!("/admin/{}/{}?catalogPageSlug={}", segment, id, plural),
    )
}

pub fn admin_teams_url(base: &BaseUrl, id: &str) -> String {
    admin_url(base, "team", id)
}

/// Fallback target when a reference cannot be resolved.
pub fn admin_landing_url(base: &BaseUrl) -> String {
    join(base.as_str(), "/admin")
}

// REST endpoints

pub fn health_url(base: &BaseUrl) -> String {
    join(base.as_str(), "/api/version")
}

pub fn catalog_definitions_url(api_base: &ApiBase) -> String {
    join(api_base.as_str(), "/api/v1/catalog/definitions")
}

pub fn catalog_entity_url(api_base: &ApiBase, tag: &str) -> String {
    join(api_base.as_str(), &format!("/api/v1/catalog/{}", tag))
}

pub fn team_lookup_url(api_base: &ApiBase, tag_or_id: &str) -> String {
    join(api_base.as_str(), &format!("/api/v1/teams/{}", tag_or_id))
}

pub fn service_lookup_url(api_base: &ApiBase, id: &str) -> String {
    join(api_base.as_str(), &format!("/api/services/{}", id))
}
