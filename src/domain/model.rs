use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A validated absolute http(s) URL without a trailing slash.
///
/// Only [`crate::core::url::normalize`] creates one, so holding a `BaseUrl`
/// means the value already passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl {
    pub(crate) raw: String,
    pub(crate) scheme: String,
    pub(crate) host: String,
    pub(crate) port: Option<u16>,
}

impl BaseUrl {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Base URL of the Cortex REST API, either configured or derived from the UI base.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiBase(pub(crate) BaseUrl);

impl ApiBase {
    /// Uses an explicitly configured API URL as-is.
    pub fn explicit(base: BaseUrl) -> Self {
        ApiBase(base)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    ServiceId,
    CrossReferenceTag,
    OwnerReference,
    None,
}

impl ReferenceKind {
    pub fn is_reference(&self) -> bool {
        !matches!(self, ReferenceKind::None)
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::ServiceId => "service-id",
            ReferenceKind::CrossReferenceTag => "tag",
            ReferenceKind::OwnerReference => "owner",
            ReferenceKind::None => "none",
        };
        f.write_str(name)
    }
}

/// Entities with a fixed web UI route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Service,
    Team,
    Scorecard,
}

impl EntityKind {
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Service => "services",
            EntityKind::Team => "teams",
            EntityKind::Scorecard => "scorecards",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: String,
}

/// Outcome of a connectivity check, shown as-is by diagnostics screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub ok: bool,
    pub message: String,
    pub http_code: Option<u16>,
}

impl HealthReport {
    pub fn failed(message: impl Into<String>, http_code: Option<u16>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            http_code,
        }
    }
}

/// One step of the key path from the document root to a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }
}

/// A scalar inside a YAML document together with enough structure to classify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalarPosition {
    pub path: Vec<PathSegment>,
    pub value: String,
    /// Scalar key/value pairs of the mapping that directly contains this scalar.
    pub siblings: BTreeMap<String, String>,
}

impl ScalarPosition {
    pub fn new(path: Vec<PathSegment>, value: impl Into<String>) -> Self {
        Self {
            path,
            value: value.into(),
            siblings: BTreeMap::new(),
        }
    }

    pub fn with_sibling(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.siblings.insert(key.into(), value.into());
        self
    }

    /// Key of the scalar itself; `None` for bare list items.
    pub fn key(&self) -> Option<&str> {
        self.segment_from_end(0).and_then(PathSegment::as_key)
    }

    pub(crate) fn segment_from_end(&self, offset: usize) -> Option<&PathSegment> {
        self.path.len().checked_sub(offset + 1).map(|i| &self.path[i])
    }

    pub fn sibling(&self, key: &str) -> Option<&str> {
        self.siblings.get(key).map(String::as_str)
    }

    /// Dotted rendering such as `x-cortex-owners[0].name`.
    pub fn path_display(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(i) => out.push_str(&format!("[{}]", i)),
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind: ReferenceKind,
    pub value: String,
}

impl Classification {
    pub fn none(value: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::None,
            value: value.into(),
        }
    }
}

/// A classified scalar found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub value: String,
    pub position: ScalarPosition,
}

/// Everything needed to resolve one reference for navigation.
#[derive(Clone)]
pub struct ResolutionRequest {
    pub kind: ReferenceKind,
    pub value: String,
    pub base_url: BaseUrl,
    pub api_base: ApiBase,
    pub token: Option<String>,
}

impl fmt::Debug for ResolutionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionRequest")
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("base_url", &self.base_url.as_str())
            .field("api_base", &self.api_base.as_str())
            .field("token", &crate::utils::error::redact(self.token.as_deref()))
            .finish()
    }
}
