pub mod cache;
pub mod classifier;
pub mod client;
pub mod resolver;
pub mod url;

pub use crate::domain::model::{
    ApiBase, BaseUrl, CatalogEntity, Classification, HealthReport, Reference, ReferenceKind,
    ResolutionRequest, ScalarPosition, TeamRef,
};
pub use crate::domain::ports::{CatalogApi, ConfigProvider, CredentialSource};
pub use crate::utils::error::Result;
