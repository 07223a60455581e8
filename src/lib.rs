pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::config::{CortexConfig, EnvCredentials, StaticCredentials};
pub use crate::core::{cache::EntityCache, client::CatalogClient, resolver::EntityResolver};
pub use utils::error::{CortexError, Result};
