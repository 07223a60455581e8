#[cfg(feature = "cli")]
pub mod cli;
pub mod credentials;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, KindArg};
pub use credentials::{EnvCredentials, StaticCredentials};
pub use toml_config::CortexConfig;
