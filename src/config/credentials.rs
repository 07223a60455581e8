use crate::domain::ports::CredentialSource;
use crate::utils::error::redact;
use std::env;
use std::fmt;

pub const DEFAULT_TOKEN_VAR: &str = "CORTEX_TOKEN";

fn non_blank(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}

/// Reads the access token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    variable: String,
}

impl EnvCredentials {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_VAR)
    }
}

impl CredentialSource for EnvCredentials {
    fn token(&self) -> Option<String> {
        non_blank(env::var(&self.variable).ok())
    }
}

/// In-memory token, e.g. taken from the configuration file.
#[derive(Clone, Default)]
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: non_blank(token),
        }
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("token", &redact(self.token.as_deref()))
            .finish()
    }
}

impl CredentialSource for StaticCredentials {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}
