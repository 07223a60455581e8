use thiserror::Error;

#[derive(Error, Debug)]
pub enum CortexError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Unauthorized (token invalid or missing)")]
    Unauthorized,

    #[error("Endpoint not found at {url}")]
    NotFound { url: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Response is missing field `{field}`")]
    MalformedResponse { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration parse error in {field}: {message}")]
    ConfigParse { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

pub type Result<T> = std::result::Result<T, CortexError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Remote,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CortexError {
    /// 由 HTTP 狀態碼建立對應的錯誤
    pub fn from_status(status: u16, url: &str) -> Self {
        match status {
            401 => CortexError::Unauthorized,
            404 => CortexError::NotFound {
                url: url.to_string(),
            },
            other => CortexError::UnexpectedStatus { status: other },
        }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        CortexError::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CortexError::InvalidConfiguration { .. }
            | CortexError::ConfigParse { .. }
            | CortexError::InvalidConfigValue { .. }
            | CortexError::MissingConfig { .. } => ErrorCategory::Configuration,
            CortexError::Unauthorized
            | CortexError::NotFound { .. }
            | CortexError::Transport(_)
            | CortexError::UnexpectedStatus { .. }
            | CortexError::MalformedResponse { .. } => ErrorCategory::Remote,
            CortexError::Yaml(_) | CortexError::Serialization(_) => ErrorCategory::Input,
            CortexError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 遠端失敗只代表解析落空，不影響整體流程
            ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// True for every failure that the resolver turns into a fallback link or label.
    pub fn is_resolution_miss(&self) -> bool {
        self.category() == ErrorCategory::Remote
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CortexError::InvalidConfiguration { .. } | CortexError::MissingConfig { .. } => {
                format!("Cortex is not configured correctly: {}", self)
            }
            CortexError::Unauthorized => {
                "Cortex rejected the access token (HTTP 401)".to_string()
            }
            CortexError::Transport(_) => format!("Could not reach Cortex: {}", self),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CortexError::InvalidConfiguration { .. }
            | CortexError::InvalidConfigValue { .. }
            | CortexError::MissingConfig { .. }
            | CortexError::ConfigParse { .. } => {
                "Check base_url/api_url in the configuration file"
            }
            CortexError::Unauthorized => "Set a valid token in CORTEX_TOKEN or the config file",
            CortexError::NotFound { .. } => "Verify the base URL points at your Cortex workspace",
            CortexError::Transport(_) => "Check network connectivity and try again",
            CortexError::UnexpectedStatus { .. } | CortexError::MalformedResponse { .. } => {
                "Retry later; the Cortex API returned an unexpected response"
            }
            CortexError::Yaml(_) | CortexError::Serialization(_) => {
                "Fix the syntax of the input document"
            }
            CortexError::Io(_) => "Check that the file exists and is readable",
        }
    }
}

/// Renders a secret for diagnostics without revealing it.
pub fn redact(value: Option<&str>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "***",
        _ => "",
    }
}
