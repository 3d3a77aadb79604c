use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommentsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Resource not found (404): {url}")]
    NotFound { url: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid endpoint pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 遠端服務回應 404，例如論文沒有討論串
    NotFound,
    Transport,
    Parse,
    Config,
}

impl CommentsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CommentsError::NotFound { .. } => ErrorCategory::NotFound,
            CommentsError::Request(_) | CommentsError::HttpStatus { .. } | CommentsError::IoError(_) => {
                ErrorCategory::Transport
            }
            CommentsError::Serialization(_) | CommentsError::TomlError(_) => ErrorCategory::Parse,
            CommentsError::InvalidUrl(_)
            | CommentsError::Pattern(_)
            | CommentsError::InvalidConfigValueError { .. }
            | CommentsError::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

pub type Result<T> = std::result::Result<T, CommentsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_category() {
        let err = CommentsError::NotFound {
            url: "https://example.com/papers/latestversion/1234.5678".to_string(),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("404"));

        let err = CommentsError::HttpStatus {
            status: 500,
            url: "https://example.com".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_parse_category() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(CommentsError::from(err).category(), ErrorCategory::Parse);
    }
}
