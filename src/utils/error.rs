use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Leaderboard request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV rendering error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Leaderboard source {url} answered with HTTP {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("No leaderboard source could be read (tried: {attempted})")]
    SourceUnavailable { attempted: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Chart rendering error: {message}")]
    ChartError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code; low severity is reported but still succeeds.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl BoardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BoardError::ApiError(_)
            | BoardError::UpstreamStatus { .. }
            | BoardError::SourceUnavailable { .. } => ErrorCategory::Network,
            BoardError::ConfigError { .. }
            | BoardError::ConfigValidationError { .. }
            | BoardError::InvalidConfigValueError { .. }
            | BoardError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BoardError::SerializationError(_) => ErrorCategory::Data,
            BoardError::ZipError(_)
            | BoardError::CsvError(_)
            | BoardError::IoError(_)
            | BoardError::ChartError { .. } => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // A re-fetch usually fixes these.
            BoardError::ApiError(_)
            | BoardError::UpstreamStatus { .. }
            | BoardError::SourceUnavailable { .. } => ErrorSeverity::Medium,
            BoardError::ConfigError { .. }
            | BoardError::ConfigValidationError { .. }
            | BoardError::InvalidConfigValueError { .. }
            | BoardError::MissingConfigError { .. }
            | BoardError::SerializationError(_)
            | BoardError::ChartError { .. } => ErrorSeverity::High,
            BoardError::ZipError(_) | BoardError::CsvError(_) | BoardError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BoardError::ApiError(_) | BoardError::UpstreamStatus { .. } => {
                "Check the endpoint URL and session cookie, then run again"
            }
            BoardError::SourceUnavailable { .. } => {
                "Configure a fallback mirror or point --input-file at a saved leaderboard JSON"
            }
            BoardError::ConfigError { .. }
            | BoardError::ConfigValidationError { .. }
            | BoardError::InvalidConfigValueError { .. } => {
                "Fix the reported setting in the config file or command line"
            }
            BoardError::MissingConfigError { .. } => "Provide the missing setting",
            BoardError::SerializationError(_) => {
                "The leaderboard document is not valid JSON; re-fetch it"
            }
            BoardError::ChartError { .. } => "Run again with --verbose and report the log",
            BoardError::ZipError(_) | BoardError::CsvError(_) | BoardError::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not load the leaderboard: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Leaderboard data problem: {}", self),
            ErrorCategory::Output => format!("Could not write the results: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_retryable() {
        let err = BoardError::UpstreamStatus {
            url: "https://example.com/board.json".to_string(),
            status: 502,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("HTTP 502"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = BoardError::MissingConfigError {
            field: "source.endpoint".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.recovery_suggestion(), "Provide the missing setting");
        assert_eq!(err.severity().exit_code(), 1);
    }

    #[test]
    fn test_bad_document_and_chart_errors() {
        let err: BoardError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("Leaderboard data problem"));

        let err = BoardError::ChartError {
            message: "chart still live".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.recovery_suggestion(), "Run again with --verbose and report the log");
    }
}
