use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrailError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unexpected HTTP status {status} from {endpoint}")]
    StatusError { endpoint: String, status: u16 },

    #[error("Narration service returned an empty audio payload for '{site}'")]
    EmptyAudioError { site: String },

    #[error("Audio playback failed: {message}")]
    PlaybackError { message: String },

    #[error("Site {id} is not in the loaded catalog")]
    UnknownSite { id: u64 },

    #[error("Narration for site {id} is already in progress")]
    AlreadyNarrating { id: u64 },

    #[error("Wallet connection rejected: {message}")]
    WalletRejected { message: String },

    #[error("Transaction failed: {message}")]
    TransactionError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Playback,
    Wallet,
    Transaction,
    Validation,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrailError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrailError::HttpError(_)
            | TrailError::StatusError { .. }
            | TrailError::EmptyAudioError { .. } => ErrorCategory::Network,
            TrailError::IoError(_) => ErrorCategory::Io,
            TrailError::SerializationError(_) => ErrorCategory::Network,
            TrailError::PlaybackError { .. } => ErrorCategory::Playback,
            TrailError::UnknownSite { .. }
            | TrailError::AlreadyNarrating { .. }
            | TrailError::InvalidValueError { .. }
            | TrailError::MissingFieldError { .. } => ErrorCategory::Validation,
            TrailError::WalletRejected { .. } => ErrorCategory::Wallet,
            TrailError::TransactionError { .. } => ErrorCategory::Transaction,
            TrailError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        if let TrailError::AlreadyNarrating { .. } = self {
            return ErrorSeverity::Low;
        }
        match self.category() {
            ErrorCategory::Validation
            | ErrorCategory::Network
            | ErrorCategory::Playback
            | ErrorCategory::Wallet
            | ErrorCategory::Transaction => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Playback => {
                "The city is quiet right now... check if the narration service is running!"
                    .to_string()
            }
            ErrorCategory::Wallet => "Wallet connection was rejected.".to_string(),
            ErrorCategory::Transaction => {
                "Transaction failed or rejected. Please try again.".to_string()
            }
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Validation => self.to_string(),
            ErrorCategory::Io => format!("File system error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the endpoint is reachable and try again",
            ErrorCategory::Playback => "Check the [audio] player command in the configuration",
            ErrorCategory::Wallet => "Approve the connection request in your wallet and retry",
            ErrorCategory::Transaction => "Your form was kept, submit it again once ready",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Validation => "Check the value and try again; `sites` lists valid ids",
            ErrorCategory::Io => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, TrailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        let err = TrailError::StatusError {
            endpoint: "http://localhost/narrate".to_string(),
            status: 503,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);

        let err = TrailError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: "expected a table".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_narration_failures_share_notice_text() {
        let status = TrailError::StatusError {
            endpoint: "x".to_string(),
            status: 500,
        };
        let playback = TrailError::PlaybackError {
            message: "no player".to_string(),
        };
        assert_eq!(
            status.user_friendly_message(),
            playback.user_friendly_message()
        );
    }
}
