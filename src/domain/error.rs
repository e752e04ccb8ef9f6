//! Domain error types.

use chrono::NaiveDateTime;

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown strategy kind '{kind}'")]
    UnknownStrategy { kind: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no bars in {source_name}")]
    NoData { source_name: String },

    #[error("feed integrity violated: bar at {current} does not follow {previous}")]
    FeedIntegrity {
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigtraderError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SigtraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::Data { .. } | SigtraderError::NoData { .. } => 3,
            SigtraderError::UnknownStrategy { .. } => 4,
            SigtraderError::FeedIntegrity { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
