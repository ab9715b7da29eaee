//! Domain error types.

/// Top-level error type for stockscope.
#[derive(Debug, thiserror::Error)]
pub enum StockscopeError {
    #[error("no data for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("invalid price series for {ticker}: {reason}")]
    InvalidSeries { ticker: String, reason: String },

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

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StockscopeError {
    pub fn data_unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        StockscopeError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        StockscopeError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&StockscopeError> for std::process::ExitCode {
    fn from(err: &StockscopeError) -> Self {
        let code: u8 = match err {
            StockscopeError::Io(_) => 1,
            StockscopeError::ConfigParse { .. }
            | StockscopeError::ConfigMissing { .. }
            | StockscopeError::ConfigInvalid { .. } => 2,
            StockscopeError::DataUnavailable { .. } | StockscopeError::InvalidSeries { .. } => 3,
            StockscopeError::Render { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
