//! Domain error types.

/// Top-level error type for mizan.
#[derive(Debug, thiserror::Error)]
pub enum MizanError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("malformed data: {reason}")]
    MalformedData { reason: String },

    #[error("insufficient data for {subject}: have {bars} bars, need {minimum}")]
    InsufficientData {
        subject: String,
        bars: usize,
        minimum: usize,
    },

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

    #[error("invalid ticker list: {reason}")]
    TickerList { reason: String },

    #[error("narrative generation failed: {reason}")]
    Narrative { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MizanError {
    pub fn insufficient(subject: &str, bars: usize, minimum: usize) -> Self {
        MizanError::InsufficientData {
            subject: subject.to_string(),
            bars,
            minimum,
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        MizanError::MalformedData {
            reason: reason.into(),
        }
    }
}

impl From<&MizanError> for std::process::ExitCode {
    fn from(err: &MizanError) -> Self {
        let code: u8 = match err {
            MizanError::Io(_) | MizanError::Narrative { .. } => 1,
            MizanError::ConfigParse { .. }
            | MizanError::ConfigMissing { .. }
            | MizanError::ConfigInvalid { .. }
            | MizanError::TickerList { .. } => 2,
            MizanError::DataSource { .. } => 3,
            MizanError::MalformedData { .. } | MizanError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
