//! Domain error types.

/// Top-level error type for algocraft.
#[derive(Debug, thiserror::Error)]
pub enum AlgocraftError {
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

    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("report write error: {0}")]
    Report(#[from] csv::Error),
}

impl From<&AlgocraftError> for std::process::ExitCode {
    fn from(err: &AlgocraftError) -> Self {
        let code: u8 = match err {
            AlgocraftError::Io(_) | AlgocraftError::Report(_) => 1,
            AlgocraftError::ConfigParse { .. }
            | AlgocraftError::ConfigMissing { .. }
            | AlgocraftError::ConfigInvalid { .. } => 2,
            AlgocraftError::Configuration { .. } => 4,
            AlgocraftError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
