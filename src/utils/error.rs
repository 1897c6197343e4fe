use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToponymError {
    #[error("PDF file '{path}' not found")]
    PdfNotFound { path: String },

    #[error("PDF processing failed: {0}")]
    PdfError(#[from] lopdf::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Language '{code}' is not configured (available: {available})")]
    UnknownLanguage { code: String, available: String },

    #[error("Model '{model}' is not installed")]
    ModelNotInstalled { model: String },

    #[error("Failed to load model '{model}': {message}")]
    ModelLoadError { model: String, message: String },

    #[error("Model download failed for '{model}': {message}")]
    DownloadError { model: String, message: String },

    #[error("Entity recognition failed: {message}")]
    InferenceError { message: String },

    #[error("Setup incomplete: {message}")]
    SetupError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Model,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ToponymError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PdfNotFound { .. } | Self::PdfError(_) => ErrorCategory::Input,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::UnknownLanguage { .. } => ErrorCategory::Configuration,
            Self::ModelNotInstalled { .. }
            | Self::ModelLoadError { .. }
            | Self::DownloadError { .. }
            | Self::SetupError { .. } => ErrorCategory::Model,
            Self::InferenceError { .. }
            | Self::RegexError(_)
            | Self::CsvError(_)
            | Self::SerializationError(_) => ErrorCategory::Processing,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // a network hiccup is worth retrying
            Self::DownloadError { .. } => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::PdfNotFound { path } => format!("Error: PDF file '{}' not found.", path),
            Self::PdfError(e) => format!("Error processing PDF: {}", e),
            Self::UnknownLanguage { code, available } => format!(
                "Error: Language code '{}' is not configured.\n📋 Available language codes: {}",
                code, available
            ),
            Self::ModelNotInstalled { model } => {
                format!("Model '{}' is not installed locally.", model)
            }
            Self::SetupError { .. } => "Exiting due to incomplete setup.".to_string(),
            other => format!("Error: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Input => "Check that the path points to a readable PDF file".to_string(),
            ErrorCategory::Configuration => {
                "Review the command-line flags and the settings file".to_string()
            }
            ErrorCategory::Model => {
                "Run with --list-languages, then --install-language <code> for missing models"
                    .to_string()
            }
            ErrorCategory::Processing => "Re-run with --verbose for details".to_string(),
            ErrorCategory::System => {
                "Check file permissions and available disk space".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ToponymError>;
