use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed record at line {line}: expected {expected} fields, found {found}")]
    MalformedRecord {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },
}

/// 錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Storage,
    Configuration,
    Processing,
    System,
}

/// 錯誤嚴重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl BatchError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CsvError(_) | Self::MalformedRecord { .. } => ErrorCategory::Input,
            Self::DatabaseError(_) | Self::StoreError { .. } => ErrorCategory::Storage,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::InvalidStateTransition { .. } => ErrorCategory::Processing,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MalformedRecord { line, expected, .. } => format!(
                "Fix line {} of the input file so it has exactly {} delimited fields",
                line, expected
            ),
            Self::CsvError(_) => "Check the input file encoding and delimiter setting".to_string(),
            Self::DatabaseError(_) | Self::StoreError { .. } => {
                "Check that the database file is writable and not locked by another process"
                    .to_string()
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the TOML configuration file and command-line overrides".to_string()
            }
            Self::IoError(_) => "Check that the input path exists and is readable".to_string(),
            Self::InvalidStateTransition { .. } => {
                "This is an internal error, please report it".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input file could not be read: {}", self),
            ErrorCategory::Storage => format!("Records could not be stored: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Job processing failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
