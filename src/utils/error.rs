use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommissionError {
    #[error("Rates sum to {sum}, which deviates from 1.0 by more than {tolerance}")]
    InvalidConfiguration { sum: f64, tolerance: f64 },

    #[error("Rate '{field}' must be a finite fraction between 0 and 1, got {value}")]
    InvalidRate { field: String, value: f64 },

    #[error("Amount must be a finite, non-negative number, got {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Unknown tier preset: {name}")]
    UnknownPreset { name: String },

    #[error("No commission configuration stored for salon '{salon_id}'")]
    ConfigurationNotFound { salon_id: String },

    #[error("Version conflict for salon '{salon_id}': expected {expected}, found {actual}")]
    VersionConflict {
        salon_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Commission,
    Store,
    Configuration,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CommissionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfiguration { .. }
            | Self::InvalidRate { .. }
            | Self::InvalidAmount { .. }
            | Self::UnknownPreset { .. } => ErrorCategory::Commission,
            Self::ConfigurationNotFound { .. } | Self::VersionConflict { .. } => {
                ErrorCategory::Store
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::Io,
            Self::CsvError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Data
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 重新讀取後可重試
            Self::VersionConflict { .. } => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidConfiguration { .. } => {
                "Adjust the three rates so they add up to 100%, or apply a tier preset".to_string()
            }
            Self::InvalidRate { field, .. } => {
                format!("Set '{}' to a percentage between 0 and 100", field)
            }
            Self::InvalidAmount { .. } => "Enter a booking amount of zero or more".to_string(),
            Self::UnknownPreset { .. } => "Use one of: basic, premium, elite".to_string(),
            Self::ConfigurationNotFound { .. } => {
                "Create one with `set` or `apply-preset` first".to_string()
            }
            Self::VersionConflict { actual, .. } => format!(
                "Someone else updated this configuration; reload it and retry with --expected-version {}",
                actual
            ),
            Self::IoError(_) => "Check that the path exists and is writable".to_string(),
            Self::CsvError(_) => {
                "Check that the bookings file has a 'booking_id,amount' header".to_string()
            }
            Self::SerializationError(_) => {
                "The stored file may be corrupted; re-save the configuration without an expected version".to_string()
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the configuration file and command line arguments".to_string()
            }
            Self::ProcessingError { .. } => {
                "Fix the offending rows or enable settlement.skip_invalid_rows".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Commission => format!("Commission rules rejected the input: {}", self),
            ErrorCategory::Store => format!("Configuration store: {}", self),
            ErrorCategory::Configuration => format!("Invalid settings: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Data => format!("Could not process data: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CommissionError>;
