use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("{what} out of range: {value} (expected {expected})")]
    OutOfRangeError {
        what: String,
        value: String,
        expected: String,
    },

    #[error("Division by zero while computing {context}")]
    DivisionByZeroError { context: String },

    #[error("Missing known corner '{role}' required for {mode} restoration")]
    MissingCornerError { role: String, mode: String },

    #[error("Invalid input for {field}: '{value}' ({reason})")]
    InvalidInputError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Addressing,
    Computation,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SurveyError {
    pub fn out_of_range(what: &str, value: impl ToString, expected: &str) -> Self {
        SurveyError::OutOfRangeError {
            what: what.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn invalid_input(field: &str, value: impl ToString, reason: &str) -> Self {
        SurveyError::InvalidInputError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn division_by_zero(context: impl Into<String>) -> Self {
        SurveyError::DivisionByZeroError {
            context: context.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SurveyError::OutOfRangeError { .. } => ErrorCategory::Addressing,
            SurveyError::DivisionByZeroError { .. } | SurveyError::MissingCornerError { .. } => {
                ErrorCategory::Computation
            }
            SurveyError::InvalidInputError { .. } => ErrorCategory::Input,
            SurveyError::ConfigError { .. } => ErrorCategory::Configuration,
            SurveyError::IoError(_)
            | SurveyError::CsvError(_)
            | SurveyError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Addressing | ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Computation | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SurveyError::OutOfRangeError { what, value, .. } => {
                format!("{} {} does not exist in a 6x6 township", what, value)
            }
            SurveyError::DivisionByZeroError { context } => {
                format!("Cannot proportion {}: the total distance is zero", context)
            }
            SurveyError::MissingCornerError { role, .. } => {
                format!("Known corner {} has not been provided", role)
            }
            SurveyError::InvalidInputError { field, value, .. } => {
                format!("The value '{}' entered for {} is not usable", value, field)
            }
            SurveyError::ConfigError { message } => {
                format!("The session file could not be used: {}", message)
            }
            other => format!("System error: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SurveyError::OutOfRangeError { .. } => {
                "Use section numbers 1-36 and grid rows/columns 0-5"
            }
            SurveyError::DivisionByZeroError { .. } => {
                "Check that record and measured distances are non-zero"
            }
            SurveyError::MissingCornerError { .. } => {
                "Provide all known corners required by the selected restoration mode"
            }
            SurveyError::InvalidInputError { .. } => {
                "Enter distances as feet (e.g. 2640) or chains (e.g. 40 ch)"
            }
            SurveyError::ConfigError { .. } => "Check the TOML session file for typos",
            SurveyError::IoError(_) => "Check that the file exists and is readable",
            SurveyError::CsvError(_) => "Check the CSV header and column count",
            SurveyError::SerializationError(_) => "Report this issue with the input used",
        }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;
