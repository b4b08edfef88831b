use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

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

    #[error("Tap on overlay {overlay}, item {item} does not address an installed venue")]
    TapOutOfRange { overlay: usize, item: usize },

    #[error("Map event channel closed")]
    ChannelClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Data,
    Contract,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MapError::IoError(_) => ErrorCategory::Io,
            MapError::SerializationError(_) => ErrorCategory::Data,
            MapError::TapOutOfRange { .. } => ErrorCategory::Contract,
            MapError::ChannelClosed => ErrorCategory::Runtime,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 地圖表面回報了無效的索引，略過此事件即可
            MapError::TapOutOfRange { .. } => ErrorSeverity::Low,
            MapError::ChannelClosed => ErrorSeverity::Medium,
            MapError::SerializationError(_)
            | MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. } => ErrorSeverity::High,
            MapError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MapError::IoError(_) => {
                "Check that the scenario and results files exist and are readable".to_string()
            }
            MapError::SerializationError(_) => {
                "Make sure the results file is a JSON array of category groups".to_string()
            }
            MapError::ConfigError { .. } | MapError::ConfigValidationError { .. } => {
                "Fix the scenario file; it must be valid TOML with a [[steps]] list".to_string()
            }
            MapError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the scenario file", field)
            }
            MapError::MissingConfigError { field } => {
                format!("Add '{}' to the scenario file", field)
            }
            MapError::TapOutOfRange { .. } => {
                "Only tap items of overlays that are currently installed".to_string()
            }
            MapError::ChannelClosed => {
                "Keep the map session alive until all events are handled".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Io => format!("Could not read input: {}", self),
            ErrorCategory::Data => format!("Could not parse search results: {}", self),
            ErrorCategory::Contract => format!("Ignored tap: {}", self),
            ErrorCategory::Runtime => format!("Map session stopped: {}", self),
        }
    }
}

impl From<toml::de::Error> for MapError {
    fn from(e: toml::de::Error) -> Self {
        MapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
