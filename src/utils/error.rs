use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Failed to fetch boundary data from {url}: {message}")]
    FetchError { url: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid GeoJSON document: {message}")]
    InvalidGeoJson { message: String },

    #[error("CSV parse error: {0}")]
    ParseError(#[from] csv::Error),

    #[error("Uploaded table is missing required columns: {}", missing.join(", "))]
    SchemaError { missing: Vec<String> },

    #[error("Invalid boundary collection: {message}")]
    InvalidBoundary { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template rendering error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Render,
    Configuration,
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
            MapError::FetchError { .. } | MapError::Http(_) => ErrorCategory::Network,
            MapError::InvalidGeoJson { .. }
            | MapError::ParseError(_)
            | MapError::SchemaError { .. }
            | MapError::InvalidBoundary { .. }
            | MapError::SerializationError(_) => ErrorCategory::Data,
            MapError::IoError(_) => ErrorCategory::Storage,
            MapError::TemplateError(_) => ErrorCategory::Render,
            MapError::ConfigError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 上傳檔案錯誤只會影響標記圖層
            ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Storage | ErrorCategory::Render => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// Short message suitable for the warning banner or stderr.
    pub fn user_friendly_message(&self) -> String {
        match self {
            MapError::FetchError { url, .. } => {
                format!("Could not load district boundaries from {}", url)
            }
            MapError::Http(_) => "Could not reach the boundary data server".to_string(),
            MapError::InvalidGeoJson { .. } | MapError::InvalidBoundary { .. } => {
                "The boundary data is not a valid district GeoJSON collection".to_string()
            }
            MapError::ParseError(_) => "The uploaded file is not a valid CSV table".to_string(),
            MapError::SchemaError { missing } => format!(
                "The uploaded file is missing required columns: {}",
                missing.join(", ")
            ),
            MapError::IoError(e) => format!("File access failed: {}", e),
            MapError::SerializationError(_) => "Could not serialize map data".to_string(),
            MapError::TemplateError(_) => "Could not build the map page".to_string(),
            MapError::ConfigError { message } => format!("Invalid configuration: {}", message),
            MapError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            MapError::MissingConfigError { field } => {
                format!("Missing configuration value: {}", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MapError::FetchError { .. } | MapError::Http(_) => {
                "Check the network connection and the --boundary-url value, then try again"
            }
            MapError::InvalidGeoJson { .. } | MapError::InvalidBoundary { .. } => {
                "Point --boundary-url at a GeoJSON FeatureCollection of Polygon/MultiPolygon features"
            }
            MapError::ParseError(_) => "Save the table as comma-separated UTF-8 text",
            MapError::SchemaError { .. } => {
                "Add the columns District, Branch_Name, Sol ID, Block_Name, latitude, longitude"
            }
            MapError::IoError(_) => "Check that the path exists and is writable",
            MapError::SerializationError(_) | MapError::TemplateError(_) => {
                "Report this issue with the input files attached"
            }
            MapError::ConfigError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. } => "Fix the configuration and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
