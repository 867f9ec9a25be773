use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No dataset {field}")]
    UnknownField { field: String },

    #[error("Unknown conversion '{conversion}'")]
    UnknownConversion { conversion: String },

    #[error("Conversion '{conversion}' cannot be applied to field '{field}' of type {found}")]
    ConversionType {
        conversion: String,
        field: String,
        found: String,
    },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unknown region '{0}'")]
    UnknownRegion(String),

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
