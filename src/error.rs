use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encode error: {0}")]
    Png(#[from] png::EncodingError),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Format {format} cannot represent {data}")]
    UnsupportedData {
        format: &'static str,
        data: &'static str,
    },
}
