// src/error.rs
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum TubeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Upstream API returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    ParseError(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<rust_xlsxwriter::XlsxError> for TubeError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        TubeError::Export(err.to_string())
    }
}

impl TubeError {
    pub fn code_str(&self) -> &'static str {
        match self {
            TubeError::InvalidInput(_) => "invalid_input",
            TubeError::ResourceNotFound(_) => "not_found",
            TubeError::Upstream { .. } => "upstream_error",
            TubeError::HttpRequest(_) => "upstream_error",
            TubeError::ParseError(_) => "parse_error",
            TubeError::SerdeJson(_) => "parse_error",
            TubeError::Export(_) => "export_error",
            TubeError::Io(_) => "export_error",
            TubeError::Config(_) => "config_error",
        }
    }

    /// HTTP status a request boundary should answer with for this error.
    ///
    /// Invalid URLs are the caller's fault (400). A well-formed URL whose
    /// video has no metadata is unprocessable (422).
    pub fn status_hint(&self) -> u16 {
        match self {
            TubeError::InvalidInput(_) => 400,
            TubeError::ResourceNotFound(_) => 422,
            TubeError::Upstream { .. } | TubeError::HttpRequest(_) => 502,
            _ => 500,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "error": {
                "code": self.code_str(),
                "status": self.status_hint(),
                "message": self.to_string(),
            }
        })
    }
}

pub type Result<T> = std::result::Result<T, TubeError>;
