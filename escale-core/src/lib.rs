pub mod admin;
pub mod de;
pub mod media;
pub mod repository;
pub mod tourisme;

pub use repository::{DataOrigin, Page, Sourced};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Upstream API error ({status}): {message}")]
    UpstreamError { status: u16, message: String },
    #[error("Upstream unreachable: {0}")]
    NetworkError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl CoreError {
    /// True for failures of the upstream API rather than of the caller's input.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(self, CoreError::UpstreamError { .. } | CoreError::NetworkError(_))
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .next()
                    .unwrap_or_else(|| "invalid".to_string());
                format!("{}: {}", field, detail)
            })
            .collect();
        fields.sort();
        CoreError::ValidationError(fields.join(", "))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
