use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use escale_booking::reservation::ReservationError;
use escale_booking::service::BookingAdminError;
use escale_catalog::PricingError;
use escale_core::CoreError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    UpstreamError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::UpstreamError(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
            CoreError::NotFound(msg) => AppError::NotFoundError(msg),
            CoreError::UpstreamError { message, .. } => AppError::UpstreamError(message),
            CoreError::NetworkError(msg) => AppError::UpstreamError(format!("Service indisponible: {}", msg)),
            CoreError::InternalError(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::Validation(msg) => AppError::ValidationError(msg),
            // The booking endpoint's own wording reaches the visitor unchanged.
            ReservationError::Rejected(msg) => AppError::ConflictError(msg),
            ReservationError::Pricing(e) => e.into(),
            ReservationError::Core(e) => e.into(),
        }
    }
}

impl From<BookingAdminError> for AppError {
    fn from(err: BookingAdminError) -> Self {
        match err {
            BookingAdminError::Transition(e) => AppError::ConflictError(e.to_string()),
            BookingAdminError::Core(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        CoreError::from(err).into()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
