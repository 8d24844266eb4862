// region:    --- Imports
use crate::bidding::rule::BidRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

// endregion: --- Imports

// region:    --- App Error
/// 서비스 전역 에러
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidForm(String),

    #[error("{0}")]
    BidTooLow(#[from] BidRejection),

    #[error("Listing is closed")]
    ListingClosed,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 클라이언트에 전달되는 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidForm(_) => "INVALID_FORM",
            AppError::BidTooLow(_) => "LOW_BID",
            AppError::ListingClosed => "LISTING_CLOSED",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Config(_) => "CONFIG",
            AppError::Database(_) => "DATABASE",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidForm(_) | AppError::BidTooLow(_) | AppError::ListingClosed => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{:<12} --> 요청 처리 실패: {:?}", "Error", self);
        }

        let body = match &self {
            AppError::BidTooLow(rejection) => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "bid_amount": rejection.amount,
                "starting_price": rejection.starting_price,
                "max_bid": rejection.max_bid,
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
// endregion: --- App Error

// region:    --- Conversions
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidForm(rejection.body_text())
    }
}

impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        AppError::InvalidForm(rejection.body_text())
    }
}
// endregion: --- Conversions
