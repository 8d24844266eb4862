// region:    --- Imports
use crate::app::AppState;
use crate::error::AppError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Current User
/// `Authorization: Bearer <token>` 헤더로 인증된 사용자
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: i64,
    pub token: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .and_then(|t| Uuid::parse_str(t.trim()).ok())
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization format".to_string()))?;

        let session = super::authenticate(state.store.as_ref(), token).await?;
        Ok(CurrentUser {
            user_id: session.user_id,
            token,
        })
    }
}
// endregion: --- Current User
