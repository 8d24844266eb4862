// region:    --- Imports
use crate::config::Config;
use crate::error::AppError;
use crate::handlers;
use crate::store::AuctionStore;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// endregion: --- Imports

// region:    --- App State
/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AuctionStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn AuctionStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn session_ttl(&self) -> Result<chrono::Duration, AppError> {
        chrono::Duration::try_hours(self.config.session_expiry_hours).ok_or_else(|| {
            AppError::Config(format!(
                "SESSION_EXPIRY_HOURS out of range: {}",
                self.config.session_expiry_hours
            ))
        })
    }
}
// endregion: --- App State

// region:    --- Router
/// 라우터 설정
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/register", post(handlers::handle_register))
        .route("/login", post(handlers::handle_login))
        .route("/logout", post(handlers::handle_logout))
        .route(
            "/listings",
            get(handlers::handle_get_active_listings).post(handlers::handle_create_listing),
        )
        .route("/listings/:id", get(handlers::handle_get_listing))
        .route("/listings/:id/bids", post(handlers::handle_place_bid))
        .route("/listings/:id/close", post(handlers::handle_close_listing))
        .route("/listings/:id/comments", post(handlers::handle_add_comment))
        .route(
            "/categories",
            get(handlers::handle_get_categories).post(handlers::handle_create_category),
        )
        .route("/categories/:name", get(handlers::handle_get_category_listings))
        .route(
            "/watchlist",
            get(handlers::handle_get_watchlist).post(handlers::handle_update_watchlist),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 64))
        .with_state(state)
}
// endregion: --- Router
