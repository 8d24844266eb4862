/// 경매 사이트 저장소
/// 1. PostgreSQL 저장소 (운영)
/// 2. 메모리 저장소 (테스트 및 로컬 실행)
// region:    --- Imports
use crate::auction::model::{
    Bid, Category, Comment, Listing, NewListing, Session, User, WatchlistEntry,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Modules
pub mod in_memory;
pub mod postgres;
pub mod queries;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
// endregion: --- Modules

// region:    --- Store Trait
pub const USERNAME_TAKEN: &str = "Username already taken.";

/// 저장소 트레이트
#[async_trait]
pub trait AuctionStore: Send + Sync {
    // 사용자 / 세션
    /// 사용자 이름이 중복이면 `AppError::Conflict`
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError>;
    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, AppError>;
    async fn delete_session(&self, token: Uuid) -> Result<(), AppError>;
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    // 카테고리
    async fn create_category(&self, name: &str) -> Result<Category, AppError>;
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;
    async fn get_category(&self, category_id: i64) -> Result<Option<Category>, AppError>;

    // 상품
    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AppError>;
    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError>;
    async fn list_active_listings(&self) -> Result<Vec<Listing>, AppError>;
    async fn list_listings_in_category(&self, category_id: i64) -> Result<Vec<Listing>, AppError>;
    /// 마감 처리 후 상품 반환. 상품이 없으면 `None`
    async fn deactivate_listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError>;

    // 입찰
    /// 금액 내림차순
    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>, AppError>;
    /// 최고 입찰가 조회, 입찰 규칙 검사, 입찰 저장을 상품 단위로 직렬화해서 수행
    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> Result<Bid, AppError>;

    // 댓글
    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Comment, AppError>;
    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>, AppError>;

    // 관심 목록
    /// 이미 등록된 경우 `None`
    async fn add_to_watchlist(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> Result<Option<WatchlistEntry>, AppError>;
    /// 삭제된 항목이 있으면 `true`
    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError>;
    async fn list_watchlist(&self, user_id: i64) -> Result<Vec<Listing>, AppError>;
}
// endregion: --- Store Trait
