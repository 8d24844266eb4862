// region:    --- Imports
use super::{queries, AuctionStore, USERNAME_TAKEN};
use crate::auction::model::{
    Bid, Category, Comment, Listing, NewListing, Session, User, WatchlistEntry,
};
use crate::bidding::rule;
use crate::database::DatabaseManager;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Postgres Store
/// PostgreSQL 저장소 구현체
pub struct PostgresStore {
    db: Arc<DatabaseManager>,
}

impl PostgresStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuctionStore for PostgresStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        info!("{:<12} --> 사용자 생성: {}", "Store", username);
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    warn!("{:<12} --> 사용자 이름 중복: {}", "Store", username);
                    AppError::Conflict(USERNAME_TAKEN.to_string())
                }
                other => AppError::Database(other),
            })
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        Ok(sqlx::query_as::<_, Session>(queries::INSERT_SESSION)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(Utc::now())
            .bind(expires_at)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, AppError> {
        Ok(sqlx::query_as::<_, Session>(queries::GET_SESSION)
            .bind(token)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn delete_session(&self, token: Uuid) -> Result<(), AppError> {
        sqlx::query(queries::DELETE_SESSION)
            .bind(token)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(queries::DELETE_EXPIRED_SESSIONS)
            .bind(now)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn create_category(&self, name: &str) -> Result<Category, AppError> {
        Ok(sqlx::query_as::<_, Category>(queries::INSERT_CATEGORY)
            .bind(name)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_ALL_CATEGORIES)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_CATEGORY_BY_NAME)
            .bind(name)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn get_category(&self, category_id: i64) -> Result<Option<Category>, AppError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_CATEGORY)
            .bind(category_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AppError> {
        Ok(sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.image_url)
            .bind(listing.category_id)
            .bind(listing.starting_price)
            .bind(listing.owner_id)
            .bind(listing.active)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn list_active_listings(&self) -> Result<Vec<Listing>, AppError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_ACTIVE_LISTINGS)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn list_listings_in_category(&self, category_id: i64) -> Result<Vec<Listing>, AppError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_LISTINGS_IN_CATEGORY)
            .bind(category_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn deactivate_listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError> {
        Ok(sqlx::query_as::<_, Listing>(queries::DEACTIVATE_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>, AppError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> Result<Bid, AppError> {
        // 상품 행을 잠근 상태에서 조회-비교-저장
        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    let listing = sqlx::query_as::<_, Listing>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| AppError::not_found("Listing"))?;

                    if !listing.active {
                        return Err(AppError::ListingClosed);
                    }

                    let max_bid = sqlx::query_scalar::<_, Option<Decimal>>(queries::GET_MAX_BID)
                        .bind(listing_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    rule::evaluate_bid(listing.starting_price, max_bid, amount)?;

                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(listing_id)
                        .bind(bidder_id)
                        .bind(amount)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok::<Bid, AppError>(bid)
                })
            })
            .await
    }

    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Comment, AppError> {
        Ok(sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(listing_id)
            .bind(author_id)
            .bind(text)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>, AppError> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn add_to_watchlist(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> Result<Option<WatchlistEntry>, AppError> {
        Ok(sqlx::query_as::<_, WatchlistEntry>(queries::INSERT_WATCHLIST_ENTRY)
            .bind(user_id)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(queries::DELETE_WATCHLIST_ENTRY)
            .bind(user_id)
            .bind(listing_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_watchlist(&self, user_id: i64) -> Result<Vec<Listing>, AppError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_WATCHLIST)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?)
    }
}
// endregion: --- Postgres Store
