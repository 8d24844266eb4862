/// 메모리 저장소
/// 모든 상태를 하나의 뮤텍스로 보호하므로 입찰의 조회-비교-저장이 직렬화된다.
// region:    --- Imports
use super::{AuctionStore, USERNAME_TAKEN};
use crate::auction::model::{
    Bid, Category, Comment, Listing, NewListing, Session, User, WatchlistEntry,
};
use crate::bidding::rule;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- In-Memory State
#[derive(Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    sessions: BTreeMap<Uuid, Session>,
    categories: BTreeMap<i64, Category>,
    listings: BTreeMap<i64, Listing>,
    bids: BTreeMap<i64, Bid>,
    comments: BTreeMap<i64, Comment>,
    watchlist: BTreeMap<i64, WatchlistEntry>,
    last_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn bids_for(&self, listing_id: i64) -> impl Iterator<Item = &Bid> {
        self.bids.values().filter(move |b| b.listing_id == listing_id)
    }
}
// endregion: --- In-Memory State

// region:    --- In-Memory Store
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<dyn AuctionStore> {
        Arc::new(Self::new())
    }
}

/// 최신 등록 순
fn newest_first(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    listings
}

#[async_trait]
impl AuctionStore for InMemoryStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.username == username) {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }
        let user = User {
            id: state.next_id(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let mut state = self.state.lock().await;
        let session = Session {
            token: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            expires_at,
        };
        state.sessions.insert(session.token, session.clone());
        Ok(session)
    }

    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, AppError> {
        let state = self.state.lock().await;
        Ok(state.sessions.get(&token).cloned())
    }

    async fn delete_session(&self, token: Uuid) -> Result<(), AppError> {
        self.state.lock().await.sessions.remove(&token);
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - state.sessions.len()) as u64)
    }

    async fn create_category(&self, name: &str) -> Result<Category, AppError> {
        let mut state = self.state.lock().await;
        let category = Category {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        let state = self.state.lock().await;
        Ok(state.categories.values().find(|c| c.name == name).cloned())
    }

    async fn get_category(&self, category_id: i64) -> Result<Option<Category>, AppError> {
        Ok(self.state.lock().await.categories.get(&category_id).cloned())
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AppError> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&listing.owner_id) {
            return Err(AppError::not_found("User"));
        }
        let listing = Listing {
            id: state.next_id(),
            title: listing.title,
            description: listing.description,
            image_url: listing.image_url,
            category_id: listing.category_id,
            starting_price: listing.starting_price,
            owner_id: listing.owner_id,
            active: listing.active,
            created_at: Utc::now(),
        };
        state.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError> {
        Ok(self.state.lock().await.listings.get(&listing_id).cloned())
    }

    async fn list_active_listings(&self) -> Result<Vec<Listing>, AppError> {
        let state = self.state.lock().await;
        let listings = state.listings.values().filter(|l| l.active).cloned().collect();
        Ok(newest_first(listings))
    }

    async fn list_listings_in_category(&self, category_id: i64) -> Result<Vec<Listing>, AppError> {
        let state = self.state.lock().await;
        let listings = state
            .listings
            .values()
            .filter(|l| l.category_id == Some(category_id))
            .cloned()
            .collect();
        Ok(newest_first(listings))
    }

    async fn deactivate_listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.listings.get_mut(&listing_id).map(|listing| {
            listing.active = false;
            listing.clone()
        }))
    }

    async fn list_bids(&self, listing_id: i64) -> Result<Vec<Bid>, AppError> {
        let state = self.state.lock().await;
        let mut bids: Vec<Bid> = state.bids_for(listing_id).cloned().collect();
        bids.sort_by(|a, b| b.amount.cmp(&a.amount).then(b.id.cmp(&a.id)));
        Ok(bids)
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> Result<Bid, AppError> {
        let mut state = self.state.lock().await;
        let listing = state
            .listings
            .get(&listing_id)
            .ok_or_else(|| AppError::not_found("Listing"))?;
        if !listing.active {
            return Err(AppError::ListingClosed);
        }

        let max_bid = rule::max_bid(state.bids_for(listing_id).map(|b| b.amount));
        rule::evaluate_bid(listing.starting_price, max_bid, amount)?;

        let bid = Bid {
            id: state.next_id(),
            listing_id,
            bidder_id,
            amount,
            created_at: Utc::now(),
        };
        state.bids.insert(bid.id, bid.clone());
        Ok(bid)
    }

    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Comment, AppError> {
        let mut state = self.state.lock().await;
        if !state.listings.contains_key(&listing_id) {
            return Err(AppError::not_found("Listing"));
        }
        let comment = Comment {
            id: state.next_id(),
            listing_id,
            author_id,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, listing_id: i64) -> Result<Vec<Comment>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .values()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn add_to_watchlist(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> Result<Option<WatchlistEntry>, AppError> {
        let mut state = self.state.lock().await;
        if state
            .watchlist
            .values()
            .any(|w| w.user_id == user_id && w.listing_id == listing_id)
        {
            return Ok(None);
        }
        let entry = WatchlistEntry {
            id: state.next_id(),
            user_id,
            listing_id,
        };
        state.watchlist.insert(entry.id, entry.clone());
        Ok(Some(entry))
    }

    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        let before = state.watchlist.len();
        state
            .watchlist
            .retain(|_, w| !(w.user_id == user_id && w.listing_id == listing_id));
        Ok(state.watchlist.len() < before)
    }

    async fn list_watchlist(&self, user_id: i64) -> Result<Vec<Listing>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .watchlist
            .values()
            .filter(|w| w.user_id == user_id)
            .filter_map(|w| state.listings.get(&w.listing_id).cloned())
            .collect())
    }
}
// endregion: --- In-Memory Store
