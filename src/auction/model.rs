use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 사용자 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// 카테고리 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

// 상품(리스팅) 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub starting_price: Decimal,
    pub owner_id: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

// 댓글 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// 관심 목록 항목
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchlistEntry {
    pub id: i64,
    pub user_id: i64,
    pub listing_id: i64,
}

// 로그인 세션
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub token: Uuid,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// 신규 상품 등록 데이터 (검증 완료)
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub starting_price: Decimal,
    pub owner_id: i64,
    pub active: bool,
}

/// 상품 상세 조회 결과
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail {
    pub listing: Listing,
    pub category: Option<Category>,
    /// 금액 내림차순
    pub bids: Vec<Bid>,
    pub max_bid: Option<Decimal>,
    pub comments: Vec<Comment>,
}
