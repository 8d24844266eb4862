/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash)
    VALUES ($1, $2, $3)
    RETURNING id, username, email, password_hash, created_at
"#;

/// 사용자 이름으로 조회
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1";

/// 세션 생성
pub const INSERT_SESSION: &str = r#"
    INSERT INTO sessions (token, user_id, created_at, expires_at)
    VALUES ($1, $2, $3, $4)
    RETURNING token, user_id, created_at, expires_at
"#;

/// 세션 조회
pub const GET_SESSION: &str =
    "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1";

/// 세션 삭제
pub const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = $1";

/// 만료 세션 삭제
pub const DELETE_EXPIRED_SESSIONS: &str = "DELETE FROM sessions WHERE expires_at <= $1";

/// 카테고리 생성
pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES ($1) RETURNING id, name";

/// 모든 카테고리 조회
pub const GET_ALL_CATEGORIES: &str = "SELECT id, name FROM categories ORDER BY name, id";

/// 이름으로 카테고리 조회
pub const GET_CATEGORY_BY_NAME: &str =
    "SELECT id, name FROM categories WHERE name = $1 ORDER BY id LIMIT 1";

/// 카테고리 조회
pub const GET_CATEGORY: &str = "SELECT id, name FROM categories WHERE id = $1";

/// 상품 생성
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (title, description, image_url, category_id, starting_price, owner_id, active)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id, title, description, image_url, category_id, starting_price, owner_id, active, created_at
"#;

/// 상품 조회
pub const GET_LISTING: &str =
    "SELECT id, title, description, image_url, category_id, starting_price, owner_id, active, created_at FROM listings WHERE id = $1";

/// 입찰 처리를 위한 상품 행 잠금 조회
pub const LOCK_LISTING: &str =
    "SELECT id, title, description, image_url, category_id, starting_price, owner_id, active, created_at FROM listings WHERE id = $1 FOR UPDATE";

/// 진행 중인 상품 조회
pub const GET_ACTIVE_LISTINGS: &str =
    "SELECT id, title, description, image_url, category_id, starting_price, owner_id, active, created_at FROM listings WHERE active ORDER BY created_at DESC, id DESC";

/// 카테고리별 상품 조회
pub const GET_LISTINGS_IN_CATEGORY: &str =
    "SELECT id, title, description, image_url, category_id, starting_price, owner_id, active, created_at FROM listings WHERE category_id = $1 ORDER BY created_at DESC, id DESC";

/// 상품 마감
pub const DEACTIVATE_LISTING: &str = r#"
    UPDATE listings SET active = FALSE
    WHERE id = $1
    RETURNING id, title, description, image_url, category_id, starting_price, owner_id, active, created_at
"#;

/// 최고 입찰가 조회
pub const GET_MAX_BID: &str = "SELECT MAX(amount) AS max_bid FROM bids WHERE listing_id = $1";

/// 입찰 저장
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, bidder_id, amount)
    VALUES ($1, $2, $3)
    RETURNING id, listing_id, bidder_id, amount, created_at
"#;

/// 상품 입찰 조회 (금액 내림차순)
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, listing_id, bidder_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY amount DESC, id DESC
"#;

/// 댓글 저장
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (listing_id, author_id, text)
    VALUES ($1, $2, $3)
    RETURNING id, listing_id, author_id, text, created_at
"#;

/// 상품 댓글 조회
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT id, listing_id, author_id, text, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at, id
"#;

/// 관심 목록 추가 (중복이면 아무것도 하지 않음)
pub const INSERT_WATCHLIST_ENTRY: &str = r#"
    INSERT INTO watchlist (user_id, listing_id)
    SELECT $1, $2
    WHERE NOT EXISTS (SELECT 1 FROM watchlist WHERE user_id = $1 AND listing_id = $2)
    RETURNING id, user_id, listing_id
"#;

/// 관심 목록 삭제
pub const DELETE_WATCHLIST_ENTRY: &str =
    "DELETE FROM watchlist WHERE user_id = $1 AND listing_id = $2";

/// 사용자 관심 목록 조회
pub const GET_WATCHLIST: &str = r#"
    SELECT l.id, l.title, l.description, l.image_url, l.category_id, l.starting_price, l.owner_id, l.active, l.created_at
    FROM watchlist w
    JOIN listings l ON l.id = w.listing_id
    WHERE w.user_id = $1
    ORDER BY w.id
"#;
