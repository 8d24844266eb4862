// region:    --- Imports
use crate::accounts::{self, CurrentUser};
use crate::app::AppState;
use crate::auction::forms::{
    BidForm, CategoryForm, CommentForm, ListingForm, LoginForm, RegisterForm, WatchlistAction,
    WatchlistForm, INVALID_BID_FORM,
};
use crate::auction::model::{ListingDetail, NewListing, Session, User};
use crate::bidding::commands::{
    handle_close_listing as command_close_listing, handle_place_bid as command_place_bid,
    CloseListingCommand, PlaceBidCommand,
};
use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

// endregion: --- Imports

fn session_body(user: &User, session: &Session) -> serde_json::Value {
    serde_json::json!({
        "token": session.token,
        "expires_at": session.expires_at,
        "user": user,
    })
}

// region:    --- Account Handlers

/// 회원 가입
pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterForm>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(form) = payload?;
    let (user, session) =
        accounts::register(state.store.as_ref(), form, state.session_ttl()?).await?;
    Ok((StatusCode::CREATED, Json(session_body(&user, &session))))
}

/// 로그인
pub async fn handle_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginForm>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(form) = payload?;
    let (user, session) =
        accounts::login(state.store.as_ref(), form, state.session_ttl()?).await?;
    Ok(Json(session_body(&user, &session)))
}

/// 로그아웃
pub async fn handle_logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    accounts::logout(state.store.as_ref(), current.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Account Handlers

// region:    --- Command Handlers

/// 상품 등록
pub async fn handle_create_listing(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<ListingForm>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(form) = payload?;
    let form = form.validate()?;
    info!("{:<12} --> 상품 등록 요청: {}", "Command", form.title);

    let category_id = match &form.category {
        Some(name) => Some(
            state
                .store
                .find_category_by_name(name)
                .await?
                .ok_or_else(|| AppError::InvalidForm(format!("Unknown category: {}", name)))?
                .id,
        ),
        None => None,
    };

    let listing = state
        .store
        .create_listing(NewListing {
            title: form.title,
            description: form.description,
            image_url: form.image_url,
            category_id,
            starting_price: form.starting_price,
            owner_id: current.user_id,
            active: form.active,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(listing)))
}

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BidForm>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(listing_id) = path?;
    let Json(form) = payload.map_err(|_| AppError::InvalidForm(INVALID_BID_FORM.to_string()))?;

    let cmd = PlaceBidCommand {
        listing_id,
        bidder_id: current.user_id,
        amount: form.amount,
    };
    let bid = command_place_bid(cmd, state.store.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Bid placed",
            "bid": bid,
        })),
    ))
}

/// 경매 마감
pub async fn handle_close_listing(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(listing_id) = path?;
    let cmd = CloseListingCommand {
        listing_id,
        user_id: current.user_id,
    };
    let listing = command_close_listing(cmd, state.store.as_ref()).await?;
    Ok(Json(listing))
}

/// 댓글 작성
pub async fn handle_add_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CommentForm>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(listing_id) = path?;
    let Json(form) = payload?;
    let text = form.validate()?;
    info!("{:<12} --> 댓글 작성 listing: {}", "Command", listing_id);

    if state.store.get_listing(listing_id).await?.is_none() {
        return Err(AppError::not_found("Listing"));
    }
    let comment = state
        .store
        .add_comment(listing_id, current.user_id, &text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// 카테고리 생성
pub async fn handle_create_category(
    State(state): State<AppState>,
    _current: CurrentUser,
    payload: Result<Json<CategoryForm>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(form) = payload?;
    let name = form.validate()?;
    info!("{:<12} --> 카테고리 생성: {}", "Command", name);

    if state.store.find_category_by_name(&name).await?.is_some() {
        return Err(AppError::Conflict(format!("Category already exists: {}", name)));
    }
    let category = state.store.create_category(&name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// 관심 목록 추가 / 삭제
pub async fn handle_update_watchlist(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<WatchlistForm>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(form) = payload?;
    let action = form.action()?;
    info!("{:<12} --> 관심 목록 변경: {:?}", "Command", action);

    if state.store.get_listing(form.listing).await?.is_none() {
        return Err(AppError::not_found("Listing"));
    }

    let changed = match action {
        WatchlistAction::Add(listing_id) => state
            .store
            .add_to_watchlist(current.user_id, listing_id)
            .await?
            .is_some(),
        WatchlistAction::Remove(listing_id) => {
            state
                .store
                .remove_from_watchlist(current.user_id, listing_id)
                .await?
        }
    };

    let watchlist = state.store.list_watchlist(current.user_id).await?;
    Ok(Json(serde_json::json!({
        "changed": changed,
        "watchlist": watchlist,
    })))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 진행 중인 상품 조회
pub async fn handle_get_active_listings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 진행 중인 상품 조회", "HandlerQuery");
    Ok(Json(state.store.list_active_listings().await?))
}

/// 상품 상세 조회
pub async fn handle_get_listing(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(listing_id) = path?;
    info!("{:<12} --> 상품 조회 id: {}", "HandlerQuery", listing_id);
    let listing = state
        .store
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| AppError::not_found("Listing"))?;

    let category = match listing.category_id {
        Some(category_id) => state.store.get_category(category_id).await?,
        None => None,
    };
    let bids = state.store.list_bids(listing_id).await?;
    let max_bid = bids.first().map(|b| b.amount);
    let comments = state.store.list_comments(listing_id).await?;

    Ok(Json(ListingDetail {
        listing,
        category,
        bids,
        max_bid,
        comments,
    }))
}

/// 모든 카테고리 조회
pub async fn handle_get_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 카테고리 조회", "HandlerQuery");
    Ok(Json(state.store.list_categories().await?))
}

/// 카테고리별 상품 조회
pub async fn handle_get_category_listings(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(name) = path?;
    info!("{:<12} --> 카테고리별 상품 조회: {}", "HandlerQuery", name);
    let category = state
        .store
        .find_category_by_name(&name)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;
    Ok(Json(state.store.list_listings_in_category(category.id).await?))
}

/// 관심 목록 조회
pub async fn handle_get_watchlist(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 관심 목록 조회 user: {}", "HandlerQuery", current.user_id);
    Ok(Json(state.store.list_watchlist(current.user_id).await?))
}

// endregion: --- Query Handlers
