/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 경매 마감
// region:    --- Imports
use crate::auction::forms::{AmountInput, BidForm};
use crate::auction::model::{Bid, Listing};
use crate::error::AppError;
use crate::store::AuctionStore;
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: AmountInput,
}

/// 경매 마감 명령
#[derive(Debug, Clone, Copy)]
pub struct CloseListingCommand {
    pub listing_id: i64,
    pub user_id: i64,
}

/// 1. 입찰
/// 금액 형식 검증 후 저장소에서 입찰 규칙을 적용한다
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    store: &dyn AuctionStore,
) -> Result<Bid, AppError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    let amount = BidForm { amount: cmd.amount }.validate()?;

    match store.place_bid(cmd.listing_id, cmd.bidder_id, amount).await {
        Ok(bid) => {
            info!(
                "{:<12} --> 입찰 성공: listing={}, amount={}",
                "Command", bid.listing_id, bid.amount
            );
            Ok(bid)
        }
        Err(e) => {
            warn!("{:<12} --> 입찰 실패: {}", "Command", e);
            Err(e)
        }
    }
}

/// 2. 경매 마감
/// 소유자만 마감할 수 있고, 이미 마감된 상품은 그대로 반환한다
pub async fn handle_close_listing(
    cmd: CloseListingCommand,
    store: &dyn AuctionStore,
) -> Result<Listing, AppError> {
    info!("{:<12} --> 경매 마감 요청 처리 시작: {:?}", "Command", cmd);

    let listing = store
        .get_listing(cmd.listing_id)
        .await?
        .ok_or_else(|| AppError::not_found("Listing"))?;

    if listing.owner_id != cmd.user_id {
        return Err(AppError::Forbidden(
            "Only the listing owner can close it".to_string(),
        ));
    }
    if !listing.active {
        return Ok(listing);
    }

    store
        .deactivate_listing(cmd.listing_id)
        .await?
        .ok_or_else(|| AppError::not_found("Listing"))
}
// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::NewListing;
    use crate::store::InMemoryStore;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn setup(starting_price: &str) -> (InMemoryStore, Listing, i64) {
        let store = InMemoryStore::new();
        let owner = store.create_user("owner", "", "hash").await.unwrap();
        let bidder = store.create_user("bidder", "", "hash").await.unwrap();
        let listing = store
            .create_listing(NewListing {
                title: "Lamp".to_string(),
                description: "Brass desk lamp".to_string(),
                image_url: None,
                category_id: None,
                starting_price: d(starting_price),
                owner_id: owner.id,
                active: true,
            })
            .await
            .unwrap();
        (store, listing, bidder.id)
    }

    fn bid(listing: &Listing, bidder_id: i64, amount: &str) -> PlaceBidCommand {
        PlaceBidCommand {
            listing_id: listing.id,
            bidder_id,
            amount: AmountInput::from(amount),
        }
    }

    #[tokio::test]
    async fn first_bid_must_reach_starting_price() {
        let (store, listing, bidder) = setup("10").await;

        let err = handle_place_bid(bid(&listing, bidder, "9.99"), &store).await.unwrap_err();
        assert!(matches!(err, AppError::BidTooLow(_)));

        let accepted = handle_place_bid(bid(&listing, bidder, "10"), &store).await.unwrap();
        assert_eq!(accepted.amount, d("10"));
        assert_eq!(accepted.bidder_id, bidder);
    }

    #[tokio::test]
    async fn tie_with_highest_bid_is_rejected() {
        let (store, listing, bidder) = setup("10").await;
        handle_place_bid(bid(&listing, bidder, "15"), &store).await.unwrap();

        let err = handle_place_bid(bid(&listing, bidder, "15"), &store).await.unwrap_err();
        assert!(matches!(err, AppError::BidTooLow(_)));
        handle_place_bid(bid(&listing, bidder, "15.01"), &store).await.unwrap();
    }

    #[tokio::test]
    async fn zero_bid_on_free_listing_is_rejected() {
        let (store, listing, bidder) = setup("0").await;
        let err = handle_place_bid(bid(&listing, bidder, "0"), &store).await.unwrap_err();
        assert!(matches!(err, AppError::BidTooLow(_)));
    }

    #[tokio::test]
    async fn rejected_bids_leave_history_untouched() {
        let (store, listing, bidder) = setup("10").await;
        handle_place_bid(bid(&listing, bidder, "12"), &store).await.unwrap();
        let bid_ids = |bids: Vec<Bid>| bids.iter().map(|b| b.id).collect::<Vec<i64>>();
        let before = bid_ids(store.list_bids(listing.id).await.unwrap());

        for amount in ["11", "12", "abc", "-5", "12.001"] {
            assert!(handle_place_bid(bid(&listing, bidder, amount), &store).await.is_err());
        }

        let after = bid_ids(store.list_bids(listing.id).await.unwrap());
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn malformed_amount_is_an_invalid_form() {
        let (store, listing, bidder) = setup("10").await;
        let err = handle_place_bid(bid(&listing, bidder, "ten"), &store).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidForm(_)));
    }

    #[tokio::test]
    async fn unknown_listing_is_not_found() {
        let (store, _, bidder) = setup("10").await;
        let cmd = PlaceBidCommand {
            listing_id: 9999,
            bidder_id: bidder,
            amount: AmountInput::from("10"),
        };
        assert!(matches!(handle_place_bid(cmd, &store).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn only_owner_closes_and_closed_listing_rejects_bids() {
        let (store, listing, bidder) = setup("10").await;

        let err = handle_close_listing(
            CloseListingCommand { listing_id: listing.id, user_id: bidder },
            &store,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let close = CloseListingCommand { listing_id: listing.id, user_id: listing.owner_id };
        let closed = handle_close_listing(close, &store).await.unwrap();
        assert!(!closed.active);

        // 다시 마감해도 비활성 상태 유지
        let closed_again = handle_close_listing(close, &store).await.unwrap();
        assert!(!closed_again.active);

        let err = handle_place_bid(bid(&listing, bidder, "100"), &store).await.unwrap_err();
        assert!(matches!(err, AppError::ListingClosed));
    }

    #[tokio::test]
    async fn concurrent_bids_stay_strictly_increasing() {
        let (store, listing, bidder) = setup("10").await;
        let store: Arc<dyn AuctionStore> = Arc::new(store);

        let mut handles = vec![];
        for i in 1..=50 {
            let store = Arc::clone(&store);
            let cmd = PlaceBidCommand {
                listing_id: listing.id,
                bidder_id: bidder,
                amount: AmountInput::from(format!("{}", 10 + (i * 7) % 50).as_str()),
            };
            handles.push(tokio::spawn(async move {
                handle_place_bid(cmd, store.as_ref()).await
            }));
        }
        for handle in handles {
            let _ = handle.await.unwrap();
        }

        let mut bids = store.list_bids(listing.id).await.unwrap();
        bids.sort_by_key(|b| b.id);
        assert!(!bids.is_empty());
        assert!(bids.windows(2).all(|w| w[0].amount < w[1].amount));
        assert!(bids.iter().all(|b| b.amount >= d("10")));
    }
}
