/// 입찰 수락 규칙
/// 입찰 금액은 시작가 이상이어야 하고, 기존 최고 입찰가보다 커야 한다.
/// 입찰이 없으면 최고 입찰가는 0으로 간주한다.
// region:    --- Imports
use rust_decimal::Decimal;

// endregion: --- Imports

// region:    --- Bid Rule
/// 입찰 거절 사유
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Bid must be at least as much as the starting price, and larger than all existing bids!")]
pub struct BidRejection {
    pub amount: Decimal,
    pub starting_price: Decimal,
    pub max_bid: Option<Decimal>,
}

/// 입찰 목록에서 최고 입찰가 계산
pub fn max_bid<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().max()
}

/// 입찰 수락 여부 판단
pub fn evaluate_bid(
    starting_price: Decimal,
    max_bid: Option<Decimal>,
    amount: Decimal,
) -> Result<(), BidRejection> {
    let floor = max_bid.unwrap_or(Decimal::ZERO);
    if amount >= starting_price && amount > floor {
        Ok(())
    } else {
        Err(BidRejection {
            amount,
            starting_price,
            max_bid,
        })
    }
}
// endregion: --- Bid Rule

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn first_bid_at_starting_price_is_accepted() {
        assert!(evaluate_bid(d("10"), None, d("10")).is_ok());
        assert!(evaluate_bid(d("10"), None, d("10.01")).is_ok());
    }

    #[test]
    fn first_bid_below_starting_price_is_rejected() {
        let rejection = evaluate_bid(d("10"), None, d("9.99")).unwrap_err();
        assert_eq!(rejection.amount, d("9.99"));
        assert_eq!(rejection.max_bid, None);
    }

    #[test]
    fn tie_with_current_max_is_rejected() {
        assert!(evaluate_bid(d("10"), Some(d("15")), d("15")).is_err());
        assert!(evaluate_bid(d("10"), Some(d("15")), d("15.01")).is_ok());
    }

    #[test]
    fn zero_starting_price_rejects_zero_bid() {
        assert!(evaluate_bid(Decimal::ZERO, None, Decimal::ZERO).is_err());
        assert!(evaluate_bid(Decimal::ZERO, None, d("0.01")).is_ok());
    }

    #[test]
    fn starting_price_tie_needs_to_beat_existing_bids() {
        // 시작가보다 낮은 기존 입찰은 정상 흐름에서는 생기지 않지만 규칙은 두 조건을 모두 본다
        assert!(evaluate_bid(d("10"), Some(d("5")), d("10")).is_ok());
        assert!(evaluate_bid(d("10"), Some(d("10")), d("10")).is_err());
    }

    #[test]
    fn accepted_iff_above_max_when_max_exceeds_start() {
        let start = d("10");
        let max = d("20");
        let cases = [("19.99", false), ("20", false), ("20.01", true), ("100", true)];
        for (amount, accepted) in cases {
            let result = evaluate_bid(start, Some(max), d(amount));
            assert_eq!(result.is_ok(), accepted, "{}", amount);
        }
    }

    #[test]
    fn max_bid_of_empty_history_is_none() {
        assert_eq!(max_bid(Vec::new()), None);
        assert_eq!(max_bid(vec![d("3"), d("12.5"), d("7")]), Some(d("12.5")));
    }
}
