/// 요청 폼과 검증
/// 금액은 NUMERIC(10, 2) 컬럼에 맞춰 소수점 2자리, 정수부 8자리까지 허용한다.
// region:    --- Imports
use crate::error::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Limits
pub const MAX_TITLE_LENGTH: usize = 64;
pub const MAX_DESCRIPTION_LENGTH: usize = 256;
pub const MAX_IMAGE_URL_LENGTH: usize = 256;
pub const MAX_CATEGORY_NAME_LENGTH: usize = 64;
pub const MAX_COMMENT_LENGTH: usize = 256;
pub const MAX_USERNAME_LENGTH: usize = 150;

const AMOUNT_MAX_DIGITS: u32 = 10;
const AMOUNT_DECIMAL_PLACES: u32 = 2;

pub const INVALID_BID_FORM: &str = "Bid form was invalid! Try again";
// endregion: --- Limits

// region:    --- Amount
/// 금액 입력값. 문자열과 숫자 모두 받는다.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(serde_json::Number),
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

/// 금액 파싱 및 검증
pub fn parse_amount(input: &AmountInput) -> Option<Decimal> {
    let raw = match input {
        AmountInput::Text(text) => text.trim().to_string(),
        AmountInput::Number(number) => number.to_string(),
    };
    let amount = Decimal::from_str(&raw).ok()?;

    if amount < Decimal::ZERO {
        return None;
    }
    if amount.scale() > AMOUNT_DECIMAL_PLACES {
        return None;
    }
    let limit = Decimal::from(10_i64.pow(AMOUNT_MAX_DIGITS - AMOUNT_DECIMAL_PLACES));
    if amount >= limit {
        return None;
    }
    // "-0" 입력은 0으로 저장
    Some(if amount.is_zero() { Decimal::ZERO } else { amount })
}
// endregion: --- Amount

// region:    --- Forms
/// 입찰 폼
#[derive(Debug, Clone, Deserialize)]
pub struct BidForm {
    pub amount: AmountInput,
}

impl BidForm {
    pub fn validate(&self) -> Result<Decimal, AppError> {
        parse_amount(&self.amount)
            .ok_or_else(|| AppError::InvalidForm(INVALID_BID_FORM.to_string()))
    }
}

/// 상품 등록 폼
#[derive(Debug, Clone, Deserialize)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub starting_price: AmountInput,
    #[serde(default)]
    pub active: Option<bool>,
}

/// 검증된 상품 등록 폼
#[derive(Debug, Clone, PartialEq)]
pub struct ValidListingForm {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub starting_price: Decimal,
    pub active: bool,
}

impl ListingForm {
    pub fn validate(self) -> Result<ValidListingForm, AppError> {
        let title = required_text("title", &self.title, MAX_TITLE_LENGTH)?;
        let description = required_text("description", &self.description, MAX_DESCRIPTION_LENGTH)?;
        let image_url =
            optional_text("image_url", self.image_url.as_deref(), MAX_IMAGE_URL_LENGTH)?;
        let category =
            optional_text("category", self.category.as_deref(), MAX_CATEGORY_NAME_LENGTH)?;
        let starting_price = parse_amount(&self.starting_price).ok_or_else(|| {
            AppError::InvalidForm(
                "starting_price must be a non-negative amount with at most 2 decimal places"
                    .to_string(),
            )
        })?;

        Ok(ValidListingForm {
            title,
            description,
            image_url,
            category,
            starting_price,
            active: self.active.unwrap_or(true),
        })
    }
}

/// 댓글 폼
#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<String, AppError> {
        required_text("text", &self.text, MAX_COMMENT_LENGTH)
    }
}

/// 카테고리 생성 폼
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<String, AppError> {
        required_text("name", &self.name, MAX_CATEGORY_NAME_LENGTH)
    }
}

/// 회원 가입 폼
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), AppError> {
        required_text("username", &self.username, MAX_USERNAME_LENGTH)?;
        if self.password.is_empty() {
            return Err(AppError::InvalidForm("password is required".to_string()));
        }
        if self.password != self.confirmation {
            return Err(AppError::InvalidForm("Passwords must match.".to_string()));
        }
        Ok(())
    }
}

/// 로그인 폼
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// 관심 목록 폼
#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistForm {
    pub listing: i64,
    #[serde(default)]
    pub add: bool,
    #[serde(default)]
    pub remove: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchlistAction {
    Add(i64),
    Remove(i64),
}

impl WatchlistForm {
    pub fn action(&self) -> Result<WatchlistAction, AppError> {
        match (self.add, self.remove) {
            (true, false) => Ok(WatchlistAction::Add(self.listing)),
            (false, true) => Ok(WatchlistAction::Remove(self.listing)),
            _ => Err(AppError::InvalidForm(
                "exactly one of add or remove must be true".to_string(),
            )),
        }
    }
}
// endregion: --- Forms

// region:    --- Helpers
fn required_text(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidForm(format!("{} is required", field)));
    }
    if value.chars().count() > max {
        return Err(AppError::InvalidForm(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}

fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => required_text(field, value, max).map(Some),
    }
}
// endregion: --- Helpers

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> Option<Decimal> {
        parse_amount(&AmountInput::from(s))
    }

    #[test]
    fn parses_well_formed_amounts() {
        assert_eq!(amount("10"), Some(Decimal::new(10, 0)));
        assert_eq!(amount(" 9.99 "), Some(Decimal::new(999, 2)));
        assert_eq!(amount("0"), Some(Decimal::ZERO));
        assert_eq!(amount("99999999.99"), Some(Decimal::new(9_999_999_999, 2)));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for raw in ["", "abc", "-1", "-0.01", "1.234", "100000000", "12,50"] {
            assert_eq!(amount(raw), None, "{:?}", raw);
        }
    }

    #[test]
    fn accepts_json_numbers() {
        let form: BidForm = serde_json::from_str(r#"{"amount": 15.01}"#).unwrap();
        assert_eq!(form.validate().unwrap(), Decimal::new(1501, 2));

        let form: BidForm = serde_json::from_str(r#"{"amount": 7}"#).unwrap();
        assert_eq!(form.validate().unwrap(), Decimal::new(7, 0));
    }

    #[test]
    fn invalid_bid_form_uses_distinct_message() {
        let form: BidForm = serde_json::from_str(r#"{"amount": "ten"}"#).unwrap();
        match form.validate() {
            Err(AppError::InvalidForm(msg)) => assert_eq!(msg, INVALID_BID_FORM),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn listing_form_defaults_to_active_and_trims() {
        let form: ListingForm = serde_json::from_str(
            r#"{"title": "  Lamp ", "description": "Brass",
                "starting_price": "10.00", "image_url": ""}"#,
        )
        .unwrap();
        let valid = form.validate().unwrap();
        assert_eq!(valid.title, "Lamp");
        assert!(valid.active);
        assert_eq!(valid.image_url, None);
        assert_eq!(valid.category, None);
    }

    #[test]
    fn listing_form_rejects_long_title() {
        let form = ListingForm {
            title: "x".repeat(MAX_TITLE_LENGTH + 1),
            description: "d".to_string(),
            image_url: None,
            category: None,
            starting_price: AmountInput::from("1"),
            active: None,
        };
        assert!(matches!(form.validate(), Err(AppError::InvalidForm(_))));
    }

    #[test]
    fn register_form_requires_matching_passwords() {
        let form = RegisterForm {
            username: "alice".to_string(),
            email: String::new(),
            password: "one".to_string(),
            confirmation: "two".to_string(),
        };
        match form.validate() {
            Err(AppError::InvalidForm(msg)) => assert_eq!(msg, "Passwords must match."),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn watchlist_form_needs_one_action() {
        let form = WatchlistForm { listing: 3, add: true, remove: false };
        assert_eq!(form.action().unwrap(), WatchlistAction::Add(3));
        let form = WatchlistForm { listing: 3, add: true, remove: true };
        assert!(form.action().is_err());
    }
}
