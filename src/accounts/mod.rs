/// 계정 관련 처리
/// 1. 회원 가입
/// 2. 로그인 / 로그아웃
/// 3. 세션 검증
// region:    --- Imports
use crate::auction::forms::{LoginForm, RegisterForm};
use crate::auction::model::{Session, User};
use crate::error::AppError;
use crate::store::AuctionStore;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Modules
pub mod password;
pub mod session;

pub use session::CurrentUser;
// endregion: --- Modules

// region:    --- Accounts
pub const INVALID_CREDENTIALS: &str = "Invalid username and/or password.";

/// 현재 시각 기준 세션 만료 시각
pub fn session_expiry(session_ttl: Duration) -> Result<DateTime<Utc>, AppError> {
    Utc::now()
        .checked_add_signed(session_ttl)
        .ok_or_else(|| AppError::Internal("Session expiry is out of range".to_string()))
}

/// 1. 회원 가입 후 바로 로그인
pub async fn register(
    store: &dyn AuctionStore,
    form: RegisterForm,
    session_ttl: Duration,
) -> Result<(User, Session), AppError> {
    info!("{:<12} --> 회원 가입 요청: {}", "Accounts", form.username);
    form.validate()?;
    let expires_at = session_expiry(session_ttl)?;

    let password_hash = password::hash_password(&form.password)?;
    let user = store
        .create_user(form.username.trim(), form.email.trim(), &password_hash)
        .await?;
    let session = store.create_session(user.id, expires_at).await?;

    info!("{:<12} --> 회원 가입 성공 id: {}", "Accounts", user.id);
    Ok((user, session))
}

/// 2. 로그인
pub async fn login(
    store: &dyn AuctionStore,
    form: LoginForm,
    session_ttl: Duration,
) -> Result<(User, Session), AppError> {
    info!("{:<12} --> 로그인 요청: {}", "Accounts", form.username);
    let expires_at = session_expiry(session_ttl)?;
    let user = match store.find_user_by_username(form.username.trim()).await? {
        Some(user) if password::verify_password(&form.password, &user.password_hash) => user,
        _ => {
            warn!("{:<12} --> 로그인 실패: {}", "Accounts", form.username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    let session = store.create_session(user.id, expires_at).await?;
    Ok((user, session))
}

/// 2. 로그아웃
pub async fn logout(store: &dyn AuctionStore, token: Uuid) -> Result<(), AppError> {
    info!("{:<12} --> 로그아웃", "Accounts");
    store.delete_session(token).await
}

/// 3. 세션 검증. 만료된 세션은 삭제한다
pub async fn authenticate(store: &dyn AuctionStore, token: Uuid) -> Result<Session, AppError> {
    let session = store
        .find_session(token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

    if session.is_expired(Utc::now()) {
        store.delete_session(token).await?;
        return Err(AppError::Unauthorized("Invalid or expired session".to_string()));
    }
    Ok(session)
}
// endregion: --- Accounts

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn register_form(username: &str, password: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
            confirmation: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = InMemoryStore::new();
        let (user, session) = register(&store, register_form("alice", "pw"), Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(session.user_id, user.id);

        let login_form = LoginForm {
            username: "alice".to_string(),
            password: "pw".to_string(),
        };
        let (logged_in, _) = login(&store, login_form, Duration::hours(1)).await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let store = InMemoryStore::new();
        register(&store, register_form("bob", "pw"), Duration::hours(1))
            .await
            .unwrap();
        match register(&store, register_form("bob", "other"), Duration::hours(1)).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Username already taken."),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let store = InMemoryStore::new();
        register(&store, register_form("carol", "right"), Duration::hours(1))
            .await
            .unwrap();
        let form = LoginForm {
            username: "carol".to_string(),
            password: "wrong".to_string(),
        };
        assert!(matches!(
            login(&store, form, Duration::hours(1)).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_removed() {
        let store = InMemoryStore::new();
        let (_, session) = register(&store, register_form("dave", "pw"), Duration::hours(-1))
            .await
            .unwrap();
        assert!(authenticate(&store, session.token).await.is_err());
        assert!(store.find_session(session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn oversized_session_ttl_is_an_error_not_a_panic() {
        let store = InMemoryStore::new();
        let ttl = Duration::hours(10_000_000_000);
        match register(&store, register_form("frank", "pw"), ttl).await {
            Err(AppError::Internal(_)) => {}
            other => panic!("unexpected: {:?}", other),
        }
        // 세션을 만들 수 없으면 사용자도 만들지 않는다
        assert!(store.find_user_by_username("frank").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_invalidates_session() {
        let store = InMemoryStore::new();
        let (_, session) = register(&store, register_form("erin", "pw"), Duration::hours(1))
            .await
            .unwrap();
        assert!(authenticate(&store, session.token).await.is_ok());
        logout(&store, session.token).await.unwrap();
        assert!(authenticate(&store, session.token).await.is_err());
    }
}
