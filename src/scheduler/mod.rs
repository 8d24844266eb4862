/// 만료 세션 정리 스케줄러
// region:    --- Imports
use crate::error::AppError;
use crate::store::AuctionStore;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Session Sweeper
/// 만료 세션 정리 스케줄러
pub struct SessionSweeper {
    store: Arc<dyn AuctionStore>,
    period: Duration,
}

impl SessionSweeper {
    pub fn new(store: Arc<dyn AuctionStore>, period: Duration) -> Self {
        Self { store, period }
    }

    /// 세션 정리 스케줄러 시작
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = interval(self.period);
            loop {
                interval.tick().await;
                if let Err(e) = Self::sweep(self.store.as_ref()).await {
                    error!("{:<12} --> 세션 정리 중 오류 발생: {:?}", "Scheduler", e);
                }
            }
        })
    }

    /// 만료 세션 삭제
    pub async fn sweep(store: &dyn AuctionStore) -> Result<u64, AppError> {
        let removed = store.delete_expired_sessions(Utc::now()).await?;
        if removed > 0 {
            info!("{:<12} --> 만료 세션 {}개 삭제", "Scheduler", removed);
        } else {
            debug!("{:<12} --> 만료 세션 없음", "Scheduler");
        }
        Ok(removed)
    }
}
// endregion: --- Session Sweeper

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[tokio::test]
    async fn sweep_removes_only_expired_sessions() {
        let store = InMemoryStore::new();
        let user = store.create_user("sweeper", "", "hash").await.unwrap();
        let expired = store
            .create_session(user.id, Utc::now() - chrono::Duration::minutes(1))
            .await
            .unwrap();
        let live = store
            .create_session(user.id, Utc::now() + chrono::Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(SessionSweeper::sweep(&store).await.unwrap(), 1);
        assert!(store.find_session(expired.token).await.unwrap().is_none());
        assert!(store.find_session(live.token).await.unwrap().is_some());
    }
}
