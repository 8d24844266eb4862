// region:    --- Imports
use auction_site::app::{self, AppState};
use auction_site::config::{Config, StoreKind};
use auction_site::database::DatabaseManager;
use auction_site::error::AppError;
use auction_site::scheduler::SessionSweeper;
use auction_site::store::{AuctionStore, InMemoryStore, PostgresStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Duration;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = Config::from_env()?;
    info!("{:<12} --> 설정 로드 완료: store={:?}", "Main", config.store);

    // 저장소 생성
    let store: Arc<dyn AuctionStore> = match config.store {
        StoreKind::Postgres => {
            let db_manager = Arc::new(DatabaseManager::from_config(&config).await?);
            if let Err(e) = db_manager.initialize_database(config.reset_database).await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresStore::new(db_manager))
        }
        StoreKind::Memory => {
            warn!("{:<12} --> 메모리 저장소 사용: 재시작 시 데이터가 사라집니다", "Main");
            InMemoryStore::new_shared()
        }
    };

    // 만료 세션 정리
    SessionSweeper::new(
        Arc::clone(&store),
        Duration::from_secs(config.session_sweep_secs.max(1)),
    )
    .start();

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind {}: {}", config.bind_addr, e)))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    info!("{:<12} --> Web Server: Listening on {}", "Main", local_addr);

    let routes_all = app::router(AppState::new(store, config));

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
