use crate::config::Config;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::pin::Pin;
use tracing::info;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 데이터베이스 매니저 생성
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// 설정으로부터 데이터베이스 매니저 생성
    pub async fn from_config(config: &Config) -> Result<Self, crate::error::AppError> {
        let database_url = config.database_url.as_deref().ok_or_else(|| {
            crate::error::AppError::Config("DATABASE_URL must be set".to_string())
        })?;
        Ok(Self::connect(database_url, config.db_max_connections).await?)
    }

    /// 트랜잭션 실행
    pub async fn transaction<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: for<'c> FnOnce(
            &'c mut sqlx::Transaction<'_, sqlx::Postgres>,
        ) -> Pin<Box<dyn Future<Output = Result<R, E>> + Send + 'c>>,
        E: From<sqlx::Error>,
    {
        let mut tx = self.pool.begin().await?;
        let result = f(&mut tx).await;
        match result {
            Ok(r) => {
                tx.commit().await?;
                Ok(r)
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    /// 데이터베이스 초기화
    /// `reset`이면 기존 테이블을 지우고 다시 만든다
    pub async fn initialize_database(&self, reset: bool) -> Result<(), sqlx::Error> {
        if reset {
            info!("{:<12} --> 기존 테이블 삭제", "Database");
            let recreate_db_sql = include_str!("../../sql/00-recreate-db.sql");
            self.execute_multi_query(recreate_db_sql).await?;
        }

        let create_schema_sql = include_str!("../../sql/01-create-schema.sql");
        self.execute_multi_query(create_schema_sql).await?;

        Ok(())
    }

    /// 여러 쿼리 실행
    async fn execute_multi_query(&self, sql: &str) -> Result<(), sqlx::Error> {
        for query in sql.split(';') {
            let query = query.trim();
            if !query.is_empty() {
                sqlx::query(query).execute(&self.pool).await?;
            }
        }
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
