// region:    --- Imports
use crate::error::AppError;
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Config
/// 저장소 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(AppError::Config(format!("Invalid AUCTION_STORE: {}", other))),
        }
    }
}

/// 세션 유효 기간 상한 (1년)
pub const MAX_SESSION_EXPIRY_HOURS: i64 = 24 * 365;

/// 환경 변수 기반 서버 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub reset_database: bool,
    pub session_expiry_hours: i64,
    pub session_sweep_secs: u64,
    pub store: StoreKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            database_url: None,
            db_max_connections: 5,
            reset_database: false,
            session_expiry_hours: 24,
            session_sweep_secs: 3600,
            store: StoreKind::Postgres,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();
        let config = Config {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: std::env::var("DATABASE_URL").ok(),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            reset_database: parse_var("RESET_DATABASE", defaults.reset_database)?,
            session_expiry_hours: parse_var(
                "SESSION_EXPIRY_HOURS",
                defaults.session_expiry_hours,
            )?,
            session_sweep_secs: parse_var("SESSION_SWEEP_SECS", defaults.session_sweep_secs)?,
            store: parse_var("AUCTION_STORE", defaults.store)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 설정값 범위 검증
    pub fn validate(&self) -> Result<(), AppError> {
        if self.store == StoreKind::Postgres && self.database_url.is_none() {
            return Err(AppError::Config(
                "DATABASE_URL must be set for the postgres store".to_string(),
            ));
        }
        if !(1..=MAX_SESSION_EXPIRY_HOURS).contains(&self.session_expiry_hours) {
            return Err(AppError::Config(format!(
                "SESSION_EXPIRY_HOURS must be between 1 and {}",
                MAX_SESSION_EXPIRY_HOURS
            )));
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
// endregion: --- Config

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_kind_parses_case_insensitively() {
        assert_eq!("Postgres".parse::<StoreKind>().unwrap(), StoreKind::Postgres);
        assert_eq!(" memory ".parse::<StoreKind>().unwrap(), StoreKind::Memory);
        assert!("redis".parse::<StoreKind>().is_err());
    }

    #[test]
    fn session_expiry_must_stay_in_range() {
        let memory = Config {
            store: StoreKind::Memory,
            ..Config::default()
        };
        assert!(memory.validate().is_ok());

        for hours in [0, -1, MAX_SESSION_EXPIRY_HOURS + 1, 10_000_000_000] {
            let config = Config {
                session_expiry_hours: hours,
                ..memory.clone()
            };
            assert!(matches!(config.validate(), Err(AppError::Config(_))), "{}", hours);
        }
    }

    #[test]
    fn postgres_store_needs_database_url() {
        assert!(matches!(Config::default().validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn defaults_listen_on_port_3000() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.session_expiry_hours, 24);
    }
}
