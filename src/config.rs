use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// How many catalog dishes a quick report is built from.
    pub quick_report_dishes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let quick_report_dishes = std::env::var("QUICK_REPORT_DISHES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(3);
        Ok(Self {
            database_url,
            max_connections,
            quick_report_dishes,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_dir: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let api_url = std::env::var("DISHWISE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into());
        let session_dir = std::env::var("DISHWISE_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_dir());
        Self {
            api_url,
            session_dir,
        }
    }
}

pub fn default_session_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("dishwise")
}
