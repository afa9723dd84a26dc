use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use tenant_config_core::process_mappings::DEFAULT_CACHE_CAPACITY;
use tenant_config_storage_sqlite::DEFAULT_POOL_SIZE;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub db_pool_size: u32,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub cache_capacity: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("TC_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid TC_LISTEN_ADDR")?;
        let db_path = std::env::var("TC_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let db_pool_size = std::env::var("TC_DB_POOL_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|size: &u32| *size > 0)
            .unwrap_or(DEFAULT_POOL_SIZE);
        let cors_allow = std::env::var("TC_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("TC_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let cache_capacity = std::env::var("TC_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|capacity: &u64| *capacity > 0)
            .unwrap_or(DEFAULT_CACHE_CAPACITY);
        Ok(Self {
            listen_addr,
            db_path,
            db_pool_size,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            cache_capacity,
        })
    }
}
