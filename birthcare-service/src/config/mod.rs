//! Environment-driven configuration.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::Secret;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct BirthcareConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub scheduler: SchedulerConfig,
    pub observability: ObservabilityConfig,
    pub service_name: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CORS allow-list; `*` opens the surface for local development.
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HS256 shared secret for validating bearer tokens issued by the
    /// identity provider.
    pub jwt_secret: Secret<String>,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Root directory for application document blobs.
    pub root: PathBuf,
}

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub sweep_interval_secs: u64,
    pub accrual_interval_secs: u64,
}

impl SchedulerConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn accrual_interval(&self) -> Duration {
        Duration::from_secs(self.accrual_interval_secs)
    }
}

#[derive(Clone, Debug)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl BirthcareConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("BIRTHCARE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("BIRTHCARE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let database_url =
            env::var("BIRTHCARE_DATABASE_URL").context("BIRTHCARE_DATABASE_URL must be set")?;
        let max_connections = env::var("BIRTHCARE_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?;
        let min_connections = env::var("BIRTHCARE_DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "2".to_string())
            .parse()?;

        let allowed_origins = env::var("BIRTHCARE_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let jwt_secret =
            env::var("BIRTHCARE_JWT_SECRET").context("BIRTHCARE_JWT_SECRET must be set")?;

        let storage_root = env::var("BIRTHCARE_STORAGE_ROOT")
            .unwrap_or_else(|_| "./storage".to_string())
            .into();

        let scheduler_enabled = env::var("BIRTHCARE_JOBS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);
        let sweep_interval_secs = env::var("BIRTHCARE_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?;
        let accrual_interval_secs = env::var("BIRTHCARE_ACCRUAL_INTERVAL_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()?;

        let log_level = env::var("BIRTHCARE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let otlp_endpoint = env::var("BIRTHCARE_OTLP_ENDPOINT").ok();

        Ok(Self {
            server: ServerConfig {
                host,
                port,
                allowed_origins,
            },
            database: DatabaseConfig {
                url: Secret::new(database_url),
                max_connections,
                min_connections,
            },
            auth: AuthConfig {
                jwt_secret: Secret::new(jwt_secret),
            },
            storage: StorageConfig {
                root: storage_root,
            },
            scheduler: SchedulerConfig {
                enabled: scheduler_enabled,
                sweep_interval_secs,
                accrual_interval_secs,
            },
            observability: ObservabilityConfig {
                log_level,
                otlp_endpoint,
            },
            service_name: "birthcare-service".to_string(),
        })
    }
}
