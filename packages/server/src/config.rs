use anyhow::{Context, Result};
use chrono::Duration;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub expiry_sweep_cron: String,
    pub allowed_origins: Vec<String>,
    pub lifecycle: LifecyclePolicy,
    pub retry: RetryPolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let ttl_days: i64 = parse_or("REQUEST_TTL_DAYS", 30)?;
        if ttl_days <= 0 {
            anyhow::bail!("REQUEST_TTL_DAYS must be positive, got {}", ttl_days);
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_or("PORT", 8080)?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "collab-server".to_string()),
            expiry_sweep_cron: env::var("EXPIRY_SWEEP_CRON")
                .unwrap_or_else(|_| "0 0 * * * *".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            lifecycle: LifecyclePolicy {
                request_ttl: Duration::days(ttl_days),
                default_currency: env::var("DEFAULT_CURRENCY")
                    .unwrap_or_else(|_| "USD".to_string()),
                notify_timeout_ms: parse_or("NOTIFY_TIMEOUT_MS", 2000)?,
                sweep_batch_size: parse_or("SWEEP_BATCH_SIZE", 200)?,
            },
            retry: RetryPolicy {
                attempts: parse_or("READ_RETRY_ATTEMPTS", 3)?,
                base_delay_ms: parse_or("READ_RETRY_BASE_DELAY_MS", 50)?,
                max_delay_ms: parse_or("READ_RETRY_MAX_DELAY_MS", 1000)?,
            },
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}

/// Business knobs for the request lifecycle.
#[derive(Debug, Clone)]
pub struct LifecyclePolicy {
    /// How long a pending request may sit without activity before it expires.
    pub request_ttl: Duration,
    /// Currency applied when a budget omits one.
    pub default_currency: String,
    /// Upper bound on a single notification dispatch.
    pub notify_timeout_ms: u64,
    /// Records fetched per expiry sweep batch.
    pub sweep_batch_size: i64,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            request_ttl: Duration::days(30),
            default_currency: "USD".to_string(),
            notify_timeout_ms: 2000,
            sweep_batch_size: 200,
        }
    }
}

/// Bounded backoff for transient read failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total tries, including the first.
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-based): base * 2^retry, capped.
    pub fn delay_for(&self, retry: u32) -> std::time::Duration {
        let factor = 2u64.saturating_pow(retry.min(20));
        let ms = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        std::time::Duration::from_millis(ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay_ms: 50,
            max_delay_ms: 1000,
        }
    }
}
