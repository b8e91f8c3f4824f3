//! CLI for the pending-request expiry sweep
//!
//! Runs one sweep against the configured database and prints the report as
//! JSON, for operators and external schedulers.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use collab_core::config::Config;
use collab_core::domains::auth::JwtService;
use collab_core::domains::collaboration::actions::sweep_expired;
use collab_core::kernel::ServerDeps;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "sweep_cli")]
#[command(about = "Expire pending collaboration requests past their TTL")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expire every stale pending request
    Run {
        /// Evaluate staleness as of this instant (RFC 3339) instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// List stale pending requests without changing them
    Preview {
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
}

#[derive(Serialize)]
struct StaleRequest {
    id: Uuid,
    brand_id: Uuid,
    creator_id: Uuid,
    updated_at: DateTime<Utc>,
}

fn output<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,collab_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let deps = build_deps().await?;

    match cli.command {
        Commands::Run { at } => cmd_run(&deps, at.unwrap_or_else(Utc::now)).await,
        Commands::Preview { limit } => cmd_preview(&deps, limit).await,
    }
}

async fn build_deps() -> Result<ServerDeps> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer));
    Ok(ServerDeps::postgres(
        pool,
        jwt_service,
        config.lifecycle,
        config.retry,
    ))
}

async fn cmd_run(deps: &ServerDeps, at: DateTime<Utc>) -> Result<()> {
    let report = sweep_expired(at, deps)
        .await
        .context("Expiry sweep failed")?;
    output(&report)
}

async fn cmd_preview(deps: &ServerDeps, limit: i64) -> Result<()> {
    let cutoff = Utc::now() - deps.lifecycle.request_ttl;
    let stale = deps
        .requests
        .find_stale_pending(cutoff, None, limit.max(1))
        .await
        .context("Failed to list stale requests")?;

    let rows: Vec<StaleRequest> = stale
        .into_iter()
        .map(|r| StaleRequest {
            id: r.id.into_uuid(),
            brand_id: r.brand_id.into_uuid(),
            creator_id: r.creator_id.into_uuid(),
            updated_at: r.updated_at,
        })
        .collect();

    output(&rows)
}
