// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use collab_core::domains::auth::JwtService;
use collab_core::kernel::{scheduled_tasks, ServerDeps};
use collab_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,collab_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Collaboration Platform API");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        ttl_days = config.lifecycle.request_ttl.num_days(),
        sweep_cron = %config.expiry_sweep_cron,
        "Configuration loaded"
    );

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));
    let server_deps = Arc::new(ServerDeps::postgres(
        pool.clone(),
        jwt_service,
        config.lifecycle.clone(),
        config.retry.clone(),
    ));

    // Keep the scheduler alive for the lifetime of the server
    let _scheduler = scheduled_tasks::start_scheduler(server_deps.clone(), &config.expiry_sweep_cron)
        .await
        .context("Failed to start scheduled tasks")?;

    let app = build_app(pool, server_deps, &config.allowed_origins)?;

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("GraphQL playground: http://localhost:{}/graphql", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
